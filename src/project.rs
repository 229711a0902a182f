use crate::error::Result;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    /// Detect the current project.
    pub fn detect() -> Result<Self> {
        let root = Self::get_project_root()?;
        Ok(Self { root })
    }

    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the project root directory
    /// Priority: git worktree/repo root (via --show-toplevel), then current directory
    fn get_project_root() -> Result<PathBuf> {
        if let Ok(output) = Command::new("git")
            .args(["rev-parse", "--show-toplevel"])
            .output()
        {
            if output.status.success() {
                let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if let Ok(canonical) = PathBuf::from(root).canonicalize() {
                    return Ok(canonical);
                }
            }
        }

        Ok(std::env::current_dir()?)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
