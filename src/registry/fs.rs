//! Directory-backed registry.
//!
//! Layout:
//!
//! ```text
//! <root>/index.cue                          catalog index
//! <root>/<module path>/<version>/asset.cue  asset definition
//! <root>/<module path>/<version>/module.cue dependency manifest (optional)
//! ```

use super::{FetchedModule, Registry};
use crate::catalog::{Catalog, ModuleRef};
use crate::document::Document;
use crate::error::{AssetError, Result};
use semver::Version;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

pub const INDEX_FILE: &str = "index.cue";

#[derive(Debug, Clone)]
pub struct FsRegistry {
    root: PathBuf,
    index: Option<PathBuf>,
}

impl FsRegistry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            index: None,
        }
    }

    /// Read the index from `path` instead of `<root>/index.cue`.
    pub fn with_index(mut self, path: impl Into<PathBuf>) -> Self {
        self.index = Some(path.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index_path(&self) -> PathBuf {
        self.index
            .clone()
            .unwrap_or_else(|| self.root.join(INDEX_FILE))
    }

    /// Load the catalog index as a read-only snapshot.
    pub fn load_index(&self) -> Result<Catalog> {
        let path = self.index_path();
        let bytes = std::fs::read(&path).map_err(|e| {
            AssetError::Registry(format!("failed to read index {}: {}", path.display(), e))
        })?;
        let doc = Document::parse_bytes(&bytes)?;
        let catalog = Catalog::from_document(&doc);
        debug!(path = %path.display(), entries = catalog.len(), "loaded catalog index");
        Ok(catalog)
    }

    fn module_dir(&self, module_path: &str) -> Result<PathBuf> {
        let relative = Path::new(module_path);
        let safe = !module_path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(AssetError::Registry(format!(
                "invalid module path '{}'",
                module_path
            )));
        }
        Ok(self.root.join(relative))
    }

    /// Versions published for a module, unsorted.
    fn versions(&self, dir: &Path) -> Result<Vec<Version>> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            AssetError::Registry(format!("module not found at {}: {}", dir.display(), e))
        })?;
        let mut versions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| AssetError::Registry(e.to_string()))?;
            if !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name();
            if let Some(version) = name.to_str().and_then(parse_version) {
                versions.push(version);
            }
        }
        Ok(versions)
    }
}

fn parse_version(s: &str) -> Option<Version> {
    Version::parse(s.strip_prefix('v')?).ok()
}

/// `v0` -> Some(0); anything else -> None.
fn parse_major(s: &str) -> Option<u64> {
    s.strip_prefix('v')?.parse().ok()
}

impl Registry for FsRegistry {
    fn resolve_version(&self, module_path: &str) -> Result<String> {
        let module = ModuleRef::parse(module_path);
        let dir = self.module_dir(&module.path)?;

        if let Some(exact) = module.version.as_deref().and_then(parse_version) {
            if dir.join(format!("v{}", exact)).is_dir() {
                return Ok(format!("{}@v{}", module.path, exact));
            }
            return Err(AssetError::Registry(format!(
                "version v{} of {} not found",
                exact, module.path
            )));
        }

        let major = match module.version.as_deref() {
            Some(v) => Some(parse_major(v).ok_or_else(|| {
                AssetError::Registry(format!("invalid version '{}' in {}", v, module_path))
            })?),
            None => None,
        };

        let latest = self
            .versions(&dir)?
            .into_iter()
            .filter(|v| major.map_or(true, |m| v.major == m))
            .max()
            .ok_or_else(|| {
                AssetError::Registry(format!("no matching version of {}", module_path))
            })?;

        let resolved = format!("{}@v{}", module.path, latest);
        debug!(module = module_path, resolved = %resolved, "resolved module version");
        Ok(resolved)
    }

    fn fetch(&self, versioned_path: &str) -> Result<FetchedModule> {
        let module = ModuleRef::parse(versioned_path);
        let version = module.version.as_deref().ok_or_else(|| {
            AssetError::Registry(format!("'{}' has no version", versioned_path))
        })?;
        if parse_version(version).is_none() {
            return Err(AssetError::Registry(format!(
                "invalid version '{}' in {}",
                version, versioned_path
            )));
        }
        let location = self.module_dir(&module.path)?.join(version);
        if !location.is_dir() {
            return Err(AssetError::Registry(format!(
                "module {} not available at {}",
                versioned_path,
                location.display()
            )));
        }
        Ok(FetchedModule {
            path: versioned_path.to_string(),
            location,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_versions(versions: &[&str]) -> (tempfile::TempDir, FsRegistry) {
        let dir = tempfile::tempdir().unwrap();
        for v in versions {
            std::fs::create_dir_all(dir.path().join("example.com/roles/go").join(v)).unwrap();
        }
        let registry = FsRegistry::new(dir.path());
        (dir, registry)
    }

    #[test]
    fn test_resolve_latest_for_major() {
        let (_dir, registry) = registry_with_versions(&["v0.1.0", "v0.10.2", "v0.9.0", "v1.0.0"]);
        assert_eq!(
            registry.resolve_version("example.com/roles/go@v0").unwrap(),
            "example.com/roles/go@v0.10.2"
        );
        assert_eq!(
            registry.resolve_version("example.com/roles/go").unwrap(),
            "example.com/roles/go@v1.0.0"
        );
    }

    #[test]
    fn test_resolve_exact_version() {
        let (_dir, registry) = registry_with_versions(&["v0.1.0", "v0.2.0"]);
        assert_eq!(
            registry.resolve_version("example.com/roles/go@v0.1.0").unwrap(),
            "example.com/roles/go@v0.1.0"
        );
        assert!(registry.resolve_version("example.com/roles/go@v0.3.0").is_err());
    }

    #[test]
    fn test_resolve_missing_module() {
        let (_dir, registry) = registry_with_versions(&[]);
        let err = registry.resolve_version("example.com/nothing@v0").unwrap_err();
        assert!(matches!(err, AssetError::Registry(_)));
        assert!(registry.resolve_version("example.com/roles/go@v2").is_err());
    }

    #[test]
    fn test_rejects_escaping_paths() {
        let (_dir, registry) = registry_with_versions(&["v0.1.0"]);
        assert!(registry.resolve_version("../etc@v0").is_err());
        assert!(registry.fetch("/etc/passwd@v0.1.0").is_err());
    }

    #[test]
    fn test_fetch_rejects_non_semver_version() {
        let (dir, registry) = registry_with_versions(&["v0.1.0"]);
        std::fs::create_dir_all(dir.path().join("outside")).unwrap();

        for bad in ["../../outside", "..", "v0", "0.1.0"] {
            let err = registry
                .fetch(&format!("example.com/roles/go@{}", bad))
                .unwrap_err();
            assert!(matches!(err, AssetError::Registry(_)), "{bad}: {err}");
        }
    }

    #[test]
    fn test_fetch() {
        let (dir, registry) = registry_with_versions(&["v0.1.0"]);
        let fetched = registry.fetch("example.com/roles/go@v0.1.0").unwrap();
        assert_eq!(fetched.location, dir.path().join("example.com/roles/go/v0.1.0"));
        assert!(registry.fetch("example.com/roles/go@v0.2.0").is_err());
        assert!(registry.fetch("example.com/roles/go").is_err());
    }

    #[test]
    fn test_load_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(INDEX_FILE),
            "roles: {\n\tgo: {\n\t\tmodule: \"example.com/roles/go@v0\"\n\t}\n}\n",
        )
        .unwrap();
        let catalog = FsRegistry::new(dir.path()).load_index().unwrap();
        assert_eq!(catalog.len(), 1);

        let missing = FsRegistry::new(dir.path()).with_index(dir.path().join("nope.cue"));
        assert!(missing.load_index().is_err());
    }
}
