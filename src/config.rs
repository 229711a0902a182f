use crate::cli::Cli;
use crate::error::{AssetError, Result};
use crate::logging::LoggingConfig;
use crate::utils::path::{expand_tilde, resolve_dir};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of both the global (`~/.assetctl.toml`) and project config.
pub const CONFIG_FILE: &str = ".assetctl.toml";

pub const ENV_GLOBAL_DIR: &str = "ASSETCTL_GLOBAL_DIR";
pub const ENV_REGISTRY: &str = "ASSETCTL_REGISTRY";
pub const ENV_INDEX: &str = "ASSETCTL_INDEX";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub assets: AssetsConfig,

    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Directory holding the user's installed asset documents
    #[serde(default = "default_global_dir")]
    pub global_dir: String,

    /// Project-local directory, relative to the project root
    #[serde(default = "default_local_dir")]
    pub local_dir: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            global_dir: default_global_dir(),
            local_dir: default_local_dir(),
        }
    }
}

fn default_global_dir() -> String {
    "~/.config/assetctl".to_string()
}

fn default_local_dir() -> String {
    ".assetctl".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RegistryConfig {
    /// Registry directory containing `index.cue` and module directories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,

    /// Index document to use instead of `<root>/index.cue`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchConfig {
    /// Maximum number of results shown; unlimited when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl Config {
    /// Load configuration with precedence:
    /// 1. CLI flags (applied later via with_cli_overrides)
    /// 2. Environment variables
    /// 3. Project config (.assetctl.toml in project root)
    /// 4. Global config (~/.assetctl.toml)
    /// 5. Built-in defaults
    pub fn load(project_root: &Path) -> Result<Self> {
        let global = home_dir().map(|home| home.join(CONFIG_FILE));
        Self::load_from(global.as_deref(), project_root)
    }

    /// Same as [`Config::load`] with an explicit global config path.
    pub fn load_from(global_config: Option<&Path>, project_root: &Path) -> Result<Self> {
        let mut config = Self::default();

        if let Some(global_config) = global_config {
            if global_config.exists() {
                config = config.merge(Self::from_file(global_config)?);
            }
        }

        let project_config = project_root.join(CONFIG_FILE);
        if project_config.exists() {
            config = config.merge(Self::from_file(&project_config)?);
        }

        config = config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(mut self, other: Self) -> Self {
        if other.assets.global_dir != default_global_dir() {
            self.assets.global_dir = other.assets.global_dir;
        }
        if other.assets.local_dir != default_local_dir() {
            self.assets.local_dir = other.assets.local_dir;
        }

        if other.registry.root.is_some() {
            self.registry.root = other.registry.root;
        }
        if other.registry.index.is_some() {
            self.registry.index = other.registry.index;
        }

        if other.search.limit.is_some() {
            self.search.limit = other.search.limit;
        }

        let default_logging = LoggingConfig::default();
        if other.logging.level != default_logging.level {
            self.logging.level = other.logging.level;
        }
        if other.logging.format != default_logging.format {
            self.logging.format = other.logging.format;
        }
        if other.logging.color != default_logging.color {
            self.logging.color = other.logging.color;
        }
        self.logging.modules.extend(other.logging.modules);

        self
    }

    fn merge_env(mut self) -> Self {
        if let Some(dir) = non_empty_env(ENV_GLOBAL_DIR) {
            self.assets.global_dir = dir;
        }
        if let Some(root) = non_empty_env(ENV_REGISTRY) {
            self.registry.root = Some(root);
        }
        if let Some(index) = non_empty_env(ENV_INDEX) {
            self.registry.index = Some(index);
        }
        self
    }

    /// Apply CLI overrides (highest precedence)
    pub fn with_cli_overrides(mut self, cli: &Cli) -> Self {
        if cli.verbose {
            self.logging.level = "debug".to_string();
        }
        if let Some(registry) = &cli.registry {
            self.registry.root = Some(registry.to_string_lossy().to_string());
        }
        if let Some(index) = &cli.index {
            self.registry.index = Some(index.to_string_lossy().to_string());
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.search.limit == Some(0) {
            return Err(AssetError::InvalidConfig(
                "search.limit must be greater than 0".to_string(),
            ));
        }
        if self.assets.global_dir.trim().is_empty() {
            return Err(AssetError::InvalidConfig(
                "assets.global_dir cannot be empty".to_string(),
            ));
        }
        if self.assets.local_dir.trim().is_empty() {
            return Err(AssetError::InvalidConfig(
                "assets.local_dir cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn global_dir(&self) -> Result<PathBuf> {
        expand_tilde(&self.assets.global_dir).ok_or_else(|| {
            AssetError::InvalidConfig(format!(
                "cannot expand assets.global_dir '{}'",
                self.assets.global_dir
            ))
        })
    }

    pub fn local_dir(&self, project_root: &Path) -> Result<PathBuf> {
        resolve_dir(Path::new(&self.assets.local_dir), project_root).ok_or_else(|| {
            AssetError::InvalidConfig(format!(
                "cannot expand assets.local_dir '{}'",
                self.assets.local_dir
            ))
        })
    }

    /// Directory installs go to: project-local or global.
    pub fn target_dir(&self, local: bool, project_root: &Path) -> Result<PathBuf> {
        if local {
            self.local_dir(project_root)
        } else {
            self.global_dir()
        }
    }

    pub fn registry_root(&self, project_root: &Path) -> Result<PathBuf> {
        let root = self.registry.root.as_deref().ok_or_else(|| {
            AssetError::InvalidConfig(format!(
                "no registry configured; set registry.root in {} or {}",
                CONFIG_FILE, ENV_REGISTRY
            ))
        })?;
        resolve_dir(Path::new(root), project_root).ok_or_else(|| {
            AssetError::InvalidConfig(format!("cannot expand registry.root '{}'", root))
        })
    }

    pub fn index_path(&self, project_root: &Path) -> Result<Option<PathBuf>> {
        match self.registry.index.as_deref() {
            Some(index) => resolve_dir(Path::new(index), project_root)
                .map(Some)
                .ok_or_else(|| {
                    AssetError::InvalidConfig(format!("cannot expand registry.index '{}'", index))
                }),
            None => Ok(None),
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Get the home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}
