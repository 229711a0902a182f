use crate::config::Config;
use crate::error::Result;
use crate::installer::ConfigStore;
use crate::project::Project;
use crate::registry::FsRegistry;

/// Where an installed asset lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Global,
    Local,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Global => "global",
            Scope::Local => "local",
        }
    }
}

/// Registry configured for this project.
pub fn open_registry(project: &Project, config: &Config) -> Result<FsRegistry> {
    let registry = FsRegistry::new(config.registry_root(project.root())?);
    Ok(match config.index_path(project.root())? {
        Some(index) => registry.with_index(index),
        None => registry,
    })
}

/// Config stores to read installed assets from. The project-local store comes
/// last; it is skipped when it resolves to the global directory.
pub fn installed_stores(
    project: &Project,
    config: &Config,
    local_only: bool,
) -> Result<Vec<(Scope, ConfigStore)>> {
    let local = config.local_dir(project.root())?;
    if local_only {
        return Ok(vec![(Scope::Local, ConfigStore::new(local))]);
    }

    let global = config.global_dir()?;
    let mut stores = vec![(Scope::Global, ConfigStore::new(&global))];
    if local != global {
        stores.push((Scope::Local, ConfigStore::new(local)));
    }
    Ok(stores)
}
