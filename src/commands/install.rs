use super::helpers::open_registry;
use crate::catalog::{Catalog, CatalogEntry, Category};
use crate::cli::InstallCmd;
use crate::config::Config;
use crate::error::{AssetError, Result};
use crate::installer::{ConfigStore, InstallAction, InstallReport, Installer};
use crate::project::Project;

pub fn execute(project: &Project, config: &Config, cmd: &InstallCmd) -> Result<()> {
    let registry = open_registry(project, config)?;
    let catalog = registry.load_index()?;
    let entry = select_entry(&catalog, &cmd.name, cmd.category)?;

    let store = ConfigStore::new(config.target_dir(cmd.local, project.root())?);
    let report = Installer::new(&registry, &store).install_entry(&catalog, entry)?;

    print!("{}", format_report(&report));
    Ok(())
}

/// Pick the catalog entry to install. A name present in several categories
/// needs an explicit category.
pub fn select_entry<'c>(
    catalog: &'c Catalog,
    name: &str,
    category: Option<Category>,
) -> Result<&'c CatalogEntry> {
    if let Some(category) = category {
        return catalog
            .find(category, name)
            .ok_or_else(|| AssetError::NotFound(format!("{} '{}'", category, name)));
    }

    match catalog.find_named(name).as_slice() {
        [] => Err(AssetError::NotFound(format!("asset '{}'", name))),
        [entry] => Ok(*entry),
        several => {
            let categories: Vec<&str> = several.iter().map(|e| e.category.as_str()).collect();
            Err(AssetError::Validation(format!(
                "'{}' exists as {}; pick one with --category",
                name,
                categories.join(", ")
            )))
        }
    }
}

/// Dependencies first, then the requested asset.
pub fn format_report(report: &InstallReport) -> String {
    let mut out = String::new();
    for dependency in &report.dependencies {
        out.push_str(&format_report(dependency));
    }
    let verb = match report.action {
        InstallAction::Inserted => "Installed",
        InstallAction::Updated => "Updated",
    };
    out.push_str(&format!(
        "{} {} '{}' from {} -> {}\n",
        verb,
        report.category,
        report.name,
        report.origin,
        report.file.display()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ModuleRef;
    use std::path::PathBuf;

    fn entry(category: Category, name: &str) -> CatalogEntry {
        CatalogEntry {
            category,
            name: name.to_string(),
            module: Some(ModuleRef::parse("example.com/x@v0")),
            description: String::new(),
            tags: vec![],
        }
    }

    #[test]
    fn test_select_entry() {
        let catalog = Catalog::new(vec![
            entry(Category::Role, "review"),
            entry(Category::Task, "review"),
            entry(Category::Context, "env"),
        ]);

        assert_eq!(select_entry(&catalog, "env", None).unwrap().category, Category::Context);
        assert!(matches!(
            select_entry(&catalog, "review", None),
            Err(AssetError::Validation(_))
        ));
        assert_eq!(
            select_entry(&catalog, "review", Some(Category::Task)).unwrap().category,
            Category::Task
        );
        assert!(matches!(
            select_entry(&catalog, "missing", None),
            Err(AssetError::NotFound(_))
        ));
        assert!(matches!(
            select_entry(&catalog, "env", Some(Category::Role)),
            Err(AssetError::NotFound(_))
        ));
    }

    #[test]
    fn test_format_report_lists_dependencies_first() {
        let role = InstallReport {
            category: Category::Role,
            name: "go".to_string(),
            origin: "example.com/roles/go@v0.1.0".to_string(),
            action: InstallAction::Inserted,
            file: PathBuf::from("/cfg/roles.cue"),
            dependencies: vec![],
        };
        let task = InstallReport {
            category: Category::Task,
            name: "review".to_string(),
            origin: "example.com/tasks/review@v0.1.0".to_string(),
            action: InstallAction::Updated,
            file: PathBuf::from("/cfg/tasks.cue"),
            dependencies: vec![role],
        };
        assert_eq!(
            format_report(&task),
            "Installed role 'go' from example.com/roles/go@v0.1.0 -> /cfg/roles.cue\n\
             Updated task 'review' from example.com/tasks/review@v0.1.0 -> /cfg/tasks.cue\n"
        );
    }
}
