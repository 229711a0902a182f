use super::helpers::installed_stores;
use crate::catalog::{Catalog, Category};
use crate::cli::ListCmd;
use crate::config::Config;
use crate::error::Result;
use crate::installer::ORIGIN_FIELD;
use crate::project::Project;

pub fn execute(project: &Project, config: &Config, cmd: &ListCmd) -> Result<()> {
    let categories: Vec<Category> = match cmd.category {
        Some(category) => vec![category],
        None => Category::ALL.to_vec(),
    };

    let mut any = false;
    for (scope, store) in installed_stores(project, config, cmd.local)? {
        let mut catalog = Catalog::default();
        for &category in &categories {
            catalog.extend(store.installed(category)?);
        }
        if catalog.is_empty() {
            continue;
        }
        any = true;
        println!("{} ({}):", scope.as_str(), store.dir().display());
        print!("{}", format_installed(&catalog));
    }

    if !any {
        println!("No assets installed.");
    }
    Ok(())
}

/// One line per entry, grouped by category in catalog order.
pub fn format_installed(catalog: &Catalog) -> String {
    let mut out = String::new();
    for category in Category::ALL {
        let mut entries: Vec<_> = catalog.by_category(category).collect();
        if entries.is_empty() {
            continue;
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        out.push_str(&format!("  {}:\n", category.block_name()));
        for entry in entries {
            match &entry.module {
                Some(module) => out.push_str(&format!(
                    "    {:<30} {}: {}\n",
                    entry.name, ORIGIN_FIELD, module
                )),
                None => out.push_str(&format!("    {}\n", entry.name)),
            }
        }
    }
    out
}
