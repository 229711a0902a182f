//! Role dependency detection for task modules.

use crate::catalog::{Catalog, CatalogEntry, Category, ModuleRef};
use std::collections::BTreeMap;
use tracing::debug;

/// Path segment that marks a module as a role.
pub const ROLE_MARKER: &str = "roles";

/// First dependency path (in lexicographic order) with a `roles` segment.
///
/// When a task depends on several roles the lexicographic pick is arbitrary
/// but stable.
pub fn find_role_dependency(dependencies: &BTreeMap<String, String>) -> Option<&str> {
    dependencies
        .keys()
        .map(String::as_str)
        .find(|path| is_role_path(path))
}

fn is_role_path(path: &str) -> bool {
    ModuleRef::base_path(path)
        .split('/')
        .any(|segment| segment == ROLE_MARKER)
}

/// Catalog role entry for the task's role dependency, if there is one.
/// Misses are not errors: the task keeps its inline role.
pub fn resolve_role_dependency<'c>(
    catalog: &'c Catalog,
    dependencies: &BTreeMap<String, String>,
) -> Option<&'c CatalogEntry> {
    let Some(path) = find_role_dependency(dependencies) else {
        debug!("task declares no role dependency");
        return None;
    };
    let wanted = ModuleRef::base_path(path);
    let found = catalog
        .by_category(Category::Role)
        .find(|entry| entry.module_path() == Some(wanted));
    if found.is_none() {
        debug!(dependency = path, "role dependency not in catalog, keeping inline role");
    }
    found
}
