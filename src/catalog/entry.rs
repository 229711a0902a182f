use super::category::Category;
use crate::document::{FieldValue, StructValue};
use serde::Serialize;
use std::fmt;

/// Module location plus an optional version (`v0` or `v0.2.1`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleRef {
    pub path: String,
    pub version: Option<String>,
}

impl ModuleRef {
    /// Split `path@version` at the last `@`.
    pub fn parse(s: &str) -> Self {
        match s.rsplit_once('@') {
            Some((path, version)) if !path.is_empty() && !version.is_empty() => Self {
                path: path.to_string(),
                version: Some(version.to_string()),
            },
            _ => Self {
                path: s.to_string(),
                version: None,
            },
        }
    }

    /// Path with the version suffix removed, for comparing references that
    /// pin different versions of one module.
    pub fn base_path(s: &str) -> &str {
        match s.rsplit_once('@') {
            Some((path, _)) if !path.is_empty() => path,
            _ => s,
        }
    }
}

impl fmt::Display for ModuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}@{}", self.path, version),
            None => f.write_str(&self.path),
        }
    }
}

/// One searchable asset, from the remote index or from an installed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub category: Category,
    pub name: String,
    pub module: Option<ModuleRef>,
    pub description: String,
    pub tags: Vec<String>,
}

impl CatalogEntry {
    /// Build an entry from a document entry body. Index entries name their
    /// module in `module`; installed entries carry it in `origin`.
    pub fn from_fields(category: Category, name: &str, fields: &StructValue) -> Self {
        let module = fields
            .get("module")
            .or_else(|| fields.get("origin"))
            .and_then(FieldValue::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(ModuleRef::parse);

        Self {
            category,
            name: name.to_string(),
            module,
            description: fields
                .get("description")
                .and_then(FieldValue::as_str)
                .unwrap_or_default()
                .to_string(),
            tags: fields
                .get("tags")
                .and_then(FieldValue::as_string_list)
                .unwrap_or_default(),
        }
    }

    pub fn module_path(&self) -> Option<&str> {
        self.module.as_ref().map(|m| m.path.as_str())
    }
}
