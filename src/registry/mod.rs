//! Module registry boundary.
//!
//! The installer only needs two things from a registry: turn a module path into
//! a concrete version, and make that version's content available locally. Any
//! failure is reported as [`AssetError::Registry`] without interpretation.

pub mod fs;

pub use fs::FsRegistry;

use crate::catalog::Category;
use crate::document::{Document, FieldValue, StructValue};
use crate::error::{AssetError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File inside a module holding the asset definition.
pub const ASSET_FILE: &str = "asset.cue";
/// Optional file inside a module declaring its dependencies.
pub const MODULE_FILE: &str = "module.cue";

pub trait Registry {
    /// Resolve `path@vN` (or a bare path) to a canonical `path@vN.M.P`.
    fn resolve_version(&self, module_path: &str) -> Result<String>;

    /// Make a resolved module available locally.
    fn fetch(&self, versioned_path: &str) -> Result<FetchedModule>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedModule {
    /// Canonical versioned module path; recorded as the installed entry's origin.
    pub path: String,
    /// Directory holding the module content.
    pub location: PathBuf,
}

/// Content of a fetched asset module.
#[derive(Debug, Clone)]
pub struct AssetModule {
    pub path: String,
    pub fields: StructValue,
    /// Dependency module path -> version.
    pub dependencies: BTreeMap<String, String>,
}

impl AssetModule {
    /// Read the asset block for `category` and the dependency manifest.
    pub fn load(fetched: &FetchedModule, category: Category) -> Result<Self> {
        let asset_path = fetched.location.join(ASSET_FILE);
        let doc = read_document(&asset_path)?.ok_or_else(|| {
            AssetError::Registry(format!(
                "module {} has no {}",
                fetched.path, ASSET_FILE
            ))
        })?;
        let fields = doc.find_block(category.as_str()).cloned().ok_or_else(|| {
            AssetError::Registry(format!(
                "module {} does not define a {}",
                fetched.path, category
            ))
        })?;

        let dependencies = match read_document(&fetched.location.join(MODULE_FILE))? {
            Some(manifest) => dependencies_from(&manifest),
            None => BTreeMap::new(),
        };

        Ok(Self {
            path: fetched.path.clone(),
            fields,
            dependencies,
        })
    }
}

/// `deps: { "path@v0": { v: "v0.1.0" } }`, or a plain version string per dependency.
fn dependencies_from(manifest: &Document) -> BTreeMap<String, String> {
    let Some(deps) = manifest.find_block("deps") else {
        return BTreeMap::new();
    };
    deps.fields()
        .map(|dep| {
            let version = match &dep.value {
                FieldValue::String(v) => v.clone(),
                FieldValue::Struct(body) => body
                    .get("v")
                    .and_then(FieldValue::as_str)
                    .unwrap_or_default()
                    .to_string(),
                _ => String::new(),
            };
            (dep.key.clone(), version)
        })
        .collect()
}

fn read_document(path: &Path) -> Result<Option<Document>> {
    if !path.exists() {
        return Ok(None);
    }
    let bytes = std::fs::read(path).map_err(|e| {
        AssetError::Registry(format!("failed to read {}: {}", path.display(), e))
    })?;
    Document::parse_bytes(&bytes).map(Some)
}
