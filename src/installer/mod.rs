//! Writes assets into the per-category config documents.
//!
//! An install loads the target document, upserts a single entry into the
//! category block, and writes the file back atomically. Anything else in the
//! document (other blocks, comments, hand-edited entries) passes through.

pub mod fields;
pub mod store;

pub use fields::{build_entry, RoleRef, ORIGIN_FIELD};
pub use store::ConfigStore;

use crate::catalog::{Catalog, CatalogEntry, Category};
use crate::document::{FieldValue, StructValue, Upsert};
use crate::error::{AssetError, Result};
use crate::registry::{AssetModule, Registry};
use crate::resolver;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallAction {
    Inserted,
    Updated,
}

impl From<Upsert> for InstallAction {
    fn from(upsert: Upsert) -> Self {
        match upsert {
            Upsert::Inserted => InstallAction::Inserted,
            Upsert::Replaced => InstallAction::Updated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    pub category: Category,
    pub name: String,
    pub origin: String,
    pub action: InstallAction,
    pub file: PathBuf,
    /// Assets installed first because this one depends on them.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<InstallReport>,
}

pub struct Installer<'a, R: Registry + ?Sized> {
    registry: &'a R,
    store: &'a ConfigStore,
}

impl<'a, R: Registry + ?Sized> Installer<'a, R> {
    pub fn new(registry: &'a R, store: &'a ConfigStore) -> Self {
        Self { registry, store }
    }

    pub fn store(&self) -> &ConfigStore {
        self.store
    }

    /// Upsert `name` into the category's document with fields taken from
    /// `source` and `origin` set to `provenance`.
    pub fn install(
        &self,
        category: Category,
        name: &str,
        source: &StructValue,
        provenance: &str,
    ) -> Result<InstallReport> {
        self.install_with_role(category, name, source, provenance, None)
    }

    /// Same as [`Installer::install`], with the task's role replaced by `role`.
    pub fn install_with_role(
        &self,
        category: Category,
        name: &str,
        source: &StructValue,
        provenance: &str,
        role: Option<RoleRef>,
    ) -> Result<InstallReport> {
        if name.is_empty() {
            return Err(AssetError::Validation("asset name cannot be empty".to_string()));
        }

        let entry = build_entry(category, source, provenance, role);
        let mut doc = self.store.load(category)?;
        let upsert = doc.upsert_entry(category.block_name(), name, FieldValue::Struct(entry))?;
        let file = self.store.save(category, &doc)?;

        let action = InstallAction::from(upsert);
        info!(
            category = %category,
            name,
            origin = provenance,
            action = ?action,
            file = %file.display(),
            "installed asset"
        );

        Ok(InstallReport {
            category,
            name: name.to_string(),
            origin: provenance.to_string(),
            action,
            file,
            dependencies: Vec::new(),
        })
    }

    /// Resolve, fetch and install a catalog entry. Tasks whose module depends
    /// on a role found in `catalog` get that role installed first (when it is
    /// not already) and reference it by name.
    pub fn install_entry(&self, catalog: &Catalog, entry: &CatalogEntry) -> Result<InstallReport> {
        let asset = self.fetch_asset(entry)?;
        self.install_asset(catalog, entry, &asset)
    }

    fn fetch_asset(&self, entry: &CatalogEntry) -> Result<AssetModule> {
        let module = entry.module.as_ref().ok_or_else(|| {
            AssetError::Validation(format!(
                "{} '{}' has no module reference",
                entry.category, entry.name
            ))
        })?;

        let versioned = self.registry.resolve_version(&module.to_string())?;
        let fetched = self.registry.fetch(&versioned)?;
        let asset = AssetModule::load(&fetched, entry.category)?;
        debug!(
            module = %asset.path,
            dependencies = asset.dependencies.len(),
            "fetched asset module"
        );
        Ok(asset)
    }

    fn install_asset(
        &self,
        catalog: &Catalog,
        entry: &CatalogEntry,
        asset: &AssetModule,
    ) -> Result<InstallReport> {
        let mut dependencies = Vec::new();
        let role = if entry.category == Category::Task {
            self.install_role_dependency(catalog, asset, &mut dependencies)?
        } else {
            None
        };

        let mut report =
            self.install_with_role(entry.category, &entry.name, &asset.fields, &asset.path, role)?;
        report.dependencies = dependencies;
        Ok(report)
    }

    /// Role to reference from a task, installing it when missing. A role whose
    /// module cannot be resolved, fetched or read leaves the task's inline
    /// role in place; failures writing the local store still abort.
    fn install_role_dependency(
        &self,
        catalog: &Catalog,
        asset: &AssetModule,
        installed: &mut Vec<InstallReport>,
    ) -> Result<Option<RoleRef>> {
        let Some(role) = resolver::resolve_role_dependency(catalog, &asset.dependencies) else {
            return Ok(None);
        };

        if self.store.is_installed(Category::Role, &role.name)? {
            debug!(role = %role.name, "role dependency already installed");
            return Ok(Some(RoleRef::Name(role.name.clone())));
        }

        let role_asset = match self.fetch_asset(role) {
            Ok(role_asset) => role_asset,
            Err(e @ (AssetError::Registry(_) | AssetError::Parse { .. })) => {
                warn!(role = %role.name, reason = %e, "could not fetch role dependency, keeping inline role");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let report = self.install_asset(catalog, role, &role_asset)?;
        installed.push(report);
        Ok(Some(RoleRef::Name(role.name.clone())))
    }
}
