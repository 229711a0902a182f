//! On-disk config documents, one per category.

use crate::catalog::{Catalog, Category};
use crate::document::Document;
use crate::error::{AssetError, Result};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, category: Category) -> PathBuf {
        self.dir.join(category.file_name())
    }

    /// Load a category document; a missing file is an empty document.
    pub fn load(&self, category: Category) -> Result<Document> {
        let path = self.path_for(category);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no document yet, starting empty");
                return Ok(Document::new());
            }
            Err(e) => return Err(e.into()),
        };
        Document::parse_bytes(&bytes).map_err(|e| match e {
            AssetError::Parse {
                line,
                column,
                message,
            } => AssetError::Parse {
                line,
                column,
                message: format!("{} ({})", message, path.display()),
            },
            other => other,
        })
    }

    /// Write a document through a temp file in the same directory, then
    /// rename it over the target. Readers see the old or the new file, never a
    /// partial one.
    pub fn save(&self, category: Category, doc: &Document) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(category);

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(doc.serialize().as_bytes())?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path)?;

        debug!(path = %path.display(), "saved document");
        Ok(path)
    }

    /// Installed entries of one category.
    pub fn installed(&self, category: Category) -> Result<Catalog> {
        let doc = self.load(category)?;
        let entries = Catalog::from_document(&doc)
            .by_category(category)
            .cloned()
            .collect();
        Ok(Catalog::new(entries))
    }

    /// Installed entries of every category.
    pub fn installed_all(&self) -> Result<Catalog> {
        let mut catalog = Catalog::default();
        for category in Category::ALL {
            catalog.extend(self.installed(category)?);
        }
        Ok(catalog)
    }

    pub fn is_installed(&self, category: Category, name: &str) -> Result<bool> {
        let doc = self.load(category)?;
        Ok(doc.find_entry(category.block_name(), name).is_some())
    }
}
