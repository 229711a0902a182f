//! Catalog of installable assets.
//!
//! A [`Catalog`] is a read-only snapshot. It is built from the remote index
//! document or from installed config documents through the same extraction,
//! so search and dependency lookup never care where an entry came from.

pub mod category;
pub mod entry;

pub use category::Category;
pub use entry::{CatalogEntry, ModuleRef};

use crate::document::Document;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Collect the entries of every category block in `doc`. Other blocks and
    /// non-struct entries are ignored.
    pub fn from_document(doc: &Document) -> Self {
        let mut entries = Vec::new();
        for (block, body) in doc.blocks() {
            let Some(category) = Category::from_block_name(block) else {
                continue;
            };
            for field in body.fields() {
                if let Some(fields) = field.value.as_struct() {
                    entries.push(CatalogEntry::from_fields(category, &field.key, fields));
                }
            }
        }
        Self { entries }
    }

    pub fn extend(&mut self, other: Catalog) {
        self.entries.extend(other.entries);
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(move |e| e.category == category)
    }

    pub fn find(&self, category: Category, name: &str) -> Option<&CatalogEntry> {
        self.by_category(category).find(|e| e.name == name)
    }

    /// All entries named `name`, across categories.
    pub fn find_named(&self, name: &str) -> Vec<&CatalogEntry> {
        self.entries.iter().filter(|e| e.name == name).collect()
    }

    /// Entry whose module path equals `module_path`. Version suffixes on
    /// either side are ignored.
    pub fn find_by_module(&self, module_path: &str) -> Option<&CatalogEntry> {
        let wanted = ModuleRef::base_path(module_path);
        self.entries
            .iter()
            .find(|e| e.module_path() == Some(wanted))
    }
}
