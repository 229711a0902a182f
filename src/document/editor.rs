//! Structural editing of config documents.
//!
//! A document is a sequence of top-level members; the members whose value is a
//! struct are category blocks, and the fields of a block are its entries.
//! Edits go through the tree, so an entry can only ever land inside the block
//! it was addressed to.

use super::format;
use super::parser;
use super::value::{Field, FieldValue, Member, StructValue};
use crate::error::{AssetError, Result};

/// Outcome of an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Replaced,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub members: Vec<Member>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(src: &str) -> Result<Self> {
        parser::parse(src)
    }

    pub fn parse_bytes(bytes: &[u8]) -> Result<Self> {
        parser::parse_bytes(bytes)
    }

    pub fn serialize(&self) -> String {
        format::serialize(self)
    }

    /// True when the document holds nothing but blank lines.
    pub fn is_empty(&self) -> bool {
        self.members.iter().all(|m| matches!(m, Member::Blank))
    }

    /// Top-level fields whose value is a struct, in document order.
    pub fn blocks(&self) -> impl Iterator<Item = (&str, &StructValue)> {
        self.members.iter().filter_map(|m| match m {
            Member::Field(Field {
                key,
                value: FieldValue::Struct(body),
                ..
            }) => Some((key.as_str(), body)),
            _ => None,
        })
    }

    pub fn find_block(&self, name: &str) -> Option<&StructValue> {
        self.blocks().find(|(key, _)| *key == name).map(|(_, body)| body)
    }

    pub fn find_block_mut(&mut self, name: &str) -> Option<&mut StructValue> {
        self.members.iter_mut().find_map(|m| match m {
            Member::Field(Field {
                key,
                value: FieldValue::Struct(body),
                ..
            }) if key == name => Some(body),
            _ => None,
        })
    }

    pub fn find_entry(&self, block: &str, key: &str) -> Option<&Field> {
        self.find_block(block)?.find_entry(key)
    }

    /// Append a new block holding one entry. A brand new document gets a
    /// short header comment first.
    pub fn create_block(&mut self, name: &str, first_key: &str, first_value: FieldValue) {
        if self.is_empty() {
            self.members.clear();
            self.members
                .push(Member::Comment(format!(" {} installed by assetctl.", name)));
            self.members.push(Member::Comment(
                " Entries may be edited by hand; reinstalling an asset replaces its entry."
                    .to_string(),
            ));
            self.members.push(Member::Blank);
        } else if !matches!(self.members.last(), Some(Member::Blank)) {
            self.members.push(Member::Blank);
        }

        let body = StructValue::new().with(first_key, first_value);
        self.members
            .push(Member::Field(Field::new(name, FieldValue::Struct(body))));
    }

    /// Insert or replace `key` inside `block`, creating the block if needed.
    pub fn upsert_entry(&mut self, block: &str, key: &str, value: FieldValue) -> Result<Upsert> {
        self.ensure_not_scalar(block)?;
        match self.find_block_mut(block) {
            Some(body) => Ok(body.upsert_entry(key, value)),
            None => {
                self.create_block(block, key, value);
                Ok(Upsert::Inserted)
            }
        }
    }

    /// Replace an existing entry; the block and the entry must both exist.
    pub fn update_entry(&mut self, block: &str, key: &str, value: FieldValue) -> Result<()> {
        let body = self
            .find_block_mut(block)
            .ok_or_else(|| AssetError::NotFound(format!("block '{}'", block)))?;
        let field = body
            .get_field_mut(key)
            .ok_or_else(|| AssetError::NotFound(format!("entry '{}' in '{}'", key, block)))?;
        field.value = value;
        Ok(())
    }

    /// Remove an entry and return its value.
    pub fn remove_entry(&mut self, block: &str, key: &str) -> Result<FieldValue> {
        let body = self
            .find_block_mut(block)
            .ok_or_else(|| AssetError::NotFound(format!("block '{}'", block)))?;
        let index = body
            .position(key)
            .ok_or_else(|| AssetError::NotFound(format!("entry '{}' in '{}'", key, block)))?;
        match body.members.remove(index) {
            Member::Field(field) => Ok(field.value),
            _ => Err(AssetError::NotFound(format!("entry '{}' in '{}'", key, block))),
        }
    }

    fn ensure_not_scalar(&self, block: &str) -> Result<()> {
        let clash = self.members.iter().any(|m| {
            matches!(m, Member::Field(f) if f.key == block && !matches!(f.value, FieldValue::Struct(_)))
        });
        if clash && self.find_block(block).is_none() {
            return Err(AssetError::InvalidConfig(format!(
                "'{}' is defined but is not a block",
                block
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl StructValue {
    /// Entry lookup by logical key; `"x"` and `x` name the same entry.
    pub fn find_entry(&self, key: &str) -> Option<&Field> {
        self.get_field(key)
    }

    pub fn upsert_entry(&mut self, key: &str, value: FieldValue) -> Upsert {
        match self.get_field_mut(key) {
            Some(field) => {
                field.value = value;
                Upsert::Replaced
            }
            None => {
                self.push(key, value);
                Upsert::Inserted
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(file: &str) -> FieldValue {
        FieldValue::Struct(StructValue::new().with("file", FieldValue::string(file)))
    }

    #[test]
    fn test_upsert_into_new_document_adds_header() {
        let mut doc = Document::new();
        assert_eq!(doc.upsert_entry("contexts", "x", entry("a.md")).unwrap(), Upsert::Inserted);
        let text = doc.serialize();
        assert!(text.starts_with("// contexts installed by assetctl.\n"));
        assert!(text.ends_with("contexts: {\n\tx: {\n\t\tfile: \"a.md\"\n\t}\n}\n"));
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut doc = Document::parse(
            "contexts: {\n\tfirst: { file: \"1\" }\n\t\"x\": { file: \"old\" } // keep\n\tlast: { file: \"2\" }\n}\n",
        )
        .unwrap();
        assert_eq!(doc.upsert_entry("contexts", "x", entry("new")).unwrap(), Upsert::Replaced);

        let block = doc.find_block("contexts").unwrap();
        assert_eq!(block.keys(), vec!["first", "x", "last"]);
        let x = block.find_entry("x").unwrap();
        assert_eq!(x.comment.as_deref(), Some(" keep"));
        assert_eq!(
            x.value.as_struct().unwrap().get("file").and_then(FieldValue::as_str),
            Some("new")
        );
    }

    #[test]
    fn test_upsert_targets_named_block_only() {
        let src = "contexts: {\n\ta: {\n\t\tfile: \"a\"\n\t}\n}\n\nsettings: {\n\tdefault_agent: \"claude\"\n\tshell: \"bash\"\n}\n";
        let mut doc = Document::parse(src).unwrap();
        doc.upsert_entry("contexts", "b", entry("b")).unwrap();

        let text = doc.serialize();
        assert_eq!(
            text,
            "contexts: {\n\ta: {\n\t\tfile: \"a\"\n\t}\n\tb: {\n\t\tfile: \"b\"\n\t}\n}\n\nsettings: {\n\tdefault_agent: \"claude\"\n\tshell: \"bash\"\n}\n"
        );
    }

    #[test]
    fn test_create_block_appends_after_existing() {
        let mut doc = Document::parse("// mine\nroles: {}\n").unwrap();
        doc.upsert_entry("tasks", "t", entry("t")).unwrap();
        let text = doc.serialize();
        assert_eq!(
            text,
            "// mine\nroles: {}\n\ntasks: {\n\tt: {\n\t\tfile: \"t\"\n\t}\n}\n"
        );
    }

    #[test]
    fn test_upsert_into_scalar_key_fails() {
        let mut doc = Document::parse("roles: \"nope\"\n").unwrap();
        assert!(doc.upsert_entry("roles", "x", entry("x")).is_err());
    }

    #[test]
    fn test_update_entry_not_found() {
        let mut doc = Document::parse("roles: { a: {} }\n").unwrap();
        assert!(matches!(
            doc.update_entry("agents", "a", entry("x")),
            Err(AssetError::NotFound(_))
        ));
        assert!(matches!(
            doc.update_entry("roles", "b", entry("x")),
            Err(AssetError::NotFound(_))
        ));
        doc.update_entry("roles", "a", entry("x")).unwrap();
        assert!(doc.find_entry("roles", "a").is_some());
    }

    #[test]
    fn test_remove_entry() {
        let mut doc = Document::parse("roles: { a: {}, b: {} }\n").unwrap();
        doc.remove_entry("roles", "a").unwrap();
        assert_eq!(doc.find_block("roles").unwrap().keys(), vec!["b"]);
        assert!(matches!(doc.remove_entry("roles", "a"), Err(AssetError::NotFound(_))));
    }

    #[test]
    fn test_quoted_and_unquoted_keys_match() {
        let doc = Document::parse("roles: { \"reviewer\": {} }\n").unwrap();
        assert!(doc.find_entry("roles", "reviewer").is_some());
        let doc = Document::parse("roles: { reviewer: {} }\n").unwrap();
        assert!(doc.find_entry("roles", "reviewer").is_some());
    }
}
