//! Per-category field extraction for installed entries.

use crate::catalog::Category;
use crate::document::{FieldValue, StructValue};

/// Provenance field stamped first on every installed entry.
pub const ORIGIN_FIELD: &str = "origin";

/// A task's role: the name of an installed role, or the role body inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleRef {
    Name(String),
    Inline(StructValue),
}

impl RoleRef {
    pub fn from_value(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::String(name) => Some(RoleRef::Name(name.clone())),
            FieldValue::Struct(body) => Some(RoleRef::Inline(body.clone())),
            _ => None,
        }
    }

    pub fn into_value(self) -> FieldValue {
        match self {
            RoleRef::Name(name) => FieldValue::String(name),
            RoleRef::Inline(body) => FieldValue::Struct(body),
        }
    }
}

/// Build the entry body: `origin` first, then the category's allowed fields in
/// their fixed order. Fields outside the allow-list are dropped. For tasks,
/// `role` overrides whatever role the source carries.
pub fn build_entry(
    category: Category,
    source: &StructValue,
    provenance: &str,
    role: Option<RoleRef>,
) -> StructValue {
    let mut entry = StructValue::new().with(ORIGIN_FIELD, FieldValue::string(provenance));

    for &name in category.allowed_fields() {
        if category == Category::Task && name == "role" {
            let role = role
                .clone()
                .or_else(|| source.get(name).and_then(RoleRef::from_value));
            if let Some(role) = role {
                entry.push(name, role.into_value());
            }
            continue;
        }
        if let Some(value) = source.get(name) {
            entry.push(name, value.clone());
        }
    }

    entry
}
