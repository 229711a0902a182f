//! Value tree for parsed config documents.

/// A field value as it appears in a config document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    String(String),
    Bool(bool),
    List(Vec<FieldValue>),
    Struct(StructValue),
    /// Anything the editor does not interpret (numbers, references,
    /// expressions). Kept verbatim.
    Passthrough(String),
}

impl FieldValue {
    pub fn string(value: impl Into<String>) -> Self {
        FieldValue::String(value.into())
    }

    pub fn string_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::List(items.into_iter().map(|s| FieldValue::String(s.into())).collect())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            FieldValue::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_struct_mut(&mut self) -> Option<&mut StructValue> {
        match self {
            FieldValue::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// String items of a list value; non-string items are skipped.
    pub fn as_string_list(&self) -> Option<Vec<String>> {
        match self {
            FieldValue::List(items) => Some(
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
            ),
            _ => None,
        }
    }
}

/// One line-level item inside a struct body (or at the top of a document).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Field(Field),
    /// Text after `//`, trailing whitespace removed.
    Comment(String),
    Blank,
    /// A top-level declaration that is not a `key: value` field, e.g. `package x`.
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Logical key, quoting removed.
    pub key: String,
    pub value: FieldValue,
    /// Same-line comment following the value.
    pub comment: Option<String>,
}

impl Field {
    pub fn new(key: impl Into<String>, value: FieldValue) -> Self {
        Self {
            key: key.into(),
            value,
            comment: None,
        }
    }
}

/// Ordered struct body. Field order is preserved exactly as parsed or inserted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructValue {
    pub members: Vec<Member>,
}

impl StructValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.members.iter().filter_map(|m| match m {
            Member::Field(f) => Some(f),
            _ => None,
        })
    }

    pub fn field_count(&self) -> usize {
        self.fields().count()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields().find(|f| f.key == key).map(|f| &f.value)
    }

    pub fn get_field(&self, key: &str) -> Option<&Field> {
        self.fields().find(|f| f.key == key)
    }

    pub fn get_field_mut(&mut self, key: &str) -> Option<&mut Field> {
        self.members.iter_mut().find_map(|m| match m {
            Member::Field(f) if f.key == key => Some(f),
            _ => None,
        })
    }

    pub fn keys(&self) -> Vec<&str> {
        self.fields().map(|f| f.key.as_str()).collect()
    }

    /// Append a field without checking for an existing key.
    pub fn push(&mut self, key: impl Into<String>, value: FieldValue) {
        self.members.push(Member::Field(Field::new(key, value)));
    }

    /// Builder form of [`StructValue::push`].
    pub fn with(mut self, key: impl Into<String>, value: FieldValue) -> Self {
        self.push(key, value);
        self
    }

    pub(crate) fn position(&self, key: &str) -> Option<usize> {
        self.members
            .iter()
            .position(|m| matches!(m, Member::Field(f) if f.key == key))
    }
}
