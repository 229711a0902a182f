use crate::error::{AssetError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four asset kinds. Declaration order is the search tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Agent,
    Role,
    Context,
    Task,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Agent,
        Category::Role,
        Category::Context,
        Category::Task,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Agent => "agent",
            Category::Role => "role",
            Category::Context => "context",
            Category::Task => "task",
        }
    }

    /// Block name in config documents and in the catalog index.
    pub fn block_name(&self) -> &'static str {
        match self {
            Category::Agent => "agents",
            Category::Role => "roles",
            Category::Context => "contexts",
            Category::Task => "tasks",
        }
    }

    /// Config document holding installed assets of this category.
    pub fn file_name(&self) -> &'static str {
        match self {
            Category::Agent => "agents.cue",
            Category::Role => "roles.cue",
            Category::Context => "contexts.cue",
            Category::Task => "tasks.cue",
        }
    }

    pub fn from_block_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.block_name() == name)
    }

    /// Fields copied from a module into an installed entry, in output order.
    pub fn allowed_fields(&self) -> &'static [&'static str] {
        match self {
            Category::Agent => &[
                "description",
                "tags",
                "bin",
                "command",
                "default_model",
                "models",
            ],
            Category::Role => &["description", "tags", "file", "command", "prompt", "optional"],
            Category::Context => &[
                "description",
                "tags",
                "file",
                "command",
                "prompt",
                "required",
                "default",
            ],
            Category::Task => &["description", "tags", "role", "file", "command", "prompt"],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AssetError;

    /// Accepts singular or plural, any case.
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == lower || c.block_name() == lower)
            .ok_or_else(|| {
                AssetError::Validation(format!(
                    "unknown category '{}' (expected agent, role, context or task)",
                    s
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_singular_and_plural() {
        assert_eq!("agent".parse::<Category>().unwrap(), Category::Agent);
        assert_eq!("Roles".parse::<Category>().unwrap(), Category::Role);
        assert_eq!("contexts".parse::<Category>().unwrap(), Category::Context);
        assert_eq!(" task ".parse::<Category>().unwrap(), Category::Task);
        assert!("skills".parse::<Category>().is_err());
    }

    #[test]
    fn test_precedence_order() {
        let mut cats = vec![Category::Task, Category::Context, Category::Agent, Category::Role];
        cats.sort();
        assert_eq!(cats, Category::ALL.to_vec());
    }

    #[test]
    fn test_block_names_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_block_name(category.block_name()), Some(category));
        }
        assert_eq!(Category::from_block_name("settings"), None);
    }

    #[test]
    fn test_task_fields_include_role() {
        assert!(Category::Task.allowed_fields().contains(&"role"));
        assert!(!Category::Role.allowed_fields().contains(&"role"));
        assert!(Category::Agent.allowed_fields().contains(&"models"));
    }
}
