use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AssetError {
    pub(crate) fn parse(line: usize, column: usize, message: impl Into<String>) -> Self {
        AssetError::Parse {
            line,
            column,
            message: message.into(),
        }
    }

    /// True for errors caused by a malformed document rather than the environment.
    pub fn is_parse(&self) -> bool {
        matches!(self, AssetError::Parse { .. })
    }
}

impl From<tempfile::PersistError> for AssetError {
    fn from(err: tempfile::PersistError) -> Self {
        AssetError::Io(err.error)
    }
}

pub type Result<T> = std::result::Result<T, AssetError>;
