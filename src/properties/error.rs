use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("required properties file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read properties file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse properties file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid escape sequence on line {line} of '{path}'")]
    InvalidEscape { path: PathBuf, line: usize },

    #[error("property '{key}' in '{path}' is not a scalar value")]
    NonScalarValue { path: PathBuf, key: String },

    #[error("environment separator for prefix '{0}' must not be empty")]
    EmptySeparator(String),

    #[error("circular reference detected while resolving '{0}'")]
    CircularReference(String),

    #[error("referenced property not found: {0}")]
    ReferenceNotFound(String),

    #[error("invalid reference in property '{0}'")]
    InvalidReference(String),

    #[error("unclosed reference (missing '}}') in property '{0}'")]
    UnclosedReference(String),
}
