use thiserror::Error;

/// Boxed error returned by adapters and construct functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The single failure category reported by [`PropertiesLoader::load`].
///
/// [`PropertiesLoader::load`]: super::PropertiesLoader::load
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BindError {
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error("failed to convert property '{key}': {source}")]
    Conversion {
        key: String,
        source: ConversionError,
    },

    #[error("property '{key}' has type {type_name}, which no converter or adapter handles")]
    UnresolvedType { key: String, type_name: &'static str },

    #[error("strict binding of {type_name} found unmapped properties: {}", .keys.join(", "))]
    UnmappedProperties {
        type_name: &'static str,
        keys: Vec<String>,
    },

    #[error("the constructor of {type_name} could not be called: {source}")]
    Construction {
        type_name: &'static str,
        source: BoxError,
    },
}

/// A malformed type descriptor, detected before any value is converted.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum MetadataError {
    #[error("{type_name} requires an enclosing instance and cannot be instantiated")]
    EnclosingInstanceRequired { type_name: &'static str },

    #[error("{type_name} defines {found} binding constructors but must define exactly 1")]
    ConstructorCount { type_name: &'static str, found: usize },

    #[error("constructor parameter '{parameter}' of {type_name} has no property key")]
    MissingKey {
        type_name: &'static str,
        parameter: String,
    },
}

/// A present, non-empty value that could not be turned into its declared type.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConversionError {
    #[error("the value {input:?} was expected to be a {expected} but could not be parsed: {reason}")]
    InvalidNumber {
        input: String,
        expected: &'static str,
        reason: String,
    },

    #[error("the value {input:?} ({normalized}) is not a member of {enum_name}")]
    UnknownMember {
        input: String,
        normalized: String,
        enum_name: &'static str,
    },

    #[error("the adapter for {expected} rejected the value {input:?}: {source}")]
    Adapter {
        input: String,
        expected: &'static str,
        source: BoxError,
    },
}

impl ConversionError {
    /// The raw string that failed to convert.
    pub fn input(&self) -> &str {
        match self {
            ConversionError::InvalidNumber { input, .. }
            | ConversionError::UnknownMember { input, .. }
            | ConversionError::Adapter { input, .. } => input,
        }
    }
}
