use crate::binding::BindError;
use crate::properties::SourceError;
use thiserror::Error;

/// Top-level error type for the propbind library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("binding error: {0}")]
    Bind(#[from] BindError),

    #[error("property source error: {0}")]
    Source(#[from] SourceError),
}
