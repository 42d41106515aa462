//! Assembling flat property sets from files and the environment.

mod builder;
mod env;
mod error;
mod file;
mod resolve;
mod set;
mod source;

pub use builder::Properties;
pub use env::EnvSource;
pub use error::SourceError;
pub use file::FileSource;
pub use resolve::resolve_references;
pub use set::{PropertyMap, PropertySet};
pub use source::{MapSource, PropertySource};
