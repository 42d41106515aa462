use std::path::Path;

use tracing::debug;

use super::env::EnvSource;
use super::file::FileSource;
use super::resolve::resolve_references;
use super::source::{MapSource, PropertySource};
use super::{PropertySet, SourceError};

/// Builder for assembling a flat property set from layered sources.
///
/// Sources are applied in registration order, with later sources replacing
/// keys set by earlier ones. Keys are flat strings; there is no nesting.
///
/// ## Variable References
///
/// Values can reference other properties using `${other.key}` syntax:
///
/// ```properties
/// server.host = localhost
/// server.url = http://${server.host}/api
/// ```
///
/// Use `$$` to escape a literal `$` (e.g., `$${VAR}` becomes `${VAR}`).
///
/// ## Example
///
/// ```no_run
/// use propbind::Properties;
///
/// let properties = Properties::builder()
///     .with_file("config/default.properties", true)
///     .with_env("MYAPP", "__")
///     .with_file("config/local.toml", false)
///     .build()?;
/// # Ok::<(), propbind::SourceError>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct Properties {
    sources: Vec<Box<dyn PropertySource>>,
}

impl Properties {
    /// Creates a new properties builder.
    pub fn builder() -> Self {
        Self::default()
    }

    /// Adds a `.properties` or `.toml` file to be loaded.
    ///
    /// If `required` is `true`, the build will fail if the file doesn't exist.
    /// Optional files that are missing are silently skipped.
    pub fn with_file(self, path: impl AsRef<Path>, required: bool) -> Self {
        self.with_source(FileSource::new(path, required))
    }

    /// Loads properties from environment variables with the given prefix.
    ///
    /// See [`EnvSource`] for how variable names map to keys. An empty
    /// `separator` makes [`build`](Self::build) fail.
    pub fn with_env(self, prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        self.with_source(EnvSource::new(prefix, separator))
    }

    /// Adds fixed values, typically registered first as defaults.
    pub fn with_defaults<K, V>(self, defaults: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.with_source(MapSource::new(defaults.into_iter().collect()))
    }

    /// Adds any other property source.
    pub fn with_source(mut self, source: impl PropertySource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Loads and merges all sources, then resolves `${...}` references.
    pub fn build(self) -> Result<PropertySet, SourceError> {
        let mut merged = PropertySet::new();

        for source in &self.sources {
            merged.merge(source.properties()?);
        }

        // Resolve ${...} references after all sources are merged
        resolve_references(&mut merged)?;

        debug!(sources = self.sources.len(), count = merged.len(), "built property set");
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_later_sources_override_earlier() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "config.int = 7\nconfig.url = http://${{config.host}}/").unwrap();

        let properties = Properties::builder()
            .with_defaults([("config.int", "1"), ("config.host", "localhost")])
            .with_file(file.path(), true)
            .build()
            .unwrap();

        assert_eq!(properties.get("config.int"), Some("7"));
        assert_eq!(properties.get("config.host"), Some("localhost"));
        assert_eq!(properties.get("config.url"), Some("http://localhost/"));
    }

    #[test]
    fn test_missing_optional_file_is_skipped() {
        let properties = Properties::builder()
            .with_defaults([("a", "1")])
            .with_file("/nonexistent/app.properties", false)
            .build()
            .unwrap();
        assert_eq!(properties.len(), 1);
    }

    #[test]
    fn test_missing_required_file_fails() {
        let result = Properties::builder()
            .with_file("/nonexistent/app.properties", true)
            .build();
        assert!(matches!(result, Err(SourceError::FileNotFound(_))));
    }

    #[test]
    fn test_empty_env_separator_fails_build() {
        let result = Properties::builder()
            .with_defaults([("a", "1")])
            .with_env("APP", "")
            .build();
        assert!(matches!(result, Err(SourceError::EmptySeparator(_))));
    }

    #[test]
    fn test_reference_errors_surface() {
        let result = Properties::builder()
            .with_defaults([("a", "${b}"), ("b", "${a}")])
            .build();
        assert!(matches!(result, Err(SourceError::CircularReference(_))));
    }
}
