use super::source::PropertySource;
use super::{PropertySet, SourceError};

/// Reads properties from environment variables sharing a prefix.
///
/// Variable names are mapped to property keys by:
/// 1. Removing the prefix and separator
/// 2. Splitting remaining segments on the separator
/// 3. Lowercasing the segments and joining them with `.`
///
/// With prefix `MYAPP` and separator `__`, `MYAPP__CONFIG__INT=5` becomes
/// `config.int = 5`. Values are kept as strings.
///
/// An empty separator is reported as [`SourceError::EmptySeparator`] when the
/// source is read.
#[derive(Debug, Clone)]
pub struct EnvSource {
    prefix: String,
    separator: String,
}

impl EnvSource {
    pub fn new(prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            separator: separator.into(),
        }
    }

    fn collect(&self, vars: impl IntoIterator<Item = (String, String)>) -> PropertySet {
        let prefix_with_sep = format!("{}{}", self.prefix, self.separator);
        let mut properties = PropertySet::new();

        for (name, value) in vars {
            if let Some(path) = name.strip_prefix(&prefix_with_sep) {
                if path.is_empty() {
                    continue;
                }

                let key = path
                    .split(&self.separator)
                    .map(str::to_lowercase)
                    .collect::<Vec<_>>()
                    .join(".");
                properties.insert(key, value);
            }
        }

        properties
    }
}

impl PropertySource for EnvSource {
    fn properties(&self) -> Result<PropertySet, SourceError> {
        if self.separator.is_empty() {
            return Err(SourceError::EmptySeparator(self.prefix.clone()));
        }
        Ok(self.collect(std::env::vars()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_maps_prefixed_vars_to_dotted_keys() {
        let source = EnvSource::new("MYAPP", "__");
        let properties = source.collect(vars(&[
            ("MYAPP__CONFIG__INT", "5"),
            ("MYAPP__NAME", "demo"),
            ("MYAPP__", "ignored"),
            ("OTHER__CONFIG__INT", "7"),
            ("MYAPPX__NAME", "ignored"),
        ]));

        assert_eq!(properties.get("config.int"), Some("5"));
        assert_eq!(properties.get("name"), Some("demo"));
        assert_eq!(properties.len(), 2);
    }

    #[test]
    fn test_single_underscore_stays_in_segment() {
        let source = EnvSource::new("APP", "__");
        let properties = source.collect(vars(&[("APP__POOL__MAX_SIZE", "8")]));
        assert_eq!(properties.get("pool.max_size"), Some("8"));
    }

    #[test]
    fn test_empty_separator_is_an_error() {
        let result = EnvSource::new("APP", "").properties();
        assert!(matches!(result, Err(SourceError::EmptySeparator(ref prefix)) if prefix == "APP"));
    }
}
