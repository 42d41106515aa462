//! File-based property source.
//!
//! Files ending in `.toml` are read as TOML and flattened into dotted keys
//! (`[server] port = 80` becomes `server.port`). Every other file is read in
//! the `.properties` text format: `key=value`, `key: value` or `key value`
//! entries, `#`/`!` comment lines, trailing-backslash continuation lines and
//! `\t`, `\n`, `\r`, `\f`, `\uXXXX` escapes (surrogate pairs included).

use std::path::{Path, PathBuf};

use toml::{Table, Value};
use tracing::debug;

use super::source::PropertySource;
use super::{PropertySet, SourceError};

/// A property source that loads from a `.properties` or `.toml` file.
///
/// Files can be marked as required or optional. Required files that don't exist
/// cause an error; optional files that don't exist are silently skipped.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    required: bool,
}

impl FileSource {
    /// Creates a new file source.
    ///
    /// If `required` is true, the build will fail if the file doesn't exist.
    pub fn new(path: impl AsRef<Path>, required: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required,
        }
    }
}

impl PropertySource for FileSource {
    fn properties(&self) -> Result<PropertySet, SourceError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if self.required {
                    return Err(SourceError::FileNotFound(self.path.clone()));
                }
                debug!(path = %self.path.display(), "optional properties file missing");
                return Ok(PropertySet::new());
            }
            Err(e) => {
                return Err(SourceError::ReadError {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        let properties = if self.path.extension().is_some_and(|ext| ext == "toml") {
            parse_toml(&self.path, &contents)?
        } else {
            parse_properties(&contents).map_err(|line| SourceError::InvalidEscape {
                path: self.path.clone(),
                line,
            })?
        };

        debug!(path = %self.path.display(), count = properties.len(), "loaded properties file");
        Ok(properties)
    }
}

fn parse_toml(path: &Path, contents: &str) -> Result<PropertySet, SourceError> {
    let table: Table = toml::from_str(contents).map_err(|e| SourceError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut properties = PropertySet::new();
    flatten(path, "", table, &mut properties)?;
    Ok(properties)
}

fn flatten(path: &Path, prefix: &str, table: Table, out: &mut PropertySet) -> Result<(), SourceError> {
    for (key, value) in table {
        let key = if prefix.is_empty() {
            key
        } else {
            format!("{prefix}.{key}")
        };

        let text = match value {
            Value::String(s) => s,
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Datetime(dt) => dt.to_string(),
            Value::Table(nested) => {
                flatten(path, &key, nested, out)?;
                continue;
            }
            Value::Array(_) => {
                return Err(SourceError::NonScalarValue {
                    path: path.to_path_buf(),
                    key,
                })
            }
        };
        out.insert(key, text);
    }
    Ok(())
}

/// Parses `.properties` text. On a bad escape, returns the 1-based line number.
pub(crate) fn parse_properties(text: &str) -> Result<PropertySet, usize> {
    let mut properties = PropertySet::new();
    let mut lines = text.lines().enumerate();

    while let Some((index, line)) = lines.next() {
        let line = line.trim_start();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let mut logical = line.to_string();
        while continues(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        let (key, value) = split_entry(&logical);
        let line_number = index + 1;
        properties.insert(
            unescape(key).ok_or(line_number)?,
            unescape(value).ok_or(line_number)?,
        );
    }

    Ok(properties)
}

/// A line continues when it ends in an odd number of backslashes.
fn continues(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => return (&line[..i], line[i + 1..].trim_start()),
            c if c.is_whitespace() => {
                let rest = line[i..].trim_start();
                let rest = rest
                    .strip_prefix(&['=', ':'][..])
                    .map(str::trim_start)
                    .unwrap_or(rest);
                return (&line[..i], rest);
            }
            _ => {}
        }
    }
    (line, "")
}

fn unescape(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let mut units = vec![read_unit(&mut chars)?];
                // A high surrogate must be followed by an escaped low surrogate.
                if (0xD800..=0xDBFF).contains(&units[0]) {
                    if chars.next() != Some('\\') || chars.next() != Some('u') {
                        return None;
                    }
                    units.push(read_unit(&mut chars)?);
                }
                for decoded in char::decode_utf16(units) {
                    out.push(decoded.ok()?);
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Some(out)
}

/// Reads the four hex digits of a `\uXXXX` escape as one UTF-16 unit.
fn read_unit(chars: &mut std::str::Chars) -> Option<u16> {
    let hex: String = chars.by_ref().take(4).collect();
    if hex.len() != 4 {
        return None;
    }
    u16::from_str_radix(&hex, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_file_source_loads_properties_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# comment\nconfig.string = -s\nconfig.int:-2147483648").unwrap();

        let source = FileSource::new(file.path(), true);
        let properties = source.properties().unwrap();

        assert_eq!(properties.get("config.string"), Some("-s"));
        assert_eq!(properties.get("config.int"), Some("-2147483648"));
        assert_eq!(properties.len(), 2);
    }

    #[test]
    fn test_file_source_loads_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "name = \"demo\"\n[config]\nint = 5\nfloat = 1.5\nflag = true\n[config.nested]\nkey = \"v\""
        )
        .unwrap();

        let properties = FileSource::new(file.path(), true).properties().unwrap();

        assert_eq!(properties.get("name"), Some("demo"));
        assert_eq!(properties.get("config.int"), Some("5"));
        assert_eq!(properties.get("config.float"), Some("1.5"));
        assert_eq!(properties.get("config.flag"), Some("true"));
        assert_eq!(properties.get("config.nested.key"), Some("v"));
    }

    #[test]
    fn test_toml_arrays_are_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "hosts = [\"a\", \"b\"]").unwrap();

        let result = FileSource::new(file.path(), true).properties();
        assert!(matches!(result, Err(SourceError::NonScalarValue { ref key, .. }) if key == "hosts"));
    }

    #[test]
    fn test_file_source_required_missing() {
        let source = FileSource::new("/nonexistent/path/app.properties", true);
        let result = source.properties();

        assert!(matches!(result, Err(SourceError::FileNotFound(_))));
    }

    #[test]
    fn test_file_source_optional_missing() {
        let source = FileSource::new("/nonexistent/path/app.properties", false);
        let properties = source.properties().unwrap();

        assert!(properties.is_empty());
    }

    #[test]
    fn test_separators_and_whitespace() {
        let properties = parse_properties(
            "a=1\nb = 2\nc:3\nd 4\ne  =  5 \n   ! bang comment\nf\n",
        )
        .unwrap();

        assert_eq!(properties.get("a"), Some("1"));
        assert_eq!(properties.get("b"), Some("2"));
        assert_eq!(properties.get("c"), Some("3"));
        assert_eq!(properties.get("d"), Some("4"));
        assert_eq!(properties.get("e"), Some("5 "));
        assert_eq!(properties.get("f"), Some(""));
        assert_eq!(properties.len(), 6);
    }

    #[test]
    fn test_continuation_and_escapes() {
        let properties = parse_properties(
            "list = one, \\\n       two\nkey\\=with\\:sep = tab\\there\nunicode = caf\\u00e9\nliteral = ends\\\\\n",
        )
        .unwrap();

        assert_eq!(properties.get("list"), Some("one, two"));
        assert_eq!(properties.get("key=with:sep"), Some("tab\there"));
        assert_eq!(properties.get("unicode"), Some("café"));
        assert_eq!(properties.get("literal"), Some("ends\\"));
    }

    #[test]
    fn test_surrogate_pair_escape() {
        let properties = parse_properties("emoji = \\uD83D\\uDE00\nmixed = a\\ud83d\\ude00b\n").unwrap();
        assert_eq!(properties.get("emoji"), Some("\u{1F600}"));
        assert_eq!(properties.get("mixed"), Some("a\u{1F600}b"));
    }

    #[test]
    fn test_unpaired_surrogate_reports_line() {
        assert_eq!(parse_properties("high = \\uD83D").unwrap_err(), 1);
        assert_eq!(parse_properties("ok = 1\nhigh = \\uD83Dx").unwrap_err(), 2);
        assert_eq!(parse_properties("two = \\uD83D\\uD83D").unwrap_err(), 1);
        assert_eq!(parse_properties("low = \\uDE00").unwrap_err(), 1);
    }

    #[test]
    fn test_bad_unicode_escape_reports_line() {
        assert_eq!(parse_properties("ok = 1\nbad = \\u12").unwrap_err(), 2);
        assert_eq!(parse_properties("bad = \\uzzzz").unwrap_err(), 1);
    }
}
