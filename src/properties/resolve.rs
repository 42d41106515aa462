//! Reference resolution for property values.
//!
//! Supports `${other.key}` syntax for reusing the value of another property.
//! Use `$${...}` to escape and produce a literal `${...}`.

use std::collections::BTreeMap;

use super::{PropertySet, SourceError};

/// Resolves all `${key}` references in the property set.
///
/// Referenced values are resolved recursively before substitution. Returns an
/// error if a circular reference is detected or a referenced key doesn't exist.
pub fn resolve_references(properties: &mut PropertySet) -> Result<(), SourceError> {
    let raw = properties.entries_mut().clone();
    let mut resolved = BTreeMap::new();

    for key in raw.keys() {
        let mut stack = Vec::new();
        resolve_key(key, &raw, &mut resolved, &mut stack)?;
    }

    *properties.entries_mut() = resolved;
    Ok(())
}

/// Resolves a single key, memoizing results in `resolved`.
fn resolve_key(
    key: &str,
    raw: &BTreeMap<String, String>,
    resolved: &mut BTreeMap<String, String>,
    stack: &mut Vec<String>,
) -> Result<String, SourceError> {
    if let Some(value) = resolved.get(key) {
        return Ok(value.clone());
    }
    if stack.iter().any(|k| k == key) {
        return Err(SourceError::CircularReference(key.to_string()));
    }

    let value = raw
        .get(key)
        .ok_or_else(|| SourceError::ReferenceNotFound(key.to_string()))?;

    stack.push(key.to_string());
    let expanded = expand(key, value, raw, resolved, stack)?;
    stack.pop();

    resolved.insert(key.to_string(), expanded.clone());
    Ok(expanded)
}

/// Expands all `${...}` references in one value.
/// Handles `$$` escape sequences.
fn expand(
    owner: &str,
    value: &str,
    raw: &BTreeMap<String, String>,
    resolved: &mut BTreeMap<String, String>,
    stack: &mut Vec<String>,
) -> Result<String, SourceError> {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            result.push(ch);
            continue;
        }
        match chars.peek() {
            Some('$') => {
                // Escape sequence: $$ -> $
                chars.next();
                result.push('$');
            }
            Some('{') => {
                chars.next();
                let reference = consume_until(&mut chars, '}')
                    .ok_or_else(|| SourceError::UnclosedReference(owner.to_string()))?;
                if reference.is_empty() {
                    return Err(SourceError::InvalidReference(owner.to_string()));
                }
                result.push_str(&resolve_key(&reference, raw, resolved, stack)?);
            }
            _ => result.push('$'),
        }
    }

    Ok(result)
}

/// Consumes characters until the delimiter, returning the collected string.
fn consume_until(chars: &mut std::iter::Peekable<std::str::Chars>, delim: char) -> Option<String> {
    let mut result = String::new();
    for ch in chars.by_ref() {
        if ch == delim {
            return Some(result);
        }
        result.push(ch);
    }
    None // Delimiter not found
}
