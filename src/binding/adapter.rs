//! User-supplied conversions for types the built-in converter does not know.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use super::error::BoxError;
use super::types::FieldType;
use super::value::Value;

/// Converts property strings into one specific declared type.
pub trait TypeAdapter: Send + Sync {
    /// The declared type this adapter produces. Matched by exact identity.
    fn converting_type(&self) -> FieldType;

    fn convert(&self, input: &str) -> Result<Value, BoxError>;
}

/// Adapter backed by a plain conversion function.
///
/// ```
/// use propbind::SimpleTypeAdapter;
/// use std::net::Ipv4Addr;
///
/// let adapter = SimpleTypeAdapter::new(|s: &str| s.parse::<Ipv4Addr>());
/// ```
pub struct SimpleTypeAdapter<T, F> {
    converter: F,
    _marker: PhantomData<fn() -> T>,
}

impl<T, E, F> SimpleTypeAdapter<T, F>
where
    T: Any + Send,
    E: Into<BoxError>,
    F: Fn(&str) -> Result<T, E> + Send + Sync,
{
    pub fn new(converter: F) -> Self {
        Self {
            converter,
            _marker: PhantomData,
        }
    }
}

impl<T, E, F> TypeAdapter for SimpleTypeAdapter<T, F>
where
    T: Any + Send,
    E: Into<BoxError>,
    F: Fn(&str) -> Result<T, E> + Send + Sync,
{
    fn converting_type(&self) -> FieldType {
        FieldType::custom::<T>()
    }

    fn convert(&self, input: &str) -> Result<Value, BoxError> {
        (self.converter)(input).map(Value::custom).map_err(Into::into)
    }
}

/// An ordered list of adapters. Lookup is a linear scan; the first adapter
/// registered for a type wins.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: Vec<Arc<dyn TypeAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, adapter: Arc<dyn TypeAdapter>) {
        self.adapters.push(adapter);
    }

    pub fn find(&self, field_type: &FieldType) -> Option<&dyn TypeAdapter> {
        self.adapters
            .iter()
            .find(|adapter| adapter.converting_type() == *field_type)
            .map(|adapter| &**adapter)
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl FromIterator<Arc<dyn TypeAdapter>> for AdapterRegistry {
    fn from_iter<I: IntoIterator<Item = Arc<dyn TypeAdapter>>>(iter: I) -> Self {
        Self {
            adapters: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.adapters.iter().map(|a| a.converting_type()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::ParseIntError;

    #[derive(Debug, PartialEq)]
    struct Port(u16);

    fn port_adapter(offset: u16) -> Arc<dyn TypeAdapter> {
        Arc::new(SimpleTypeAdapter::new(move |s: &str| {
            s.parse::<u16>().map(|p| Port(p + offset))
        }))
    }

    #[test]
    fn test_first_registered_adapter_wins() {
        let registry: AdapterRegistry = vec![port_adapter(0), port_adapter(1)]
            .into_iter()
            .collect();

        let adapter = registry.find(&FieldType::custom::<Port>()).unwrap();
        let value = adapter.convert("80").unwrap();
        match value {
            Value::Custom(boxed) => assert_eq!(*boxed.downcast::<Port>().unwrap(), Port(80)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_lookup_is_exact() {
        let mut registry = AdapterRegistry::new();
        registry.push(port_adapter(0));

        assert!(registry.find(&FieldType::custom::<u16>()).is_none());
        assert!(registry.find(&FieldType::Str).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_adapter_error_is_boxed() {
        let adapter = SimpleTypeAdapter::new(|s: &str| -> Result<u16, ParseIntError> { s.parse() });
        let err = adapter.convert("nope").unwrap_err();
        assert!(err.downcast_ref::<ParseIntError>().is_some());
    }
}
