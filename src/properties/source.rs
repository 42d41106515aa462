use super::{PropertySet, SourceError};

/// Supplies one layer of properties to a [`Properties`](super::Properties) builder.
pub trait PropertySource: Send + Sync + std::fmt::Debug {
    fn properties(&self) -> Result<PropertySet, SourceError>;
}

/// A fixed in-memory layer, typically used for defaults.
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    properties: PropertySet,
}

impl MapSource {
    pub fn new(properties: PropertySet) -> Self {
        Self { properties }
    }
}

impl PropertySource for MapSource {
    fn properties(&self) -> Result<PropertySet, SourceError> {
        Ok(self.properties.clone())
    }
}
