use std::sync::Arc;

use super::adapter::{AdapterRegistry, TypeAdapter};

/// A reusable bundle of adapters shared between loaders.
///
/// Loaders copy the adapter list when they are created, so adding adapters
/// afterwards only affects loaders created later.
///
/// ```
/// use propbind::{LoaderTemplate, SimpleTypeAdapter};
/// use std::net::{IpAddr, SocketAddr};
///
/// let mut template = LoaderTemplate::new();
/// template
///     .add(SimpleTypeAdapter::new(|s: &str| s.parse::<IpAddr>()))
///     .add(SimpleTypeAdapter::new(|s: &str| s.parse::<SocketAddr>()));
/// assert_eq!(template.adapters().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LoaderTemplate {
    adapters: AdapterRegistry,
}

impl LoaderTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a template holding `adapters` in order.
    pub fn with_adapters(adapters: impl IntoIterator<Item = Arc<dyn TypeAdapter>>) -> Self {
        Self {
            adapters: adapters.into_iter().collect(),
        }
    }

    /// Appends an adapter and returns the template for chaining.
    pub fn add(&mut self, adapter: impl TypeAdapter + 'static) -> &mut Self {
        self.adapters.push(Arc::new(adapter));
        self
    }

    pub fn adapters(&self) -> &AdapterRegistry {
        &self.adapters
    }
}
