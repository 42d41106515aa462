use std::sync::Arc;

use tracing::{debug, trace};

use super::adapter::{AdapterRegistry, TypeAdapter};
use super::convert::convert;
use super::descriptor::{Bindable, ResolvedConstructor, TypeDescriptor};
use super::error::{BindError, ConversionError};
use super::template::LoaderTemplate;
use super::types::FieldType;
use super::value::{Arguments, Value};
use crate::properties::PropertyMap;

/// Builds instances of `T` from flat property sets.
///
/// For every binding-constructor parameter, in declaration order, the
/// loader reads the parameter's key, falls back to its default, substitutes
/// the type's absence value for an empty string, and otherwise converts the
/// string with the built-in rules or the first matching adapter.
///
/// ## Example
///
/// ```
/// use propbind::{Bindable, ConstructorDescriptor, FieldType, ParamDescriptor, Primitive, PropertiesLoader, PropertySet, TypeDescriptor};
///
/// struct Pool {
///     size: i32,
///     name: Option<String>,
/// }
///
/// impl Bindable for Pool {
///     fn descriptor() -> TypeDescriptor<Self> {
///         TypeDescriptor::new().constructor(
///             ConstructorDescriptor::binding(|args| Ok(Pool { size: args.next()?, name: args.next()? }))
///                 .param(ParamDescriptor::new("size", FieldType::Primitive(Primitive::I32)).key("pool.size").default_value("4"))
///                 .param(ParamDescriptor::new("name", FieldType::Str).key("pool.name")),
///         )
///     }
/// }
///
/// let pool = PropertiesLoader::<Pool>::new().load(&PropertySet::new())?;
/// assert_eq!(pool.size, 4);
/// assert_eq!(pool.name, None);
/// # Ok::<(), propbind::BindError>(())
/// ```
#[derive(Debug)]
pub struct PropertiesLoader<T> {
    descriptor: TypeDescriptor<T>,
    adapters: AdapterRegistry,
}

impl<T: Bindable> PropertiesLoader<T> {
    /// Creates a loader that only uses the built-in conversions.
    pub fn new() -> Self {
        Self::from_descriptor(T::descriptor(), AdapterRegistry::new())
    }

    /// Creates a loader with an explicit adapter list.
    pub fn with_adapters(adapters: impl IntoIterator<Item = Arc<dyn TypeAdapter>>) -> Self {
        Self::from_descriptor(T::descriptor(), adapters.into_iter().collect())
    }

    /// Creates a loader using a snapshot of the template's adapters.
    pub fn with_template(template: &LoaderTemplate) -> Self {
        Self::from_descriptor(T::descriptor(), template.adapters().clone())
    }
}

impl<T: Bindable> Default for PropertiesLoader<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PropertiesLoader<T> {
    /// Creates a loader for a descriptor that is not tied to a [`Bindable`] impl.
    pub fn from_descriptor(descriptor: TypeDescriptor<T>, adapters: AdapterRegistry) -> Self {
        Self {
            descriptor,
            adapters,
        }
    }

    pub fn descriptor(&self) -> &TypeDescriptor<T> {
        &self.descriptor
    }

    /// Loads the properties into a new instance of `T`.
    ///
    /// The descriptor is validated on every call, before any value is
    /// converted. No instance is returned unless every parameter converts and
    /// the constructor succeeds.
    pub fn load<P: PropertyMap + ?Sized>(&self, properties: &P) -> Result<T, BindError> {
        let type_name = self.descriptor.type_name();
        let constructor = self.descriptor.resolve()?;
        debug!(type_name, params = constructor.keys().len(), "binding properties");

        if constructor.is_strict() {
            check_unmapped(type_name, &constructor, properties)?;
        }

        let mut values = Vec::with_capacity(constructor.keys().len());
        for (key, param) in constructor.params() {
            let field_type = param.field_type();
            let raw = match properties.get_property(key) {
                Some(value) => value,
                None => {
                    trace!(key, default = param.default(), "property absent, using default");
                    param.default()
                }
            };

            if raw.is_empty() {
                trace!(key, "empty property, using absence value");
                values.push(field_type.absence());
                continue;
            }

            values.push(self.convert_value(key, raw, field_type)?);
        }

        let mut args = Arguments::new(values);
        let instance = constructor
            .invoke(&mut args)
            .map_err(|source| BindError::Construction { type_name, source })?;

        debug!(type_name, "bound properties");
        Ok(instance)
    }

    fn convert_value(&self, key: &str, raw: &str, field_type: &FieldType) -> Result<Value, BindError> {
        let conversion_failed = |source| BindError::Conversion {
            key: key.to_string(),
            source,
        };

        if let Some(value) = convert(raw, field_type).map_err(conversion_failed)? {
            return Ok(value);
        }

        let adapter = self
            .adapters
            .find(field_type)
            .ok_or_else(|| BindError::UnresolvedType {
                key: key.to_string(),
                type_name: field_type.name(),
            })?;
        trace!(key, type_name = field_type.name(), "converting with adapter");

        adapter.convert(raw).map_err(|source| {
            conversion_failed(ConversionError::Adapter {
                input: raw.to_string(),
                expected: field_type.name(),
                source,
            })
        })
    }
}

fn check_unmapped<T, P: PropertyMap + ?Sized>(
    type_name: &'static str,
    constructor: &ResolvedConstructor<'_, T>,
    properties: &P,
) -> Result<(), BindError> {
    let keys: Vec<String> = properties
        .property_keys()
        .filter(|key| !constructor.keys().iter().any(|known| known == key))
        .map(str::to_string)
        .collect();

    if keys.is_empty() {
        Ok(())
    } else {
        Err(BindError::UnmappedProperties { type_name, keys })
    }
}
