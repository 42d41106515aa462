//! Hand-written descriptions of bindable types and their validation.

use std::any::type_name;
use std::fmt;

use super::error::{BoxError, MetadataError};
use super::types::FieldType;
use super::value::Arguments;

/// Function that builds `T` from positional arguments.
pub type ConstructFn<T> = fn(&mut Arguments) -> Result<T, BoxError>;

/// A type that can be built from a flat property set.
///
/// ```
/// use propbind::{Bindable, ConstructorDescriptor, FieldType, ParamDescriptor, Primitive, TypeDescriptor};
///
/// struct Server {
///     host: String,
///     port: i32,
/// }
///
/// impl Bindable for Server {
///     fn descriptor() -> TypeDescriptor<Self> {
///         TypeDescriptor::new().constructor(
///             ConstructorDescriptor::binding(|args| {
///                 Ok(Server {
///                     host: args.next()?,
///                     port: args.next()?,
///                 })
///             })
///             .param(ParamDescriptor::new("host", FieldType::Str).key("server.host").default_value("localhost"))
///             .param(ParamDescriptor::new("port", FieldType::Primitive(Primitive::I32)).key("server.port")),
///         )
///     }
/// }
/// ```
pub trait Bindable: Sized {
    fn descriptor() -> TypeDescriptor<Self>;
}

/// One constructor parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDescriptor {
    name: String,
    key: Option<String>,
    default_value: String,
    field_type: FieldType,
}

impl ParamDescriptor {
    /// Creates a parameter without a key or default. A key must be set
    /// before the parameter can be bound.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            key: None,
            default_value: String::new(),
            field_type,
        }
    }

    /// Sets the property key this parameter reads.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets the value used when the key is absent. Empty means no default.
    pub fn default_value(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = default_value.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn property_key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn default(&self) -> &str {
        &self.default_value
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }
}

/// A constructor of `T`, optionally marked as the binding constructor.
pub struct ConstructorDescriptor<T> {
    binding: bool,
    strict: bool,
    params: Vec<ParamDescriptor>,
    construct: ConstructFn<T>,
}

impl<T> ConstructorDescriptor<T> {
    /// A constructor marked for binding.
    pub fn binding(construct: ConstructFn<T>) -> Self {
        Self {
            binding: true,
            strict: false,
            params: Vec::new(),
            construct,
        }
    }

    /// A constructor the loader ignores.
    pub fn unmarked(construct: ConstructFn<T>) -> Self {
        Self {
            binding: false,
            ..Self::binding(construct)
        }
    }

    /// Rejects property sets containing keys no parameter reads.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn param(mut self, param: ParamDescriptor) -> Self {
        self.params.push(param);
        self
    }

    pub fn is_binding(&self) -> bool {
        self.binding
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn params(&self) -> &[ParamDescriptor] {
        &self.params
    }
}

impl<T> fmt::Debug for ConstructorDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("binding", &self.binding)
            .field("strict", &self.strict)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Describes how to construct `T`.
pub struct TypeDescriptor<T> {
    type_name: &'static str,
    needs_enclosing_instance: bool,
    constructors: Vec<ConstructorDescriptor<T>>,
}

impl<T> TypeDescriptor<T> {
    pub fn new() -> Self {
        Self {
            type_name: type_name::<T>(),
            needs_enclosing_instance: false,
            constructors: Vec::new(),
        }
    }

    /// Marks `T` as only constructible from within an enclosing value, which
    /// a property set can never supply.
    pub fn needs_enclosing_instance(mut self) -> Self {
        self.needs_enclosing_instance = true;
        self
    }

    pub fn constructor(mut self, constructor: ConstructorDescriptor<T>) -> Self {
        self.constructors.push(constructor);
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Validates the descriptor and returns its binding constructor.
    ///
    /// Fails if `T` needs an enclosing instance, if there is not exactly one
    /// binding constructor, or if any of its parameters lacks a key.
    pub fn resolve(&self) -> Result<ResolvedConstructor<'_, T>, MetadataError> {
        if self.needs_enclosing_instance {
            return Err(MetadataError::EnclosingInstanceRequired {
                type_name: self.type_name,
            });
        }

        let mut marked = self.constructors.iter().filter(|c| c.binding);
        let constructor = match (marked.next(), marked.next()) {
            (Some(constructor), None) => constructor,
            _ => {
                return Err(MetadataError::ConstructorCount {
                    type_name: self.type_name,
                    found: self.constructors.iter().filter(|c| c.binding).count(),
                })
            }
        };

        let keys = constructor
            .params
            .iter()
            .map(|param| {
                param
                    .key
                    .as_deref()
                    .ok_or_else(|| MetadataError::MissingKey {
                        type_name: self.type_name,
                        parameter: param.name.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ResolvedConstructor { constructor, keys })
    }
}

/// A validated binding constructor whose parameters all carry keys.
#[derive(Debug)]
pub struct ResolvedConstructor<'a, T> {
    constructor: &'a ConstructorDescriptor<T>,
    keys: Vec<&'a str>,
}

impl<'a, T> ResolvedConstructor<'a, T> {
    /// Parameters paired with their keys, in declaration order.
    pub fn params(&self) -> impl Iterator<Item = (&'a str, &'a ParamDescriptor)> + '_ {
        self.keys.iter().copied().zip(self.constructor.params.iter())
    }

    pub fn keys(&self) -> &[&'a str] {
        &self.keys
    }

    pub fn is_strict(&self) -> bool {
        self.constructor.strict
    }

    pub(crate) fn invoke(&self, args: &mut Arguments) -> Result<T, BoxError> {
        (self.constructor.construct)(args)
    }
}

impl<T> Default for TypeDescriptor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for TypeDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_name", &self.type_name)
            .field("needs_enclosing_instance", &self.needs_enclosing_instance)
            .field("constructors", &self.constructors)
            .finish()
    }
}
