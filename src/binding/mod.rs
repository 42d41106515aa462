//! Binding flat property sets onto typed constructors.

mod adapter;
mod convert;
mod descriptor;
mod error;
mod loader;
mod template;
mod types;
mod value;

pub use adapter::{AdapterRegistry, SimpleTypeAdapter, TypeAdapter};
pub use convert::convert;
pub use descriptor::{
    Bindable, ConstructFn, ConstructorDescriptor, ParamDescriptor, ResolvedConstructor,
    TypeDescriptor,
};
pub use error::{BindError, BoxError, ConversionError, MetadataError};
pub use loader::PropertiesLoader;
pub use template::LoaderTemplate;
pub use types::{CustomType, EnumType, FieldType, Primitive};
pub use value::{ArgumentError, Arguments, EnumMember, FromValue, PropertyEnum, Value};
