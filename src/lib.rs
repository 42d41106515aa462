pub mod binding;
mod error;
pub mod properties;

pub use binding::{
    convert, AdapterRegistry, ArgumentError, Arguments, BindError, Bindable, BoxError,
    ConstructorDescriptor, ConversionError, FieldType, LoaderTemplate, MetadataError,
    ParamDescriptor, Primitive, PropertiesLoader, PropertyEnum, SimpleTypeAdapter, TypeAdapter,
    TypeDescriptor, Value,
};
pub use error::Error;
pub use properties::{Properties, PropertyMap, PropertySet, SourceError};

/// Assembles properties from `properties` and binds them with `loader`.
///
/// ```no_run
/// # use propbind::{Bindable, PropertiesLoader, Properties, TypeDescriptor};
/// # struct AppConfig;
/// # impl Bindable for AppConfig { fn descriptor() -> TypeDescriptor<Self> { TypeDescriptor::new() } }
/// let config: AppConfig = propbind::load(
///     &PropertiesLoader::new(),
///     Properties::builder().with_file("app.properties", true).with_env("APP", "__"),
/// )?;
/// # Ok::<(), propbind::Error>(())
/// ```
pub fn load<T>(loader: &PropertiesLoader<T>, properties: Properties) -> Result<T, Error> {
    let properties = properties.build()?;
    Ok(loader.load(&properties)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Endpoint {
        url: String,
        retries: i16,
    }

    impl Bindable for Endpoint {
        fn descriptor() -> TypeDescriptor<Self> {
            TypeDescriptor::new().constructor(
                ConstructorDescriptor::binding(|args| {
                    Ok(Endpoint {
                        url: args.next()?,
                        retries: args.next()?,
                    })
                })
                .param(ParamDescriptor::new("url", FieldType::Str).key("endpoint.url"))
                .param(
                    ParamDescriptor::new("retries", FieldType::Primitive(Primitive::I16))
                        .key("endpoint.retries")
                        .default_value("3"),
                ),
            )
        }
    }

    #[test]
    fn test_load_from_layered_sources() {
        let endpoint: Endpoint = load(
            &PropertiesLoader::new(),
            Properties::builder().with_defaults([
                ("endpoint.host", "example.com"),
                ("endpoint.url", "https://${endpoint.host}/v1"),
            ]),
        )
        .unwrap();

        assert_eq!(endpoint.url, "https://example.com/v1");
        assert_eq!(endpoint.retries, 3);
    }

    #[test]
    fn test_errors_are_wrapped_by_kind() {
        let bind = load::<Endpoint>(
            &PropertiesLoader::new(),
            Properties::builder().with_defaults([("endpoint.url", "u"), ("endpoint.retries", "x")]),
        );
        assert!(matches!(bind, Err(Error::Bind(BindError::Conversion { .. }))));

        let source = load::<Endpoint>(
            &PropertiesLoader::new(),
            Properties::builder().with_defaults([("endpoint.url", "${missing}")]),
        );
        assert!(matches!(source, Err(Error::Source(SourceError::ReferenceNotFound(_)))));
    }
}
