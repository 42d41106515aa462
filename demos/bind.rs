use std::net::SocketAddr;

use propbind::{
    Bindable, ConstructorDescriptor, FieldType, LoaderTemplate, ParamDescriptor, Primitive,
    Properties, PropertiesLoader, PropertyEnum, SimpleTypeAdapter, TypeDescriptor,
};

#[derive(Debug)]
enum LogLevel {
    Info,
    Debug,
}

impl PropertyEnum for LogLevel {
    const MEMBERS: &'static [&'static str] = &["INFO", "DEBUG"];

    fn from_member(name: &str) -> Option<Self> {
        match name {
            "INFO" => Some(LogLevel::Info),
            "DEBUG" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

#[derive(Debug)]
#[allow(dead_code)]
struct ServerConfig {
    name: String,
    listen: SocketAddr,
    workers: i32,
    timeout_secs: Option<f64>,
    log_level: LogLevel,
}

impl Bindable for ServerConfig {
    fn descriptor() -> TypeDescriptor<Self> {
        TypeDescriptor::new().constructor(
            ConstructorDescriptor::binding(|args| {
                Ok(ServerConfig {
                    name: args.next()?,
                    listen: args.next_custom()?,
                    workers: args.next()?,
                    timeout_secs: args.next()?,
                    log_level: args.next_enum()?,
                })
            })
            .param(ParamDescriptor::new("name", FieldType::Str).key("server.name").default_value("demo"))
            .param(
                ParamDescriptor::new("listen", FieldType::custom::<SocketAddr>())
                    .key("server.listen")
                    .default_value("127.0.0.1:8080"),
            )
            .param(
                ParamDescriptor::new("workers", FieldType::Primitive(Primitive::I32))
                    .key("server.workers")
                    .default_value("4"),
            )
            .param(ParamDescriptor::new("timeout_secs", FieldType::Wrapper(Primitive::F64)).key("server.timeout"))
            .param(
                ParamDescriptor::new("log_level", FieldType::enumeration::<LogLevel>())
                    .key("log.level")
                    .default_value("info"),
            ),
        )
    }
}

fn main() -> Result<(), propbind::Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let mut template = LoaderTemplate::new();
    template.add(SimpleTypeAdapter::new(|s: &str| s.parse::<SocketAddr>()));

    // defaults -> env overrides (DEMO__SERVER__WORKERS=8) -> optional local file
    let properties = Properties::builder()
        .with_defaults([("server.host", "0.0.0.0"), ("server.listen", "${server.host}:9000")])
        .with_env("DEMO", "__")
        .with_file("demos/local.properties", false)
        .build()?;

    let config = PropertiesLoader::<ServerConfig>::with_template(&template).load(&properties)?;
    println!("{config:#?}");

    Ok(())
}
