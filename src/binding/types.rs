//! Declared parameter types.

use std::any::{type_name, Any, TypeId};
use std::fmt;

use super::value::{PropertyEnum, Value};

/// Numeric kinds understood by the built-in converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl Primitive {
    /// The display name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Primitive::I8 => "i8",
            Primitive::I16 => "i16",
            Primitive::I32 => "i32",
            Primitive::I64 => "i64",
            Primitive::F32 => "f32",
            Primitive::F64 => "f64",
        }
    }

    /// The zero value substituted for an empty property.
    pub fn zero(self) -> Value {
        match self {
            Primitive::I8 => Value::I8(0),
            Primitive::I16 => Value::I16(0),
            Primitive::I32 => Value::I32(0),
            Primitive::I64 => Value::I64(0),
            Primitive::F32 => Value::F32(0.0),
            Primitive::F64 => Value::F64(0.0),
        }
    }
}

/// An enum type whose members can be named in a property value.
#[derive(Clone, Copy)]
pub struct EnumType {
    id: TypeId,
    name: &'static str,
    members: &'static [&'static str],
}

impl EnumType {
    pub fn of<E: PropertyEnum>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: type_name::<E>(),
            members: E::MEMBERS,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn members(&self) -> &'static [&'static str] {
        self.members
    }

    pub(crate) fn id(&self) -> TypeId {
        self.id
    }
}

impl PartialEq for EnumType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EnumType {}

impl fmt::Debug for EnumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Enum({})", self.name)
    }
}

/// A type only an adapter can produce.
///
/// Identity is the Rust `TypeId`, so adapters match exactly and never by
/// any notion of subtyping.
#[derive(Clone, Copy)]
pub struct CustomType {
    id: TypeId,
    name: &'static str,
}

impl CustomType {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for CustomType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CustomType {}

impl fmt::Debug for CustomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Custom({})", self.name)
    }
}

/// The declared type of a constructor parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// A plain number. Empty input yields zero.
    Primitive(Primitive),
    /// A nullable number. Empty input yields `Value::Null`.
    Wrapper(Primitive),
    Str,
    Enum(EnumType),
    Custom(CustomType),
}

impl FieldType {
    pub fn enumeration<E: PropertyEnum>() -> Self {
        FieldType::Enum(EnumType::of::<E>())
    }

    pub fn custom<T: Any>() -> Self {
        FieldType::Custom(CustomType::of::<T>())
    }

    /// Value supplied when the resolved property string is empty.
    pub fn absence(&self) -> Value {
        match self {
            FieldType::Primitive(primitive) => primitive.zero(),
            _ => Value::Null,
        }
    }

    /// Wrapper numbers convert exactly like their primitive kind.
    pub(crate) fn unwrapped(&self) -> FieldType {
        match *self {
            FieldType::Wrapper(primitive) => FieldType::Primitive(primitive),
            other => other,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Primitive(primitive) => primitive.name(),
            FieldType::Wrapper(primitive) => match primitive {
                Primitive::I8 => "Option<i8>",
                Primitive::I16 => "Option<i16>",
                Primitive::I32 => "Option<i32>",
                Primitive::I64 => "Option<i64>",
                Primitive::F32 => "Option<f32>",
                Primitive::F64 => "Option<f64>",
            },
            FieldType::Str => "String",
            FieldType::Enum(enum_type) => enum_type.name(),
            FieldType::Custom(custom) => custom.name(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
