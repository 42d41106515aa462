//! Converted values and the positional argument list handed to constructors.

use std::any::{type_name, Any, TypeId};
use std::fmt;

use thiserror::Error;

use super::types::EnumType;

/// An enum whose variants can be selected by name from a property value.
///
/// Member names are matched after the raw value has been uppercased and its
/// spaces replaced with `_`, so they are normally written in
/// `SCREAMING_SNAKE_CASE`.
pub trait PropertyEnum: Sized + 'static {
    const MEMBERS: &'static [&'static str];

    fn from_member(name: &str) -> Option<Self>;
}

/// A resolved enum member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumMember {
    owner: TypeId,
    name: &'static str,
}

impl EnumMember {
    pub(crate) fn new(owner: &EnumType, name: &'static str) -> Self {
        Self {
            owner: owner.id(),
            name,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// A value produced from a property string.
pub enum Value {
    Null,
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Str(String),
    Enum(EnumMember),
    Custom(Box<dyn Any + Send>),
}

impl Value {
    /// Wraps an adapter's output.
    pub fn custom<T: Any + Send>(value: T) -> Self {
        Value::Custom(Box::new(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Str(_) => "string",
            Value::Enum(_) => "enum member",
            Value::Custom(_) => "custom value",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::I8(v) => write!(f, "I8({v})"),
            Value::I16(v) => write!(f, "I16({v})"),
            Value::I32(v) => write!(f, "I32({v})"),
            Value::I64(v) => write!(f, "I64({v})"),
            Value::F32(v) => write!(f, "F32({v})"),
            Value::F64(v) => write!(f, "F64({v})"),
            Value::Str(v) => write!(f, "Str({v:?})"),
            Value::Enum(member) => write!(f, "Enum({})", member.name),
            Value::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Types that can be taken directly out of a [`Value`].
pub trait FromValue: Sized {
    /// Returns `None` when the value has a different kind.
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

from_value! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    String => Str,
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// Raised when a constructor takes an argument with the wrong type.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ArgumentError {
    #[error("argument {position} is missing")]
    Missing { position: usize },

    #[error("argument {position} is a {found} but {expected} was requested")]
    Mismatch {
        position: usize,
        expected: &'static str,
        found: &'static str,
    },
}

/// Positional arguments assembled for a binding constructor.
///
/// Arguments are taken in constructor declaration order.
#[derive(Debug)]
pub struct Arguments {
    values: std::vec::IntoIter<Value>,
    position: usize,
}

impl Arguments {
    pub(crate) fn new(values: Vec<Value>) -> Self {
        Self {
            values: values.into_iter(),
            position: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    fn take(&mut self) -> Result<(usize, Value), ArgumentError> {
        let position = self.position;
        let value = self
            .values
            .next()
            .ok_or(ArgumentError::Missing { position })?;
        self.position += 1;
        Ok((position, value))
    }

    /// Takes the next argument as a number, `String` or `Option` of either.
    pub fn next<T: FromValue>(&mut self) -> Result<T, ArgumentError> {
        let (position, value) = self.take()?;
        let found = value.kind();
        T::from_value(value).ok_or(ArgumentError::Mismatch {
            position,
            expected: type_name::<T>(),
            found,
        })
    }

    /// Takes the next argument as an enum member, failing on absence.
    pub fn next_enum<E: PropertyEnum>(&mut self) -> Result<E, ArgumentError> {
        let (position, value) = self.take()?;
        enum_from_value(position, value)?.ok_or(ArgumentError::Mismatch {
            position,
            expected: type_name::<E>(),
            found: "null",
        })
    }

    pub fn next_optional_enum<E: PropertyEnum>(&mut self) -> Result<Option<E>, ArgumentError> {
        let (position, value) = self.take()?;
        enum_from_value(position, value)
    }

    /// Takes the next argument as an adapter-produced value, failing on absence.
    pub fn next_custom<T: Any>(&mut self) -> Result<T, ArgumentError> {
        let (position, value) = self.take()?;
        custom_from_value(position, value)?.ok_or(ArgumentError::Mismatch {
            position,
            expected: type_name::<T>(),
            found: "null",
        })
    }

    pub fn next_optional_custom<T: Any>(&mut self) -> Result<Option<T>, ArgumentError> {
        let (position, value) = self.take()?;
        custom_from_value(position, value)
    }
}

fn enum_from_value<E: PropertyEnum>(
    position: usize,
    value: Value,
) -> Result<Option<E>, ArgumentError> {
    let mismatch = |found| ArgumentError::Mismatch {
        position,
        expected: type_name::<E>(),
        found,
    };
    match value {
        Value::Null => Ok(None),
        Value::Enum(member) if member.owner == TypeId::of::<E>() => E::from_member(member.name)
            .map(Some)
            .ok_or_else(|| mismatch("unknown enum member")),
        other => Err(mismatch(other.kind())),
    }
}

fn custom_from_value<T: Any>(position: usize, value: Value) -> Result<Option<T>, ArgumentError> {
    match value {
        Value::Null => Ok(None),
        Value::Custom(boxed) => match boxed.downcast::<T>() {
            Ok(v) => Ok(Some(*v)),
            Err(_) => Err(ArgumentError::Mismatch {
                position,
                expected: type_name::<T>(),
                found: "custom value of another type",
            }),
        },
        other => Err(ArgumentError::Mismatch {
            position,
            expected: type_name::<T>(),
            found: other.kind(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Mode {
        Fast,
        Slow,
    }

    impl PropertyEnum for Mode {
        const MEMBERS: &'static [&'static str] = &["FAST", "SLOW"];

        fn from_member(name: &str) -> Option<Self> {
            match name {
                "FAST" => Some(Mode::Fast),
                "SLOW" => Some(Mode::Slow),
                _ => None,
            }
        }
    }

    #[test]
    fn test_positional_extraction() {
        let mode = EnumType::of::<Mode>();
        let mut args = Arguments::new(vec![
            Value::I32(7),
            Value::Str("name".into()),
            Value::Null,
            Value::Enum(EnumMember::new(&mode, "SLOW")),
            Value::custom(42u64),
        ]);

        assert_eq!(args.remaining(), 5);
        assert_eq!(args.next::<i32>().unwrap(), 7);
        assert_eq!(args.next::<String>().unwrap(), "name");
        assert_eq!(args.next::<Option<f64>>().unwrap(), None);
        assert_eq!(args.next_enum::<Mode>().unwrap(), Mode::Slow);
        assert_eq!(args.next_custom::<u64>().unwrap(), 42);
        assert!(matches!(
            args.next::<i32>(),
            Err(ArgumentError::Missing { position: 5 })
        ));
    }

    #[test]
    fn test_mismatch_reports_position() {
        let mut args = Arguments::new(vec![Value::I8(1), Value::Null]);

        let err = args.next::<i64>().unwrap_err();
        assert!(matches!(
            err,
            ArgumentError::Mismatch { position: 0, found: "i8", .. }
        ));

        assert!(args.next_custom::<u64>().is_err());
    }

    #[test]
    fn test_optional_enum_and_custom() {
        let mut args = Arguments::new(vec![Value::Null, Value::Null]);
        assert_eq!(args.next_optional_enum::<Mode>().unwrap(), None);
        assert_eq!(args.next_optional_custom::<u64>().unwrap(), None);
    }

    #[test]
    fn test_custom_downcast_mismatch() {
        let mut args = Arguments::new(vec![Value::custom("text")]);
        assert!(args.next_custom::<u64>().is_err());
    }
}
