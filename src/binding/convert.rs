//! Built-in string conversion for numbers, strings and enums.

use std::fmt::Display;
use std::str::FromStr;

use super::error::ConversionError;
use super::types::{EnumType, FieldType, Primitive};
use super::value::{EnumMember, Value};

/// Converts `input` into `field_type` using the built-in rules.
///
/// Returns `Ok(None)` when the type is not handled here (custom types), which
/// tells the caller to consult its adapters instead. Wrapper numbers follow
/// the same rules as their primitive kind.
pub fn convert(input: &str, field_type: &FieldType) -> Result<Option<Value>, ConversionError> {
    let value = match field_type.unwrapped() {
        FieldType::Primitive(primitive) => parse_primitive(input, primitive)?,
        FieldType::Str => Value::Str(input.to_string()),
        FieldType::Enum(enum_type) => resolve_member(input, &enum_type)?,
        FieldType::Custom(_) | FieldType::Wrapper(_) => return Ok(None),
    };
    Ok(Some(value))
}

fn parse_primitive(input: &str, primitive: Primitive) -> Result<Value, ConversionError> {
    Ok(match primitive {
        Primitive::I8 => Value::I8(parse_number(input, primitive)?),
        Primitive::I16 => Value::I16(parse_number(input, primitive)?),
        Primitive::I32 => Value::I32(parse_number(input, primitive)?),
        Primitive::I64 => Value::I64(parse_number(input, primitive)?),
        Primitive::F32 => Value::F32(parse_float(input, primitive)?),
        Primitive::F64 => Value::F64(parse_float(input, primitive)?),
    })
}

fn parse_number<N>(input: &str, primitive: Primitive) -> Result<N, ConversionError>
where
    N: FromStr,
    N::Err: Display,
{
    input
        .parse()
        .map_err(|e: N::Err| invalid_number(input, primitive, e.to_string()))
}

/// Parses a decimal float literal.
///
/// Surrounding whitespace is ignored and a trailing `f`/`d` type suffix is
/// accepted. The only non-numeric spellings are `NaN` and `Infinity`, with an
/// optional sign.
fn parse_float<N>(input: &str, primitive: Primitive) -> Result<N, ConversionError>
where
    N: FromStr,
    N::Err: Display,
{
    let trimmed = input.trim();
    let unsigned = trimmed.strip_prefix(&['+', '-'][..]).unwrap_or(trimmed);

    let literal = if unsigned == "NaN" || unsigned == "Infinity" {
        trimmed
    } else {
        let body = trimmed
            .strip_suffix(&['f', 'F', 'd', 'D'][..])
            .unwrap_or(trimmed);
        if body.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
            return Err(invalid_number(
                input,
                primitive,
                "not a decimal floating-point literal".to_string(),
            ));
        }
        body
    };

    parse_number(literal, primitive).map_err(|_| {
        invalid_number(input, primitive, "invalid float literal".to_string())
    })
}

fn invalid_number(input: &str, primitive: Primitive, reason: String) -> ConversionError {
    ConversionError::InvalidNumber {
        input: input.to_string(),
        expected: primitive.name(),
        reason,
    }
}

/// Normalizes `input` to a member name and looks it up case-sensitively.
fn resolve_member(input: &str, enum_type: &EnumType) -> Result<Value, ConversionError> {
    let normalized = input.trim().to_uppercase().replace(' ', "_");

    enum_type
        .members()
        .iter()
        .copied()
        .find(|member| *member == normalized)
        .map(|member| Value::Enum(EnumMember::new(enum_type, member)))
        .ok_or_else(|| ConversionError::UnknownMember {
            input: input.to_string(),
            normalized,
            enum_name: enum_type.name(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::PropertyEnum;

    enum Choice {
        A,
        SomeValue,
    }

    impl PropertyEnum for Choice {
        const MEMBERS: &'static [&'static str] = &["A", "SOME_VALUE"];

        fn from_member(name: &str) -> Option<Self> {
            match name {
                "A" => Some(Choice::A),
                "SOME_VALUE" => Some(Choice::SomeValue),
                _ => None,
            }
        }
    }

    fn member_name(value: Option<Value>) -> &'static str {
        match value {
            Some(Value::Enum(member)) => member.name(),
            other => panic!("expected an enum member, got {other:?}"),
        }
    }

    #[test]
    fn test_integer_bounds() {
        let i8_type = FieldType::Primitive(Primitive::I8);
        assert!(matches!(convert("-128", &i8_type), Ok(Some(Value::I8(-128)))));
        assert!(matches!(
            convert("128", &i8_type),
            Err(ConversionError::InvalidNumber { expected: "i8", .. })
        ));

        let i64_type = FieldType::Primitive(Primitive::I64);
        assert!(matches!(
            convert("-9223372036854775808", &i64_type),
            Ok(Some(Value::I64(i64::MIN)))
        ));
    }

    #[test]
    fn test_wrapper_uses_primitive_rules() {
        let wrapper = FieldType::Wrapper(Primitive::I16);
        assert!(matches!(convert("32767", &wrapper), Ok(Some(Value::I16(32767)))));
        assert!(convert("x", &wrapper).is_err());
    }

    #[test]
    fn test_floats() {
        assert!(matches!(
            convert("42", &FieldType::Primitive(Primitive::F32)),
            Ok(Some(Value::F32(v))) if v == 42.0
        ));
        assert!(matches!(
            convert("-0.5", &FieldType::Wrapper(Primitive::F64)),
            Ok(Some(Value::F64(v))) if v == -0.5
        ));

        let err = convert("forty", &FieldType::Primitive(Primitive::F64)).unwrap_err();
        assert_eq!(err.input(), "forty");
        assert!(err.to_string().contains("f64"));
    }

    #[test]
    fn test_float_whitespace_and_suffix() {
        let f32_type = FieldType::Primitive(Primitive::F32);
        assert!(matches!(convert("1.5 ", &f32_type), Ok(Some(Value::F32(v))) if v == 1.5));
        assert!(matches!(convert(" 1.5f", &f32_type), Ok(Some(Value::F32(v))) if v == 1.5));
        assert!(matches!(
            convert("2e3D", &FieldType::Primitive(Primitive::F64)),
            Ok(Some(Value::F64(v))) if v == 2000.0
        ));
    }

    #[test]
    fn test_float_special_values() {
        let f64_type = FieldType::Primitive(Primitive::F64);
        assert!(matches!(convert("NaN", &f64_type), Ok(Some(Value::F64(v))) if v.is_nan()));
        assert!(matches!(
            convert("-Infinity", &f64_type),
            Ok(Some(Value::F64(v))) if v == f64::NEG_INFINITY
        ));

        for rejected in ["inf", "infinity", "nan", "INF", "f", "1.5x"] {
            let err = convert(rejected, &f64_type).unwrap_err();
            assert_eq!(err.input(), rejected);
        }
    }

    #[test]
    fn test_integers_are_not_trimmed() {
        assert!(convert(" 5", &FieldType::Primitive(Primitive::I32)).is_err());
    }

    #[test]
    fn test_string_passes_through() {
        assert!(matches!(
            convert("  -s ", &FieldType::Str),
            Ok(Some(Value::Str(s))) if s == "  -s "
        ));
    }

    #[test]
    fn test_enum_normalization() {
        let choice = FieldType::enumeration::<Choice>();
        assert_eq!(member_name(convert("a", &choice).unwrap()), "A");
        assert_eq!(member_name(convert(" a", &choice).unwrap()), "A");
        assert_eq!(member_name(convert("some value", &choice).unwrap()), "SOME_VALUE");
        assert_eq!(member_name(convert("Some_Value", &choice).unwrap()), "SOME_VALUE");
    }

    #[test]
    fn test_enum_unknown_member() {
        let choice = FieldType::enumeration::<Choice>();
        let err = convert("c", &choice).unwrap_err();
        assert!(matches!(
            err,
            ConversionError::UnknownMember { ref normalized, .. } if normalized == "C"
        ));
    }

    #[test]
    fn test_custom_is_unhandled() {
        assert!(matches!(convert("x", &FieldType::custom::<u128>()), Ok(None)));
    }
}
