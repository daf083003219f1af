//! String to typed value conversion.
//!
//! Responsibilities:
//! - Parse a raw string into a `ConvertedValue` for a given `TargetType`.
//! - Apply the single-value contract element-wise to sequences and mappings,
//!   passing absent values through untouched.
//! - Provide typed wrappers that derive the `TargetType` from the requested
//!   Rust type and cast the result.
//!
//! Does NOT handle:
//! - Reading environment variables or files (see `utilkit-config`).
//! - Logging. Errors are returned to the caller.
//!
//! Invariants:
//! - Malformed input never yields a zero value; it always fails.
//! - Batch conversions stop at the first failing element and report its
//!   index or key.
//! - Composite targets are decoded through the codec and checked against
//!   the requested shape.

use chrono::{DateTime, FixedOffset};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

use crate::codec::{self, take_same};
use crate::error::{CodecError, ConvertError, ElementKey, ParseKind};
use crate::target::{Convertible, FloatWidth, IntWidth, TargetType};
use crate::value::ConvertedValue;

const TRUE_LITERALS: [&str; 6] = ["1", "t", "T", "TRUE", "true", "True"];
const FALSE_LITERALS: [&str; 6] = ["0", "f", "F", "FALSE", "false", "False"];

/// Converts `raw` into a value of the given target type.
pub fn convert(raw: &str, target: &TargetType) -> Result<ConvertedValue, ConvertError> {
    match target {
        TargetType::String => Ok(ConvertedValue::String(raw.to_string())),
        TargetType::Int(width) => parse_int(raw, *width),
        TargetType::Uint(width) => parse_uint(raw, *width),
        TargetType::Float(width) => parse_float(raw, *width),
        TargetType::Bool => parse_bool(raw).map(ConvertedValue::Bool),
        TargetType::Instant => parse_instant(raw).map(ConvertedValue::Instant),
        TargetType::Duration => parse_duration(raw).map(ConvertedValue::Duration),
        TargetType::Optional(inner) if inner.is_composite() && raw.trim() == "null" => {
            Ok(ConvertedValue::Structured(Value::Null))
        }
        TargetType::Optional(inner) => convert(raw, inner),
        TargetType::Sequence(_) | TargetType::Mapping(_) | TargetType::Record(_) => {
            parse_structured(raw, target).map(ConvertedValue::Structured)
        }
        TargetType::Dynamic => Err(ConvertError::UnsupportedType(format!(
            "{target} (a concrete target type is required)"
        ))),
    }
}

/// Parses an RFC 3339 timestamp, with or without fractional seconds.
pub fn parse_instant(raw: &str) -> Result<DateTime<FixedOffset>, ConvertError> {
    DateTime::parse_from_rfc3339(raw).map_err(|e| ConvertError::parse(ParseKind::Time, raw, e))
}

/// Parses a duration such as `1h30m` or `250ms`.
pub fn parse_duration(raw: &str) -> Result<Duration, ConvertError> {
    humantime::parse_duration(raw).map_err(|e| ConvertError::parse(ParseKind::Duration, raw, e))
}

/// Parses the boolean literals `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool(raw: &str) -> Result<bool, ConvertError> {
    if TRUE_LITERALS.contains(&raw) {
        Ok(true)
    } else if FALSE_LITERALS.contains(&raw) {
        Ok(false)
    } else {
        Err(ConvertError::parse(
            ParseKind::Bool,
            raw,
            "expected one of 1, t, true, 0, f, false",
        ))
    }
}

fn parse_int(raw: &str, width: IntWidth) -> Result<ConvertedValue, ConvertError> {
    let kind = ParseKind::Numeric {
        width: width.bits(),
        signed: true,
    };
    let fail = |e: std::num::ParseIntError| ConvertError::parse(kind, raw, e);
    Ok(match width {
        IntWidth::W8 => ConvertedValue::I8(raw.parse().map_err(fail)?),
        IntWidth::W16 => ConvertedValue::I16(raw.parse().map_err(fail)?),
        IntWidth::W32 => ConvertedValue::I32(raw.parse().map_err(fail)?),
        IntWidth::W64 => ConvertedValue::I64(raw.parse().map_err(fail)?),
        IntWidth::Size => ConvertedValue::Isize(raw.parse().map_err(fail)?),
    })
}

fn parse_uint(raw: &str, width: IntWidth) -> Result<ConvertedValue, ConvertError> {
    let kind = ParseKind::Numeric {
        width: width.bits(),
        signed: false,
    };
    let fail = |e: std::num::ParseIntError| ConvertError::parse(kind, raw, e);
    Ok(match width {
        IntWidth::W8 => ConvertedValue::U8(raw.parse().map_err(fail)?),
        IntWidth::W16 => ConvertedValue::U16(raw.parse().map_err(fail)?),
        IntWidth::W32 => ConvertedValue::U32(raw.parse().map_err(fail)?),
        IntWidth::W64 => ConvertedValue::U64(raw.parse().map_err(fail)?),
        IntWidth::Size => ConvertedValue::Usize(raw.parse().map_err(fail)?),
    })
}

fn parse_float(raw: &str, width: FloatWidth) -> Result<ConvertedValue, ConvertError> {
    let kind = ParseKind::Numeric {
        width: width.bits(),
        signed: true,
    };
    let fail = |e: std::num::ParseFloatError| ConvertError::parse(kind, raw, e);
    match width {
        FloatWidth::W32 => {
            let value: f32 = raw.parse().map_err(fail)?;
            reject_overflow(raw, value.is_infinite(), kind)?;
            Ok(ConvertedValue::F32(value))
        }
        FloatWidth::W64 => {
            let value: f64 = raw.parse().map_err(fail)?;
            reject_overflow(raw, value.is_infinite(), kind)?;
            Ok(ConvertedValue::F64(value))
        }
    }
}

// Finite literals too large for the width parse to infinity; only an
// explicit `inf`/`infinity` literal may produce one.
fn reject_overflow(raw: &str, infinite: bool, kind: ParseKind) -> Result<(), ConvertError> {
    let literal = raw.trim_start_matches(['+', '-']).to_ascii_lowercase();
    if infinite && !literal.starts_with("inf") {
        return Err(ConvertError::parse(kind, raw, "value out of range"));
    }
    Ok(())
}

fn parse_structured(raw: &str, target: &TargetType) -> Result<Value, ConvertError> {
    let structured = |source: CodecError| ConvertError::Structured {
        input: raw.to_string(),
        source,
    };
    let value: Value =
        codec::decode_named(raw.as_bytes(), &target.to_string()).map_err(structured)?;
    check_shape(&value, target).map_err(|message| {
        structured(CodecError::decode(target.to_string(), raw.as_bytes(), message))
    })?;
    Ok(value)
}

fn check_shape(value: &Value, target: &TargetType) -> Result<(), String> {
    match (target, value) {
        (TargetType::Optional(_), Value::Null) => Ok(()),
        (TargetType::Optional(inner), _) => check_shape(value, inner),
        (TargetType::String, Value::String(_)) => Ok(()),
        (TargetType::Bool, Value::Bool(_)) => Ok(()),
        (TargetType::Int(width), Value::Number(n))
            if n.as_i64().is_some_and(|v| fits_signed(v, *width)) =>
        {
            Ok(())
        }
        (TargetType::Uint(width), Value::Number(n))
            if n.as_u64().is_some_and(|v| fits_unsigned(v, *width)) =>
        {
            Ok(())
        }
        (TargetType::Float(FloatWidth::W32), Value::Number(n))
            if n.as_f64().is_some_and(|v| (v as f32).is_finite()) =>
        {
            Ok(())
        }
        (TargetType::Float(FloatWidth::W64), Value::Number(_)) => Ok(()),
        (TargetType::Instant, Value::String(s)) if parse_instant(s).is_ok() => Ok(()),
        (TargetType::Duration, Value::Object(_) | Value::Array(_)) => Ok(()),
        (TargetType::Sequence(inner), Value::Array(items)) => {
            items.iter().enumerate().try_for_each(|(index, item)| {
                check_shape(item, inner).map_err(|m| format!("[{index}]: {m}"))
            })
        }
        (TargetType::Mapping(inner), Value::Object(fields)) => {
            fields.iter().try_for_each(|(key, item)| {
                check_shape(item, inner).map_err(|m| format!("{key:?}: {m}"))
            })
        }
        (TargetType::Record(_), Value::Object(_)) => Ok(()),
        _ => Err(format!("expected {target}, found {}", json_kind(value))),
    }
}

fn fits_signed(value: i64, width: IntWidth) -> bool {
    match width {
        IntWidth::W8 => i8::try_from(value).is_ok(),
        IntWidth::W16 => i16::try_from(value).is_ok(),
        IntWidth::W32 => i32::try_from(value).is_ok(),
        IntWidth::W64 => true,
        IntWidth::Size => isize::try_from(value).is_ok(),
    }
}

fn fits_unsigned(value: u64, width: IntWidth) -> bool {
    match width {
        IntWidth::W8 => u8::try_from(value).is_ok(),
        IntWidth::W16 => u16::try_from(value).is_ok(),
        IntWidth::W32 => u32::try_from(value).is_ok(),
        IntWidth::W64 => true,
        IntWidth::Size => usize::try_from(value).is_ok(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Converts every element of `raws`, failing on the first bad element.
pub fn convert_sequence<S>(
    raws: &[S],
    target: &TargetType,
) -> Result<Vec<ConvertedValue>, ConvertError>
where
    S: AsRef<str>,
{
    raws.iter()
        .enumerate()
        .map(|(index, raw)| {
            convert(raw.as_ref(), target)
                .map_err(|e| ConvertError::element(ElementKey::Index(index), e))
        })
        .collect()
}

/// Like [`convert_sequence`], but `None` elements stay `None`.
pub fn convert_optional_sequence<S>(
    raws: &[Option<S>],
    target: &TargetType,
) -> Result<Vec<Option<ConvertedValue>>, ConvertError>
where
    S: AsRef<str>,
{
    raws.iter()
        .enumerate()
        .map(|(index, raw)| {
            raw.as_ref()
                .map(|raw| convert(raw.as_ref(), target))
                .transpose()
                .map_err(|e| ConvertError::element(ElementKey::Index(index), e))
        })
        .collect()
}

/// Converts every value of `raws`, failing on the first bad entry.
pub fn convert_mapping<S>(
    raws: &HashMap<String, S>,
    target: &TargetType,
) -> Result<HashMap<String, ConvertedValue>, ConvertError>
where
    S: AsRef<str>,
{
    raws.iter()
        .map(|(key, raw)| {
            convert(raw.as_ref(), target)
                .map(|value| (key.clone(), value))
                .map_err(|e| ConvertError::element(ElementKey::Key(key.clone()), e))
        })
        .collect()
}

/// Like [`convert_mapping`], but `None` values stay `None`.
pub fn convert_optional_mapping<S>(
    raws: &HashMap<String, Option<S>>,
    target: &TargetType,
) -> Result<HashMap<String, Option<ConvertedValue>>, ConvertError>
where
    S: AsRef<str>,
{
    raws.iter()
        .map(|(key, raw)| {
            raw.as_ref()
                .map(|raw| convert(raw.as_ref(), target))
                .transpose()
                .map(|value| (key.clone(), value))
                .map_err(|e| ConvertError::element(ElementKey::Key(key.clone()), e))
        })
        .collect()
}

/// Splits `raw` on `separator` and converts each trimmed piece into an
/// element of the sequence `target`.
pub fn convert_list(
    raw: &str,
    separator: char,
    target: &TargetType,
) -> Result<ConvertedValue, ConvertError> {
    let TargetType::Sequence(inner) = target else {
        return Err(ConvertError::UnsupportedType(format!(
            "{target} (delimited lists convert into sequences only)"
        )));
    };

    let items = raw
        .split(separator)
        .map(str::trim)
        .enumerate()
        .map(|(index, piece)| {
            convert(piece, inner)
                .and_then(|value| {
                    value.into_json().map_err(|source| ConvertError::Structured {
                        input: piece.to_string(),
                        source,
                    })
                })
                .map_err(|e| ConvertError::element(ElementKey::Index(index), e))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ConvertedValue::Structured(Value::Array(items)))
}

/// Converts `raw` into `T`.
///
/// ```
/// use utilkit_convert::str_conv;
///
/// let port: u16 = str_conv("8080").unwrap();
/// assert_eq!(port, 8080);
/// assert!(str_conv::<u16>("70000").is_err());
/// ```
pub fn str_conv<T>(raw: &str) -> Result<T, ConvertError>
where
    T: Convertible,
{
    T::from_converted(convert(raw, &T::target_type())?)
}

/// Converts every element of `raws` into `T`.
pub fn slice_str_conv<T, S>(raws: &[S]) -> Result<Vec<T>, ConvertError>
where
    T: Convertible,
    S: AsRef<str>,
{
    let target = T::target_type();
    raws.iter()
        .enumerate()
        .map(|(index, raw)| {
            convert(raw.as_ref(), &target)
                .and_then(T::from_converted)
                .map_err(|e| ConvertError::element(ElementKey::Index(index), e))
        })
        .collect()
}

/// Converts every present element of `raws` into `T`; `None` stays `None`.
pub fn slice_opt_str_conv<T, S>(raws: &[Option<S>]) -> Result<Vec<Option<T>>, ConvertError>
where
    T: Convertible,
    S: AsRef<str>,
{
    let target = T::target_type();
    raws.iter()
        .enumerate()
        .map(|(index, raw)| {
            raw.as_ref()
                .map(|raw| convert(raw.as_ref(), &target).and_then(T::from_converted))
                .transpose()
                .map_err(|e| ConvertError::element(ElementKey::Index(index), e))
        })
        .collect()
}

/// Converts every value of `map` into `T`.
///
/// A `HashMap<String, String>` destination is returned without conversion.
pub fn map_str_conv<T>(map: HashMap<String, String>) -> Result<HashMap<String, T>, ConvertError>
where
    T: Convertible + 'static,
{
    let mut slot = Some(map);
    if let Some(same) = take_same::<HashMap<String, String>, HashMap<String, T>>(&mut slot) {
        return Ok(same);
    }

    let target = T::target_type();
    slot.into_iter()
        .flatten()
        .map(|(key, raw)| {
            match convert(&raw, &target).and_then(T::from_converted) {
                Ok(value) => Ok((key, value)),
                Err(e) => Err(ConvertError::element(ElementKey::Key(key), e)),
            }
        })
        .collect()
}

/// Converts every present value of `map` into `T`; `None` stays `None`.
pub fn map_opt_str_conv<T>(
    map: HashMap<String, Option<String>>,
) -> Result<HashMap<String, Option<T>>, ConvertError>
where
    T: Convertible,
{
    let target = T::target_type();
    map.into_iter()
        .map(|(key, raw)| {
            let converted = raw
                .map(|raw| convert(&raw, &target).and_then(T::from_converted))
                .transpose();
            match converted {
                Ok(value) => Ok((key, value)),
                Err(e) => Err(ConvertError::element(ElementKey::Key(key), e)),
            }
        })
        .collect()
}

/// Converts a `separator`-delimited list into the sequence type `T`.
///
/// ```
/// use utilkit_convert::list_str_conv;
///
/// let ports: Vec<u16> = list_str_conv("80, 443", ',').unwrap();
/// assert_eq!(ports, vec![80, 443]);
/// ```
pub fn list_str_conv<T>(raw: &str, separator: char) -> Result<T, ConvertError>
where
    T: Convertible,
{
    T::from_converted(convert_list(raw, separator, &T::target_type())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_is_returned_unchanged() {
        let value = convert("  spaced  ", &TargetType::String).unwrap();
        assert_eq!(value, ConvertedValue::String("  spaced  ".to_string()));
    }

    #[test]
    fn test_numeric_widths_are_enforced() {
        assert_eq!(
            convert("127", &TargetType::Int(IntWidth::W8)).unwrap(),
            ConvertedValue::I8(127)
        );
        let err = convert("128", &TargetType::Int(IntWidth::W8)).unwrap_err();
        assert_eq!(
            err.parse_kind(),
            Some(ParseKind::Numeric {
                width: 8,
                signed: true
            })
        );
        let err = convert("-1", &TargetType::Uint(IntWidth::W32)).unwrap_err();
        assert_eq!(
            err.parse_kind(),
            Some(ParseKind::Numeric {
                width: 32,
                signed: false
            })
        );
    }

    #[test]
    fn test_malformed_numeric_never_yields_zero() {
        for raw in ["abc", "", " 1", "1.0", "0x10"] {
            let err = convert(raw, &TargetType::Int(IntWidth::W32)).unwrap_err();
            assert!(
                matches!(err.parse_kind(), Some(ParseKind::Numeric { .. })),
                "{raw:?} should fail as numeric"
            );
        }
    }

    #[test]
    fn test_float_overflow_is_rejected() {
        assert!(convert("1e40", &TargetType::Float(FloatWidth::W32)).is_err());
        assert_eq!(
            convert("1e40", &TargetType::Float(FloatWidth::W64)).unwrap(),
            ConvertedValue::F64(1e40)
        );
        assert_eq!(
            convert("-inf", &TargetType::Float(FloatWidth::W32)).unwrap(),
            ConvertedValue::F32(f32::NEG_INFINITY)
        );
    }

    #[test]
    fn test_float_overflow_inside_composites_is_rejected() {
        let target = TargetType::Sequence(Box::new(TargetType::Float(FloatWidth::W32)));
        let err = convert("[1.5, 1e40]", &target).unwrap_err();
        assert_eq!(err.parse_kind(), Some(ParseKind::Structured));
        assert!(str_conv::<Vec<f32>>("[1e40]").is_err());
        assert!(str_conv::<HashMap<String, f32>>(r#"{"a": 1e40}"#).is_err());
        assert!(str_conv::<Option<Vec<f32>>>("[-1e40]").is_err());

        assert_eq!(str_conv::<Vec<f32>>("[1.5, -2]").unwrap(), vec![1.5, -2.0]);
        assert_eq!(str_conv::<Vec<f64>>("[1e40]").unwrap(), vec![1e40]);
        let map: HashMap<String, f32> = str_conv(r#"{"a": 3.4e38}"#).unwrap();
        assert!(map["a"].is_finite());
    }

    #[test]
    fn test_bool_literals() {
        for raw in TRUE_LITERALS {
            assert!(parse_bool(raw).unwrap(), "{raw:?} should be true");
        }
        for raw in FALSE_LITERALS {
            assert!(!parse_bool(raw).unwrap(), "{raw:?} should be false");
        }
        for raw in ["maybe", "yes", "tRUE", ""] {
            let err = parse_bool(raw).unwrap_err();
            assert_eq!(err.parse_kind(), Some(ParseKind::Bool));
        }
    }

    #[test]
    fn test_instant_with_fractional_seconds() {
        let value = convert("2024-01-15T10:00:00.250+07:00", &TargetType::Instant).unwrap();
        let ConvertedValue::Instant(instant) = value else {
            panic!("expected an instant");
        };
        assert_eq!(instant.timestamp_subsec_millis(), 250);
        assert_eq!(instant.offset().local_minus_utc(), 7 * 3600);
    }

    #[test]
    fn test_invalid_instant_and_duration() {
        let err = convert("not-a-date", &TargetType::Instant).unwrap_err();
        assert_eq!(err.parse_kind(), Some(ParseKind::Time));
        let err = convert("soon", &TargetType::Duration).unwrap_err();
        assert_eq!(err.parse_kind(), Some(ParseKind::Duration));
    }

    #[test]
    fn test_duration_grammar() {
        assert_eq!(
            convert("1h30m", &TargetType::Duration).unwrap(),
            ConvertedValue::Duration(Duration::from_secs(5400))
        );
        assert_eq!(
            convert("250ms", &TargetType::Duration).unwrap(),
            ConvertedValue::Duration(Duration::from_millis(250))
        );
    }

    #[test]
    fn test_dynamic_target_is_unsupported() {
        let err = convert("{}", &TargetType::Dynamic).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedType(_)));
    }

    #[test]
    fn test_composite_shape_is_checked() {
        let target = TargetType::Sequence(Box::new(TargetType::Int(IntWidth::W8)));
        assert_eq!(
            convert("[1, 2]", &target).unwrap(),
            ConvertedValue::Structured(json!([1, 2]))
        );
        for raw in ["[1, 300]", r#"{"a": 1}"#, "[1,"] {
            let err = convert(raw, &target).unwrap_err();
            assert_eq!(err.parse_kind(), Some(ParseKind::Structured), "{raw}");
        }
        let record = TargetType::Record("Point");
        assert!(convert("[]", &record).is_err());
        assert!(convert(r#"{"x": 1}"#, &record).is_ok());
    }

    #[test]
    fn test_optional_composite_accepts_null() {
        let target = TargetType::Optional(Box::new(TargetType::Record("Point")));
        assert_eq!(
            convert("null", &target).unwrap(),
            ConvertedValue::Structured(Value::Null)
        );
    }

    #[test]
    fn test_sequence_reports_failing_index() {
        let err = convert_sequence(&["1", "2", "x", "y"], &TargetType::Int(IntWidth::W64))
            .unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Element {
                key: ElementKey::Index(2),
                ..
            }
        ));
    }

    #[test]
    fn test_optional_sequence_passes_absent_through() {
        let raws = [Some("1"), None, Some("3")];
        let values = convert_optional_sequence(&raws, &TargetType::Uint(IntWidth::W8)).unwrap();
        assert_eq!(
            values,
            vec![Some(ConvertedValue::U8(1)), None, Some(ConvertedValue::U8(3))]
        );
    }

    #[test]
    fn test_optional_mapping_passes_absent_through() {
        let raws = HashMap::from([
            ("a".to_string(), Some("true".to_string())),
            ("b".to_string(), None),
        ]);
        let values = convert_optional_mapping(&raws, &TargetType::Bool).unwrap();
        assert_eq!(values["a"], Some(ConvertedValue::Bool(true)));
        assert_eq!(values["b"], None);
    }

    #[test]
    fn test_mapping_reports_failing_key() {
        let raws = HashMap::from([("bad".to_string(), "nope".to_string())]);
        let err = convert_mapping(&raws, &TargetType::Bool).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Element { key: ElementKey::Key(ref k), .. } if k == "bad"
        ));
    }

    #[test]
    fn test_list_conversion() {
        let target = TargetType::Sequence(Box::new(TargetType::Duration));
        let value = convert_list("1s, 2m", ',', &target).unwrap();
        let durations: Vec<Duration> = Convertible::from_converted(value).unwrap();
        assert_eq!(durations, vec![Duration::from_secs(1), Duration::from_secs(120)]);

        let err = convert_list("1,x", ',', &target).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Element {
                key: ElementKey::Index(0),
                ..
            }
        ));
        assert!(convert_list("1", ',', &TargetType::Bool).is_err());
    }

    #[test]
    fn test_map_str_conv_identity() {
        let map = HashMap::from([("k".to_string(), "v".to_string())]);
        let same: HashMap<String, String> = map_str_conv(map.clone()).unwrap();
        assert_eq!(same, map);
    }
}
