//! Target type descriptors and the `Convertible` trait.
//!
//! Responsibilities:
//! - Describe every shape the converter can produce as a closed `TargetType` enum.
//! - Derive a `TargetType` from a Rust type (`Convertible::target_type`) and
//!   cast a `ConvertedValue` back into that type (`Convertible::from_converted`).
//!
//! Does NOT handle:
//! - Parsing raw strings (see `converter`).
//! - JSON encoding and decoding (see `codec`).
//!
//! Invariants:
//! - Every conversion is anchored to exactly one `TargetType`, known up front.
//! - `Dynamic` is never resolvable; converting into it always fails.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Duration;

use crate::error::{CodecError, ConvertError};
use crate::value::ConvertedValue;

/// Bit width of an integer target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
    /// Pointer-sized (`isize` / `usize`).
    Size,
}

impl IntWidth {
    pub fn bits(self) -> u32 {
        match self {
            Self::W8 => 8,
            Self::W16 => 16,
            Self::W32 => 32,
            Self::W64 => 64,
            Self::Size => usize::BITS,
        }
    }
}

/// Bit width of a floating point target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatWidth {
    W32,
    W64,
}

impl FloatWidth {
    pub fn bits(self) -> u32 {
        match self {
            Self::W32 => 32,
            Self::W64 => 64,
        }
    }
}

/// Runtime descriptor of the type a conversion should produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetType {
    String,
    Int(IntWidth),
    Uint(IntWidth),
    Float(FloatWidth),
    Bool,
    /// A point in time with a UTC offset.
    Instant,
    Duration,
    Sequence(Box<TargetType>),
    /// Mapping from string keys to the inner type.
    Mapping(Box<TargetType>),
    /// A struct with named fields, identified by its type name.
    Record(&'static str),
    /// A value that may be absent; the raw grammar is the inner type's.
    Optional(Box<TargetType>),
    /// An unresolved dynamic type, e.g. `serde_json::Value`.
    Dynamic,
}

impl TargetType {
    /// Whether values of this type travel through the codec.
    pub fn is_composite(&self) -> bool {
        match self {
            Self::Sequence(_) | Self::Mapping(_) | Self::Record(_) => true,
            Self::Optional(inner) => inner.is_composite(),
            _ => false,
        }
    }

    pub fn is_record(&self) -> bool {
        match self {
            Self::Record(_) => true,
            Self::Optional(inner) => inner.is_record(),
            _ => false,
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Int(IntWidth::Size) => write!(f, "isize"),
            Self::Int(width) => write!(f, "i{}", width.bits()),
            Self::Uint(IntWidth::Size) => write!(f, "usize"),
            Self::Uint(width) => write!(f, "u{}", width.bits()),
            Self::Float(width) => write!(f, "f{}", width.bits()),
            Self::Bool => write!(f, "bool"),
            Self::Instant => write!(f, "instant"),
            Self::Duration => write!(f, "duration"),
            Self::Sequence(inner) => write!(f, "sequence<{inner}>"),
            Self::Mapping(inner) => write!(f, "mapping<string, {inner}>"),
            Self::Record(name) => write!(f, "record {name}"),
            Self::Optional(inner) => write!(f, "option<{inner}>"),
            Self::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// A Rust type the converter can produce.
///
/// `target_type` derives the descriptor handed to the converter and
/// `from_converted` performs the final cast of its result.
pub trait Convertible: Sized {
    fn target_type() -> TargetType;

    fn from_converted(value: ConvertedValue) -> Result<Self, ConvertError>;
}

fn mismatch<T: Convertible>(found: &ConvertedValue) -> ConvertError {
    ConvertError::Mismatch {
        expected: T::target_type().to_string(),
        found: found.kind_name().to_string(),
    }
}

/// Casts a `Structured` value into `T` by deserializing it.
///
/// Used by composite `Convertible` impls and by `convertible_record!`.
pub fn from_structured<T>(value: ConvertedValue) -> Result<T, ConvertError>
where
    T: Convertible + DeserializeOwned,
{
    match value {
        ConvertedValue::Structured(json) => T::deserialize(&json).map_err(|e| {
            let input = json.to_string();
            ConvertError::Structured {
                source: CodecError::decode(T::target_type().to_string(), input.as_bytes(), e),
                input,
            }
        }),
        other => Err(mismatch::<T>(&other)),
    }
}

macro_rules! convertible_primitive {
    ($($ty:ty => $variant:ident, $target:expr;)*) => {$(
        impl Convertible for $ty {
            fn target_type() -> TargetType {
                $target
            }

            fn from_converted(value: ConvertedValue) -> Result<Self, ConvertError> {
                match value {
                    ConvertedValue::$variant(v) => Ok(v),
                    other => Err(mismatch::<Self>(&other)),
                }
            }
        }
    )*};
}

convertible_primitive! {
    String => String, TargetType::String;
    i8 => I8, TargetType::Int(IntWidth::W8);
    i16 => I16, TargetType::Int(IntWidth::W16);
    i32 => I32, TargetType::Int(IntWidth::W32);
    i64 => I64, TargetType::Int(IntWidth::W64);
    isize => Isize, TargetType::Int(IntWidth::Size);
    u8 => U8, TargetType::Uint(IntWidth::W8);
    u16 => U16, TargetType::Uint(IntWidth::W16);
    u32 => U32, TargetType::Uint(IntWidth::W32);
    u64 => U64, TargetType::Uint(IntWidth::W64);
    usize => Usize, TargetType::Uint(IntWidth::Size);
    f32 => F32, TargetType::Float(FloatWidth::W32);
    f64 => F64, TargetType::Float(FloatWidth::W64);
    bool => Bool, TargetType::Bool;
    DateTime<FixedOffset> => Instant, TargetType::Instant;
    Duration => Duration, TargetType::Duration;
}

impl Convertible for DateTime<Utc> {
    fn target_type() -> TargetType {
        TargetType::Instant
    }

    fn from_converted(value: ConvertedValue) -> Result<Self, ConvertError> {
        match value {
            ConvertedValue::Instant(v) => Ok(v.with_timezone(&Utc)),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl<T> Convertible for Option<T>
where
    T: Convertible,
{
    fn target_type() -> TargetType {
        TargetType::Optional(Box::new(T::target_type()))
    }

    fn from_converted(value: ConvertedValue) -> Result<Self, ConvertError> {
        match value {
            ConvertedValue::Structured(serde_json::Value::Null) => Ok(None),
            other => T::from_converted(other).map(Some),
        }
    }
}

impl<T> Convertible for Vec<T>
where
    T: Convertible + DeserializeOwned,
{
    fn target_type() -> TargetType {
        TargetType::Sequence(Box::new(T::target_type()))
    }

    fn from_converted(value: ConvertedValue) -> Result<Self, ConvertError> {
        from_structured(value)
    }
}

impl<T> Convertible for HashMap<String, T>
where
    T: Convertible + DeserializeOwned,
{
    fn target_type() -> TargetType {
        TargetType::Mapping(Box::new(T::target_type()))
    }

    fn from_converted(value: ConvertedValue) -> Result<Self, ConvertError> {
        from_structured(value)
    }
}

impl<T> Convertible for BTreeMap<String, T>
where
    T: Convertible + DeserializeOwned,
{
    fn target_type() -> TargetType {
        TargetType::Mapping(Box::new(T::target_type()))
    }

    fn from_converted(value: ConvertedValue) -> Result<Self, ConvertError> {
        from_structured(value)
    }
}

impl Convertible for serde_json::Value {
    fn target_type() -> TargetType {
        TargetType::Dynamic
    }

    fn from_converted(value: ConvertedValue) -> Result<Self, ConvertError> {
        value.into_json().map_err(|source| ConvertError::Structured {
            input: String::new(),
            source,
        })
    }
}

/// Implements [`Convertible`] for structs that deserialize from JSON objects.
///
/// ```
/// use serde::Deserialize;
/// use utilkit_convert::{convertible_record, str_conv};
///
/// #[derive(Debug, Deserialize, PartialEq)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
/// convertible_record!(Point);
///
/// let p: Point = str_conv(r#"{"x":1,"y":2}"#).unwrap();
/// assert_eq!(p, Point { x: 1, y: 2 });
/// ```
#[macro_export]
macro_rules! convertible_record {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::Convertible for $ty {
            fn target_type() -> $crate::TargetType {
                $crate::TargetType::Record(stringify!($ty))
            }

            fn from_converted(
                value: $crate::ConvertedValue,
            ) -> ::std::result::Result<Self, $crate::ConvertError> {
                $crate::target::from_structured(value)
            }
        }
    )+};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_target_type_is_derived_from_rust_type() {
        assert_eq!(<i16 as Convertible>::target_type(), TargetType::Int(IntWidth::W16));
        assert_eq!(
            <Vec<u8> as Convertible>::target_type(),
            TargetType::Sequence(Box::new(TargetType::Uint(IntWidth::W8)))
        );
        assert_eq!(
            <HashMap<String, bool> as Convertible>::target_type(),
            TargetType::Mapping(Box::new(TargetType::Bool))
        );
        assert_eq!(<serde_json::Value as Convertible>::target_type(), TargetType::Dynamic);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(TargetType::Int(IntWidth::Size).to_string(), "isize");
        assert_eq!(
            TargetType::Mapping(Box::new(TargetType::Float(FloatWidth::W32))).to_string(),
            "mapping<string, f32>"
        );
        assert_eq!(TargetType::Record("Point").to_string(), "record Point");
    }

    #[test]
    fn test_primitive_cast_rejects_other_variant() {
        let err = i32::from_converted(ConvertedValue::I64(1)).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Mismatch { ref expected, ref found } if expected == "i32" && found == "i64"
        ));
    }

    #[test]
    fn test_option_casts_null_to_none() {
        let value = ConvertedValue::Structured(serde_json::Value::Null);
        assert_eq!(Option::<i32>::from_converted(value).unwrap(), None);
        assert_eq!(
            Option::<i32>::from_converted(ConvertedValue::I32(3)).unwrap(),
            Some(3)
        );
    }

    #[test]
    fn test_structured_cast_reports_codec_error() {
        let err = Vec::<i32>::from_converted(ConvertedValue::Structured(json!(["a"]))).unwrap_err();
        assert!(matches!(err, ConvertError::Structured { .. }));
    }

    #[test]
    fn test_composite_and_record_predicates() {
        assert!(TargetType::Record("Point").is_record());
        assert!(TargetType::Optional(Box::new(TargetType::Record("Point"))).is_composite());
        assert!(!TargetType::Duration.is_composite());
    }
}
