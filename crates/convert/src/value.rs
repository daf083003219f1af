//! The typed result of a conversion.

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

use crate::error::CodecError;

/// A value produced by the converter, tagged with the kind it was parsed as.
///
/// Serializes untagged, so a `ConvertedValue` encodes exactly like the Rust
/// value it wraps.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConvertedValue {
    String(String),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Usize(usize),
    F32(f32),
    F64(f64),
    Bool(bool),
    Instant(DateTime<FixedOffset>),
    Duration(Duration),
    Structured(serde_json::Value),
}

impl ConvertedValue {
    /// Short name of the variant, used in cast errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::Isize(_) => "isize",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::Usize(_) => "usize",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Bool(_) => "bool",
            Self::Instant(_) => "instant",
            Self::Duration(_) => "duration",
            Self::Structured(_) => "structured",
        }
    }

    /// Converts into a JSON value, consuming `self`.
    pub fn into_json(self) -> Result<serde_json::Value, CodecError> {
        match self {
            Self::Structured(value) => Ok(value),
            other => serde_json::to_value(&other).map_err(|e| CodecError::Encode {
                message: e.to_string(),
            }),
        }
    }
}

impl fmt::Display for ConvertedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(v) => f.write_str(v),
            Self::I8(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::Isize(v) => write!(f, "{v}"),
            Self::U8(v) => write!(f, "{v}"),
            Self::U16(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::Usize(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Instant(v) => f.write_str(&v.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Self::Duration(v) => write!(f, "{}", humantime::format_duration(*v)),
            Self::Structured(v) => write!(f, "{v}"),
        }
    }
}
