//! JSON codec used as the pivot for composite conversions.
//!
//! Responsibilities:
//! - Encode any serializable value as canonical JSON, refusing values nested
//!   deeper than `MAX_DEPTH` (self-referential values never terminate otherwise).
//! - Decode JSON text into a concrete shape, reporting the destination type
//!   and the offending fragment on failure.
//! - Convert between heterogeneous shapes by marshalling then unmarshalling.
//! - Decode string-valued maps into records, lifting nested JSON values.
//!
//! Does NOT handle:
//! - Parsing primitive literals (see `converter`).
//!
//! Invariants:
//! - Mapping key order in the output is not guaranteed.
//! - The identity fast path never re-encodes: a source whose type already is
//!   the destination type is returned as-is.

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_json::ser::Formatter;
use std::any::{Any, type_name};
use std::collections::HashMap;
use std::io;
use std::time::Duration;

use crate::error::CodecError;
use crate::target::Convertible;
use crate::value::ConvertedValue;

/// Maximum array/object nesting accepted by [`encode`].
pub const MAX_DEPTH: usize = 128;

/// Compact JSON formatter that fails once arrays/objects nest past a limit.
struct DepthLimitedFormatter {
    depth: usize,
    limit: usize,
}

impl DepthLimitedFormatter {
    fn new(limit: usize) -> Self {
        Self { depth: 0, limit }
    }

    fn enter(&mut self) -> io::Result<()> {
        if self.depth >= self.limit {
            return Err(io::Error::other(format!(
                "nesting exceeds {} levels; the value may be self-referential",
                self.limit
            )));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

impl Formatter for DepthLimitedFormatter {
    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.enter()?;
        writer.write_all(b"[")
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.leave();
        writer.write_all(b"]")
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.enter()?;
        writer.write_all(b"{")
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.leave();
        writer.write_all(b"}")
    }
}

/// Encodes `value` as JSON bytes.
pub fn encode_to_vec<T>(value: &T) -> Result<Vec<u8>, CodecError>
where
    T: Serialize + ?Sized,
{
    let mut buf = Vec::with_capacity(128);
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, DepthLimitedFormatter::new(MAX_DEPTH));
    value
        .serialize(&mut serializer)
        .map_err(|e| CodecError::Encode {
            message: e.to_string(),
        })?;
    Ok(buf)
}

/// Encodes `value` as a JSON string.
pub fn encode<T>(value: &T) -> Result<String, CodecError>
where
    T: Serialize + ?Sized,
{
    let bytes = encode_to_vec(value)?;
    String::from_utf8(bytes).map_err(|e| CodecError::Encode {
        message: e.to_string(),
    })
}

/// Decodes a serialized form into `T`.
pub fn decode<T>(form: impl AsRef<[u8]>) -> Result<T, CodecError>
where
    T: DeserializeOwned,
{
    decode_named(form.as_ref(), type_name::<T>())
}

pub(crate) fn decode_named<T>(form: &[u8], target: &str) -> Result<T, CodecError>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(form).map_err(|e| CodecError::decode(target, form, e))
}

/// Moves the value out of `slot` as a `T` when `S` and `T` are the same type.
///
/// `slot` is left untouched otherwise.
pub(crate) fn take_same<S, T>(slot: &mut Option<S>) -> Option<T>
where
    S: 'static,
    T: 'static,
{
    (slot as &mut dyn Any)
        .downcast_mut::<Option<T>>()
        .and_then(Option::take)
}

/// Converts `source` into `T` through the canonical form.
///
/// `String`, `&'static str` and `Vec<u8>` sources are already serialized forms
/// and are decoded directly. Any other source is encoded first.
pub fn transcode<S, T>(source: S) -> Result<T, CodecError>
where
    S: Serialize + 'static,
    T: DeserializeOwned + 'static,
{
    let mut slot = Some(source);
    if let Some(same) = take_same::<S, T>(&mut slot) {
        return Ok(same);
    }

    let any = &slot as &dyn Any;
    if let Some(Some(text)) = any.downcast_ref::<Option<String>>() {
        return decode(text);
    }
    if let Some(Some(text)) = any.downcast_ref::<Option<&'static str>>() {
        return decode(text);
    }
    if let Some(Some(bytes)) = any.downcast_ref::<Option<Vec<u8>>>() {
        return decode(bytes);
    }

    // `Some(source)` encodes exactly like `source`.
    let bytes = encode_to_vec(&slot)?;
    decode(&bytes)
}

/// Decodes a map of strings into `T`.
///
/// When `T` is a record, every value that itself parses as a JSON object or
/// array is lifted into that structure; all other values stay strings. For
/// any other `T` the map is re-encoded as-is.
pub fn decode_string_map<T>(map: HashMap<String, String>) -> Result<T, CodecError>
where
    T: Convertible + DeserializeOwned + 'static,
{
    let mut slot = Some(map);
    if let Some(same) = take_same::<HashMap<String, String>, T>(&mut slot) {
        return Ok(same);
    }

    if !T::target_type().is_record() {
        let bytes = encode_to_vec(&slot)?;
        return decode(&bytes);
    }

    let fields: serde_json::Map<String, Value> = slot
        .into_iter()
        .flatten()
        .map(|(key, raw)| {
            let value = nested_value(&raw).unwrap_or(Value::String(raw));
            (key, value)
        })
        .collect();
    let bytes = encode_to_vec(&Value::Object(fields))?;
    decode(&bytes)
}

fn nested_value(raw: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Some(value),
        _ => None,
    }
}

/// Renders a value as a plain string.
///
/// Strings come back unquoted; numbers, booleans and `null` as their
/// literals; durations in `1h 30m` form; timestamps as RFC 3339; composites
/// as JSON.
///
/// ```
/// use std::time::Duration;
/// use utilkit_convert::to_plain_string;
///
/// assert_eq!(to_plain_string(&Duration::from_secs(5400)).unwrap(), "1h 30m");
/// assert_eq!(to_plain_string(&"plain").unwrap(), "plain");
/// ```
pub fn to_plain_string<T>(value: &T) -> Result<String, CodecError>
where
    T: Serialize + Any,
{
    let any = value as &dyn Any;
    if let Some(duration) = any.downcast_ref::<Duration>() {
        return Ok(humantime::format_duration(*duration).to_string());
    }
    if let Some(time) = any.downcast_ref::<DateTime<FixedOffset>>() {
        return Ok(time.to_rfc3339_opts(SecondsFormat::AutoSi, true));
    }
    if let Some(time) = any.downcast_ref::<DateTime<Utc>>() {
        return Ok(time.to_rfc3339_opts(SecondsFormat::AutoSi, true));
    }
    if let Some(converted) = any.downcast_ref::<ConvertedValue>() {
        return Ok(converted.to_string());
    }

    let text = encode(value)?;
    if text.starts_with('"') {
        return decode::<String>(&text);
    }
    Ok(text)
}

/// Like [`to_plain_string`], but yields the error message on failure.
pub fn to_str<T>(value: &T) -> String
where
    T: Serialize + Any,
{
    to_plain_string(value).unwrap_or_else(|e| e.to_string())
}
