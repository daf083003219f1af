//! Typed value conversion for Utilkit.
//!
//! This crate converts raw strings (from environment variables, maps of
//! string settings, or delimited lists) into strongly-typed values, and uses
//! JSON as the pivot representation for composite shapes.

pub mod codec;
pub mod converter;
pub mod error;
pub mod response;
pub mod target;
pub mod value;

pub use codec::{
    decode, decode_string_map, encode, encode_to_vec, to_plain_string, to_str, transcode,
};
pub use converter::{
    convert, convert_list, convert_mapping, convert_optional_mapping, convert_optional_sequence,
    convert_sequence, list_str_conv, map_opt_str_conv, map_str_conv, slice_opt_str_conv,
    slice_str_conv, str_conv,
};
pub use error::{CodecError, ConvertError, ElementKey, ParseKind};
pub use response::ApiResponse;
pub use target::{Convertible, FloatWidth, IntWidth, TargetType};
pub use value::ConvertedValue;
