//! Error types for typed conversion and the JSON codec.
//!
//! Responsibilities:
//! - Define the conversion error taxonomy (`ConvertError`) and the codec
//!   error taxonomy (`CodecError`).
//! - Describe which literal grammar failed (`ParseKind`) and which batch
//!   element failed (`ElementKey`).
//!
//! Does NOT handle:
//! - Logging. Errors are returned to the caller; the core never logs.
//!
//! Invariants:
//! - Every parse error carries the attempted kind and the raw input.
//! - Decode errors carry the destination type name and a bounded fragment
//!   of the offending serialized text.

use std::fmt;
use thiserror::Error;

/// Maximum number of characters of serialized input kept in a decode error.
pub const FRAGMENT_LIMIT: usize = 256;

/// The literal grammar a parse attempt was using when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseKind {
    Time,
    Duration,
    Numeric { width: u32, signed: bool },
    Bool,
    Structured,
}

impl fmt::Display for ParseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Time => write!(f, "time"),
            Self::Duration => write!(f, "duration"),
            Self::Numeric { width, signed } => {
                let prefix = if *signed { "signed" } else { "unsigned" };
                write!(f, "numeric ({prefix} {width}-bit)")
            }
            Self::Bool => write!(f, "bool"),
            Self::Structured => write!(f, "structured"),
        }
    }
}

/// Position of a failing element inside a batch conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKey {
    Index(usize),
    Key(String),
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "[{index}]"),
            Self::Key(key) => write!(f, "{key:?}"),
        }
    }
}

/// Errors produced by the JSON codec.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("failed to encode value: {message}")]
    Encode { message: String },

    #[error("failed to decode into {target}: {message} (input: {fragment})")]
    Decode {
        target: String,
        fragment: String,
        message: String,
    },
}

impl CodecError {
    pub(crate) fn decode(target: impl Into<String>, input: &[u8], message: impl fmt::Display) -> Self {
        Self::Decode {
            target: target.into(),
            fragment: fragment_of(input),
            message: message.to_string(),
        }
    }
}

/// Errors produced by typed conversion.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("failed to parse {input:?} as {kind}: {message}")]
    Parse {
        kind: ParseKind,
        input: String,
        message: String,
    },

    #[error("failed to parse {input:?} as a structured value")]
    Structured {
        input: String,
        #[source]
        source: CodecError,
    },

    #[error("unsupported target type: {0}")]
    UnsupportedType(String),

    /// A converted value did not have the variant the requested Rust type expects.
    #[error("converted value {found} cannot be cast to {expected}")]
    Mismatch { expected: String, found: String },

    #[error("element {key} failed to convert")]
    Element {
        key: ElementKey,
        #[source]
        source: Box<ConvertError>,
    },
}

impl ConvertError {
    pub(crate) fn parse(kind: ParseKind, input: &str, message: impl fmt::Display) -> Self {
        Self::Parse {
            kind,
            input: input.to_string(),
            message: message.to_string(),
        }
    }

    pub(crate) fn element(key: ElementKey, source: ConvertError) -> Self {
        Self::Element {
            key,
            source: Box::new(source),
        }
    }

    /// The grammar that failed, if this is a parse failure.
    ///
    /// Batch failures report the kind of the element that failed.
    pub fn parse_kind(&self) -> Option<ParseKind> {
        match self {
            Self::Parse { kind, .. } => Some(*kind),
            Self::Structured { .. } => Some(ParseKind::Structured),
            Self::Element { source, .. } => source.parse_kind(),
            Self::UnsupportedType(_) | Self::Mismatch { .. } => None,
        }
    }
}

fn fragment_of(input: &[u8]) -> String {
    let text = String::from_utf8_lossy(input);
    if text.chars().count() <= FRAGMENT_LIMIT {
        return text.into_owned();
    }
    let mut fragment: String = text.chars().take(FRAGMENT_LIMIT).collect();
    fragment.push('…');
    fragment
}
