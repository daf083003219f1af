//! Default JSON payload for API responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::codec;
use crate::error::CodecError;

/// Envelope returned by API handlers.
///
/// A status of 400 or above marks the response as an error; it then doubles
/// as a `std::error::Error` whose message is `message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// The same HTTP status code as the response.
    pub status: u16,
    /// Application-specific code identifying the error.
    pub error_code: String,
    pub message: String,
    pub data: Value,
}

impl ApiResponse {
    /// A successful response carrying `data`.
    pub fn ok<T>(data: &T) -> Result<Self, CodecError>
    where
        T: Serialize + ?Sized,
    {
        let data = codec::decode(codec::encode_to_vec(data)?)?;
        Ok(Self {
            status: 200,
            error_code: String::new(),
            message: String::new(),
            data,
        })
    }

    /// An error response without payload.
    pub fn error(status: u16, error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            error_code: error_code.into(),
            message: message.into(),
            data: Value::Null,
        }
    }

    pub fn is_error(&self) -> bool {
        self.status >= 400
    }
}

impl fmt::Display for ApiResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_error() {
            f.write_str(&self.message)
        } else {
            Ok(())
        }
    }
}

impl std::error::Error for ApiResponse {}
