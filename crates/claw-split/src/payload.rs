//! Payload line decoding.

use serde::de::Error as _;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, SplitError};

/// A container runtime log record. Only the `log` field is used.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogLine {
    /// Raw log text, typically including its trailing newline.
    pub log: String,
}

impl LogLine {
    /// Decodes a raw input line.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::MalformedPayload`] if the bytes are not a JSON
    /// object with a string `log` field. Invalid UTF-8 is replaced with
    /// U+FFFD rather than rejected.
    pub fn decode(raw: &[u8], line_no: u64) -> Result<Self> {
        let malformed = |source| SplitError::MalformedPayload {
            line: line_no,
            source,
        };

        let text = String::from_utf8_lossy(raw);
        let value: Value = serde_json::from_str(&text).map_err(malformed)?;
        if !value.is_object() {
            return Err(malformed(serde_json::Error::custom("expected a JSON object")));
        }
        serde_json::from_value(value).map_err(malformed)
    }
}
