//! Canonical encoding of a call-ID list into a metafield value.
//!
//! The single on-wire representation is a JSON array of strings, stored in
//! the metafield's text value field. Earlier generations of this service
//! wrote the same logical list in several mutually incompatible shapes
//! (comma-joined strings, native multi-value lists); reading those back
//! with a guess-and-coerce parser is what corrupted data in the first
//! place. Decoding is therefore strict: anything that is not a JSON array
//! of strings is an error, never an empty list.

use serde_json::Value;
use thiserror::Error;

use crate::types::CallId;

/// A stored metafield value that does not parse as the canonical encoding.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The value is not valid JSON at all.
    #[error("stored value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The value is valid JSON but not an array.
    #[error("stored value is JSON but not an array (found {found})")]
    NotAnArray {
        /// JSON type name of what was found.
        found: &'static str,
    },

    /// The array contains an element that is not a string.
    #[error("list element at index {index} is not a string")]
    NonStringElement {
        /// Zero-based index of the offending element.
        index: usize,
    },
}

/// Encode a call-ID list as the canonical JSON array of strings.
///
/// The empty list encodes as `[]`; the record is kept alive with that
/// value rather than deleted.
#[must_use]
pub fn encode_call_ids(ids: &[CallId]) -> String {
    // A list of strings cannot fail JSON serialization.
    serde_json::to_string(ids).expect("string list serializes")
}

/// Decode a stored metafield value under the canonical encoding.
///
/// # Errors
///
/// Returns [`DecodeError`] if the value is not a JSON array of strings.
/// Order and any pre-existing duplicates are preserved; the write path is
/// responsible for never introducing duplicates.
pub fn decode_call_ids(value: &str) -> Result<Vec<CallId>, DecodeError> {
    let parsed: Value = serde_json::from_str(value)?;

    let Value::Array(elements) = parsed else {
        return Err(DecodeError::NotAnArray {
            found: json_type_name(&parsed),
        });
    };

    elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| match element {
            Value::String(s) => Ok(CallId::new(s)),
            _ => Err(DecodeError::NonStringElement { index }),
        })
        .collect()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
