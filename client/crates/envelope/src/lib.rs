//! Response envelope and list-shape decoding for the job-board API.
//!
//! Every API response is wrapped as `{statusCode, message, data}`. Collection
//! endpoints are inconsistent about what sits inside `data`: sometimes a bare
//! array, sometimes an object holding the array under `data` or `items`.
//! [`ListShape::classify`] is the single place where that shape is resolved,
//! and it fails closed: anything it does not recognise decodes as empty.

mod list;

use serde::Deserialize;
use serde_json::Value;

pub use list::{DecodedList, ListShape, WrapperKey, decode_items};

/// Errors raised while reading a response body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvelopeError {
    /// The body was not valid JSON.
    #[error("response body is not valid JSON: {message}")]
    InvalidJson {
        /// Parser error description.
        message: String,
    },
}

/// Decoded `{statusCode, message, data}` wrapper.
///
/// Bodies that are not shaped like an envelope are kept whole as `data`, so a
/// server that skips the wrapper still yields its payload.
///
/// # Examples
/// ```
/// use envelope::Envelope;
///
/// let body = br#"{"statusCode":200,"message":"ok","data":[1,2]}"#;
/// let envelope = Envelope::parse(body).unwrap();
/// assert_eq!(envelope.status_code, Some(200));
/// assert_eq!(envelope.data, Some(serde_json::json!([1, 2])));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Envelope {
    /// Status code echoed in the body, when present.
    pub status_code: Option<u16>,
    /// Human-readable message; list messages are joined with `"; "`.
    pub message: Option<String>,
    /// Payload, or `None` when absent or `null`.
    pub data: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MessageDto {
    Text(String),
    Lines(Vec<String>),
}

impl MessageDto {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Lines(lines) => lines.join("; "),
        }
    }
}

impl Envelope {
    /// Parse a raw response body. An empty body yields an empty envelope.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::InvalidJson`] when the body is not JSON.
    pub fn parse(body: &[u8]) -> Result<Self, EnvelopeError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let value: Value =
            serde_json::from_slice(body).map_err(|error| EnvelopeError::InvalidJson {
                message: error.to_string(),
            })?;
        Ok(Self::from_value(value))
    }

    /// Interpret an already-decoded JSON value.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let mut map = match value {
            Value::Object(map) => map,
            other => {
                return Self {
                    data: non_null(other),
                    ..Self::default()
                };
            }
        };
        if !map.contains_key("statusCode") && !map.contains_key("data") {
            return Self {
                data: Some(Value::Object(map)),
                ..Self::default()
            };
        }

        let status_code = map
            .get("statusCode")
            .and_then(Value::as_u64)
            .and_then(|code| u16::try_from(code).ok());
        let message = map
            .remove("message")
            .and_then(|raw| serde_json::from_value::<MessageDto>(raw).ok())
            .map(MessageDto::into_text)
            .filter(|text| !text.trim().is_empty());
        let data = map.remove("data").and_then(non_null);
        Self {
            status_code,
            message,
            data,
        }
    }

    /// Unwrap a single record from `data`.
    ///
    /// Some endpoints double-wrap records as `{data: {...}}`; an inner `data`
    /// object is taken when the outer object carries no `id` of its own.
    #[must_use]
    pub fn into_record(self) -> Option<Value> {
        let data = self.data?;
        match data {
            Value::Object(mut map) if !map.contains_key("id") => match map.remove("data") {
                Some(inner @ Value::Object(_)) => Some(inner),
                Some(other) => {
                    map.insert("data".to_owned(), other);
                    Some(Value::Object(map))
                }
                None => Some(Value::Object(map)),
            },
            other => Some(other),
        }
    }
}

fn non_null(value: Value) -> Option<Value> {
    if value.is_null() { None } else { Some(value) }
}
