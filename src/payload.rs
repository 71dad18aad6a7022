//! Payload - the closed set of item shapes every size strategy understands

use crate::size::Measure;
use crate::utils::serialization::{self, json, string};
use crate::{AggregateError, AggregateResult};
use base64::Engine;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// A single batchable item
///
/// Raw-length sizing works for `Bytes` and `Text`; json-length sizing works for
/// all three shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Opaque binary data
    Bytes(Vec<u8>),
    /// UTF-8 text, e.g. a log line
    Text(String),
    /// Structured data
    Json(Value),
}

impl Payload {
    /// Create a payload from binary data
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Payload::Bytes(data.into())
    }

    /// Create a payload from text
    ///
    /// # Example
    /// ```
    /// use batch_aggregate::Payload;
    ///
    /// let line = Payload::from_string(format!("user {} logged in", 42));
    /// assert_eq!(line.as_str(), Some("user 42 logged in"));
    /// ```
    pub fn from_string(text: impl Into<String>) -> Self {
        Payload::Text(text.into())
    }

    /// Create a payload from any JSON-serializable object
    ///
    /// # Example
    /// ```
    /// use batch_aggregate::Payload;
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct OrderEvent {
    ///     order_id: String,
    ///     amount: f64,
    /// }
    ///
    /// let order = OrderEvent { order_id: "ORD-12345".into(), amount: 99.99 };
    /// let payload = Payload::from_json(&order).unwrap();
    /// assert_eq!(payload.as_json().unwrap()["order_id"], "ORD-12345");
    /// ```
    pub fn from_json<T: Serialize>(data: T) -> AggregateResult<Self> {
        let value = serde_json::to_value(data)
            .map_err(|e| AggregateError::invalid_payload(e.to_string()))?;
        Ok(Payload::Json(value))
    }

    /// Raw bytes of a `Bytes` or `Text` payload
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Payload::Bytes(data) => Some(data),
            Payload::Text(text) => Some(text.as_bytes()),
            Payload::Json(_) => None,
        }
    }

    /// Text of a `Text` payload
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Interpret a raw payload as UTF-8 text
    pub fn to_text(&self) -> AggregateResult<&str> {
        match self {
            Payload::Text(text) => Ok(text),
            Payload::Bytes(data) => Ok(string::from_bytes(data)?),
            Payload::Json(_) => Err(AggregateError::UnsupportedType(
                "structured JSON payload has no text form".to_string(),
            )),
        }
    }

    /// Structured value of a `Json` payload
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Whether raw-length sizing applies to this payload
    pub fn is_raw(&self) -> bool {
        !matches!(self, Payload::Json(_))
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Payload::Bytes(data) => serializer
                .serialize_str(&base64::engine::general_purpose::STANDARD.encode(data)),
            Payload::Text(text) => serializer.serialize_str(text),
            Payload::Json(value) => value.serialize(serializer),
        }
    }
}

impl Measure for Payload {
    fn byte_len(&self) -> Option<usize> {
        self.as_bytes().map(<[u8]>::len)
    }

    fn to_json(&self) -> serialization::Result<Vec<u8>> {
        json::to_bytes(self)
    }

    fn type_label(&self) -> &'static str {
        match self {
            Payload::Bytes(_) => "Payload::Bytes",
            Payload::Text(_) => "Payload::Text",
            Payload::Json(_) => "Payload::Json",
        }
    }
}

impl From<Vec<u8>> for Payload {
    fn from(data: Vec<u8>) -> Self {
        Payload::Bytes(data)
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}
