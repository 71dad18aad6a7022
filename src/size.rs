//! Size strategies.
//!
//! A batch measures every item with one [`SizeKind`] chosen at construction.
//! Items describe themselves through [`Measure`]; the strategy decides which
//! half of that description counts.

use crate::utils::serialization::{self, json};
use crate::{AggregateError, AggregateResult};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How an item's contribution to the cumulative size is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizeKind {
    /// Byte length of a byte sequence or text string
    RawLength,
    /// Byte length of the compact JSON encoding
    JsonLength,
}

impl SizeKind {
    /// Canonical configuration name
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeKind::RawLength => "raw-length",
            SizeKind::JsonLength => "json-length",
        }
    }

    /// Compute the size of `item` under this strategy
    pub fn measure<T: Measure + ?Sized>(&self, item: &T) -> AggregateResult<usize> {
        match self {
            SizeKind::RawLength => item
                .byte_len()
                .ok_or_else(|| AggregateError::UnsupportedType(item.type_label().to_string())),
            SizeKind::JsonLength => {
                let encoded = item.to_json()?;
                Ok(json::encoded_len(&encoded)?)
            }
        }
    }
}

impl fmt::Display for SizeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SizeKind {
    type Err = AggregateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw-length" | "raw_length" | "raw" | "len" => Ok(SizeKind::RawLength),
            "json-length" | "json_length" | "json" => Ok(SizeKind::JsonLength),
            other => Err(AggregateError::config(format!(
                "unknown size kind '{}' (expected raw-length or json-length)",
                other
            ))),
        }
    }
}

/// Items that can be measured by a [`SizeKind`]
pub trait Measure {
    /// Raw byte length, or `None` when this shape has no defined length
    fn byte_len(&self) -> Option<usize>;

    /// Compact JSON encoding of the item
    fn to_json(&self) -> serialization::Result<Vec<u8>>;

    /// Name reported in `UnsupportedType` errors
    fn type_label(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl Measure for [u8] {
    fn byte_len(&self) -> Option<usize> {
        Some(self.len())
    }

    fn to_json(&self) -> serialization::Result<Vec<u8>> {
        // Binary payloads travel as base64 strings inside JSON
        json::to_bytes(&base64::engine::general_purpose::STANDARD.encode(self))
    }
}

impl Measure for Vec<u8> {
    fn byte_len(&self) -> Option<usize> {
        Some(self.len())
    }

    fn to_json(&self) -> serialization::Result<Vec<u8>> {
        self.as_slice().to_json()
    }
}

impl Measure for str {
    fn byte_len(&self) -> Option<usize> {
        Some(self.len())
    }

    fn to_json(&self) -> serialization::Result<Vec<u8>> {
        json::to_bytes(self)
    }
}

impl Measure for &str {
    fn byte_len(&self) -> Option<usize> {
        Some(self.len())
    }

    fn to_json(&self) -> serialization::Result<Vec<u8>> {
        json::to_bytes(*self)
    }
}

impl Measure for String {
    fn byte_len(&self) -> Option<usize> {
        Some(self.len())
    }

    fn to_json(&self) -> serialization::Result<Vec<u8>> {
        json::to_bytes(self.as_str())
    }
}

impl Measure for serde_json::Value {
    fn byte_len(&self) -> Option<usize> {
        None
    }

    fn to_json(&self) -> serialization::Result<Vec<u8>> {
        json::to_bytes(self)
    }

    fn type_label(&self) -> &'static str {
        "serde_json::Value"
    }
}

/// Wrapper that measures any `Serialize` type by its JSON encoding
///
/// Has no raw length, so a raw-length batch rejects it with `UnsupportedType`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Unwrap the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Serialize> Measure for Json<T> {
    fn byte_len(&self) -> Option<usize> {
        None
    }

    fn to_json(&self) -> serialization::Result<Vec<u8>> {
        json::to_bytes(&self.0)
    }

    fn type_label(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use serde_json::json;

    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("refusing to encode"))
        }
    }

    #[test]
    fn test_raw_length_of_text_and_bytes() {
        assert_eq!(SizeKind::RawLength.measure("foo").unwrap(), 3);
        assert_eq!(SizeKind::RawLength.measure(&"héllo".to_string()).unwrap(), 6);
        assert_eq!(SizeKind::RawLength.measure(&vec![0u8; 17]).unwrap(), 17);
    }

    #[test]
    fn test_raw_length_rejects_structured_items() {
        let err = SizeKind::RawLength.measure(&json!({"a": 1})).unwrap_err();
        assert!(matches!(err, AggregateError::UnsupportedType(ref t) if t == "serde_json::Value"));

        let err = SizeKind::RawLength.measure(&Json(42u32)).unwrap_err();
        assert!(matches!(err, AggregateError::UnsupportedType(ref t) if t == "u32"));
    }

    #[test]
    fn test_json_length() {
        // {"id":1,"name":"a"}
        assert_eq!(
            SizeKind::JsonLength.measure(&json!({"id": 1, "name": "a"})).unwrap(),
            19
        );
        // quotes count
        assert_eq!(SizeKind::JsonLength.measure("foo").unwrap(), 5);
        // [1,2] as base64 "AQI="
        assert_eq!(SizeKind::JsonLength.measure(&vec![1u8, 2]).unwrap(), 6);
    }

    #[test]
    fn test_json_length_does_not_escape_html() {
        // compact serde_json output: <, > and & stay literal
        assert_eq!(SizeKind::JsonLength.measure("<a&b>").unwrap(), 7);
    }

    #[test]
    fn test_json_length_serialization_failure() {
        let err = SizeKind::JsonLength.measure(&Json(Unencodable)).unwrap_err();
        assert!(matches!(err, AggregateError::InvalidPayload(_)));
    }

    #[test]
    fn test_size_kind_parsing() {
        assert_eq!("raw-length".parse::<SizeKind>().unwrap(), SizeKind::RawLength);
        assert_eq!("JSON".parse::<SizeKind>().unwrap(), SizeKind::JsonLength);
        assert_eq!(" json_length ".parse::<SizeKind>().unwrap(), SizeKind::JsonLength);
        assert_eq!("len".parse::<SizeKind>().unwrap(), SizeKind::RawLength);

        let err = "xml".parse::<SizeKind>().unwrap_err();
        assert!(matches!(err, AggregateError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_size_kind_serde_names() {
        assert_eq!(serde_json::to_string(&SizeKind::RawLength).unwrap(), "\"raw-length\"");
        let kind: SizeKind = serde_json::from_str("\"json-length\"").unwrap();
        assert_eq!(kind, SizeKind::JsonLength);
        assert_eq!(SizeKind::JsonLength.to_string(), "json-length");
    }
}
