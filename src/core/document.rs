//! Opaque serialized JSON documents.
//!
//! Section payloads and the raw sections copy carried by merged posts are kept
//! as the exact text they were imported with. Typed code only reaches inside
//! through [`RawDocument::parse`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawDocument(String);

impl RawDocument {
    /// Serializes a JSON value compactly, keeping key order and non-ASCII text as-is.
    pub fn from_value(value: &Value) -> Self {
        // Serializing a `Value` cannot fail: its map keys are always strings.
        Self(serde_json::to_string(value).unwrap_or_default())
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Parses the stored text. An empty document reads as `{}`.
    pub fn parse(&self) -> Result<Value, serde_json::Error> {
        if self.0.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }
        serde_json::from_str(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RawDocument {
    fn from(value: String) -> Self {
        Self(value)
    }
}
