//! Result carrier for one model call

use serde_json::Value;

/// What one model call produced
///
/// `raw` is the text exactly as returned (message content, or the tool-call
/// argument payload). `data` is present only when structured parsing passed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseEnvelope {
    /// Verbatim model output
    pub raw: String,

    /// Parsed structured value
    pub data: Option<Value>,
}

impl ResponseEnvelope {
    /// Envelope holding only raw text
    pub fn raw(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            data: None,
        }
    }

    /// Envelope for raw text together with its validated values
    ///
    /// A single value is stored as-is; several values are stored as a JSON array.
    pub fn from_values(raw: impl Into<String>, mut values: Vec<Value>) -> Self {
        let data = match values.len() {
            0 => None,
            1 => values.pop(),
            _ => Some(Value::Array(values)),
        };

        Self {
            raw: raw.into(),
            data,
        }
    }

    /// Whether nothing at all was received
    pub fn is_miss(&self) -> bool {
        self.raw.is_empty() && self.data.is_none()
    }
}
