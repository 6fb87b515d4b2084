//! The natural structured output: input/output training pairs

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A single input/output training pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Prompt side of the pair
    pub input: String,

    /// Expected completion
    pub output: String,
}

/// A batch of pairs as returned for one chunk
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConversationsResponse {
    /// Pairs generated from the chunk
    pub conversations: Vec<Conversation>,
}

impl ConversationsResponse {
    /// JSON Schema describing this shape, usable as a process `json_schema`
    pub fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "conversations": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "input": { "type": "string" },
                            "output": { "type": "string" }
                        },
                        "required": ["input", "output"]
                    }
                }
            },
            "required": ["conversations"]
        })
    }

    /// Try to view a structured value as a batch of pairs
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Number of pairs in the batch
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    /// Whether the batch holds no pairs
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_value_accepts_conversations() {
        let value = json!({
            "conversations": [
                {"input": "Q?", "output": "A."}
            ]
        });

        let response = ConversationsResponse::from_value(&value).unwrap();
        assert_eq!(response.len(), 1);
        assert_eq!(response.conversations[0].input, "Q?");
        assert_eq!(response.conversations[0].output, "A.");
    }

    #[test]
    fn test_from_value_rejects_other_shapes() {
        assert!(ConversationsResponse::from_value(&json!({"pairs": []})).is_none());
        assert!(ConversationsResponse::from_value(&json!("text")).is_none());
    }

    #[test]
    fn test_schema_requires_conversations() {
        let schema = ConversationsResponse::schema();
        assert_eq!(schema["required"], json!(["conversations"]));
        assert_eq!(schema["properties"]["conversations"]["type"], "array");
    }
}
