use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Output format requested from a chat completion.
///
/// Serialized as a tagged object; `JsonSchema` nests its schema payload under
/// a `json_schema` key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    Text,
    JsonObject,
    JsonSchema { json_schema: Value },
}

impl ResponseFormat {
    #[must_use]
    pub fn json_schema(json_schema: Value) -> Self {
        Self::JsonSchema { json_schema }
    }
}

#[cfg(test)]
mod tests {
    use super::ResponseFormat;
    use serde_json::json;

    #[test]
    fn json_object_wire_shape() {
        let value = serde_json::to_value(ResponseFormat::JsonObject).unwrap();
        assert_eq!(value, json!({"type": "json_object"}));
    }

    #[test]
    fn json_schema_nests_payload() {
        let schema = json!({"name": "answer", "schema": {"type": "object"}});
        let value = serde_json::to_value(ResponseFormat::json_schema(schema.clone())).unwrap();
        assert_eq!(value, json!({"type": "json_schema", "json_schema": schema}));
    }
}
