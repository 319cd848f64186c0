use bon::Builder;
use openai_ox_common::ResponseFormat;
use serde::{Deserialize, Serialize};

use crate::{ChatMessage, Content, Model};

/// Request for chat completion
#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[builder(builder_type(vis = "pub"), state_mod(vis = "pub"))]
pub struct ChatRequest {
    /// List of messages in the conversation
    #[builder(field)]
    pub messages: Vec<ChatMessage>,

    /// The model to use for completion
    #[builder(into)]
    pub model: Model,

    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,

    /// Sampling temperature (0.0 to 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Top-p sampling parameter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    /// Number of completions to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,

    /// Stop sequences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,

    /// Presence penalty (-2.0 to 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,

    /// Frequency penalty (-2.0 to 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,

    /// Response format (for structured output)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,

    /// Random seed for deterministic output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// User identifier for abuse monitoring
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub user: Option<String>,
}

impl ChatRequest {
    /// Create an empty chat request for the given model
    pub fn new(model: impl Into<Model>) -> Self {
        Self::builder().model(model).build()
    }
}

impl<S: chat_request_builder::State> ChatRequestBuilder<S> {
    /// Add a user message
    pub fn user_message(mut self, content: impl Into<Content>) -> Self {
        self.messages.push(ChatMessage::user(content));
        self
    }

    /// Add an assistant message
    pub fn assistant_message(mut self, content: impl Into<Content>) -> Self {
        self.messages.push(ChatMessage::assistant(content));
        self
    }

    /// Add a system message
    pub fn system_message(mut self, content: impl Into<Content>) -> Self {
        self.messages.push(ChatMessage::system(content));
        self
    }

    /// Add a message
    pub fn message(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }

    /// Add several messages
    pub fn messages(mut self, messages: impl IntoIterator<Item = ChatMessage>) -> Self {
        self.messages.extend(messages);
        self
    }
}

/// Input to embed: one string or a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbeddingInput {
    Single(String),
    Multiple(Vec<String>),
}

impl From<String> for EmbeddingInput {
    fn from(input: String) -> Self {
        EmbeddingInput::Single(input)
    }
}

impl From<&str> for EmbeddingInput {
    fn from(input: &str) -> Self {
        EmbeddingInput::Single(input.to_string())
    }
}

impl From<Vec<String>> for EmbeddingInput {
    fn from(inputs: Vec<String>) -> Self {
        EmbeddingInput::Multiple(inputs)
    }
}

impl From<Vec<&str>> for EmbeddingInput {
    fn from(inputs: Vec<&str>) -> Self {
        EmbeddingInput::Multiple(inputs.into_iter().map(ToOwned::to_owned).collect())
    }
}

/// Encoding of returned embedding vectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EncodingFormat {
    Float,
    Base64,
}

/// Request for text embeddings
#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
pub struct EmbeddingsRequest {
    #[builder(into)]
    pub model: Model,

    #[builder(into)]
    pub input: EmbeddingInput,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding_format: Option<EncodingFormat>,

    /// Output dimensions (text-embedding-3 models only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub user: Option<String>,
}

/// How generated images are returned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ImageResponseFormat {
    Url,
    B64Json,
}

/// Request for image generation
#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
pub struct ImageRequest {
    /// Text description of the desired image
    #[builder(into)]
    pub prompt: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub model: Option<Model>,

    /// Number of images to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,

    /// e.g. `1024x1024`
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub size: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub quality: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ImageResponseFormat>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub style: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub user: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chat_request_skips_unset_fields() {
        let request = ChatRequest::builder()
            .model(Model::Gpt4oMini)
            .system_message("Be brief.")
            .user_message("Hi")
            .build();

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "messages": [
                    {"role": "system", "content": "Be brief."},
                    {"role": "user", "content": "Hi"}
                ],
                "model": "gpt-4o-mini"
            })
        );
    }

    #[test]
    fn chat_request_carries_response_format() {
        let request = ChatRequest::builder()
            .model("gpt-4o")
            .response_format(ResponseFormat::JsonObject)
            .temperature(0.0)
            .build();
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["response_format"], json!({"type": "json_object"}));
        assert_eq!(value["temperature"], json!(0.0));
    }

    #[test]
    fn embedding_input_shapes() {
        assert_eq!(serde_json::to_value(EmbeddingInput::from("a")).unwrap(), json!("a"));
        assert_eq!(
            serde_json::to_value(EmbeddingInput::from(vec!["a", "b"])).unwrap(),
            json!(["a", "b"])
        );
    }

    #[test]
    fn image_request_wire_shape() {
        let request = ImageRequest::builder()
            .prompt("a red fox")
            .model(Model::DallE3)
            .size("1024x1024")
            .response_format(ImageResponseFormat::B64Json)
            .build();

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "prompt": "a red fox",
                "model": "dall-e-3",
                "size": "1024x1024",
                "response_format": "b64_json"
            })
        );
    }
}
