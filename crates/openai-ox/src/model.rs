use serde::{Deserialize, Serialize};

/// Model identifiers for the OpenAI API
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Model {
    #[serde(rename = "gpt-4o")]
    Gpt4o,

    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,

    #[serde(rename = "whisper-1")]
    Whisper1,

    #[serde(rename = "gpt-4o-transcribe")]
    Gpt4oTranscribe,

    #[serde(rename = "text-embedding-3-small")]
    TextEmbedding3Small,

    #[serde(rename = "text-embedding-3-large")]
    TextEmbedding3Large,

    #[serde(rename = "dall-e-3")]
    DallE3,

    /// Any other model id
    #[serde(untagged)]
    Custom(String),
}

impl Model {
    /// The id sent on the wire
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gpt4o => "gpt-4o",
            Model::Gpt4oMini => "gpt-4o-mini",
            Model::Whisper1 => "whisper-1",
            Model::Gpt4oTranscribe => "gpt-4o-transcribe",
            Model::TextEmbedding3Small => "text-embedding-3-small",
            Model::TextEmbedding3Large => "text-embedding-3-large",
            Model::DallE3 => "dall-e-3",
            Model::Custom(s) => s,
        }
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Model {
    fn from(s: String) -> Self {
        match s.as_str() {
            "gpt-4o" => Model::Gpt4o,
            "gpt-4o-mini" => Model::Gpt4oMini,
            "whisper-1" => Model::Whisper1,
            "gpt-4o-transcribe" => Model::Gpt4oTranscribe,
            "text-embedding-3-small" => Model::TextEmbedding3Small,
            "text-embedding-3-large" => Model::TextEmbedding3Large,
            "dall-e-3" => Model::DallE3,
            _ => Model::Custom(s),
        }
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        Model::from(s.to_string())
    }
}
