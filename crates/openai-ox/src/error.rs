use openai_ox_common::CommonRequestError;
use serde::{Serialize, Serializer, ser::SerializeStruct};
use thiserror::Error;

/// Errors that can occur when making requests to the OpenAI API
#[derive(Debug, Error)]
pub enum OpenAIRequestError {
    /// The transport could not complete the exchange (DNS, TCP, TLS, timeout)
    #[error("connection failed: {0}")]
    Connectivity(#[source] reqwest::Error),

    /// The API answered with a non-success status
    #[error("API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        error_type: Option<String>,
        code: Option<String>,
        param: Option<String>,
    },

    /// A response or stream event did not match the expected shape
    #[error("failed to decode response: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Invalid event data in stream
    #[error("Invalid event data: {0}")]
    InvalidEventData(String),

    /// The request was rejected locally before being sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Missing API key
    #[error("Missing API key")]
    MissingApiKey,

    /// I/O errors, e.g. while reading an audio file
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl OpenAIRequestError {
    pub fn is_connectivity(&self) -> bool {
        matches!(self, OpenAIRequestError::Connectivity(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, OpenAIRequestError::Connectivity(e) if e.is_timeout())
    }

    pub fn is_api(&self) -> bool {
        matches!(self, OpenAIRequestError::Api { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, OpenAIRequestError::Decode { .. })
    }

    pub fn is_rate_limit(&self) -> bool {
        self.status() == Some(429)
    }

    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            OpenAIRequestError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server-provided message of an API error
    pub fn api_message(&self) -> Option<&str> {
        match self {
            OpenAIRequestError::Api { message, .. } => Some(message),
            _ => None,
        }
    }
}

impl From<CommonRequestError> for OpenAIRequestError {
    fn from(err: CommonRequestError) -> Self {
        match err {
            CommonRequestError::Connectivity(e) => OpenAIRequestError::Connectivity(e),
            CommonRequestError::Api(api) => OpenAIRequestError::Api {
                status: api.status,
                message: api.message,
                error_type: api.r#type,
                code: api.code,
                param: api.param,
            },
            CommonRequestError::Decode { source, body } => OpenAIRequestError::Decode {
                message: format!("{source}; body: {body}"),
                source: Some(source),
            },
            CommonRequestError::Encode(e) => OpenAIRequestError::InvalidRequest(e.to_string()),
            CommonRequestError::InvalidEventData(msg) => OpenAIRequestError::InvalidEventData(msg),
            CommonRequestError::InvalidMimeType(mime) => {
                OpenAIRequestError::InvalidRequest(format!("invalid MIME type: {mime}"))
            }
            CommonRequestError::Utf8Error(e) => OpenAIRequestError::Decode {
                message: e.to_string(),
                source: None,
            },
            CommonRequestError::RequestBuilder(msg) => OpenAIRequestError::InvalidRequest(msg),
        }
    }
}

impl Serialize for OpenAIRequestError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            OpenAIRequestError::Connectivity(e) => {
                let mut state = serializer.serialize_struct("OpenAIRequestError", 3)?;
                state.serialize_field("type", "Connectivity")?;
                state.serialize_field("timeout", &e.is_timeout())?;
                state.serialize_field("error", &e.to_string())?;
                state.end()
            }
            OpenAIRequestError::Api {
                status,
                message,
                error_type,
                code,
                param,
            } => {
                let field_count = 3
                    + usize::from(error_type.is_some())
                    + usize::from(code.is_some())
                    + usize::from(param.is_some());
                let mut state = serializer.serialize_struct("OpenAIRequestError", field_count)?;
                state.serialize_field("type", "Api")?;
                state.serialize_field("status", status)?;
                state.serialize_field("message", message)?;
                if let Some(t) = error_type {
                    state.serialize_field("error_type", t)?;
                }
                if let Some(c) = code {
                    state.serialize_field("code", c)?;
                }
                if let Some(p) = param {
                    state.serialize_field("param", p)?;
                }
                state.end()
            }
            OpenAIRequestError::Decode { message, .. } => {
                let mut state = serializer.serialize_struct("OpenAIRequestError", 2)?;
                state.serialize_field("type", "Decode")?;
                state.serialize_field("message", message)?;
                state.end()
            }
            OpenAIRequestError::InvalidEventData(message) => {
                let mut state = serializer.serialize_struct("OpenAIRequestError", 2)?;
                state.serialize_field("type", "InvalidEventData")?;
                state.serialize_field("message", message)?;
                state.end()
            }
            OpenAIRequestError::InvalidRequest(message) => {
                let mut state = serializer.serialize_struct("OpenAIRequestError", 2)?;
                state.serialize_field("type", "InvalidRequest")?;
                state.serialize_field("message", message)?;
                state.end()
            }
            OpenAIRequestError::MissingApiKey => {
                let mut state = serializer.serialize_struct("OpenAIRequestError", 1)?;
                state.serialize_field("type", "MissingApiKey")?;
                state.end()
            }
            OpenAIRequestError::Io(e) => {
                let mut state = serializer.serialize_struct("OpenAIRequestError", 2)?;
                state.serialize_field("type", "Io")?;
                state.serialize_field("error", &e.to_string())?;
                state.end()
            }
        }
    }
}
