use serde::Deserialize;
use thiserror::Error;

/// Error returned by the API with a non-success HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code of the response
    pub status: u16,
    /// Server-provided message, or the raw body when none could be extracted
    pub message: String,
    pub r#type: Option<String>,
    pub code: Option<String>,
    pub param: Option<String>,
    /// Raw response body, lossily decoded
    pub body: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HTTP {}: {}", self.status, self.message)
    }
}

/// Common errors that can occur while dispatching a request
#[derive(Error, Debug)]
pub enum CommonRequestError {
    /// The transport could not complete the exchange (DNS, TCP, TLS, timeout, body read)
    #[error("connection failed: {0}")]
    Connectivity(#[source] reqwest::Error),

    /// The server answered with a non-success status
    #[error("API error: {0}")]
    Api(ApiError),

    /// A success response whose body does not match the expected shape
    #[error("failed to decode response: {source}; body: {body}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    /// Request payload could not be encoded as JSON
    #[error("JSON encode error: {0}")]
    Encode(#[source] serde_json::Error),

    /// Invalid event data in streaming response
    #[error("Invalid event data: {0}")]
    InvalidEventData(String),

    /// Invalid MIME type for file upload
    #[error("Invalid MIME type: {0}")]
    InvalidMimeType(String),

    /// UTF-8 conversion error
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    /// The request could not be constructed (bad URL, bad header value)
    #[error("Request builder error: {0}")]
    RequestBuilder(String),
}

impl From<reqwest::Error> for CommonRequestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            CommonRequestError::RequestBuilder(err.to_string())
        } else {
            CommonRequestError::Connectivity(err)
        }
    }
}

impl CommonRequestError {
    /// Whether the error came from the transport rather than the server.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, CommonRequestError::Connectivity(_))
    }

    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            CommonRequestError::Api(err) => Some(err.status),
            _ => None,
        }
    }
}

/// `{"error": {...}}` envelope used by the API for failures
#[derive(Debug, Deserialize)]
struct ApiErrorPayload {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    r#type: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    code: Option<String>,
    #[serde(default)]
    param: Option<String>,
}

/// Error codes come back as strings from most endpoints and as numbers from a few.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Parse error response from HTTP status and body
pub fn parse_error_response(status: reqwest::StatusCode, body: &[u8]) -> CommonRequestError {
    let body_str = String::from_utf8_lossy(body).into_owned();

    if let Ok(payload) = serde_json::from_slice::<ApiErrorPayload>(body) {
        let detail = payload.error;
        return CommonRequestError::Api(ApiError {
            status: status.as_u16(),
            message: detail.message.unwrap_or_else(|| body_str.clone()),
            r#type: detail.r#type,
            code: detail.code,
            param: detail.param,
            body: body_str,
        });
    }

    // Some gateways answer with a flat {"message": "..."}
    let message = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json.get("message")?.as_str().map(ToOwned::to_owned))
        .unwrap_or_else(|| body_str.clone());

    CommonRequestError::Api(ApiError {
        status: status.as_u16(),
        message,
        r#type: None,
        code: None,
        param: None,
        body: body_str,
    })
}
