use bon::Builder;
use futures_util::stream::BoxStream;
use std::time::Duration;

use crate::{
    ChatRequest, ChatResponse, OpenAIRequestError,
    internal::{HelperSettings, OpenAIRequestHelper},
    request::{EmbeddingsRequest, ImageRequest},
    response::{ChatCompletionChunk, EmbeddingsResponse, ImageResponse, ModelInfo, ModelsResponse},
};

const BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI API client
///
/// Cloning is cheap: clones share the connection pool of the inner
/// `reqwest::Client`.
#[derive(Clone, Builder)]
pub struct OpenAI {
    /// API key for authentication
    #[builder(into)]
    api_key: String,

    /// Base URL for the API, including the version segment
    #[builder(default = BASE_URL.to_string(), into)]
    base_url: String,

    /// Sent as `OpenAI-Organization`
    #[builder(into)]
    organization: Option<String>,

    /// Sent as `OpenAI-Project`
    #[builder(into)]
    project: Option<String>,

    /// Whole-request timeout for every non-streaming call. Chat streams are
    /// not bounded by it.
    timeout: Option<Duration>,

    /// HTTP client for making requests
    #[builder(default)]
    client: reqwest::Client,
}

impl OpenAI {
    /// Create a new OpenAI client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::builder().api_key(api_key).build()
    }

    /// Create a client from `OPENAI_API_KEY`, honoring `OPENAI_BASE_URL`,
    /// `OPENAI_ORG_ID` and `OPENAI_PROJECT_ID` when set.
    /// Empty variables count as unset.
    pub fn from_env() -> Result<Self, OpenAIRequestError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, OpenAIRequestError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let api_key = var("OPENAI_API_KEY").ok_or(OpenAIRequestError::MissingApiKey)?;

        Ok(Self::builder()
            .api_key(api_key)
            .maybe_base_url(var("OPENAI_BASE_URL"))
            .maybe_organization(var("OPENAI_ORG_ID"))
            .maybe_project(var("OPENAI_PROJECT_ID"))
            .build())
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub(crate) fn request_helper(&self) -> OpenAIRequestHelper {
        OpenAIRequestHelper::new(
            self.client.clone(),
            &HelperSettings {
                base_url: &self.base_url,
                api_key: &self.api_key,
                organization: self.organization.as_deref(),
                project: self.project.as_deref(),
                timeout: self.timeout,
            },
        )
    }

    /// Create a chat request builder
    pub fn chat(&self) -> crate::request::ChatRequestBuilder {
        ChatRequest::builder()
    }

    /// Send a chat request and get a response
    pub async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, OpenAIRequestError> {
        self.request_helper().send_chat_request(request).await
    }

    /// Send a chat request and stream the completion chunks
    pub fn stream(
        &self,
        request: &ChatRequest,
    ) -> BoxStream<'static, Result<ChatCompletionChunk, OpenAIRequestError>> {
        self.request_helper().stream_chat_request(request)
    }

    /// List available models
    pub async fn list_models(&self) -> Result<ModelsResponse, OpenAIRequestError> {
        self.request_helper().list_models().await
    }

    /// Get information about one model
    pub async fn retrieve_model(&self, model_id: &str) -> Result<ModelInfo, OpenAIRequestError> {
        self.request_helper().retrieve_model(model_id).await
    }

    /// Create embeddings for the given input
    pub async fn create_embeddings(
        &self,
        request: &EmbeddingsRequest,
    ) -> Result<EmbeddingsResponse, OpenAIRequestError> {
        self.request_helper().create_embeddings(request).await
    }

    /// Generate images from a prompt
    pub async fn create_image(
        &self,
        request: &ImageRequest,
    ) -> Result<ImageResponse, OpenAIRequestError> {
        self.request_helper().create_image(request).await
    }
}

impl std::fmt::Debug for OpenAI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAI")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_default_base_url() {
        let client = OpenAI::new("sk-test");
        assert_eq!(client.base_url(), "https://api.openai.com/v1");
        assert_eq!(client.api_key(), "sk-test");
        assert!(client.timeout().is_none());
    }

    #[test]
    fn builder_sets_every_option() {
        let client = OpenAI::builder()
            .api_key("sk-test")
            .base_url("http://localhost:8080/v1")
            .organization("org-1")
            .project("proj-1")
            .timeout(Duration::from_secs(5))
            .build();

        assert_eq!(client.base_url(), "http://localhost:8080/v1");
        assert_eq!(client.organization(), Some("org-1"));
        assert_eq!(client.project(), Some("proj-1"));
        assert_eq!(client.timeout(), Some(Duration::from_secs(5)));
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: std::collections::HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn env_reads_every_variable() {
        let client = OpenAI::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-env"),
            ("OPENAI_BASE_URL", "http://proxy.local/v1"),
            ("OPENAI_ORG_ID", "org-env"),
            ("OPENAI_PROJECT_ID", "proj-env"),
        ]))
        .unwrap();

        assert_eq!(client.api_key(), "sk-env");
        assert_eq!(client.base_url(), "http://proxy.local/v1");
        assert_eq!(client.organization(), Some("org-env"));
        assert_eq!(client.project(), Some("proj-env"));
    }

    #[test]
    fn empty_env_values_count_as_unset() {
        let client = OpenAI::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-env"),
            ("OPENAI_BASE_URL", ""),
            ("OPENAI_ORG_ID", ""),
            ("OPENAI_PROJECT_ID", " "),
        ]))
        .unwrap();

        assert_eq!(client.base_url(), "https://api.openai.com/v1");
        assert_eq!(client.organization(), None);
        assert_eq!(client.project(), None);
    }

    #[test]
    fn missing_or_empty_key_is_rejected() {
        assert!(matches!(
            OpenAI::from_lookup(lookup(&[])),
            Err(OpenAIRequestError::MissingApiKey)
        ));
        assert!(matches!(
            OpenAI::from_lookup(lookup(&[("OPENAI_API_KEY", "")])),
            Err(OpenAIRequestError::MissingApiKey)
        ));
    }

    #[test]
    fn debug_redacts_api_key() {
        let client = OpenAI::new("sk-super-secret");
        let debug = format!("{client:?}");
        assert!(!debug.contains("sk-super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
