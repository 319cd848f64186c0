use futures_util::{StreamExt, stream::BoxStream};
use openai_ox_common::{
    AuthMethod, Endpoint, MultipartForm, RequestBuilder, RequestConfig,
};

use crate::{
    ChatRequest, ChatResponse, OpenAIRequestError,
    request::{EmbeddingsRequest, ImageRequest},
    response::{ChatCompletionChunk, EmbeddingsResponse, ImageResponse, ModelInfo, ModelsResponse},
};

pub(crate) const CHAT_COMPLETIONS_PATH: &str = "chat/completions";
pub(crate) const EMBEDDINGS_PATH: &str = "embeddings";
pub(crate) const IMAGE_GENERATIONS_PATH: &str = "images/generations";
pub(crate) const MODELS_PATH: &str = "models";
pub(crate) const TRANSCRIPTIONS_PATH: &str = "audio/transcriptions";
pub(crate) const TRANSLATIONS_PATH: &str = "audio/translations";

const USER_AGENT: &str = concat!("openai-ox/", env!("CARGO_PKG_VERSION"));

/// Connection settings a helper is built from
pub(crate) struct HelperSettings<'a> {
    pub base_url: &'a str,
    pub api_key: &'a str,
    pub organization: Option<&'a str>,
    pub project: Option<&'a str>,
    pub timeout: Option<std::time::Duration>,
}

/// OpenAI client helper methods using the common RequestBuilder
pub(crate) struct OpenAIRequestHelper {
    request_builder: RequestBuilder,
}

impl OpenAIRequestHelper {
    pub fn new(client: reqwest::Client, settings: &HelperSettings<'_>) -> Self {
        let mut config = RequestConfig::new(settings.base_url)
            .with_auth(AuthMethod::Bearer(settings.api_key.to_string()))
            .with_user_agent(USER_AGENT)
            .with_timeout(settings.timeout);

        if let Some(organization) = settings.organization {
            config = config.with_header("OpenAI-Organization", organization);
        }
        if let Some(project) = settings.project {
            config = config.with_header("OpenAI-Project", project);
        }

        Self {
            request_builder: RequestBuilder::new(client, config),
        }
    }

    /// Send a chat completion request
    pub async fn send_chat_request(
        &self,
        request: &ChatRequest,
    ) -> Result<ChatResponse, OpenAIRequestError> {
        let endpoint = Endpoint::post(CHAT_COMPLETIONS_PATH);
        Ok(self.request_builder.request_json(&endpoint, request).await?)
    }

    /// Stream a chat completion request
    pub fn stream_chat_request(
        &self,
        request: &ChatRequest,
    ) -> BoxStream<'static, Result<ChatCompletionChunk, OpenAIRequestError>> {
        let endpoint = Endpoint::post(CHAT_COMPLETIONS_PATH);
        self.request_builder
            .stream::<ChatCompletionChunk, _>(&endpoint, request)
            .map(|item| item.map_err(OpenAIRequestError::from))
            .boxed()
    }

    /// List available models
    pub async fn list_models(&self) -> Result<ModelsResponse, OpenAIRequestError> {
        let endpoint = Endpoint::get(MODELS_PATH);
        Ok(self.request_builder.request(&endpoint).await?)
    }

    /// Get one model
    pub async fn retrieve_model(&self, model_id: &str) -> Result<ModelInfo, OpenAIRequestError> {
        let endpoint = Endpoint::get(format!("{MODELS_PATH}/{model_id}"));
        Ok(self.request_builder.request(&endpoint).await?)
    }

    /// Generate embeddings
    pub async fn create_embeddings(
        &self,
        request: &EmbeddingsRequest,
    ) -> Result<EmbeddingsResponse, OpenAIRequestError> {
        let endpoint = Endpoint::post(EMBEDDINGS_PATH);
        Ok(self.request_builder.request_json(&endpoint, request).await?)
    }

    /// Generate images
    pub async fn create_image(
        &self,
        request: &ImageRequest,
    ) -> Result<ImageResponse, OpenAIRequestError> {
        let endpoint = Endpoint::post(IMAGE_GENERATIONS_PATH);
        Ok(self.request_builder.request_json(&endpoint, request).await?)
    }

    /// Post a multipart form and decode a JSON response
    pub async fn send_multipart<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        form: MultipartForm,
    ) -> Result<T, OpenAIRequestError> {
        let endpoint = Endpoint::post(path);
        Ok(self.request_builder.request_multipart(&endpoint, form).await?)
    }

    /// Post a multipart form and return the body as text
    pub async fn send_multipart_text(
        &self,
        path: &str,
        form: MultipartForm,
    ) -> Result<String, OpenAIRequestError> {
        let endpoint = Endpoint::post(path);
        Ok(self.request_builder.request_multipart_text(&endpoint, form).await?)
    }
}
