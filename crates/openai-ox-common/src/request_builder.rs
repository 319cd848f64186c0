use crate::{
    error::{self, CommonRequestError},
    streaming::SseParser,
};
use async_stream::try_stream;
use bytes::Bytes;
use futures_util::stream::{self, BoxStream};
use reqwest::{Method, RequestBuilder as ReqwestRequestBuilder};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::{collections::HashMap, time::Duration};
use tracing::debug;

/// HTTP method for API endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        }
    }
}

/// Authentication method for API requests
#[derive(Clone)]
pub enum AuthMethod {
    /// `Authorization: Bearer <token>`
    Bearer(String),
}

impl std::fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthMethod::Bearer(_) => f.write_str("Bearer([REDACTED])"),
        }
    }
}

/// Represents an API endpoint with its configuration
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub path: String,
    pub method: HttpMethod,
    pub extra_headers: Option<HashMap<String, String>>,
    pub query_params: Option<Vec<(String, String)>>,
}

impl Endpoint {
    pub fn new(path: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            path: path.into(),
            method,
            extra_headers: None,
            query_params: None,
        }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(path, HttpMethod::Post)
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(path, HttpMethod::Get)
    }

    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_query_params(mut self, params: Vec<(String, String)>) -> Self {
        self.query_params = Some(params);
        self
    }
}

/// Configuration shared by every request a client sends
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub base_url: String,
    pub auth: Option<AuthMethod>,
    pub default_headers: HashMap<String, String>,
    pub user_agent: Option<String>,
    /// Whole-request timeout for non-streaming requests
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth: None,
            default_headers: HashMap::new(),
            user_agent: None,
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_auth(mut self, auth: AuthMethod) -> Self {
        self.auth = Some(auth);
        self
    }

    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn url_for(&self, endpoint: &Endpoint) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.path.trim_start_matches('/')
        )
    }
}

/// Dispatches requests for one configured API host.
///
/// Every call goes through [`RequestBuilder::perform_raw`], which owns the
/// translation of transport failures and non-success statuses into
/// [`CommonRequestError`].
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    client: reqwest::Client,
    config: RequestConfig,
}

impl RequestBuilder {
    pub fn new(client: reqwest::Client, config: RequestConfig) -> Self {
        Self { client, config }
    }

    /// Build an authenticated reqwest builder for the given endpoint, bounded
    /// by the configured whole-request timeout
    pub fn build_request(&self, endpoint: &Endpoint) -> ReqwestRequestBuilder {
        let req = self.authorized_request(endpoint);
        match self.config.timeout {
            Some(timeout) => req.timeout(timeout),
            None => req,
        }
    }

    fn authorized_request(&self, endpoint: &Endpoint) -> ReqwestRequestBuilder {
        let url = self.config.url_for(endpoint);
        let mut req = self.client.request(endpoint.method.into(), &url);

        if let Some(ref params) = endpoint.query_params {
            req = req.query(params);
        }

        if let Some(ref auth) = self.config.auth {
            req = match auth {
                AuthMethod::Bearer(token) => req.bearer_auth(token),
            };
        }

        for (key, value) in &self.config.default_headers {
            req = req.header(key, value);
        }

        if let Some(ref headers) = endpoint.extra_headers {
            for (key, value) in headers {
                req = req.header(key, value);
            }
        }

        if let Some(ref user_agent) = self.config.user_agent {
            req = req.header(reqwest::header::USER_AGENT, user_agent);
        }

        req
    }

    /// Send one request and return the raw body of a success response.
    ///
    /// `finish` attaches the payload (JSON, multipart, nothing) to the
    /// authenticated request. Send and body-read failures become
    /// [`CommonRequestError::Connectivity`]; a non-success status becomes
    /// [`CommonRequestError::Api`].
    pub async fn perform_raw<F>(
        &self,
        endpoint: &Endpoint,
        finish: F,
    ) -> Result<Bytes, CommonRequestError>
    where
        F: FnOnce(ReqwestRequestBuilder) -> ReqwestRequestBuilder,
    {
        let req = finish(self.build_request(endpoint));

        debug!(method = ?endpoint.method, path = %endpoint.path, "dispatching request");
        let res = req.send().await?;
        let status = res.status();
        let bytes = res.bytes().await?;
        debug!(path = %endpoint.path, status = status.as_u16(), len = bytes.len(), "response received");

        if status.is_success() {
            Ok(bytes)
        } else {
            Err(error::parse_error_response(status, &bytes))
        }
    }

    /// [`perform_raw`](Self::perform_raw), then decode the body as JSON into `T`.
    pub async fn perform<T, F>(&self, endpoint: &Endpoint, finish: F) -> Result<T, CommonRequestError>
    where
        T: DeserializeOwned,
        F: FnOnce(ReqwestRequestBuilder) -> ReqwestRequestBuilder,
    {
        let bytes = self.perform_raw(endpoint, finish).await?;
        decode_json(&bytes)
    }

    /// Execute a request with a JSON body and return the deserialized response
    pub async fn request_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &Endpoint,
        body: &B,
    ) -> Result<T, CommonRequestError> {
        // Serialize up front so encode failures are not reported as transport errors
        let val = serde_json::to_value(body).map_err(CommonRequestError::Encode)?;
        self.perform(endpoint, |req| req.json(&val)).await
    }

    /// Execute a request without body and return the deserialized response
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
    ) -> Result<T, CommonRequestError> {
        self.perform(endpoint, |req| req).await
    }

    /// Execute a multipart form request and decode a JSON response
    pub async fn request_multipart<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        form: MultipartForm,
    ) -> Result<T, CommonRequestError> {
        let form = form.build()?;
        self.perform(endpoint, |req| req.multipart(form)).await
    }

    /// Execute a multipart form request and return the body as text
    pub async fn request_multipart_text(
        &self,
        endpoint: &Endpoint,
        form: MultipartForm,
    ) -> Result<String, CommonRequestError> {
        let form = form.build()?;
        let bytes = self.perform_raw(endpoint, |req| req.multipart(form)).await?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }

    /// Execute a streaming request, setting `"stream": true` in the JSON body.
    ///
    /// The configured timeout is not applied: a stream stays open for as long
    /// as the server keeps producing events.
    pub fn stream<T, B>(
        &self,
        endpoint: &Endpoint,
        body: &B,
    ) -> BoxStream<'static, Result<T, CommonRequestError>>
    where
        T: DeserializeOwned + Send + 'static,
        B: Serialize + ?Sized,
    {
        let body = match serde_json::to_value(body) {
            Ok(value) => value,
            Err(e) => return Box::pin(stream::once(async move { Err(CommonRequestError::Encode(e)) })),
        };
        let req = self.authorized_request(endpoint);
        let endpoint = endpoint.clone();

        Box::pin(try_stream! {
            let mut obj = match body {
                Value::Object(map) => map,
                other => Err(CommonRequestError::RequestBuilder(format!(
                    "streaming body must be a JSON object, got {other}"
                )))?,
            };
            obj.insert("stream".to_string(), Value::Bool(true));

            debug!(method = ?endpoint.method, path = %endpoint.path, "dispatching streaming request");
            let response = req.json(&Value::Object(obj)).send().await?;
            let status = response.status();

            if !status.is_success() {
                let bytes = response.bytes().await?;
                Err::<(), _>(error::parse_error_response(status, &bytes))?;
            } else {
                let mut parser = SseParser::new(response);

                while let Some(event) = parser.next_event().await? {
                    yield event;
                }
            }
        })
    }
}

/// Decode a success body, keeping the body text on failure.
fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CommonRequestError> {
    serde_json::from_slice(bytes).map_err(|source| CommonRequestError::Decode {
        source,
        body: String::from_utf8_lossy(bytes).into_owned(),
    })
}

/// One named part of a [`MultipartForm`]
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text(String),
    File {
        filename: String,
        data: Bytes,
        mime_type: Option<String>,
    },
}

/// Multipart form that stays inspectable until it is turned into a
/// `reqwest` form by [`MultipartForm::build`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    parts: Vec<(String, FormPart)>,
}

impl MultipartForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push((name.into(), FormPart::Text(value.into())));
        self
    }

    /// Add a file from bytes
    #[must_use]
    pub fn file_from_bytes(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        self.parts.push((
            name.into(),
            FormPart::File {
                filename: filename.into(),
                data: data.into(),
                mime_type: None,
            },
        ));
        self
    }

    /// Add a file from bytes with a content type
    #[must_use]
    pub fn file_from_bytes_with_mime(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        data: impl Into<Bytes>,
        mime_type: impl Into<String>,
    ) -> Self {
        self.parts.push((
            name.into(),
            FormPart::File {
                filename: filename.into(),
                data: data.into(),
                mime_type: Some(mime_type.into()),
            },
        ));
        self
    }

    pub fn parts(&self) -> &[(String, FormPart)] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// All parts registered under `name`, in insertion order
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a FormPart> + 'a {
        self.parts
            .iter()
            .filter(move |(n, _)| n == name)
            .map(|(_, part)| part)
    }

    /// Value of the first text field named `name`
    pub fn text_value<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        self.get_all(name).find_map(|part| match part {
            FormPart::Text(value) => Some(value.as_str()),
            FormPart::File { .. } => None,
        })
    }

    /// Convert into a `reqwest` multipart form.
    pub fn build(self) -> Result<reqwest::multipart::Form, CommonRequestError> {
        let mut form = reqwest::multipart::Form::new();
        for (name, part) in self.parts {
            form = match part {
                FormPart::Text(value) => form.text(name, value),
                FormPart::File {
                    filename,
                    data,
                    mime_type,
                } => {
                    let len = data.len() as u64;
                    let mut part =
                        reqwest::multipart::Part::stream_with_length(data, len).file_name(filename);
                    if let Some(mime) = mime_type {
                        part = part
                            .mime_str(&mime)
                            .map_err(|_| CommonRequestError::InvalidMimeType(mime))?;
                    }
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}
