use openai_ox::{
    EmbeddingsRequest, EncodingFormat, ImageRequest, ImageResponseFormat, Model, OpenAI,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> OpenAI {
    OpenAI::builder()
        .api_key("test-key")
        .base_url(format!("{}/v1", server.uri()))
        .build()
}

#[tokio::test]
async fn create_embeddings() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(body_json(json!({
            "model": "text-embedding-3-small",
            "input": ["first", "second"],
            "encoding_format": "float",
            "dimensions": 3
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [
                {"object": "embedding", "embedding": [0.1, 0.2, 0.3], "index": 0},
                {"object": "embedding", "embedding": [0.4, 0.5, 0.6], "index": 1}
            ],
            "model": "text-embedding-3-small",
            "usage": {"prompt_tokens": 4, "total_tokens": 4}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = EmbeddingsRequest::builder()
        .model(Model::TextEmbedding3Small)
        .input(vec!["first", "second"])
        .encoding_format(EncodingFormat::Float)
        .dimensions(3)
        .build();
    let response = client_for(&server).create_embeddings(&request).await.unwrap();

    assert_eq!(response.data.len(), 2);
    assert_eq!(response.data[1].index, 1);
    assert_eq!(response.data[0].embedding.as_floats().unwrap().len(), 3);
    assert_eq!(response.usage.prompt_tokens(), 4);
    assert_eq!(response.usage.completion_tokens, None);
}

#[tokio::test]
async fn create_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .and(body_json(json!({
            "prompt": "a lighthouse at dusk",
            "model": "dall-e-3",
            "n": 1,
            "response_format": "url"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "created": 1_700_000_123,
            "data": [{"url": "https://images.example/1.png", "revised_prompt": "a tall lighthouse"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = ImageRequest::builder()
        .prompt("a lighthouse at dusk")
        .model(Model::DallE3)
        .n(1)
        .response_format(ImageResponseFormat::Url)
        .build();
    let response = client_for(&server).create_image(&request).await.unwrap();

    assert_eq!(response.created.unix_seconds(), 1_700_000_123);
    assert_eq!(response.data[0].url.as_deref(), Some("https://images.example/1.png"));
    assert!(response.data[0].b64_json.is_none());
}

#[tokio::test]
async fn list_and_retrieve_models() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [
                {"id": "gpt-4o-mini", "object": "model", "created": 1_721_172_741, "owned_by": "system"},
                {"id": "whisper-1", "object": "model", "created": 1_677_532_384, "owned_by": "openai-internal"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/models/whisper-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "whisper-1", "object": "model", "created": 1_677_532_384, "owned_by": "openai-internal"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let models = client.list_models().await.unwrap();
    assert_eq!(models.object, "list");
    let ids: Vec<_> = models.data.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["gpt-4o-mini", "whisper-1"]);

    let model = client.retrieve_model("whisper-1").await.unwrap();
    assert_eq!(model.owned_by, "openai-internal");
    assert_eq!(Model::from(model.id), Model::Whisper1);
}

#[tokio::test]
async fn unknown_model_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"message": "The model 'nope' does not exist", "type": "invalid_request_error", "code": "model_not_found"}
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).retrieve_model("nope").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.api_message(), Some("The model 'nope' does not exist"));
}

#[tokio::test]
async fn error_without_json_falls_back_to_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client_for(&server).list_models().await.unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.api_message(), Some("Bad Gateway"));
}
