//! Live API integration tests
//!
//! These tests require `OPENAI_API_KEY` and make real API calls.
//! They are ignored by default - run with `cargo test -- --ignored` to execute.

use futures_util::StreamExt;
use openai_ox::{
    AudioResponseFormat, EmbeddingsRequest, FileSource, Model, OpenAI, TranscriptionRequest,
};

fn client() -> OpenAI {
    OpenAI::from_env().expect("OPENAI_API_KEY must be set for live tests")
}

/// One second of 8 kHz mono silence as a WAV file
fn silent_wav() -> Vec<u8> {
    let sample_rate: u32 = 8_000;
    let data_len: u32 = sample_rate * 2;
    let mut wav = Vec::with_capacity(44 + data_len as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVEfmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.resize(44 + data_len as usize, 0);
    wav
}

#[tokio::test]
#[ignore = "requires OPENAI_API_KEY and makes real API calls"]
async fn live_chat() {
    let client = client();
    let request = client
        .chat()
        .model(Model::Gpt4oMini)
        .user_message("Say hello in exactly 3 words")
        .max_completion_tokens(10)
        .build();

    let response = client.send(&request).await.unwrap();
    assert!(response.content().is_some());
    assert!(response.usage.unwrap().total_tokens() > 0);
}

#[tokio::test]
#[ignore = "requires OPENAI_API_KEY and makes real API calls"]
async fn live_streaming_chat() {
    let client = client();
    let request = client
        .chat()
        .model(Model::Gpt4oMini)
        .user_message("Count from 1 to 5")
        .max_completion_tokens(50)
        .build();

    let mut stream = client.stream(&request);
    let mut text = String::new();
    while let Some(chunk) = stream.next().await {
        if let Some(content) = chunk.unwrap().content() {
            text.push_str(content);
        }
    }
    assert!(!text.is_empty());
}

#[tokio::test]
#[ignore = "requires OPENAI_API_KEY and makes real API calls"]
async fn live_transcription() {
    let request = TranscriptionRequest::builder()
        .audio(FileSource::new("silence.wav", silent_wav()))
        .model(Model::Whisper1)
        .response_format(AudioResponseFormat::Text)
        .build();

    let transcription = client().transcription(&request).await.unwrap();
    assert!(transcription.text.len() < 200);
}

#[tokio::test]
#[ignore = "requires OPENAI_API_KEY and makes real API calls"]
async fn live_embeddings() {
    let request = EmbeddingsRequest::builder()
        .model(Model::TextEmbedding3Small)
        .input("Hello, world!")
        .build();

    let response = client().create_embeddings(&request).await.unwrap();
    assert_eq!(response.data.len(), 1);
    assert!(!response.data[0].embedding.as_floats().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires OPENAI_API_KEY and makes real API calls"]
async fn live_list_models() {
    let models = client().list_models().await.unwrap();
    assert!(models.data.iter().any(|m| m.id == "whisper-1"));
}
