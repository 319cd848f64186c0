//! OpenAI API client for Rust
//!
//! This crate provides a thin async client for the OpenAI API, with support for:
//! - Chat completions and streaming
//! - Audio transcription and translation
//! - Text embeddings
//! - Image generation
//! - Model listing
//!
//! Every call is a single HTTP exchange. Failures are reported as
//! [`OpenAIRequestError`]: connectivity problems, API errors carrying the
//! HTTP status and server message, and decode failures are distinct variants.
//!
//! # Example
//!
//! ```rust,no_run
//! use openai_ox::{FileSource, Model, OpenAI, TranscriptionRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenAI::from_env()?;
//!
//!     let request = client
//!         .chat()
//!         .model(Model::Gpt4oMini)
//!         .user_message("Hello, world!")
//!         .build();
//!     let response = client.send(&request).await?;
//!     println!("{}", response.content().unwrap_or_default());
//!
//!     let audio = FileSource::from_path("meeting.mp3").await?;
//!     let request = TranscriptionRequest::builder()
//!         .audio(audio)
//!         .model(Model::Whisper1)
//!         .language("en")
//!         .build();
//!     println!("{}", client.transcription(&request).await?.text);
//!
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod client;
pub mod content;
pub mod error;
mod internal;
pub mod message;
pub mod model;
pub mod request;
pub mod response;
pub mod usage;

pub use audio::{
    AudioResponseFormat, FileSource, Segment, TimestampGranularity, Transcription,
    TranscriptionRequest, Translation, TranslationRequest, Word,
};
pub use client::OpenAI;
pub use content::{Content, ContentPart, ImageDetail, ImagePart, ImageUrl, TextPart};
pub use error::OpenAIRequestError;
pub use message::{ChatMessage, Role};
pub use model::Model;
pub use request::{
    ChatRequest, EmbeddingInput, EmbeddingsRequest, EncodingFormat, ImageRequest,
    ImageResponseFormat,
};
pub use response::{
    ChatCompletionChunk, ChatResponse, Choice, ChoiceDelta, EmbeddingData, Embedding,
    EmbeddingsResponse, ImageData, ImageResponse, MessageDelta, ModelInfo, ModelsResponse,
};
pub use usage::Usage;

// Re-export shared types from openai-ox-common
pub use openai_ox_common::{ResponseFormat, Timestamp, TokenUsage};
