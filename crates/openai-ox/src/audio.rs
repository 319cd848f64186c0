use std::path::Path;

use bon::Builder;
use bytes::Bytes;
use openai_ox_common::MultipartForm;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Model, OpenAI, OpenAIRequestError};

/// An audio file attached to a request
#[derive(Debug, Clone, PartialEq)]
pub struct FileSource {
    /// Filename sent with the part; the API infers the audio format from its extension
    pub name: String,
    pub data: Bytes,
}

impl FileSource {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Read a file from disk, keeping its filename.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, OpenAIRequestError> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map_or_else(|| "audio".to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self::new(name, data))
    }

    /// Content type guessed from the filename extension
    pub fn mime_type(&self) -> Option<String> {
        mime_guess::from_path(&self.name)
            .first_raw()
            .map(ToOwned::to_owned)
    }

    fn append_to(&self, form: MultipartForm) -> MultipartForm {
        match self.mime_type() {
            Some(mime) => form.file_from_bytes_with_mime("file", &self.name, self.data.clone(), mime),
            None => form.file_from_bytes("file", &self.name, self.data.clone()),
        }
    }
}

/// The format of the transcript output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AudioResponseFormat {
    Json,
    Text,
    Srt,
    VerboseJson,
    Vtt,
}

impl AudioResponseFormat {
    /// Formats whose response body is plain text rather than JSON
    pub fn is_plain_text(self) -> bool {
        matches!(self, Self::Text | Self::Srt | Self::Vtt)
    }
}

/// The level of timestamp detail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TimestampGranularity {
    Word,
    Segment,
}

/// Request to transcribe audio into the input language
#[derive(Debug, Clone, Builder)]
pub struct TranscriptionRequest {
    /// The audio file to transcribe
    pub audio: FileSource,

    /// The model to use for transcription
    #[builder(into)]
    pub model: Model,

    /// Text to guide the model's style or continue a previous audio segment
    #[builder(into)]
    pub prompt: Option<String>,

    /// The format of the transcript output
    pub response_format: Option<AudioResponseFormat>,

    /// Sampling temperature between 0 and 1
    pub temperature: Option<f32>,

    /// The language of the input audio (ISO-639-1)
    #[builder(into)]
    pub language: Option<String>,

    /// Timestamp detail; requires `response_format = verbose_json`
    pub timestamp_granularities: Option<Vec<TimestampGranularity>>,
}

impl TranscriptionRequest {
    /// Build the multipart form. Optional fields are only present when set.
    pub fn to_form(&self) -> MultipartForm {
        let mut form = self.audio.append_to(MultipartForm::new()).text("model", self.model.as_str());

        if let Some(prompt) = &self.prompt {
            form = form.text("prompt", prompt);
        }
        if let Some(format) = self.response_format {
            form = form.text("response_format", format.to_string());
        }
        if let Some(temperature) = self.temperature {
            form = form.text("temperature", temperature.to_string());
        }
        if let Some(language) = &self.language {
            form = form.text("language", language);
        }
        if let Some(granularities) = &self.timestamp_granularities {
            for g in granularities {
                form = form.text("timestamp_granularities[]", g.to_string());
            }
        }

        form
    }

    fn validate(&self) -> Result<(), OpenAIRequestError> {
        if self
            .timestamp_granularities
            .as_ref()
            .is_some_and(|g| !g.is_empty())
            && self.response_format != Some(AudioResponseFormat::VerboseJson)
        {
            return Err(OpenAIRequestError::InvalidRequest(
                "`timestamp_granularities` requires `response_format = verbose_json`".into(),
            ));
        }
        Ok(())
    }
}

/// Request to translate audio into English
#[derive(Debug, Clone, Builder)]
pub struct TranslationRequest {
    /// The audio file to translate
    pub audio: FileSource,

    /// The model to use for translation
    #[builder(into)]
    pub model: Model,

    /// English text to guide the model's style or continue a previous audio segment
    #[builder(into)]
    pub prompt: Option<String>,

    /// The format of the translation output
    pub response_format: Option<AudioResponseFormat>,

    /// Sampling temperature between 0 and 1
    pub temperature: Option<f32>,
}

impl TranslationRequest {
    /// Build the multipart form. Optional fields are only present when set.
    pub fn to_form(&self) -> MultipartForm {
        let mut form = self.audio.append_to(MultipartForm::new()).text("model", self.model.as_str());

        if let Some(prompt) = &self.prompt {
            form = form.text("prompt", prompt);
        }
        if let Some(format) = self.response_format {
            form = form.text("response_format", format.to_string());
        }
        if let Some(temperature) = self.temperature {
            form = form.text("temperature", temperature.to_string());
        }

        form
    }
}

/// Result of a transcription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    /// The transcribed text
    pub text: String,

    /// Detected language (`verbose_json` only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Duration of the input audio in seconds (`verbose_json` only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<Segment>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<Word>>,
}

impl Transcription {
    fn from_text(text: String) -> Self {
        Self {
            text,
            language: None,
            duration: None,
            segments: None,
            words: None,
        }
    }
}

/// Result of a translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    /// The translated text
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<Segment>>,
}

impl Translation {
    fn from_text(text: String) -> Self {
        Self {
            text,
            language: None,
            duration: None,
            segments: None,
        }
    }
}

/// A segment of a `verbose_json` transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: u32,
    #[serde(default)]
    pub seek: u32,
    pub start: f64,
    pub end: f64,
    pub text: String,
    #[serde(default)]
    pub tokens: Vec<u32>,
    #[serde(default)]
    pub temperature: f64,
    #[serde(default)]
    pub avg_logprob: f64,
    #[serde(default)]
    pub compression_ratio: f64,
    #[serde(default)]
    pub no_speech_prob: f64,
}

/// A word with timing information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub word: String,
    pub start: f64,
    pub end: f64,
}

impl OpenAI {
    /// Transcribe audio into the input language.
    pub async fn transcription(
        &self,
        request: &TranscriptionRequest,
    ) -> Result<Transcription, OpenAIRequestError> {
        request.validate()?;
        let helper = self.request_helper();
        let form = request.to_form();
        debug!(model = %request.model, bytes = request.audio.data.len(), "transcribing audio");

        if request.response_format.is_some_and(AudioResponseFormat::is_plain_text) {
            let text = helper.send_multipart_text(crate::internal::TRANSCRIPTIONS_PATH, form).await?;
            Ok(Transcription::from_text(text))
        } else {
            helper.send_multipart(crate::internal::TRANSCRIPTIONS_PATH, form).await
        }
    }

    /// Translate audio into English.
    pub async fn translation(
        &self,
        request: &TranslationRequest,
    ) -> Result<Translation, OpenAIRequestError> {
        let helper = self.request_helper();
        let form = request.to_form();
        debug!(model = %request.model, bytes = request.audio.data.len(), "translating audio");

        if request.response_format.is_some_and(AudioResponseFormat::is_plain_text) {
            let text = helper.send_multipart_text(crate::internal::TRANSLATIONS_PATH, form).await?;
            Ok(Translation::from_text(text))
        } else {
            helper.send_multipart(crate::internal::TRANSLATIONS_PATH, form).await
        }
    }
}
