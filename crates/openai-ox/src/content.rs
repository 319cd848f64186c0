//! Message content: either a plain string or a list of typed parts.
//!
//! On the wire `content` is a JSON string or a JSON array of objects
//! discriminated by `type` (`"text"`, `"image_url"`).

use base64::Engine as _;
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{self, SeqAccess, Visitor},
};
use std::fmt;

/// The contents of a chat message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Content {
    /// Plain text content, serialized as a JSON string
    TextOnly(String),
    /// Content parts, serialized as a JSON array
    List(Vec<ContentPart>),
}

impl Content {
    /// The text of a `TextOnly` content, or the concatenated text parts of a list.
    pub fn text(&self) -> String {
        match self {
            Content::TextOnly(text) => text.clone(),
            Content::List(parts) => parts
                .iter()
                .filter_map(ContentPart::as_text)
                .collect::<Vec<_>>()
                .join(""),
        }
    }

    pub fn as_text_only(&self) -> Option<&str> {
        match self {
            Content::TextOnly(text) => Some(text),
            Content::List(_) => None,
        }
    }

    pub fn parts(&self) -> Option<&[ContentPart]> {
        match self {
            Content::TextOnly(_) => None,
            Content::List(parts) => Some(parts),
        }
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::TextOnly(text)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::TextOnly(text.to_string())
    }
}

impl From<Vec<ContentPart>> for Content {
    fn from(parts: Vec<ContentPart>) -> Self {
        Content::List(parts)
    }
}

impl<'de> Deserialize<'de> for Content {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ContentVisitor;

        impl<'de> Visitor<'de> for ContentVisitor {
            type Value = Content;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or an array of content parts")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Content::TextOnly(value.to_string()))
            }

            fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
                Ok(Content::TextOnly(value))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut parts = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(part) = seq.next_element::<ContentPart>()? {
                    parts.push(part);
                }
                Ok(Content::List(parts))
            }
        }

        deserializer.deserialize_any(ContentVisitor)
    }
}

/// One part of a list content, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text(TextPart),
    ImageUrl(ImagePart),
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text(TextPart { text: text.into() })
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        ContentPart::ImageUrl(ImagePart::new(url))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentPart::Text(part) => Some(&part.text),
            ContentPart::ImageUrl(_) => None,
        }
    }
}

/// Text content part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPart {
    pub text: String,
}

/// Image content part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePart {
    pub image_url: ImageUrl,
}

impl ImagePart {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            image_url: ImageUrl {
                url: url.into(),
                detail: None,
            },
        }
    }

    pub fn with_detail(url: impl Into<String>, detail: ImageDetail) -> Self {
        Self {
            image_url: ImageUrl {
                url: url.into(),
                detail: Some(detail),
            },
        }
    }

    /// Inline image data as a `data:` URL.
    pub fn from_base64(mime_type: &str, data: impl AsRef<[u8]>) -> Self {
        let encoded = base64::engine::general_purpose::STANDARD.encode(data);
        Self::new(format!("data:{mime_type};base64,{encoded}"))
    }
}

/// Image reference of an [`ImagePart`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    /// Either a URL of the image or a base64 `data:` URL
    pub url: String,

    /// Omitted from the payload entirely when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<ImageDetail>,
}

/// Detail level the model should use for an image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageDetail {
    Auto,
    Low,
    High,
    /// Levels this crate does not know about yet, passed through verbatim
    #[serde(untagged)]
    Other(String),
}
