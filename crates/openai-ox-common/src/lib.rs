#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::missing_docs_in_private_items
)]

//! Shared HTTP plumbing for the openai-ox client
//!
//! Every API operation is dispatched through [`RequestBuilder`], so transport
//! failures, non-success statuses and undecodable bodies reach callers as the
//! same [`CommonRequestError`] variants regardless of the resource involved.

pub mod error;
pub mod request_builder;
pub mod response_format;
pub mod streaming;
pub mod timestamp;
pub mod usage;

pub use error::{ApiError, CommonRequestError};
pub use request_builder::{
    AuthMethod, Endpoint, FormPart, HttpMethod, MultipartForm, RequestBuilder, RequestConfig,
};
pub use response_format::ResponseFormat;
pub use streaming::SseParser;
pub use timestamp::Timestamp;
pub use usage::TokenUsage;

pub use futures_util::stream::BoxStream;
