use crate::error::CommonRequestError;
use futures_util::{Stream, StreamExt};
use serde::de::DeserializeOwned;
use std::pin::Pin;
use tracing::trace;

/// Collects the `data:` lines of one server-sent event.
#[derive(Debug, Default)]
struct EventAccumulator {
    data_lines: Vec<String>,
}

impl EventAccumulator {
    /// Feed one line (without its terminator). Returns a complete payload on
    /// the blank line that ends an event.
    fn push_line(&mut self, line: &str) -> Option<String> {
        let line = line.trim_end_matches(['\n', '\r']);

        if line.is_empty() {
            return self.finish();
        }

        // Comments and the other SSE fields (event, id, retry) carry nothing we decode.
        if let Some(rest) = line.strip_prefix("data:") {
            let data = rest.strip_prefix(' ').unwrap_or(rest);
            if data == "[DONE]" {
                self.data_lines.clear();
            } else if !data.is_empty() {
                self.data_lines.push(data.to_string());
            }
        }

        None
    }

    fn finish(&mut self) -> Option<String> {
        if self.data_lines.is_empty() {
            return None;
        }
        let payload = self.data_lines.join("\n");
        self.data_lines.clear();
        Some(payload)
    }
}

fn decode_event<T: DeserializeOwned>(payload: &str) -> Result<T, CommonRequestError> {
    trace!(payload, "sse event");
    serde_json::from_str(payload)
        .map_err(|e| CommonRequestError::InvalidEventData(format!("JSON parse error: {e}; data: {payload}")))
}

type ByteStream = Pin<Box<dyn Stream<Item = Result<bytes::Bytes, reqwest::Error>> + Send>>;

/// Server-Sent Events parser for streaming responses
pub struct SseParser {
    byte_stream: ByteStream,
    buffer: Vec<u8>,
    events: EventAccumulator,
    finished: bool,
}

impl SseParser {
    pub fn new(response: reqwest::Response) -> Self {
        Self::from_stream(response.bytes_stream())
    }

    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<bytes::Bytes, reqwest::Error>> + Send + 'static,
    {
        Self {
            byte_stream: Box::pin(stream),
            buffer: Vec::new(),
            events: EventAccumulator::default(),
            finished: false,
        }
    }

    /// Get the next parsed event from the stream
    pub async fn next_event<T: DeserializeOwned>(&mut self) -> Result<Option<T>, CommonRequestError> {
        loop {
            while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
                let line_bytes: Vec<u8> = self.buffer.drain(..=pos).collect();
                let line = String::from_utf8(line_bytes)?;
                if let Some(payload) = self.events.push_line(&line) {
                    return decode_event(&payload).map(Some);
                }
            }

            if self.finished {
                return Ok(None);
            }

            match self.byte_stream.next().await {
                Some(chunk) => {
                    let chunk = chunk.map_err(CommonRequestError::Connectivity)?;
                    self.buffer.extend_from_slice(&chunk);
                }
                None => {
                    // Flush an event the server did not terminate with a blank line
                    self.finished = true;
                    let rest = String::from_utf8(std::mem::take(&mut self.buffer))?;
                    self.events.push_line(&rest);
                    if let Some(payload) = self.events.finish() {
                        return decode_event(&payload).map(Some);
                    }
                    return Ok(None);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use serde_json::Value;

    async fn parse_all(sse: &'static str) -> Result<Vec<Value>, CommonRequestError> {
        let chunks: Vec<Result<Bytes, reqwest::Error>> = vec![Ok(Bytes::from_static(sse.as_bytes()))];
        let mut parser = SseParser::from_stream(futures_util::stream::iter(chunks));
        let mut events = Vec::new();
        while let Some(event) = parser.next_event().await? {
            events.push(event);
        }
        Ok(events)
    }

    #[tokio::test]
    async fn empty_body_yields_nothing() {
        assert!(parse_all("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn done_marker_is_dropped() {
        assert!(parse_all("data: [DONE]\n\n").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn multi_line_data_is_joined() {
        let events = parse_all("data: {\"a\":\ndata: 1}\n\n").await.unwrap();
        assert_eq!(events, vec![serde_json::json!({"a": 1})]);
    }

    #[tokio::test]
    async fn comments_and_event_fields_are_ignored() {
        let sse = ": keep-alive\nevent: chunk\nid: 7\ndata: {\"n\":1}\n\ndata: {\"n\":2}\n\n";
        let events = parse_all(sse).await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1]["n"], 2);
    }

    #[tokio::test]
    async fn invalid_json_is_invalid_event_data() {
        let err = parse_all("data: {invalid json}\n\n").await.unwrap_err();
        assert!(matches!(err, CommonRequestError::InvalidEventData(_)));
    }

    #[tokio::test]
    async fn parser_handles_events_split_across_chunks() {
        let chunks: Vec<Result<Bytes, reqwest::Error>> = vec![
            Ok(Bytes::from_static(b"data: {\"n\"")),
            Ok(Bytes::from_static(b":1}\r\n\r\ndata: {\"n\":2}")),
        ];
        let mut parser = SseParser::from_stream(futures_util::stream::iter(chunks));

        let first: Option<Value> = parser.next_event().await.unwrap();
        assert_eq!(first.unwrap()["n"], 1);
        // Second event has no trailing blank line and is flushed at end of stream
        let second: Option<Value> = parser.next_event().await.unwrap();
        assert_eq!(second.unwrap()["n"], 2);
        let end: Option<Value> = parser.next_event().await.unwrap();
        assert!(end.is_none());
    }
}
