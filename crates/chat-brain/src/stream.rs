//! Decoding of streamed chat completions.
//!
//! The body is a sequence of SSE lines: `data: {json}` chunks, `: comment`
//! keep-alives, and a final `data: [DONE]`.

use tracing::{debug, warn};

use crate::api_types::ChatCompletionChunk;
use crate::error::ChatError;

/// One decoded SSE event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// Payload of a `data:` line.
    Data(String),
    /// The `[DONE]` terminator.
    Done,
}

/// Incremental line decoder for an SSE byte stream.
///
/// Bytes are buffered until a newline so a chunk boundary can fall anywhere,
/// including inside a multi-byte character.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    /// Create an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes and return every complete event they finish.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(event) = parse_line(&line) {
                events.push(event);
            }
        }
        events
    }

    /// Flush a trailing line that had no newline.
    pub fn finish(&mut self) -> Option<SseEvent> {
        let line = std::mem::take(&mut self.buffer);
        parse_line(&line)
    }
}

fn parse_line(raw: &[u8]) -> Option<SseEvent> {
    let line = String::from_utf8_lossy(raw);
    let line = line.trim_end_matches(&['\n', '\r'][..]);

    if line.is_empty() || line.starts_with(':') {
        return None;
    }

    let data = line.strip_prefix("data:")?.trim_start();
    if data == "[DONE]" {
        Some(SseEvent::Done)
    } else {
        Some(SseEvent::Data(data.to_string()))
    }
}

/// Append the content of one `data:` payload to `text`.
///
/// An in-stream error object fails the whole completion. Payloads that are
/// not valid chunks are skipped.
pub fn accumulate(text: &mut String, data: &str) -> Result<(), ChatError> {
    let chunk: ChatCompletionChunk = match serde_json::from_str(data) {
        Ok(chunk) => chunk,
        Err(e) => {
            warn!("Failed to parse stream chunk: {}", e);
            debug!("Raw chunk: {}", data);
            return Ok(());
        }
    };

    if let Some(error) = chunk.error {
        return Err(match error.status() {
            Some(status) => ChatError::Status {
                status,
                message: error.message,
            },
            None => ChatError::InvalidResponse(error.message),
        });
    }

    for choice in chunk.choices {
        if let Some(content) = choice.delta.content {
            text.push_str(&content);
        }
    }

    Ok(())
}

/// Completion text built up from SSE bytes.
///
/// Everything after `[DONE]` is ignored, including a trailing line that
/// arrived in the same chunk.
#[derive(Debug, Default)]
pub struct StreamCollector {
    decoder: SseDecoder,
    text: String,
    done: bool,
}

impl StreamCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes. Returns true once `[DONE]` has been seen.
    pub fn push(&mut self, bytes: &[u8]) -> Result<bool, ChatError> {
        if self.done {
            return Ok(true);
        }

        for event in self.decoder.push(bytes) {
            match event {
                SseEvent::Done => {
                    self.done = true;
                    return Ok(true);
                }
                SseEvent::Data(data) => accumulate(&mut self.text, &data)?,
            }
        }
        Ok(false)
    }

    /// Flush any unterminated line and return the text.
    pub fn finish(mut self) -> Result<String, ChatError> {
        if !self.done {
            if let Some(SseEvent::Data(data)) = self.decoder.finish() {
                accumulate(&mut self.text, &data)?;
            }
        }
        Ok(self.text)
    }
}
