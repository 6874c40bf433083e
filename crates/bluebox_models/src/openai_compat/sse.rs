//! Line-buffered server-sent events framing.
//!
//! Network chunks do not line up with event boundaries: one chunk may carry
//! several `data:` lines, and a line (or a multi-byte character) may be split
//! across two chunks. Bytes are buffered until a newline arrives.

use std::mem;

/// A parsed SSE event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// A `data:` payload with the prefix stripped
    Data(String),
    /// The `[DONE]` terminator
    Done,
}

/// Accumulates raw bytes and yields complete events.
///
/// ```
/// use bluebox_models::{SseEvent, SseLineBuffer};
///
/// let mut buffer = SseLineBuffer::new();
/// assert!(buffer.feed(b"data: {\"a\"").is_empty());
/// assert_eq!(buffer.feed(b":1}\n\ndata: [DONE]\n"), vec![
///     SseEvent::Data("{\"a\":1}".to_string()),
///     SseEvent::Done,
/// ]);
/// ```
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    pending: Vec<u8>,
}

impl SseLineBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bytes and return every event completed by them.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        self.pending.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(newline) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=newline).collect();
            if let Some(event) = parse_line(&String::from_utf8_lossy(&line)) {
                events.push(event);
            }
        }
        events
    }

    /// Parse whatever is left once the byte stream has ended.
    pub fn flush(&mut self) -> Vec<SseEvent> {
        let rest = mem::take(&mut self.pending);
        parse_line(&String::from_utf8_lossy(&rest))
            .into_iter()
            .collect()
    }
}

fn parse_line(line: &str) -> Option<SseEvent> {
    let line = line.trim();
    // Blank separators and the event:, id:, retry: and comment fields carry nothing.
    let data = line.strip_prefix("data:")?.trim_start();
    if data == "[DONE]" {
        return Some(SseEvent::Done);
    }
    if data.is_empty() {
        return None;
    }
    Some(SseEvent::Data(data.to_string()))
}
