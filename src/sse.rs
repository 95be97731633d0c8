//! Server-Sent Events (SSE) stream processing.
//!
//! A response body is decoded in three steps:
//!
//! 1. [`lines`] splits raw bytes on `\r?\n`, whatever the chunk boundaries.
//! 2. [`events`] groups each run of non-blank lines into one [`SseEvent`].
//! 3. [`decode`] turns every event carrying a `data` field into a JSON
//!    object, `data` parsed and the remaining fields kept as strings.
//!
//! SSE format:
//! ```text
//! event: delta
//! data: {"key": "value"}
//!
//! data: {"another": "event"}
//!
//! data: [DONE]
//! ```

use bytes::{Bytes, BytesMut};
use futures::future;
use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use nonempty::NonEmpty;
use serde_json::{Map, Value};
use tracing::trace;

use crate::client::ClientError;

/// Field whose value is JSON and whose repeated lines are joined.
pub const DATA: &str = "data";

/// Split a byte stream into lines.
///
/// Lines end at `\n`, with an optional preceding `\r` removed. A final
/// fragment without a line ending is still emitted. Lines are decoded as
/// UTF-8 only once complete, so multi-byte characters may straddle chunks.
/// The stream ends right after the first error.
pub fn lines<S, E>(bytes: S) -> impl Stream<Item = Result<String, ClientError>>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<ClientError>,
{
    stream::unfold(
        Some((Box::pin(bytes), BytesMut::new(), 0usize)),
        |state| async move {
            let (mut bytes, mut buffer, mut scanned) = state?;
            loop {
                if let Some(offset) = buffer[scanned..].iter().position(|&b| b == b'\n') {
                    let end = scanned + offset;
                    let line = buffer.split_to(end + 1);
                    return Some((Ok(decode_line(&line[..end])), Some((bytes, buffer, 0))));
                }
                scanned = buffer.len();

                match bytes.next().await {
                    Some(Ok(chunk)) => buffer.extend_from_slice(&chunk),
                    Some(Err(e)) => return Some((Err(e.into()), None)),
                    None if buffer.is_empty() => return None,
                    None => return Some((Ok(decode_line(&buffer)), None)),
                }
            }
        },
    )
}

fn decode_line(line: &[u8]) -> String {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

/// Group lines into events.
///
/// Blank lines delimit events and belong to none of them. A pending event is
/// emitted when the lines run out and dropped when they fail.
pub fn events<S>(lines: S) -> impl Stream<Item = Result<SseEvent, ClientError>>
where
    S: Stream<Item = Result<String, ClientError>>,
{
    stream::unfold(Some(Box::pin(lines)), |state| async move {
        let mut lines = state?;
        let mut buffer: Option<NonEmpty<String>> = None;
        loop {
            match lines.next().await {
                Some(Ok(line)) if line.is_empty() => {
                    if let Some(buffer) = buffer.take() {
                        return Some((Ok(SseEvent::from_lines(buffer.iter())), Some(lines)));
                    }
                }
                Some(Ok(line)) => match &mut buffer {
                    Some(pending) => pending.push(line),
                    None => buffer = Some(NonEmpty::new(line)),
                },
                Some(Err(e)) => return Some((Err(e), None)),
                None => return buffer.map(|buffer| (Ok(SseEvent::from_lines(buffer.iter())), None)),
            }
        }
    })
}

/// Decode an event-stream body into JSON values.
///
/// Events without `data` produce nothing. Malformed JSON in `data` yields an
/// error item, except for OpenAI's `data: [DONE]` marker: it is not JSON but
/// is deliberately not a parse error, it ends the sequence as a completion.
pub fn decode<S, E>(bytes: S) -> impl Stream<Item = Result<Value, ClientError>>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<ClientError>,
{
    events(lines(bytes))
        .inspect_ok(|event| trace!(?event, "sse event"))
        .try_take_while(|event| future::ready(Ok(!event.is_done())))
        .try_filter_map(|event| future::ready(event.into_value()))
}

/// Split a `<field>: <value>` line.
///
/// The field is everything before the first colon and must not be empty.
/// Exactly one whitespace character follows the colon, and the value after
/// it must not be empty. Lines of any other shape yield `None`.
///
/// # Example
/// ```
/// use oai_client::sse::parse_field;
///
/// assert_eq!(parse_field("data: {\"key\": \"value\"}"), Some(("data", "{\"key\": \"value\"}")));
/// assert_eq!(parse_field(": keep-alive"), None);
/// assert_eq!(parse_field("data:{}"), None);
/// ```
pub fn parse_field(line: &str) -> Option<(&str, &str)> {
    let (field, rest) = line.split_once(':')?;
    if field.is_empty() {
        return None;
    }

    let mut chars = rest.chars();
    if !chars.next()?.is_whitespace() {
        return None;
    }
    let value = chars.as_str();
    (!value.is_empty()).then_some((field, value))
}

/// One event: its fields in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SseEvent {
    fields: Vec<(String, String)>,
}

impl SseEvent {
    /// Build an event from its lines. Malformed lines contribute nothing.
    pub fn from_lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let mut event = SseEvent::default();
        for line in lines {
            if let Some((field, value)) = parse_field(line.as_ref()) {
                event.insert(field, value);
            }
        }
        event
    }

    // Repeated `data` lines are newline-joined; other fields keep the last value.
    fn insert(&mut self, field: &str, value: &str) {
        match self.fields.iter_mut().find(|(name, _)| name.as_str() == field) {
            Some((_, existing)) if field == DATA => {
                existing.push('\n');
                existing.push_str(value);
            }
            Some((_, existing)) => *existing = value.to_string(),
            None => self.fields.push((field.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    pub fn data(&self) -> Option<&str> {
        self.get(DATA)
    }

    pub fn event(&self) -> Option<&str> {
        self.get("event")
    }

    pub fn id(&self) -> Option<&str> {
        self.get("id")
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check if the event is the `[DONE]` end-of-stream marker.
    pub fn is_done(&self) -> bool {
        self.data() == Some("[DONE]")
    }

    /// Convert into a JSON object, or `None` if the event has no `data`.
    pub fn into_value(self) -> Result<Option<Value>, ClientError> {
        if self.data().is_none() {
            return Ok(None);
        }

        let mut object = Map::new();
        for (field, value) in self.fields {
            let value = if field == DATA {
                serde_json::from_str(&value)?
            } else {
                Value::String(value)
            };
            object.insert(field, value);
        }
        Ok(Some(Value::Object(object)))
    }
}
