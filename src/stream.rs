//! Streaming support types and utilities.

use futures::stream::{self, BoxStream, Stream, StreamExt};
use serde_json::Value;

use crate::client::ClientError;

/// Sequence of decoded JSON values produced by a streaming call.
pub type ValueStream = BoxStream<'static, Result<Value, ClientError>>;

/// MIME type announcing a server-sent event body.
pub const EVENT_STREAM: &str = "text/event-stream";

/// Whether a `content-type` header value announces an event stream.
///
/// Only the start of the value is checked, so parameters such as
/// `; charset=utf-8` do not prevent a match.
///
/// ```
/// use oai_client::stream::is_event_stream;
///
/// assert!(is_event_stream("text/event-stream; charset=utf-8"));
/// assert!(!is_event_stream("application/json"));
/// ```
pub fn is_event_stream(content_type: &str) -> bool {
    content_type.starts_with(EVENT_STREAM)
}

/// Forward items up to and including the first error, then end.
pub fn terminate_on_error<S, T, E>(inner: S) -> impl Stream<Item = Result<T, E>>
where
    S: Stream<Item = Result<T, E>>,
{
    stream::unfold(Some(Box::pin(inner)), |state| async move {
        let mut inner = state?;
        match inner.next().await? {
            Ok(item) => Some((Ok(item), Some(inner))),
            Err(e) => Some((Err(e), None)),
        }
    })
}
