//! Calls answered by either one JSON document or an event stream.

use futures::stream::{self, StreamExt};
use futures::TryFutureExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, Response};
use serde_json::Value;
use tracing::debug;

use crate::client::ClientError;
use crate::endpoint::DEFAULT_VERB;
use crate::http::{check_status, send, Transport};
use crate::options::{SecretString, TransportOptions};
use crate::sse;
use crate::stream::{is_event_stream, terminate_on_error, ValueStream};

/// Client whose calls produce a [`ValueStream`].
///
/// An `text/event-stream` answer yields one value per event carrying
/// `data`; any other answer yields its whole body as a single value.
/// Either way the stream ends after its first error.
///
/// # Example
/// ```no_run
/// use futures::StreamExt;
/// use oai_client::create_streaming_client;
/// use serde_json::json;
///
/// # async fn run() -> Result<(), oai_client::ClientError> {
/// let client = create_streaming_client("sk-...")?;
/// let mut chunks = client.stream(
///     "chat/completions",
///     json!({"model": "gpt-4o-mini", "stream": true, "messages": []}),
/// );
/// while let Some(chunk) = chunks.next().await {
///     println!("{}", chunk?["data"]);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StreamingClient {
    transport: Transport,
}

/// Create a [`StreamingClient`] for `api_key` with default options.
pub fn create_streaming_client(
    api_key: impl Into<SecretString>,
) -> Result<StreamingClient, ClientError> {
    StreamingClient::new(TransportOptions::new(api_key))
}

impl StreamingClient {
    pub fn new(options: TransportOptions) -> Result<Self, ClientError> {
        Ok(Self {
            transport: Transport::new(options)?,
        })
    }

    pub fn options(&self) -> &TransportOptions {
        self.transport.options()
    }

    /// `POST` `body` to `path` and stream the answer.
    pub fn stream(&self, path: &str, body: Value) -> ValueStream {
        self.stream_with_verb(path, body, DEFAULT_VERB)
    }

    /// Like [`stream`](Self::stream) with an explicit verb.
    ///
    /// The request is sent when the stream is first polled. Dropping the
    /// stream closes the response.
    pub fn stream_with_verb(&self, path: &str, body: Value, verb: Method) -> ValueStream {
        let request = self.transport.request(verb, path, &body);
        let response = async move {
            let response = check_status(send(request).await?).await?;
            Ok::<_, ClientError>(decode_response(response))
        };

        terminate_on_error(response.try_flatten_stream()).boxed()
    }
}

fn decode_response(response: Response) -> ValueStream {
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if is_event_stream(content_type) {
        debug!(content_type, "decoding event stream");
        sse::decode(response.bytes_stream()).boxed()
    } else {
        debug!(content_type, "decoding single JSON body");
        stream::once(async move {
            let body = response.bytes().await?;
            Ok::<Value, ClientError>(serde_json::from_slice(&body)?)
        })
        .boxed()
    }
}
