//! # oai-client - minimal client for the OpenAI HTTP API
//!
//! Two clients share one transport layer:
//!
//! - [`RequestClient`] sends one JSON request and resolves to the decoded
//!   JSON answer, or to the decoded error body the API returned.
//! - [`StreamingClient`] sends one JSON request and yields a stream of
//!   decoded values: one per server-sent event when the API streams, a
//!   single value otherwise.
//!
//! Neither client retries, queues or rate-limits; every failure is handed
//! to the caller as a [`ClientError`].
//!
//! ## Example
//! ```no_run
//! use futures::StreamExt;
//! use oai_client::{create_request_client, create_streaming_client};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = create_request_client("your-api-key")?;
//!     let models = client.request("GET models", None).await?;
//!     println!("{models}");
//!
//!     let client = create_streaming_client("your-api-key")?;
//!     let mut chunks = client.stream(
//!         "chat/completions",
//!         json!({
//!             "model": "gpt-4o-mini",
//!             "stream": true,
//!             "messages": [{"role": "user", "content": "Hello!"}],
//!         }),
//!     );
//!     while let Some(chunk) = chunks.next().await {
//!         println!("{}", chunk?["data"]);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod endpoint;
pub mod http;
pub mod options;
pub mod request;
pub mod sse;
pub mod stream;
pub mod streaming;

// Re-exports for convenience
pub use client::ClientError;
pub use endpoint::Endpoint;
pub use options::{SecretString, TransportOptions};
pub use request::{create_request_client, RequestClient};
pub use stream::ValueStream;
pub use streaming::{create_streaming_client, StreamingClient};
