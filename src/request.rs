//! Single request/response JSON calls.

use reqwest::header::ACCEPT;
use serde_json::{Map, Value};

use crate::client::ClientError;
use crate::endpoint::Endpoint;
use crate::http::{check_status, send, Transport};
use crate::options::{SecretString, TransportOptions};

/// Client for calls answered by one JSON document.
///
/// # Example
/// ```no_run
/// use oai_client::create_request_client;
///
/// # async fn run() -> Result<(), oai_client::ClientError> {
/// let client = create_request_client("sk-...")?;
/// let models = client.request("GET models", None).await?;
/// println!("{models}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RequestClient {
    transport: Transport,
}

/// Create a [`RequestClient`] for `api_key` with default options.
pub fn create_request_client(api_key: impl Into<SecretString>) -> Result<RequestClient, ClientError> {
    RequestClient::new(TransportOptions::new(api_key))
}

impl RequestClient {
    pub fn new(options: TransportOptions) -> Result<Self, ClientError> {
        Ok(Self {
            transport: Transport::new(options)?,
        })
    }

    pub fn options(&self) -> &TransportOptions {
        self.transport.options()
    }

    /// Send one request and decode the JSON answer.
    ///
    /// `endpoint` is a `[VERB] path` descriptor, see [`Endpoint`]. A missing
    /// body is sent as `{}`.
    ///
    /// # Errors
    /// - [`ClientError::Api`] with the decoded error body for non-2xx answers
    /// - [`ClientError::Parse`] if the answer or the error body is not JSON
    /// - [`ClientError::Http`] for transport failures
    pub async fn request(&self, endpoint: &str, body: Option<Value>) -> Result<Value, ClientError> {
        let endpoint: Endpoint = endpoint.parse()?;
        let body = body.unwrap_or_else(|| Value::Object(Map::new()));

        let request = self
            .transport
            .request(endpoint.verb, &endpoint.path, &body)
            .header(ACCEPT, "application/json");
        let response = send(request).await?;
        let response = check_status(response).await?;

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_client() {
        let client = create_request_client("sk-test").unwrap();
        assert_eq!(client.options().api_key.expose_secret(), "sk-test");
        assert_eq!(client.options().api_base(), "https://api.openai.com/v1");
    }

    #[tokio::test]
    async fn test_invalid_endpoint_fails_before_sending() {
        let client = create_request_client("sk-test").unwrap();
        let result = client.request("   ", None).await;
        assert!(matches!(result, Err(ClientError::Endpoint(_))));
    }
}
