//! HTTP client utilities shared by the request and streaming clients.
//!
//! This module owns client construction, authorization and the mapping of
//! non-2xx responses onto [`ClientError::Api`].

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::client::ClientError;
use crate::endpoint::join_url;
use crate::options::TransportOptions;

/// Build a configured HTTP client from transport options.
///
/// This applies common configuration like timeouts and proxies.
///
/// # Example
/// ```ignore
/// let client = build_http_client(&transport_options)?;
/// ```
pub fn build_http_client(transport_options: &TransportOptions) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder();

    if let Some(timeout) = transport_options.timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(proxy_url) = &transport_options.proxy {
        builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
    }

    builder.build()
}

/// Add extra headers to a request if specified in transport options.
pub fn add_extra_headers(
    mut request: RequestBuilder,
    extra_headers: &Option<HashMap<String, String>>,
) -> RequestBuilder {
    if let Some(headers) = extra_headers {
        for (key, value) in headers {
            request = request.header(key, value);
        }
    }
    request
}

/// An authorized connection to the API, cheap to clone.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    options: TransportOptions,
}

impl Transport {
    pub fn new(options: TransportOptions) -> Result<Self, ClientError> {
        let client = build_http_client(&options)?;
        Ok(Self { client, options })
    }

    pub fn options(&self) -> &TransportOptions {
        &self.options
    }

    /// Build an authorized request carrying `body` as JSON.
    ///
    /// `GET` and `HEAD` requests are sent without a body.
    pub fn request(&self, verb: Method, path: &str, body: &Value) -> RequestBuilder {
        let url = join_url(self.options.api_base(), path);
        let carries_body = verb != Method::GET && verb != Method::HEAD;
        let mut req = self.client.request(verb, url).header(
            AUTHORIZATION,
            format!("Bearer {}", self.options.api_key.expose_secret()),
        );
        req = add_extra_headers(req, &self.options.extra_headers);

        if carries_body {
            req = req.json(body);
        }
        req
    }
}

/// Send a request built by [`Transport::request`].
pub async fn send(request: RequestBuilder) -> Result<Response, ClientError> {
    let (client, request) = request.build_split();
    let request = request?;
    debug!(method = %request.method(), url = %request.url(), "sending request");
    Ok(client.execute(request).await?)
}

/// Pass successful responses through; turn anything else into an error
/// carrying the decoded error body.
///
/// If the body cannot be read the error is [`ClientError::Http`]; if it is
/// not JSON the error is [`ClientError::Parse`].
pub async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    warn!(%status, url = %response.url(), "request failed");
    let body = response.bytes().await?;
    let body: Value = serde_json::from_slice(&body)?;
    Err(ClientError::Api { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_build_http_client() {
        let transport_options = TransportOptions::new("test").with_timeout(Duration::from_secs(30));

        let client = build_http_client(&transport_options);
        assert!(client.is_ok());
    }

    #[test]
    fn test_build_http_client_with_proxy() {
        let transport_options =
            TransportOptions::new("test").with_proxy("http://proxy.example.com:8080".to_string());

        let client = build_http_client(&transport_options);
        assert!(client.is_ok());
    }

    #[test]
    fn test_request_headers_and_body() {
        let transport = Transport::new(
            TransportOptions::new("sk-test")
                .with_base_url("http://localhost:1/v1".to_string())
                .with_header("OpenAI-Beta".to_string(), "assistants=v2".to_string()),
        )
        .unwrap();

        let request = transport
            .request(Method::POST, "chat/completions", &serde_json::json!({"model": "m"}))
            .build()
            .unwrap();

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.url().as_str(), "http://localhost:1/v1/chat/completions");
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer sk-test");
        assert_eq!(request.headers()["OpenAI-Beta"], "assistants=v2");
        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(body, br#"{"model":"m"}"#);
    }

    #[test]
    fn test_get_request_has_no_body() {
        let transport = Transport::new(TransportOptions::new("sk-test")).unwrap();

        let request = transport
            .request(Method::GET, "models", &serde_json::json!({}))
            .build()
            .unwrap();

        assert_eq!(request.url().as_str(), "https://api.openai.com/v1/models");
        assert!(request.body().is_none());
    }
}
