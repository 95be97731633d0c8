//! Endpoint descriptors such as `"GET models"` or `"chat/completions"`.

use std::str::FromStr;

use itertools::Itertools;
use reqwest::Method;

use crate::client::ClientError;

/// Verb used when the descriptor names only a path.
pub const DEFAULT_VERB: Method = Method::POST;

/// A parsed `[VERB] path` pair.
///
/// Only the last two whitespace-separated tokens are looked at: the final
/// token is the path and the one before it, if any, the verb.
///
/// ```
/// use oai_client::endpoint::Endpoint;
/// use reqwest::Method;
///
/// let endpoint: Endpoint = "GET models".parse().unwrap();
/// assert_eq!(endpoint.verb, Method::GET);
/// assert_eq!(endpoint.path, "models");
///
/// let endpoint: Endpoint = "chat/completions".parse().unwrap();
/// assert_eq!(endpoint.verb, Method::POST);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub verb: Method,
    pub path: String,
}

impl Endpoint {
    pub fn new(verb: Method, path: impl Into<String>) -> Self {
        Self {
            verb,
            path: path.into(),
        }
    }

    /// Join `base` and the path with a single `/`.
    pub fn url(&self, base: &str) -> String {
        join_url(base, &self.path)
    }
}

impl FromStr for Endpoint {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = s.split_whitespace().collect_vec();

        match tokens.as_slice() {
            [] => Err(ClientError::Endpoint(s.to_string())),
            [path] => Ok(Endpoint::new(DEFAULT_VERB, *path)),
            [.., verb, path] => {
                let verb = Method::from_bytes(verb.to_ascii_uppercase().as_bytes())
                    .map_err(|_| ClientError::Endpoint(s.to_string()))?;
                Ok(Endpoint::new(verb, *path))
            }
        }
    }
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    [base.trim_end_matches('/'), path.trim_start_matches('/')].join("/")
}
