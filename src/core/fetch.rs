//! Request descriptions, fetch lifecycle state and the single-attempt HTTP call.

use reqwest::Method;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Per-request configuration applied on top of the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: BTreeMap::new(),
            body: None,
        }
    }
}

/// Identifies one fetch cycle. Two specs that compare equal describe the same request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub url: String,
    pub options: RequestOptions,
}

impl RequestSpec {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            options: RequestOptions::default(),
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.options.method = method;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.options.body = Some(body.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Request error: {0}")]
    Transport(String),
    #[error("HTTP error: {0}")]
    Status(u16),
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Externally visible lifecycle of a fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Loading,
    Success(T),
    Failure(FetchError),
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        FetchState::Loading
    }
}

impl<T> FetchState<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            FetchState::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FetchState::Failure(_))
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            FetchState::Failure(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_settled(&self) -> bool {
        !self.is_loading()
    }

    pub fn into_result(self) -> Option<Result<T, FetchError>> {
        match self {
            FetchState::Loading => None,
            FetchState::Success(value) => Some(Ok(value)),
            FetchState::Failure(err) => Some(Err(err)),
        }
    }
}

/// Performs exactly one request for `spec` and parses the body as JSON.
pub async fn execute<T: DeserializeOwned>(
    client: &reqwest::Client,
    spec: &RequestSpec,
) -> Result<T, FetchError> {
    let mut request = client.request(spec.options.method.clone(), &spec.url);
    for (name, value) in &spec.options.headers {
        request = request.header(name.as_str(), value.as_str());
    }
    if let Some(body) = &spec.options.body {
        request = request.body(body.clone());
    }

    let response = request
        .send()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    debug!(status = %response.status(), url = %spec.url, "Received response");

    if !response.status().is_success() {
        return Err(FetchError::Status(response.status().as_u16()));
    }

    let text = response
        .text()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    serde_json::from_str(&text).map_err(|e| FetchError::Parse(e.to_string()))
}
