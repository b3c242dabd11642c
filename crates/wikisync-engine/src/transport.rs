//! HTTP seam between the engine and the remote collector.
//!
//! The engine only needs two calls: a GET for the manifest and a JSON POST
//! for submissions. [`SyncTransport`] abstracts both so tests can script the
//! collector; [`HttpTransport`] is the production implementation.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use thiserror::Error;
use wikisync_core::errors::{SyncError, SyncErrorKind};

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Any 2xx status counts as acknowledged.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failures before any HTTP status was received.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("could not connect: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl TransportError {
    fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(timeout)
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

impl From<TransportError> for SyncError {
    fn from(err: TransportError) -> Self {
        let kind = match err {
            TransportError::Timeout(_) => SyncErrorKind::Timeout,
            TransportError::Connect(_) | TransportError::Request(_) => SyncErrorKind::Transport,
        };
        SyncError::new(kind).with_message(err.to_string())
    }
}

/// Remote collector transport.
#[async_trait]
pub trait SyncTransport: Send + Sync {
    /// GET `url`, returning whatever status the server answered with.
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;

    /// POST a JSON body to `url`.
    async fn post_json(&self, url: &str, body: Vec<u8>) -> Result<HttpResponse, TransportError>;
}

/// `reqwest`-backed transport with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    /// # Errors
    ///
    /// `Internal` if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("wikisync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                SyncError::new(SyncErrorKind::Internal)
                    .with_op("build_http_client")
                    .with_message(e.to_string())
            })?;
        Ok(Self { client, timeout })
    }

    async fn finish(&self, response: reqwest::Response) -> Result<HttpResponse, TransportError> {
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::from_reqwest(e, self.timeout))?;
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

#[async_trait]
impl SyncTransport for HttpTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(e, self.timeout))?;
        self.finish(response).await
    }

    async fn post_json(&self, url: &str, body: Vec<u8>) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(e, self.timeout))?;
        self.finish(response).await
    }
}
