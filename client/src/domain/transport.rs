//! Driven port for the HTTP transport.
//!
//! The domain owns the request/response shapes so the executor stays
//! adapter-agnostic and tests can substitute scripted doubles for reqwest.

use async_trait::async_trait;
use url::Url;

/// HTTP methods used by the shop API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
}

impl HttpMethod {
    /// Canonical wire name of the method.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
        }
    }
}

/// One outbound request handed to the transport adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub method: HttpMethod,
    pub url: Url,
    /// Header name/value pairs, already merged and deduplicated by the caller.
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl TransportRequest {
    /// Look up a header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Raw response produced by the transport adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Whether the status is in the 2xx success range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the response carries no payload (204 or zero content length).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status == 204 || self.body.is_empty()
    }
}

/// Failures raised below the HTTP status contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The connection could not be established or broke mid-flight.
    #[error("connection failed: {message}")]
    Connection { message: String },
    /// The transport-level timeout elapsed.
    #[error("request timed out: {message}")]
    Timeout { message: String },
}

impl TransportError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }
}

/// Port for sending HTTP requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send one request and collect the full response body.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}
