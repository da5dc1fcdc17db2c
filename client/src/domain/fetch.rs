//! Authenticated request executor with per-instance state and a staleness
//! cache.
//!
//! [`FetchCache`] owns one [`RequestState`] and guarantees that, no matter how
//! quickly callers re-invoke [`FetchCache::execute`], only the most recently
//! started call ever writes to that state. Supersession is cooperative: every
//! call records the generation it started under and compares it against the
//! current generation before each write, so a stale completion becomes a
//! silent no-op. The same guard freezes the state after [`FetchCache::close`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::error::ApiError;
use super::session::SessionSource;
use super::transport::{HttpMethod, HttpTransport, TransportRequest};

/// Default staleness window: five minutes.
pub const DEFAULT_CACHE_DURATION: TimeDelta = TimeDelta::minutes(5);

/// Whether and for how long a successful result stays fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    enabled: bool,
    duration: TimeDelta,
}

impl CachePolicy {
    /// Caching on, with the given staleness window.
    #[must_use]
    pub fn enabled(duration: TimeDelta) -> Self {
        Self {
            enabled: true,
            duration,
        }
    }

    /// Caching off; [`FetchCache::is_stale`] always reports `true`.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            duration: TimeDelta::zero(),
        }
    }

    /// Whether result memoization is on.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Configured staleness window.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.duration
    }
}

/// Observable lifecycle state of one executor instance.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_fetched_at: Option<DateTime<Utc>>,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            last_fetched_at: None,
        }
    }
}

/// One request to run through the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    method: HttpMethod,
    path: String,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

impl ApiRequest {
    /// A `GET` for `path`, which is joined onto the configured base URL unless
    /// it is already absolute.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// A `PATCH` carrying a pre-serialized JSON body.
    pub fn patch(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Patch,
            path: path.into(),
            headers: Vec::new(),
            body: Some(body.into()),
        }
    }

    /// A `POST` carrying a pre-serialized JSON body.
    pub fn post(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            headers: Vec::new(),
            body: Some(body.into()),
        }
    }

    /// Add a caller header. A caller-supplied `Content-Type` replaces the
    /// executor's default of `application/json`.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

struct Inner<T> {
    state: RequestState<T>,
    /// Identity of the most recently started call; bumped on every
    /// `execute` and on `close`, superseding whatever was in flight.
    generation: u64,
    closed: bool,
}

/// Authenticated request executor bound to one logical resource.
///
/// Construction wires in the session capability, the transport adapter, and a
/// clock; all three are injected so tests can script them.
pub struct FetchCache<T> {
    session: Arc<dyn SessionSource>,
    transport: Arc<dyn HttpTransport>,
    clock: Arc<dyn Clock>,
    base_url: Url,
    cache: CachePolicy,
    inner: Mutex<Inner<T>>,
}

impl<T> FetchCache<T> {
    /// Create an executor with empty state.
    pub fn new(
        session: Arc<dyn SessionSource>,
        transport: Arc<dyn HttpTransport>,
        clock: Arc<dyn Clock>,
        base_url: Url,
        cache: CachePolicy,
    ) -> Self {
        Self {
            session,
            transport,
            clock,
            base_url,
            cache,
            inner: Mutex::new(Inner {
                state: RequestState::default(),
                generation: 0,
                closed: false,
            }),
        }
    }

    /// Run one authenticated request, superseding any call still in flight.
    ///
    /// Resolves to `Ok(None)` for empty 2xx responses and `Ok(Some(value))`
    /// for JSON payloads. Every failure except [`ApiError::Cancelled`] is also
    /// recorded in the instance's error state.
    ///
    /// # Errors
    ///
    /// [`ApiError::Auth`] when the session is not authenticated (state is left
    /// untouched), [`ApiError::Cancelled`] when this call was superseded or
    /// the instance is closed, [`ApiError::Http`] for non-2xx statuses, and
    /// [`ApiError::Unexpected`] for transport or decode failures.
    pub async fn execute(&self, request: ApiRequest) -> Result<Option<T>, ApiError>
    where
        T: DeserializeOwned + Clone,
    {
        let snapshot = self.session.snapshot();
        let Some(token) = snapshot.bearer_token().map(str::to_owned) else {
            debug!("request refused: session not authenticated");
            return Err(ApiError::Auth);
        };

        let my_generation = {
            let mut inner = self.lock_inner();
            if inner.closed {
                return Err(ApiError::Cancelled);
            }
            inner.generation += 1;
            inner.state.loading = true;
            inner.state.error = None;
            inner.generation
        };

        let path = request.path.clone();
        let outcome = self.perform(&token, request).await;

        let mut inner = self.lock_inner();
        if inner.closed || inner.generation != my_generation {
            // A newer call owns the state now; vanish without a trace.
            debug!(path = %path, "request superseded, discarding result");
            return Err(ApiError::Cancelled);
        }
        inner.state.loading = false;
        match outcome {
            Ok(payload) => {
                inner.state.data = payload.clone();
                if self.cache.is_enabled() {
                    inner.state.last_fetched_at = Some(self.clock.utc());
                }
                debug!(path = %path, "request succeeded");
                Ok(payload)
            }
            Err(error) => {
                inner.state.error = Some(error.to_string());
                warn!(path = %path, error = %error, "request failed");
                Err(error)
            }
        }
    }

    /// Whether cached data is due for a refetch.
    ///
    /// `true` when caching is disabled, when nothing was fetched yet, or when
    /// the staleness window has elapsed since the last successful fetch.
    pub fn is_stale(&self) -> bool {
        if !self.cache.is_enabled() {
            return true;
        }
        let last = self.lock_inner().state.last_fetched_at;
        match last {
            None => true,
            Some(at) => self.clock.utc() - at > self.cache.duration(),
        }
    }

    /// Clear data, error, and cache bookkeeping. No network effect.
    pub fn reset(&self) {
        let mut inner = self.lock_inner();
        if inner.closed {
            return;
        }
        inner.state = RequestState::default();
    }

    /// Teardown signal from the owning context.
    ///
    /// Supersedes any in-flight call and freezes the state permanently; a
    /// request resolving afterwards cannot mutate anything.
    pub fn close(&self) {
        let mut inner = self.lock_inner();
        inner.closed = true;
        inner.generation += 1;
    }

    /// Last successfully fetched value, if any.
    pub fn data(&self) -> Option<T>
    where
        T: Clone,
    {
        self.lock_inner().state.data.clone()
    }

    /// Whether a request is currently in flight.
    pub fn loading(&self) -> bool {
        self.lock_inner().state.loading
    }

    /// Message of the last surfaced failure, if any.
    pub fn error(&self) -> Option<String> {
        self.lock_inner().state.error.clone()
    }

    /// Instant of the last successful fetch, when caching is enabled.
    pub fn last_fetched_at(&self) -> Option<DateTime<Utc>> {
        self.lock_inner().state.last_fetched_at
    }

    /// Full state snapshot.
    pub fn state(&self) -> RequestState<T>
    where
        T: Clone,
    {
        self.lock_inner().state.clone()
    }

    async fn perform(&self, token: &str, request: ApiRequest) -> Result<Option<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        let url = self.resolve_url(&request.path)?;
        let headers = merge_headers(token, request.headers);
        let response = self
            .transport
            .send(TransportRequest {
                method: request.method,
                url,
                headers,
                body: request.body,
            })
            .await
            .map_err(|error| ApiError::unexpected(error.to_string()))?;

        if !response.is_success() {
            let message = status_message(response.status, &response.body);
            return Err(ApiError::http(response.status, message));
        }
        if response.is_empty() {
            return Ok(None);
        }
        let value = serde_json::from_slice(&response.body)
            .map_err(|error| ApiError::unexpected(format!("invalid JSON payload: {error}")))?;
        Ok(Some(value))
    }

    fn resolve_url(&self, path: &str) -> Result<Url, ApiError> {
        let full = if path.starts_with("http") {
            path.to_owned()
        } else {
            // A root base URL renders with a trailing slash; paths carry their
            // own leading slash, so strip it before concatenating.
            format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
        };
        Url::parse(&full).map_err(|error| ApiError::unexpected(format!("invalid URL {full}: {error}")))
    }

    fn lock_inner(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Base headers merged with caller headers; a caller-supplied `Content-Type`
/// or `Authorization` wins over the defaults.
fn merge_headers(token: &str, caller: Vec<(String, String)>) -> Vec<(String, String)> {
    let mut headers = Vec::with_capacity(caller.len() + 2);
    if !has_header(&caller, "content-type") {
        headers.push(("Content-Type".to_owned(), "application/json".to_owned()));
    }
    if !has_header(&caller, "authorization") {
        headers.push(("Authorization".to_owned(), format!("Bearer {token}")));
    }
    headers.extend(caller);
    headers
}

fn has_header(headers: &[(String, String)], name: &str) -> bool {
    headers
        .iter()
        .any(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
}

/// User-facing message for a non-2xx response.
///
/// 401, 403, and 500 map to fixed messages regardless of body content; other
/// statuses surface the backend's `message`/`error` field when the body
/// parses, falling back to the status reason phrase.
fn status_message(status: u16, body: &[u8]) -> String {
    match status {
        401 => "Session expired. Please log in again.".to_owned(),
        403 => "You don't have permission to access this data.".to_owned(),
        500 => "Server error. Please try again later.".to_owned(),
        _ => parse_error_body(body).unwrap_or_else(|| reason_phrase(status)),
    }
}

fn parse_error_body(body: &[u8]) -> Option<String> {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: Option<String>,
        error: Option<String>,
    }

    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    parsed
        .message
        .or(parsed.error)
        .filter(|message| !message.is_empty())
}

fn reason_phrase(status: u16) -> String {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("Unknown Error")
        .to_owned()
}

#[cfg(test)]
mod tests {
    //! Coverage for the pure helpers; executor lifecycle tests live in
    //! `fetch_tests`.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(401, br#"{"message":"ignored"}"#.as_slice(), "Session expired. Please log in again.")]
    #[case(403, b"".as_slice(), "You don't have permission to access this data.")]
    #[case(500, br#"{"error":"boom"}"#.as_slice(), "Server error. Please try again later.")]
    #[case(404, br#"{"message":"order 9 not found"}"#.as_slice(), "order 9 not found")]
    #[case(409, br#"{"error":"duplicate"}"#.as_slice(), "duplicate")]
    #[case(404, b"not json".as_slice(), "Not Found")]
    #[case(418, b"".as_slice(), "I'm a teapot")]
    fn status_messages_follow_backend_contract(
        #[case] status: u16,
        #[case] body: &[u8],
        #[case] expected: &str,
    ) {
        assert_eq!(status_message(status, body), expected);
    }

    #[test]
    fn caller_content_type_overrides_json_default() {
        let merged = merge_headers(
            "tok",
            vec![("Content-Type".to_owned(), "text/plain".to_owned())],
        );
        let content_types: Vec<&str> = merged
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .map(|(_, value)| value.as_str())
            .collect();
        assert_eq!(content_types, ["text/plain"]);
    }

    #[test]
    fn caller_authorization_replaces_the_bearer_default() {
        let merged = merge_headers(
            "tok",
            vec![("Authorization".to_owned(), "Basic abc".to_owned())],
        );
        let auth_values: Vec<&str> = merged
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case("authorization"))
            .map(|(_, value)| value.as_str())
            .collect();
        assert_eq!(auth_values, ["Basic abc"]);
    }

    #[test]
    fn default_headers_carry_json_and_bearer_token() {
        let merged = merge_headers("tok-3", Vec::new());
        assert!(merged.contains(&("Content-Type".to_owned(), "application/json".to_owned())));
        assert!(merged.contains(&("Authorization".to_owned(), "Bearer tok-3".to_owned())));
    }
}
