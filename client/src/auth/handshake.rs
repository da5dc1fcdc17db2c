//! Login and refresh calls against the auth endpoints.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::domain::{HttpMethod, HttpTransport, TransportRequest};

use super::credentials::LoginCredentials;

/// Failures raised by the handshake client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthFlowError {
    /// The backend refused the credentials or the refresh token.
    #[error("authentication rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    /// The connection failed before a response arrived.
    #[error("authentication transport failed: {message}")]
    Transport { message: String },
    /// The response body did not match the token contract.
    #[error("authentication response invalid: {message}")]
    Decode { message: String },
    /// A refresh was requested but no refresh token is held.
    #[error("no refresh token available")]
    MissingRefreshToken,
}

/// Bearer token material produced by login or refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Absolute instant the access token stops being valid.
    pub expires_at: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequestDto<'a> {
    username: &'a str,
    plain_text_passwd: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequestDto<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponseDto {
    access_token: Option<String>,
    /// Lifetime in seconds.
    expires_in: Option<i64>,
    refresh_token: Option<String>,
}

/// Client for `POST /auth/login` and `POST /auth/refresh`.
///
/// These calls run outside the authenticated executor: they carry no bearer
/// token and no per-instance request state.
pub struct AuthClient {
    transport: Arc<dyn HttpTransport>,
    clock: Arc<dyn Clock>,
    base_url: Url,
}

impl AuthClient {
    /// Wire the handshake client against a base URL.
    pub fn new(transport: Arc<dyn HttpTransport>, clock: Arc<dyn Clock>, base_url: Url) -> Self {
        Self {
            transport,
            clock,
            base_url,
        }
    }

    /// Exchange credentials for a token set.
    ///
    /// # Errors
    ///
    /// [`AuthFlowError::Rejected`] for non-2xx responses,
    /// [`AuthFlowError::Transport`] for connection failures, and
    /// [`AuthFlowError::Decode`] when the response omits the access token or
    /// does not parse.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<TokenSet, AuthFlowError> {
        let body = serde_json::to_string(&LoginRequestDto {
            username: credentials.username(),
            plain_text_passwd: credentials.password(),
        })
        .map_err(|error| AuthFlowError::Decode {
            message: error.to_string(),
        })?;

        let dto = self.post_token_request("/auth/login", body).await?;
        debug!(username = credentials.username(), "login accepted");
        self.token_set_from_dto(dto, None)
    }

    /// Trade the held refresh token for fresh credentials.
    ///
    /// When the response omits a refresh token, the previous one is retained.
    ///
    /// # Errors
    ///
    /// [`AuthFlowError::MissingRefreshToken`] when `current` holds none, plus
    /// the same failures as [`AuthClient::login`].
    pub async fn refresh(&self, current: &TokenSet) -> Result<TokenSet, AuthFlowError> {
        let Some(refresh_token) = current.refresh_token.as_deref() else {
            return Err(AuthFlowError::MissingRefreshToken);
        };
        let body = serde_json::to_string(&RefreshRequestDto { refresh_token }).map_err(|error| {
            AuthFlowError::Decode {
                message: error.to_string(),
            }
        })?;

        let dto = self.post_token_request("/auth/refresh", body).await?;
        debug!("access token refreshed");
        self.token_set_from_dto(dto, current.refresh_token.clone())
    }

    async fn post_token_request(
        &self,
        path: &str,
        body: String,
    ) -> Result<TokenResponseDto, AuthFlowError> {
        // Same join rule as the executor: the path brings the slash.
        let base = self.base_url.as_str().trim_end_matches('/');
        let url = Url::parse(&format!("{base}{path}")).map_err(|error| AuthFlowError::Decode {
            message: format!("invalid auth URL: {error}"),
        })?;
        let response = self
            .transport
            .send(TransportRequest {
                method: HttpMethod::Post,
                url,
                headers: vec![("Content-Type".to_owned(), "application/json".to_owned())],
                body: Some(body),
            })
            .await
            .map_err(|error| AuthFlowError::Transport {
                message: error.to_string(),
            })?;

        if !response.is_success() {
            let message = String::from_utf8_lossy(&response.body).into_owned();
            warn!(status = response.status, path, "authentication rejected");
            return Err(AuthFlowError::Rejected {
                status: response.status,
                message,
            });
        }
        serde_json::from_slice(&response.body).map_err(|error| AuthFlowError::Decode {
            message: error.to_string(),
        })
    }

    fn token_set_from_dto(
        &self,
        dto: TokenResponseDto,
        previous_refresh: Option<String>,
    ) -> Result<TokenSet, AuthFlowError> {
        let Some(access_token) = dto.access_token.filter(|token| !token.is_empty()) else {
            return Err(AuthFlowError::Decode {
                message: "response did not include an access token".to_owned(),
            });
        };
        let lifetime = TimeDelta::seconds(dto.expires_in.unwrap_or(0));
        Ok(TokenSet {
            access_token,
            refresh_token: dto.refresh_token.or(previous_refresh),
            expires_at: self.clock.utc() + lifetime,
        })
    }
}
