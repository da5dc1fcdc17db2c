//! Validated login credentials.
//!
//! Validation happens at construction so the handshake client never sees
//! blank usernames or passwords; the password lives in a zeroizing buffer.

use std::fmt;

use zeroize::Zeroizing;

/// Errors raised when constructing [`LoginCredentials`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Username/password pair accepted by the login endpoint.
///
/// The username is trimmed; the password keeps caller-provided whitespace so
/// credential comparison on the backend is not surprised.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Validate raw form inputs into credentials.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialsError`] for blank inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, CredentialsError> {
        let trimmed = username.trim();
        if trimmed.is_empty() {
            return Err(CredentialsError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(CredentialsError::EmptyPassword);
        }
        Ok(Self {
            username: trimmed.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username as sent to the backend.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password as sent to the backend.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never leak the password through Debug output or logs.
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
