//! Credentials handshake and session management.
//!
//! The executor only ever consumes a bearer token; this module produces one
//! by driving `POST /auth/login` and `POST /auth/refresh` and holding the
//! resulting token set behind the [`crate::domain::SessionSource`] port.

mod credentials;
mod handshake;
mod session_manager;

pub use credentials::{CredentialsError, LoginCredentials};
pub use handshake::{AuthClient, AuthFlowError, TokenSet};
pub use session_manager::{SessionManager, REFRESH_MARGIN};
