//! Client SDK for the inktrack production-tracking backend.
//!
//! The crate is organised hexagonally: `domain` owns the data model, the
//! request executor, and the ports it depends on; `outbound` provides the
//! reqwest transport adapter; `api` exposes typed endpoint bindings; `auth`
//! implements the credentials handshake that produces the bearer token the
//! executor consumes.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod outbound;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use api::ApiHandle;
pub use config::ApiConfig;
pub use domain::{ApiError, CachePolicy, FetchCache};
