//! Read-only session capability consumed by the request executor.
//!
//! The executor never performs the auth handshake itself; it only observes a
//! snapshot of whatever session provider the application wires in.

/// Authentication lifecycle as seen by consumers of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No credentials are available.
    Unauthenticated,
    /// A handshake is in progress; callers should hold off on requests.
    Loading,
    /// A bearer token is available.
    Authenticated,
}

/// Point-in-time view of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    status: SessionStatus,
    access_token: Option<String>,
}

impl SessionSnapshot {
    /// Snapshot for a signed-in session holding `token`.
    pub fn authenticated(token: impl Into<String>) -> Self {
        Self {
            status: SessionStatus::Authenticated,
            access_token: Some(token.into()),
        }
    }

    /// Snapshot for a signed-out session.
    #[must_use]
    pub fn unauthenticated() -> Self {
        Self {
            status: SessionStatus::Unauthenticated,
            access_token: None,
        }
    }

    /// Snapshot for a handshake still in flight.
    #[must_use]
    pub fn loading() -> Self {
        Self {
            status: SessionStatus::Loading,
            access_token: None,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Bearer token, present only when authenticated with a non-empty token.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        if self.status != SessionStatus::Authenticated {
            return None;
        }
        self.access_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }
}

/// Port exposing the current session to the executor.
#[cfg_attr(test, mockall::automock)]
pub trait SessionSource: Send + Sync {
    /// Observe the session as it stands right now.
    fn snapshot(&self) -> SessionSnapshot;
}

/// Session source returning one fixed snapshot, useful for wiring and tests.
#[derive(Debug, Clone)]
pub struct StaticSessionSource {
    snapshot: SessionSnapshot,
}

impl StaticSessionSource {
    /// Wrap a fixed snapshot.
    #[must_use]
    pub fn new(snapshot: SessionSnapshot) -> Self {
        Self { snapshot }
    }
}

impl SessionSource for StaticSessionSource {
    fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.clone()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SessionSnapshot::unauthenticated(), None)]
    #[case(SessionSnapshot::loading(), None)]
    #[case(SessionSnapshot::authenticated(""), None)]
    #[case(SessionSnapshot::authenticated("tok-1"), Some("tok-1"))]
    fn bearer_token_requires_authenticated_non_empty_token(
        #[case] snapshot: SessionSnapshot,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(snapshot.bearer_token(), expected);
    }

    #[test]
    fn static_source_replays_its_snapshot() {
        let source = StaticSessionSource::new(SessionSnapshot::authenticated("tok-2"));
        assert_eq!(source.snapshot().bearer_token(), Some("tok-2"));
        assert_eq!(source.snapshot().status(), SessionStatus::Authenticated);
    }
}
