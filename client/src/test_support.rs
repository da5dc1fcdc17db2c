//! Test doubles shared by unit and integration tests.
//!
//! Compiled only under `cfg(test)` or the `test-support` feature.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::{HttpTransport, TransportError, TransportRequest, TransportResponse};

/// Transport double replaying a scripted queue of replies.
///
/// Each `send` pops the next reply in FIFO order, records the request it saw,
/// and optionally sleeps before resolving so tests can interleave in-flight
/// calls under a paused tokio clock.
///
/// # Panics
///
/// Panics when `send` is called with no scripted reply left.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<ScriptedReply>>,
    seen: Mutex<Vec<TransportRequest>>,
}

struct ScriptedReply {
    delay: Duration,
    result: Result<TransportResponse, TransportError>,
}

impl ScriptedTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an immediate response.
    pub fn push_response(&self, status: u16, body: impl Into<Vec<u8>>) {
        self.push_delayed_response(Duration::ZERO, status, body);
    }

    /// Queue a response that resolves after `delay`.
    pub fn push_delayed_response(&self, delay: Duration, status: u16, body: impl Into<Vec<u8>>) {
        lock(&self.replies).push_back(ScriptedReply {
            delay,
            result: Ok(TransportResponse {
                status,
                body: body.into(),
            }),
        });
    }

    /// Queue a transport failure.
    pub fn push_error(&self, error: TransportError) {
        lock(&self.replies).push_back(ScriptedReply {
            delay: Duration::ZERO,
            result: Err(error),
        });
    }

    /// Requests observed so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<TransportRequest> {
        lock(&self.seen).clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let reply = match lock(&self.replies).pop_front() {
            Some(reply) => reply,
            None => panic!("no scripted reply left for {}", request.url),
        };
        lock(&self.seen).push(request);
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        reply.result
    }
}

/// Clock double whose current instant is set and advanced by the test.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Start at an arbitrary fixed instant.
    #[must_use]
    pub fn at_epoch() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH)
    }

    pub fn advance(&self, delta: TimeDelta) {
        *lock(&self.now) += delta;
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *lock(&self.now) = now;
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *lock(&self.now)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
