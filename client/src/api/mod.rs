//! Typed endpoint bindings over the request executor.
//!
//! Each binding owns one [`FetchCache`] instance, mirroring how the dashboard
//! UI owns one request state per view. The [`ApiHandle`] bundles the shared
//! wiring (session, transport, clock, config) so bindings stay one-liners to
//! construct.

mod analytics;
mod items;
mod orders;
mod production;

pub use analytics::DashboardAnalyticsFeed;
pub use items::{ItemUpdater, UpdateItemError};
pub use orders::{OrderDetailsFeed, RecentOrdersFeed};
pub use production::{ProductionItemsFeed, ProductionOrdersFeed};

use std::sync::Arc;

use mockable::Clock;

use crate::config::ApiConfig;
use crate::domain::{CachePolicy, FetchCache, HttpTransport, SessionSource};

/// Shared wiring handed to every endpoint binding.
#[derive(Clone)]
pub struct ApiHandle {
    session: Arc<dyn SessionSource>,
    transport: Arc<dyn HttpTransport>,
    clock: Arc<dyn Clock>,
    config: ApiConfig,
}

impl ApiHandle {
    /// Bundle the session capability, transport adapter, clock, and config.
    pub fn new(
        session: Arc<dyn SessionSource>,
        transport: Arc<dyn HttpTransport>,
        clock: Arc<dyn Clock>,
        config: ApiConfig,
    ) -> Self {
        Self {
            session,
            transport,
            clock,
            config,
        }
    }

    /// Client configuration backing this handle.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Staleness policy for bindings that memoize their last result.
    #[must_use]
    pub fn cached_policy(&self) -> CachePolicy {
        CachePolicy::enabled(self.config.cache_duration())
    }

    pub(crate) fn fetch_cache<T>(&self, policy: CachePolicy) -> FetchCache<T> {
        FetchCache::new(
            Arc::clone(&self.session),
            Arc::clone(&self.transport),
            Arc::clone(&self.clock),
            self.config.base_url().clone(),
            policy,
        )
    }
}
