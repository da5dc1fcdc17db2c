//! Dashboard analytics binding.

use crate::domain::{ApiError, ApiRequest, DashboardAnalytics, FetchCache};

use super::ApiHandle;

/// Cached feed for the dashboard aggregate counters.
pub struct DashboardAnalyticsFeed {
    fetch: FetchCache<DashboardAnalytics>,
}

impl DashboardAnalyticsFeed {
    /// Bind to `GET /analytics/dashboard` with the handle's staleness window.
    #[must_use]
    pub fn new(handle: &ApiHandle) -> Self {
        Self {
            fetch: handle.fetch_cache(handle.cached_policy()),
        }
    }

    /// Fetch the counters, serving the cached value while it is fresh.
    ///
    /// `force` bypasses the freshness check, mirroring a manual refresh
    /// button.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the executor.
    pub async fn fetch(&self, force: bool) -> Result<Option<DashboardAnalytics>, ApiError> {
        if !force && !self.fetch.is_stale() {
            if let Some(current) = self.fetch.data() {
                return Ok(Some(current));
            }
        }
        self.fetch
            .execute(ApiRequest::get("/analytics/dashboard"))
            .await
    }

    /// Last fetched counters.
    #[must_use]
    pub fn analytics(&self) -> Option<DashboardAnalytics> {
        self.fetch.data()
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.fetch.loading()
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.fetch.error()
    }

    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.fetch.is_stale()
    }

    /// Teardown signal from the owning view.
    pub fn close(&self) {
        self.fetch.close();
    }
}
