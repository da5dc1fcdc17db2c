//! Order list and order detail bindings.

use crate::domain::{ApiError, ApiRequest, FetchCache, Order};

use super::ApiHandle;

/// Cached feed for the recent-orders list.
pub struct RecentOrdersFeed {
    fetch: FetchCache<Vec<Order>>,
}

impl RecentOrdersFeed {
    /// Bind to `GET /order/recent-orders` with the handle's staleness window.
    #[must_use]
    pub fn new(handle: &ApiHandle) -> Self {
        Self {
            fetch: handle.fetch_cache(handle.cached_policy()),
        }
    }

    /// Fetch the list, serving the cached value while it is fresh.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the executor.
    pub async fn fetch(&self, force: bool) -> Result<Option<Vec<Order>>, ApiError> {
        if !force && !self.fetch.is_stale() {
            if let Some(current) = self.fetch.data() {
                return Ok(Some(current));
            }
        }
        self.fetch
            .execute(ApiRequest::get("/order/recent-orders"))
            .await
    }

    #[must_use]
    pub fn orders(&self) -> Option<Vec<Order>> {
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

    pub fn close(&self) {
        self.fetch.close();
    }
}

/// Cached feed for one order's details.
pub struct OrderDetailsFeed {
    order_id: i64,
    fetch: FetchCache<Order>,
}

impl OrderDetailsFeed {
    /// Bind to `GET /order/{id}` for a single order.
    #[must_use]
    pub fn new(handle: &ApiHandle, order_id: i64) -> Self {
        Self {
            order_id,
            fetch: handle.fetch_cache(handle.cached_policy()),
        }
    }

    /// Fetch the order, serving the cached value while it is fresh.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the executor.
    pub async fn fetch(&self, force: bool) -> Result<Option<Order>, ApiError> {
        if !force && !self.fetch.is_stale() {
            if let Some(current) = self.fetch.data() {
                return Ok(Some(current));
            }
        }
        self.fetch
            .execute(ApiRequest::get(format!("/order/{}", self.order_id)))
            .await
    }

    #[must_use]
    pub fn order(&self) -> Option<Order> {
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

    pub fn close(&self) {
        self.fetch.close();
    }
}
