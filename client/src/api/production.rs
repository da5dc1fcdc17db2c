//! Production floor list bindings.
//!
//! These lists change constantly on the floor, so they run uncached: every
//! fetch goes to the backend.

use crate::domain::{ApiError, ApiRequest, CachePolicy, FetchCache, Item, Order};

use super::ApiHandle;

/// Uncached feed of all items currently in production.
pub struct ProductionItemsFeed {
    fetch: FetchCache<Vec<Item>>,
}

impl ProductionItemsFeed {
    /// Bind to `GET /production/items`.
    #[must_use]
    pub fn new(handle: &ApiHandle) -> Self {
        Self {
            fetch: handle.fetch_cache(CachePolicy::disabled()),
        }
    }

    /// Fetch the current item list.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the executor.
    pub async fn fetch(&self) -> Result<Option<Vec<Item>>, ApiError> {
        self.fetch.execute(ApiRequest::get("/production/items")).await
    }

    #[must_use]
    pub fn items(&self) -> Option<Vec<Item>> {
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

    pub fn close(&self) {
        self.fetch.close();
    }
}

/// Uncached feed of orders currently in production.
pub struct ProductionOrdersFeed {
    fetch: FetchCache<Vec<Order>>,
}

impl ProductionOrdersFeed {
    /// Bind to `GET /production/orders`.
    #[must_use]
    pub fn new(handle: &ApiHandle) -> Self {
        Self {
            fetch: handle.fetch_cache(CachePolicy::disabled()),
        }
    }

    /// Fetch the current order list.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the executor.
    pub async fn fetch(&self) -> Result<Option<Vec<Order>>, ApiError> {
        self.fetch
            .execute(ApiRequest::get("/production/orders"))
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

    pub fn close(&self) {
        self.fetch.close();
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::sync::Arc;

    use url::Url;

    use super::*;
    use crate::config::ApiConfig;
    use crate::domain::{SessionSnapshot, StaticSessionSource, DEFAULT_CACHE_DURATION};
    use crate::test_support::{ManualClock, ScriptedTransport};

    fn handle(transport: &Arc<ScriptedTransport>) -> ApiHandle {
        ApiHandle::new(
            Arc::new(StaticSessionSource::new(SessionSnapshot::authenticated(
                "tok-test",
            ))),
            Arc::clone(transport) as Arc<dyn crate::domain::HttpTransport>,
            Arc::new(ManualClock::at_epoch()) as Arc<dyn mockable::Clock>,
            ApiConfig::new(
                Url::parse("http://localhost:8080/api").expect("base url"),
                DEFAULT_CACHE_DURATION,
            ),
        )
    }

    #[tokio::test]
    async fn production_items_always_hit_the_backend() {
        let transport = Arc::new(ScriptedTransport::new());
        let feed = ProductionItemsFeed::new(&handle(&transport));
        transport.push_response(200, br#"[]"#.as_slice());
        transport.push_response(200, br#"[]"#.as_slice());

        feed.fetch().await.expect("first fetch succeeds");
        feed.fetch().await.expect("second fetch succeeds");

        assert_eq!(transport.requests().len(), 2, "uncached feed never reuses");
        assert_eq!(
            transport.requests()[0].url.as_str(),
            "http://localhost:8080/api/production/items"
        );
    }

    #[tokio::test]
    async fn production_orders_path_is_correct() {
        let transport = Arc::new(ScriptedTransport::new());
        let feed = ProductionOrdersFeed::new(&handle(&transport));
        transport.push_response(200, br#"[]"#.as_slice());

        let orders = feed.fetch().await.expect("fetch succeeds");
        assert_eq!(orders, Some(Vec::new()));
        assert_eq!(
            transport.requests()[0].url.as_str(),
            "http://localhost:8080/api/production/orders"
        );
    }
}
