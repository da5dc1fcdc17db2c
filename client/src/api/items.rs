//! Item update binding.

use serde_json::Value;

use crate::domain::{ApiError, ApiRequest, CachePolicy, FetchCache, ItemPatch};

use super::ApiHandle;

/// Failures raised by [`ItemUpdater::update`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpdateItemError {
    /// The diff carried no changes; nothing was sent.
    #[error("an item update requires at least one changed field")]
    EmptyPatch,
    /// The executor failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Binding for `PATCH /item/{id}`.
///
/// The response body is accepted as arbitrary JSON because the backend
/// answers 204 for most updates; callers refetch the affected lists instead
/// of relying on a returned record.
pub struct ItemUpdater {
    fetch: FetchCache<Value>,
}

impl ItemUpdater {
    #[must_use]
    pub fn new(handle: &ApiHandle) -> Self {
        Self {
            fetch: handle.fetch_cache(CachePolicy::disabled()),
        }
    }

    /// Send the changed fields of one item.
    ///
    /// # Errors
    ///
    /// [`UpdateItemError::EmptyPatch`] when `patch` carries no changes, or the
    /// wrapped [`ApiError`] when the request fails.
    pub async fn update(&self, item_id: i64, patch: &ItemPatch) -> Result<(), UpdateItemError> {
        if patch.is_empty() {
            return Err(UpdateItemError::EmptyPatch);
        }
        let body = serde_json::to_string(patch)
            .map_err(|error| ApiError::unexpected(format!("invalid patch payload: {error}")))?;
        self.fetch
            .execute(ApiRequest::patch(format!("/item/{item_id}"), body))
            .await?;
        Ok(())
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.fetch.loading()
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.fetch.error()
    }

    /// Clear any previous failure state, e.g. when a modal reopens.
    pub fn reset(&self) {
        self.fetch.reset();
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
    use crate::domain::{
        HttpMethod, Item, ItemStatus, Material, SessionSnapshot, StaticSessionSource,
        DEFAULT_CACHE_DURATION,
    };
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

    fn sample_item() -> Item {
        Item {
            id: 4,
            name: "sleeve print".to_owned(),
            quantity: 20,
            sale_quantity: 20,
            material: Material::Lona,
            image: "https://cdn.example/4.png".to_owned(),
            item_status: ItemStatus::Acabamento,
            order_id: 2,
        }
    }

    #[tokio::test]
    async fn empty_patch_is_rejected_before_any_request() {
        let transport = Arc::new(ScriptedTransport::new());
        let updater = ItemUpdater::new(&handle(&transport));

        let result = updater.update(4, &ItemPatch::default()).await;
        assert_eq!(result, Err(UpdateItemError::EmptyPatch));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn patch_sends_only_changed_fields_to_item_path() {
        let transport = Arc::new(ScriptedTransport::new());
        let updater = ItemUpdater::new(&handle(&transport));
        transport.push_response(204, Vec::new());

        let original = sample_item();
        let mut edited = original.clone();
        edited.quantity = 25;

        updater
            .update(4, &ItemPatch::diff(&original, &edited))
            .await
            .expect("update succeeds");

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Patch);
        assert_eq!(requests[0].url.as_str(), "http://localhost:8080/api/item/4");
        assert_eq!(requests[0].body.as_deref(), Some(r#"{"quantity":25}"#));
    }

    #[tokio::test]
    async fn backend_rejection_surfaces_through_error_state() {
        let transport = Arc::new(ScriptedTransport::new());
        let updater = ItemUpdater::new(&handle(&transport));
        transport.push_response(403, Vec::new());

        let original = sample_item();
        let mut edited = original.clone();
        edited.item_status = ItemStatus::Embalado;

        let result = updater.update(4, &ItemPatch::diff(&original, &edited)).await;
        let expected = "You don't have permission to access this data.";
        assert_eq!(
            result,
            Err(UpdateItemError::Api(ApiError::http(403, expected)))
        );
        assert_eq!(updater.error().as_deref(), Some(expected));

        updater.reset();
        assert_eq!(updater.error(), None);
    }
}
