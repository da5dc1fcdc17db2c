//! Sparse item update payloads.
//!
//! `PATCH /item/{id}` expects only the fields that actually changed, so the
//! patch is built by diffing the edited item against the original rather than
//! re-sending the full record.

use serde::Serialize;

use super::models::{Item, ItemStatus, Material};

/// Changed-fields payload for an item update.
///
/// Fields left as `None` are omitted from the JSON body entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<Material>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_status: Option<ItemStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i64>,
}

impl ItemPatch {
    /// Capture the fields of `edited` that differ from `original`.
    ///
    /// String fields are trimmed before comparison so stray whitespace from a
    /// form field does not count as an edit; the trimmed value is what gets
    /// sent.
    #[must_use]
    pub fn diff(original: &Item, edited: &Item) -> Self {
        Self {
            name: changed_string(&original.name, &edited.name),
            quantity: changed(original.quantity, edited.quantity),
            sale_quantity: changed(original.sale_quantity, edited.sale_quantity),
            material: changed(original.material, edited.material),
            image: changed_string(&original.image, &edited.image),
            item_status: changed(original.item_status, edited.item_status),
            order_id: changed(original.order_id, edited.order_id),
        }
    }

    /// Whether the patch carries no changes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.quantity.is_none()
            && self.sale_quantity.is_none()
            && self.material.is_none()
            && self.image.is_none()
            && self.item_status.is_none()
            && self.order_id.is_none()
    }
}

fn changed<T: Copy + PartialEq>(original: T, edited: T) -> Option<T> {
    (original != edited).then_some(edited)
}

fn changed_string(original: &str, edited: &str) -> Option<String> {
    let trimmed = edited.trim();
    (trimmed != original).then(|| trimmed.to_owned())
}
