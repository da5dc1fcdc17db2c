//! Data shapes exchanged with the production-tracking backend.
//!
//! The wire format is camelCase JSON with SCREAMING_SNAKE enum values, so the
//! serde renames here are part of the backend contract.

use serde::{Deserialize, Serialize};

/// Lifecycle of a customer order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pendente,
    Producao,
    Finalizado,
    Postado,
}

/// Production stage of an individual item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    Impresso,
    Encartelado,
    EmSilk,
    Chapado,
    VersoPronto,
    Acabamento,
    Embalado,
}

/// Print substrate for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Material {
    Adesivo,
    Eletrostatico,
    BrancoFosco,
    Lona,
}

/// One production item belonging to an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub quantity: u32,
    pub sale_quantity: u32,
    pub material: Material,
    pub image: String,
    pub item_status: ItemStatus,
    pub order_id: i64,
}

/// A customer order with its items.
///
/// Dates are carried as the backend's ISO strings rather than parsed; the
/// dashboard renders them verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: i64,
    pub client_name: String,
    pub status: OrderStatus,
    pub items: Vec<Item>,
    pub sale_date: String,
    pub delivery_date: String,
}

/// Aggregate counters shown on the dashboard cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardAnalytics {
    pub orders_in_production: u64,
    pub orders_waiting_shipping: u64,
    pub items_in_production: u64,
    pub orders_shipped_last_week: u64,
}
