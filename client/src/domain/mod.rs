//! Domain layer: data model, session capability, transport port, and the
//! authenticated request executor.

mod error;
mod fetch;
mod models;
mod patch;
mod session;
mod transport;

pub use error::ApiError;
pub use fetch::{ApiRequest, CachePolicy, FetchCache, RequestState, DEFAULT_CACHE_DURATION};
pub use models::{DashboardAnalytics, Item, ItemStatus, Material, Order, OrderStatus};
pub use patch::ItemPatch;
pub use session::{SessionSnapshot, SessionSource, SessionStatus, StaticSessionSource};
pub use transport::{
    HttpMethod, HttpTransport, TransportError, TransportRequest, TransportResponse,
};

#[cfg(test)]
pub(crate) use session::MockSessionSource;
#[cfg(test)]
pub(crate) use transport::MockHttpTransport;
