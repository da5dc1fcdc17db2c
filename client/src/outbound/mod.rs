//! Outbound adapters implementing the domain's driven ports.

mod http;

pub use http::ReqwestTransport;
