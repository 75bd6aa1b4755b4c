//! REST client for the retail management backend.
//!
//! Provides the typed HTTP client, endpoint table, request/response
//! payloads, and the wrappers that feed network outcomes into screen and
//! form state.

pub mod actions;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod requests;
pub mod response;

pub use client::BackendClient;
pub use endpoints::Endpoint;
pub use error::{ApiError, Result};
