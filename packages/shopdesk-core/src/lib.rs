//! Core logic for the shop administration front end.
//!
//! Provides the record model, the list derivation pipeline
//! (search, filter, sort, paginate), invoice and quotation arithmetic,
//! unit conversion, and per-screen view state.

pub mod billing;
pub mod config;
pub mod error;
pub mod record;
pub mod screen;
pub mod view;

pub use error::CoreError;
pub use record::{FieldSource, Record, RecordId, Value};
pub use view::{derive, ListPage, QueryState, SortOrder};
