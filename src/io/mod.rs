//! Input/output helpers.
//!
//! - stream schema configuration (`schema`)
//! - CSV ingest + field coercion (`ingest`)
//! - joined dataset exports (CSV/JSON) (`export`)

pub mod export;
pub mod ingest;
pub mod schema;

pub use export::*;
pub use ingest::*;
pub use schema::*;
