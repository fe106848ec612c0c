//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - categorical value types (`Gender`, `AgeBand`, `Precipitation`, item facets)
//! - one immutable record type per input stream
//! - the reconstructed `Visit` and the join aggregates
//! - the resolved run configuration (`RunConfig`)

pub mod types;

pub use types::*;
