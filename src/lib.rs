//! `cafe-align` library crate.
//!
//! The binary (`cafe`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (e.g., future GUI/daemon, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod join;
pub mod report;
pub mod script;
pub mod session;
pub mod time;
pub mod units;
