//! scandiff-cli: Command-line front end for scan export comparison.
//!
//! Normalizes the current and previous scan exports, compares them, and
//! renders the results through a report sink.

pub mod config;
pub mod pipeline;
