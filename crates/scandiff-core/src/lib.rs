//! scandiff-core: Normalization and snapshot comparison for vulnerability scan exports.
//!
//! This crate holds everything that does not touch the report artifact:
//! - Typed access to positional scan export records
//! - Per-host identity accumulation (FQDN and additional DNS names)
//! - Row normalization and deduplication
//! - Finding and host deltas between a current and a previous snapshot

pub mod compare;
pub mod config;
pub mod error;
pub mod hosts;
pub mod normalize;
pub mod record;
pub mod types;

pub use error::CoreError;
pub use normalize::{normalize, RowNormalizer, Snapshot};
pub use types::{FindingRow, HostTriple, SheetRow};
