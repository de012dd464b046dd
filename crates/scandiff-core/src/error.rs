//! Error types for the scandiff-core crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("{source_name}: record {record} has {found} fields, expected at least {expected}")]
    ShortRow {
        source_name: String,
        record: u64,
        found: usize,
        expected: usize,
    },

    #[error("{source_name}: record {record} (plugin {plugin_id}) has no plugin output token at position {token}")]
    PluginOutput {
        source_name: String,
        record: u64,
        plugin_id: String,
        token: usize,
    },

    #[error("Cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
