//! Typed positional access to raw scan export records.
//!
//! The export has no schema beyond column position. The layout is:
//!
//! ```text
//!  0 plugin id    4 host         8..11 descriptive text
//!  1 CVE          5 protocol     12    plugin output
//!  2 CVSS         6 port
//!  3 risk         7 name
//! ```

use csv::StringRecord;

use crate::error::{CoreError, Result};
use crate::types::EXPORT_HEADER_HOST;

/// Fewest fields a record may carry.
pub const MIN_FIELDS: usize = 13;

const PLUGIN_ID: usize = 0;
const CVSS: usize = 2;
const RISK: usize = 3;
const HOST: usize = 4;
const PROTOCOL: usize = 5;
const PORT: usize = 6;
const NAME: usize = 7;
const PLUGIN_OUTPUT: usize = 12;

/// A borrowed view over one export record whose width has been checked.
#[derive(Debug, Clone, Copy)]
pub struct ScanRecord<'a> {
    fields: &'a StringRecord,
}

impl<'a> ScanRecord<'a> {
    /// Wrap a record, rejecting it when it is narrower than [`MIN_FIELDS`].
    ///
    /// `source_name` and `record` (1-based) only feed the error message.
    pub fn new(fields: &'a StringRecord, source_name: &str, record: u64) -> Result<Self> {
        if fields.len() < MIN_FIELDS {
            return Err(CoreError::ShortRow {
                source_name: source_name.to_string(),
                record,
                found: fields.len(),
                expected: MIN_FIELDS,
            });
        }
        Ok(Self { fields })
    }

    fn field(&self, index: usize) -> &'a str {
        self.fields.get(index).unwrap_or_default()
    }

    pub fn plugin_id(&self) -> &'a str {
        self.field(PLUGIN_ID)
    }

    pub fn cvss(&self) -> &'a str {
        self.field(CVSS)
    }

    pub fn risk(&self) -> &'a str {
        self.field(RISK)
    }

    pub fn host(&self) -> &'a str {
        self.field(HOST)
    }

    pub fn protocol(&self) -> &'a str {
        self.field(PROTOCOL)
    }

    pub fn port(&self) -> &'a str {
        self.field(PORT)
    }

    pub fn name(&self) -> &'a str {
        self.field(NAME)
    }

    pub fn plugin_output(&self) -> &'a str {
        self.field(PLUGIN_OUTPUT)
    }

    /// The export's own column header row.
    pub fn is_export_header(&self) -> bool {
        self.host() == EXPORT_HEADER_HOST
    }
}
