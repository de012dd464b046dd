//! Configuration for the scandiff report run.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use scandiff_core::config::IdentityRules;
use serde::Deserialize;

/// Top-level report configuration.
///
/// Loaded from `scandiff.toml` `[report]` section or
/// `SCANDIFF_REPORT__` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Directory the workbook is written to (default: ".").
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Workbook file name prefix; the UTC date is appended.
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Keep informational (risk "None") findings in the report.
    #[serde(default)]
    pub include_informational: bool,

    /// Compare host inventories when a previous snapshot is given.
    #[serde(default)]
    pub check_hosts: bool,

    /// Which findings carry host naming data.
    #[serde(default)]
    pub identity: IdentityRules,
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_file_prefix() -> String {
    "NessusResults".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            file_prefix: default_file_prefix(),
            include_informational: false,
            check_hosts: false,
            identity: IdentityRules::default(),
        }
    }
}

impl ReportConfig {
    /// Workbook path for a run at `now`: `<output_dir>/<prefix>_<YYYYMMDD>.xlsx`.
    pub fn output_path(&self, now: DateTime<Utc>) -> PathBuf {
        Path::new(&self.output_dir).join(format!(
            "{}_{}.xlsx",
            self.file_prefix,
            now.format("%Y%m%d")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_config() {
        let config = ReportConfig::default();
        assert_eq!(config.output_dir, ".");
        assert_eq!(config.file_prefix, "NessusResults");
        assert!(!config.include_informational);
        assert!(!config.check_hosts);
        assert_eq!(config.identity, IdentityRules::default());
    }

    #[test]
    fn test_output_path_embeds_utc_date() {
        let config = ReportConfig {
            output_dir: "reports".to_string(),
            ..Default::default()
        };
        let now = Utc.with_ymd_and_hms(2026, 3, 7, 23, 59, 0).unwrap();
        assert_eq!(
            config.output_path(now),
            PathBuf::from("reports/NessusResults_20260307.xlsx")
        );
    }
}
