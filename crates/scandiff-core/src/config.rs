//! Identity extraction rules.
//!
//! Two finding types carry host naming data in their plugin output rather
//! than a vulnerability. The rules say which finding identifiers those are
//! and which whitespace-separated token of the output holds the name.
//! Loaded as the `[report.identity]` section by the CLI.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct IdentityRules {
    /// Finding identifier of the "host FQDN resolution" check.
    #[serde(default = "default_hostname_plugin_id")]
    pub hostname_plugin_id: String,

    /// Token holding the resolved name. Its trailing character is stripped.
    #[serde(default = "default_hostname_token")]
    pub hostname_token: usize,

    /// Finding identifier of the "additional DNS hostnames" check.
    #[serde(default = "default_dns_plugin_id")]
    pub dns_plugin_id: String,

    /// Token holding the additional DNS name, taken verbatim.
    #[serde(default = "default_dns_token")]
    pub dns_token: usize,
}

fn default_hostname_plugin_id() -> String {
    "12053".to_string()
}

fn default_hostname_token() -> usize {
    3
}

fn default_dns_plugin_id() -> String {
    "46180".to_string()
}

fn default_dns_token() -> usize {
    10
}

impl Default for IdentityRules {
    fn default() -> Self {
        Self {
            hostname_plugin_id: default_hostname_plugin_id(),
            hostname_token: default_hostname_token(),
            dns_plugin_id: default_dns_plugin_id(),
            dns_token: default_dns_token(),
        }
    }
}
