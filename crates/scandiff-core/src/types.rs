//! Normalized row types shared by the comparators and the report writers.
//!
//! A normalized finding row is the 8-field shape every later stage works
//! with. Rows compare and hash field-for-field, which is what both the
//! deduplication and the snapshot set differences rely on.

// ── Constants ─────────────────────────────────────────────────────

/// Host-IP cell value that marks the scan export's own header row.
pub const EXPORT_HEADER_HOST: &str = "Host";

/// Column labels of a normalized finding row.
pub const FINDING_HEADER: [&str; 8] = [
    "CVSS",
    "Risk",
    "Host IP",
    "FQDN",
    "Additional DNS names",
    "Protocol",
    "Port",
    "Name",
];

/// Column labels of a host identity triple.
pub const HOST_HEADER: [&str; 3] = ["Host IP", "FQDN", "Additional DNS names"];

/// Risk label carried by informational findings.
pub const INFORMATIONAL_RISK: &str = "None";

// ── Rendering ─────────────────────────────────────────────────────

/// Anything that renders as one flat row of report cells.
pub trait SheetRow {
    fn cells(&self) -> Vec<&str>;

    /// Risk label of the row, if it has one.
    ///
    /// Only rows that return a label are subject to informational filtering.
    fn risk(&self) -> Option<&str> {
        None
    }
}

// ── Finding rows ──────────────────────────────────────────────────

/// One normalized finding: the scan export's six retained fields with the
/// host's resolved names spliced in after the IP.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FindingRow {
    pub cvss: String,
    pub risk: String,
    pub host_ip: String,
    pub fqdn: String,
    pub dns_names: String,
    pub protocol: String,
    pub port: String,
    pub name: String,
}

impl FindingRow {
    /// The canonical column header row.
    pub fn header() -> Self {
        Self::from_cells(FINDING_HEADER.map(String::from))
    }

    pub fn from_cells(cells: [String; 8]) -> Self {
        let [cvss, risk, host_ip, fqdn, dns_names, protocol, port, name] = cells;
        Self {
            cvss,
            risk,
            host_ip,
            fqdn,
            dns_names,
            protocol,
            port,
            name,
        }
    }

    /// True for the column header row rather than a finding.
    pub fn is_header(&self) -> bool {
        self.host_ip == FINDING_HEADER[2]
    }

    pub fn is_informational(&self) -> bool {
        self.risk == INFORMATIONAL_RISK
    }

    /// Project the row onto its host identity.
    pub fn host(&self) -> HostTriple {
        HostTriple {
            ip: self.host_ip.clone(),
            fqdn: self.fqdn.clone(),
            dns_names: self.dns_names.clone(),
        }
    }
}

impl SheetRow for FindingRow {
    fn cells(&self) -> Vec<&str> {
        vec![
            self.cvss.as_str(),
            self.risk.as_str(),
            self.host_ip.as_str(),
            self.fqdn.as_str(),
            self.dns_names.as_str(),
            self.protocol.as_str(),
            self.port.as_str(),
            self.name.as_str(),
        ]
    }

    fn risk(&self) -> Option<&str> {
        Some(&self.risk)
    }
}

// ── Host triples ──────────────────────────────────────────────────

/// A host as seen by the host comparator: IP plus its accumulated names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostTriple {
    pub ip: String,
    pub fqdn: String,
    pub dns_names: String,
}

impl HostTriple {
    pub fn new(ip: &str, fqdn: &str, dns_names: &str) -> Self {
        Self {
            ip: ip.to_string(),
            fqdn: fqdn.to_string(),
            dns_names: dns_names.to_string(),
        }
    }
}

impl SheetRow for HostTriple {
    fn cells(&self) -> Vec<&str> {
        vec![self.ip.as_str(), self.fqdn.as_str(), self.dns_names.as_str()]
    }
}
