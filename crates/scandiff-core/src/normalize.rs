//! Row normalization: scan export records → ordered, distinct finding rows.
//!
//! Normalizing one snapshot side runs in two passes:
//!
//! 1. Every record of every source is read. Non-header records register
//!    their host in the [`HostDirectory`] and, for identity-bearing
//!    findings, add a hostname or DNS-name fact. The six retained fields
//!    of every record (header included) are collected once each.
//! 2. After all sources are consumed, each collected slice is reshaped to
//!    the 8-field form: the export header becomes the canonical column
//!    header, and data rows get their host's accumulated FQDN and DNS
//!    names spliced in after the IP.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::config::IdentityRules;
use crate::error::{CoreError, Result};
use crate::hosts::HostDirectory;
use crate::record::ScanRecord;
use crate::types::{FindingRow, EXPORT_HEADER_HOST, HOST_HEADER};

// ── Snapshot ──────────────────────────────────────────────────────

/// One side of a comparison: ordered, duplicate-free finding rows.
///
/// The first row is normally the column header. Snapshots rebuilt from a
/// prior report carry an empty host directory.
#[derive(Debug, Default)]
pub struct Snapshot {
    rows: Vec<FindingRow>,
    seen: HashSet<FindingRow>,
    hosts: HostDirectory,
}

impl Snapshot {
    /// Build a snapshot from already-normalized rows, dropping repeats.
    pub fn from_rows(rows: impl IntoIterator<Item = FindingRow>) -> Self {
        let mut snapshot = Self::default();
        snapshot.extend(rows);
        snapshot
    }

    /// Append `row` unless an equal row is already present.
    pub fn push(&mut self, row: FindingRow) -> bool {
        if self.seen.contains(&row) {
            return false;
        }
        self.seen.insert(row.clone());
        self.rows.push(row);
        true
    }

    /// Append every row not already present, keeping first-seen order.
    pub fn extend(&mut self, rows: impl IntoIterator<Item = FindingRow>) {
        for row in rows {
            self.push(row);
        }
    }

    pub fn rows(&self) -> &[FindingRow] {
        &self.rows
    }

    /// Rows other than the column header.
    pub fn findings(&self) -> impl Iterator<Item = &FindingRow> {
        self.rows.iter().filter(|r| !r.is_header())
    }

    pub fn hosts(&self) -> &HostDirectory {
        &self.hosts
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ── Normalizer ────────────────────────────────────────────────────

/// The six export fields retained before identity splicing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ScanSlice {
    cvss: String,
    risk: String,
    host: String,
    protocol: String,
    port: String,
    name: String,
}

impl ScanSlice {
    fn from_record(record: &ScanRecord<'_>) -> Self {
        Self {
            cvss: record.cvss().to_string(),
            risk: record.risk().to_string(),
            host: record.host().to_string(),
            protocol: record.protocol().to_string(),
            port: record.port().to_string(),
            name: record.name().to_string(),
        }
    }

    fn reshape(&self, hosts: &HostDirectory) -> FindingRow {
        let [host_ip, fqdn, dns_names] = if self.host == EXPORT_HEADER_HOST {
            HOST_HEADER.map(String::from)
        } else {
            match hosts.get(&self.host) {
                Some(identity) => [
                    self.host.clone(),
                    identity.fqdn.clone(),
                    identity.dns_names.clone(),
                ],
                None => [self.host.clone(), String::new(), String::new()],
            }
        };

        FindingRow {
            cvss: self.cvss.clone(),
            risk: self.risk.clone(),
            host_ip,
            fqdn,
            dns_names,
            protocol: self.protocol.clone(),
            port: self.port.clone(),
            name: self.name.clone(),
        }
    }
}

/// Identity-bearing record contents already applied to the directory.
#[derive(Debug, PartialEq, Eq, Hash)]
struct AppliedFact {
    plugin_id: String,
    host: String,
    output: String,
}

/// Accumulates one snapshot side from any number of scan export sources.
pub struct RowNormalizer {
    rules: IdentityRules,
    hosts: HostDirectory,
    slices: Vec<ScanSlice>,
    seen_slices: HashSet<ScanSlice>,
    applied_facts: HashSet<AppliedFact>,
    records: u64,
}

impl RowNormalizer {
    pub fn new(rules: IdentityRules) -> Self {
        Self {
            rules,
            hosts: HostDirectory::new(),
            slices: Vec::new(),
            seen_slices: HashSet::new(),
            applied_facts: HashSet::new(),
            records: 0,
        }
    }

    /// Read one export file. The handle is closed before returning.
    pub fn ingest_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CoreError::Open {
            path: path.display().to_string(),
            source,
        })?;
        self.ingest_reader(&path.display().to_string(), file)
    }

    /// Read one export from any reader. `source_name` labels errors and logs.
    pub fn ingest_reader<R: Read>(&mut self, source_name: &str, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut count = 0u64;
        for result in csv_reader.records() {
            let fields = result?;
            count += 1;
            let record = ScanRecord::new(&fields, source_name, count)?;
            self.ingest_record(source_name, count, &record)?;
        }

        self.records += count;
        tracing::debug!(
            source = source_name,
            records = count,
            hosts = self.hosts.len(),
            identity_facts = self.hosts.fact_count(),
            "Scan export ingested"
        );
        Ok(())
    }

    fn ingest_record(
        &mut self,
        source_name: &str,
        record_no: u64,
        record: &ScanRecord<'_>,
    ) -> Result<()> {
        if !record.is_export_header() {
            let ip = record.host();
            self.hosts.get_or_create(ip);

            let plugin_id = record.plugin_id();
            let is_hostname = plugin_id == self.rules.hostname_plugin_id;
            let is_dns = plugin_id == self.rules.dns_plugin_id;

            if (is_hostname || is_dns)
                && self.applied_facts.insert(AppliedFact {
                    plugin_id: plugin_id.to_string(),
                    host: ip.to_string(),
                    output: record.plugin_output().to_string(),
                })
            {
                if is_hostname {
                    let token =
                        output_token(record, self.rules.hostname_token, source_name, record_no)?;
                    let mut hostname = token.to_string();
                    // Resolved names end with the sentence's full stop.
                    hostname.pop();
                    self.hosts.record_hostname_fact(ip, &hostname);
                }
                if is_dns {
                    let token = output_token(record, self.rules.dns_token, source_name, record_no)?;
                    self.hosts.record_dns_fact(ip, token);
                }
            }
        }

        let slice = ScanSlice::from_record(record);
        if self.seen_slices.insert(slice.clone()) {
            self.slices.push(slice);
        }
        Ok(())
    }

    /// Run the reshaping pass and return the finished snapshot.
    pub fn finish(self) -> Snapshot {
        let Self {
            hosts,
            slices,
            records,
            ..
        } = self;

        let mut snapshot = Snapshot::default();
        for slice in &slices {
            snapshot.push(slice.reshape(&hosts));
        }

        tracing::info!(
            records,
            rows = snapshot.len(),
            hosts = hosts.len(),
            identity_facts = hosts.fact_count(),
            "Snapshot normalized"
        );

        snapshot.hosts = hosts;
        snapshot
    }
}

fn output_token<'a>(
    record: &ScanRecord<'a>,
    position: usize,
    source_name: &str,
    record_no: u64,
) -> Result<&'a str> {
    record
        .plugin_output()
        .split_whitespace()
        .nth(position)
        .ok_or_else(|| CoreError::PluginOutput {
            source_name: source_name.to_string(),
            record: record_no,
            plugin_id: record.plugin_id().to_string(),
            token: position,
        })
}

/// Normalize every export file of one snapshot side, in order.
pub fn normalize<P: AsRef<Path>>(sources: &[P], rules: &IdentityRules) -> Result<Snapshot> {
    let mut normalizer = RowNormalizer::new(rules.clone());
    for source in sources {
        normalizer.ingest_path(source)?;
    }
    Ok(normalizer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: [&str; 13] = [
        "Plugin ID",
        "CVE",
        "CVSS",
        "Risk",
        "Host",
        "Protocol",
        "Port",
        "Name",
        "Synopsis",
        "Description",
        "Solution",
        "See Also",
        "Plugin Output",
    ];

    fn row(
        plugin: &str,
        cvss: &str,
        risk: &str,
        host: &str,
        port: &str,
        name: &str,
        output: &str,
    ) -> Vec<String> {
        [plugin, "", cvss, risk, host, "tcp", port, name, "", "", "", "", output]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn fqdn_row(host: &str, name: &str) -> Vec<String> {
        row(
            "12053",
            "",
            "None",
            host,
            "0",
            "Host Fully Qualified Domain Name (FQDN) Resolution",
            &format!("\n{host} resolves as {name}.\n"),
        )
    }

    fn dns_row(host: &str, name: &str) -> Vec<String> {
        row(
            "46180",
            "",
            "None",
            host,
            "0",
            "Additional DNS Hostnames",
            &format!("\nThe following hostnames point to the remote host :\n  - {name}\n"),
        )
    }

    fn export(rows: &[Vec<String>]) -> Vec<u8> {
        let mut writer = csv::Writer::from_writer(vec![]);
        writer.write_record(HEADER).unwrap();
        for r in rows {
            writer.write_record(r).unwrap();
        }
        writer.into_inner().unwrap()
    }

    fn normalize_exports(sources: &[Vec<u8>]) -> Result<Snapshot> {
        let mut normalizer = RowNormalizer::new(IdentityRules::default());
        for (i, source) in sources.iter().enumerate() {
            normalizer.ingest_reader(&format!("scan-{i}.csv"), source.as_slice())?;
        }
        Ok(normalizer.finish())
    }

    fn finding(cells: [&str; 8]) -> FindingRow {
        FindingRow::from_cells(cells.map(String::from))
    }

    #[test]
    fn header_is_reshaped_to_eight_columns() {
        let snapshot = normalize_exports(&[export(&[])]).unwrap();
        assert_eq!(snapshot.rows(), &[FindingRow::header()]);
        assert_eq!(snapshot.findings().count(), 0);
        assert!(snapshot.hosts().is_empty());
    }

    #[test]
    fn host_without_identity_gets_empty_names() {
        let snapshot = normalize_exports(&[export(&[row(
            "51192", "7.2", "High", "10.0.0.1", "443", "Cert issue", "",
        )])])
        .unwrap();

        let findings: Vec<_> = snapshot.findings().cloned().collect();
        assert_eq!(
            findings,
            vec![finding(["7.2", "High", "10.0.0.1", "", "", "tcp", "443", "Cert issue"])]
        );
        assert_eq!(snapshot.hosts().len(), 1);
    }

    #[test]
    fn identity_is_spliced_into_every_row_of_the_host() {
        let snapshot = normalize_exports(&[export(&[
            row("51192", "7.2", "High", "10.0.0.1", "443", "Cert issue", ""),
            fqdn_row("10.0.0.1", "web.corp.lan"),
            dns_row("10.0.0.1", "www.corp.lan"),
            row("51192", "7.2", "High", "10.0.0.2", "443", "Cert issue", ""),
        ])])
        .unwrap();

        let rows = snapshot.rows();
        assert_eq!(rows.len(), 5);
        // Identity arrived after this row was read; the reshaping pass still sees it.
        assert_eq!(
            rows[1],
            finding(["7.2", "High", "10.0.0.1", "web.corp.lan ", "www.corp.lan ", "tcp", "443", "Cert issue"])
        );
        assert_eq!(rows[2].fqdn, "web.corp.lan ");
        assert!(rows[2].is_informational());
        assert_eq!(rows[4].fqdn, "");
        assert_eq!(rows[4].dns_names, "");
        assert_eq!(snapshot.hosts().fact_count(), 2);
    }

    #[test]
    fn later_identity_facts_are_prepended() {
        let first = fqdn_row("10.0.0.1", "a.lan");
        let mut second = fqdn_row("10.0.0.1", "b.lan");
        second[7] = "Host Fully Qualified Domain Name (FQDN) Resolution (2)".to_string();

        let snapshot = normalize_exports(&[export(&[first, second])]).unwrap();
        let host = snapshot.hosts().get("10.0.0.1").unwrap();
        assert_eq!(host.fqdn, "b.lan a.lan ");
        assert!(snapshot.findings().all(|r| r.fqdn == "b.lan a.lan "));
    }

    #[test]
    fn duplicate_rows_are_collapsed() {
        let finding_row = row("51192", "7.2", "High", "10.0.0.1", "443", "Cert issue", "a");
        let mut other_output = finding_row.clone();
        other_output[12] = "different output".to_string();

        let snapshot =
            normalize_exports(&[export(&[finding_row.clone(), finding_row, other_output])])
                .unwrap();
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn normalizing_twice_is_idempotent() {
        let source = export(&[
            fqdn_row("10.0.0.1", "web.lan"),
            row("51192", "7.2", "High", "10.0.0.1", "443", "Cert issue", ""),
            row("57582", "6.4", "Medium", "10.0.0.3", "22", "SSH weak", ""),
        ]);
        let a = normalize_exports(&[source.clone()]).unwrap();
        let b = normalize_exports(&[source]).unwrap();
        assert_eq!(a.rows(), b.rows());
    }

    #[test]
    fn duplicated_sources_match_single_source() {
        let source = export(&[
            fqdn_row("10.0.0.1", "web.lan"),
            dns_row("10.0.0.1", "www.lan"),
            row("51192", "7.2", "High", "10.0.0.1", "443", "Cert issue", ""),
        ]);
        let once = normalize_exports(&[source.clone()]).unwrap();
        let twice = normalize_exports(&[source.clone(), source]).unwrap();
        assert_eq!(once.rows(), twice.rows());
        assert_eq!(twice.hosts().get("10.0.0.1").unwrap().fqdn, "web.lan ");
    }

    #[test]
    fn sources_merge_into_one_snapshot() {
        let a = export(&[row("51192", "7.2", "High", "10.0.0.1", "443", "Cert issue", "")]);
        let b = export(&[
            row("57582", "6.4", "Medium", "10.0.0.2", "22", "SSH weak", ""),
            fqdn_row("10.0.0.1", "web.lan"),
        ]);
        let snapshot = normalize_exports(&[a, b]).unwrap();

        assert_eq!(snapshot.rows().iter().filter(|r| r.is_header()).count(), 1);
        assert_eq!(snapshot.findings().count(), 3);
        assert_eq!(snapshot.rows()[1].fqdn, "web.lan ");
    }

    #[test]
    fn short_record_aborts() {
        let mut data = export(&[]);
        data.extend_from_slice(b"1,2,3\n");
        let err = normalize_exports(&[data]).unwrap_err();
        assert!(matches!(err, CoreError::ShortRow { record: 2, found: 3, .. }));
    }

    #[test]
    fn truncated_plugin_output_aborts() {
        let mut broken = fqdn_row("10.0.0.1", "web.lan");
        broken[12] = "unresolvable".to_string();
        let err = normalize_exports(&[export(&[broken])]).unwrap_err();
        match err {
            CoreError::PluginOutput { plugin_id, token, record, .. } => {
                assert_eq!(plugin_id, "12053");
                assert_eq!(token, 3);
                assert_eq!(record, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn normalize_reads_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.csv");
        let mut file = File::create(&path).unwrap();
        file.write_all(&export(&[
            dns_row("10.0.0.9", "mail.lan"),
            row("51192", "5.0", "Medium", "10.0.0.9", "25", "SMTP issue", ""),
        ]))
        .unwrap();

        let snapshot = normalize(&[&path], &IdentityRules::default()).unwrap();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.rows()[2].dns_names, "mail.lan ");

        let missing = dir.path().join("missing.csv");
        let err = normalize(&[missing], &IdentityRules::default()).unwrap_err();
        assert!(matches!(err, CoreError::Open { .. }));
    }

    #[test]
    fn snapshot_from_rows_drops_repeats() {
        let row = finding(["5.0", "Medium", "10.0.0.1", "", "", "tcp", "80", "X"]);
        let mut snapshot =
            Snapshot::from_rows(vec![FindingRow::header(), row.clone(), row.clone()]);
        assert_eq!(snapshot.len(), 2);
        assert!(!snapshot.push(row));
        assert!(snapshot.push(finding(["9.8", "Critical", "10.0.0.2", "", "", "tcp", "443", "Y"])));
        assert_eq!(snapshot.len(), 3);
    }
}
