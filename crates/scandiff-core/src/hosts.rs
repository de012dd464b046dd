//! Per-host identity accumulation.
//!
//! While one snapshot is read, every host IP gets an identity record.
//! Identity-bearing findings add to the record's FQDN or DNS-names text.
//! New text is prepended to what has already accumulated, so the most
//! recently seen name comes first. Every name is followed by a single
//! space, including the last one, so the text matches what earlier
//! reports carry byte for byte.

use std::collections::HashMap;

/// Accumulated naming facts for one host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostIdentity {
    pub fqdn: String,
    pub dns_names: String,
}

/// Maps a host IP to its accumulated identity.
///
/// Created fresh for each snapshot; records are never removed.
#[derive(Debug, Default)]
pub struct HostDirectory {
    hosts: HashMap<String, HostIdentity>,
    facts: usize,
}

impl HostDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the record for `ip`, registering an empty one on first sight.
    pub fn get_or_create(&mut self, ip: &str) -> &mut HostIdentity {
        self.hosts.entry(ip.to_string()).or_default()
    }

    pub fn get(&self, ip: &str) -> Option<&HostIdentity> {
        self.hosts.get(ip)
    }

    /// Prepend a resolved hostname to the host's FQDN text.
    pub fn record_hostname_fact(&mut self, ip: &str, text: &str) {
        prepend(&mut self.get_or_create(ip).fqdn, text);
        self.facts += 1;
        tracing::trace!(ip, hostname = text, "Hostname fact recorded");
    }

    /// Prepend an additional DNS name to the host's DNS-names text.
    pub fn record_dns_fact(&mut self, ip: &str, text: &str) {
        prepend(&mut self.get_or_create(ip).dns_names, text);
        self.facts += 1;
        tracing::trace!(ip, dns_name = text, "DNS fact recorded");
    }

    /// Number of distinct hosts seen.
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Number of identity facts applied so far.
    pub fn fact_count(&self) -> usize {
        self.facts
    }
}

fn prepend(acc: &mut String, text: &str) {
    acc.insert_str(0, &format!("{text} "));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_or_create_registers_empty_record() {
        let mut dir = HostDirectory::new();
        assert!(dir.get("10.0.0.1").is_none());

        let host = dir.get_or_create("10.0.0.1");
        assert_eq!(*host, HostIdentity::default());
        assert_eq!(dir.len(), 1);

        dir.get_or_create("10.0.0.1");
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.fact_count(), 0);
    }

    #[test]
    fn hostname_facts_are_prepended() {
        let mut dir = HostDirectory::new();
        dir.record_hostname_fact("10.0.0.1", "first.lan");
        dir.record_hostname_fact("10.0.0.1", "second.lan");

        let host = dir.get("10.0.0.1").unwrap();
        assert_eq!(host.fqdn, "second.lan first.lan ");
        assert_eq!(host.dns_names, "");
        assert_eq!(dir.fact_count(), 2);
    }

    #[test]
    fn dns_facts_accumulate_separately() {
        let mut dir = HostDirectory::new();
        dir.record_hostname_fact("10.0.0.1", "web.lan");
        dir.record_dns_fact("10.0.0.1", "www.lan");
        dir.record_dns_fact("10.0.0.1", "api.lan");
        dir.record_dns_fact("10.0.0.2", "db.lan");

        assert_eq!(dir.get("10.0.0.1").unwrap().fqdn, "web.lan ");
        assert_eq!(dir.get("10.0.0.1").unwrap().dns_names, "api.lan www.lan ");
        assert_eq!(dir.get("10.0.0.2").unwrap().dns_names, "db.lan ");
        assert_eq!(dir.get("10.0.0.2").unwrap().fqdn, "");
        assert_eq!(dir.len(), 2);
    }

    #[test]
    fn single_fact_keeps_trailing_separator() {
        let mut dir = HostDirectory::new();
        dir.record_hostname_fact("10.0.0.1", "web.lan");
        assert_eq!(dir.get("10.0.0.1").unwrap().fqdn, "web.lan ");
    }
}
