//! The comparison run: normalize → compare → render.
//!
//! All state of one run lives in a [`RunContext`] created per invocation;
//! nothing is shared between runs.

use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;

use scandiff_core::compare::{
    compare_hosts, compare_snapshots, DeltaSummary, HostDelta, SnapshotDelta,
};
use scandiff_core::config::IdentityRules;
use scandiff_core::{normalize, FindingRow, SheetRow, Snapshot};
use scandiff_report::{read_prior_report, ReportSink, Section, XlsxSink};

use crate::config::ReportConfig;

/// Printed when the invocation names no current exports.
pub const NOTHING_TO_DO: &str =
    "No new csv files specified, so I'm not doing anything. Use -h to show some options";

/// What to compare and how.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Exports making up the current snapshot.
    pub current: Vec<PathBuf>,
    /// Exports making up the previous snapshot.
    pub previous: Vec<PathBuf>,
    /// An earlier report whose current results join the previous snapshot.
    pub prior_report: Option<PathBuf>,
    /// Compare host inventories as well as findings.
    pub check_hosts: bool,
    pub identity: IdentityRules,
}

/// Outcome of a run, printed with `--json`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub output: Option<String>,
    pub current_sources: usize,
    pub previous_sources: usize,
    pub prior_report: Option<String>,
    pub sections: Vec<String>,
    pub delta: Option<DeltaSummary>,
}

/// Run-scoped pipeline state.
pub struct RunContext<'o> {
    options: &'o RunOptions,
    current: Snapshot,
    previous: Option<Snapshot>,
    delta: Option<SnapshotDelta>,
    hosts: Option<HostDelta>,
    sections: Vec<Section>,
}

impl<'o> RunContext<'o> {
    /// Normalize the current exports.
    pub fn load_current(options: &'o RunOptions) -> anyhow::Result<Self> {
        if options.current.is_empty() {
            anyhow::bail!("No current scan exports given");
        }

        let current = normalize(&options.current, &options.identity)
            .context("Failed to normalize current scan exports")?;

        Ok(Self {
            options,
            current,
            previous: None,
            delta: None,
            hosts: None,
            sections: Vec::new(),
        })
    }

    /// Normalize the previous exports and merge in the prior report, if any.
    ///
    /// Leaves the previous snapshot unset when neither was given.
    pub fn load_previous(&mut self) -> anyhow::Result<()> {
        let mut previous = if self.options.previous.is_empty() {
            None
        } else {
            Some(
                normalize(&self.options.previous, &self.options.identity)
                    .context("Failed to normalize previous scan exports")?,
            )
        };

        if let Some(path) = &self.options.prior_report {
            let rows = read_prior_report(path)
                .with_context(|| format!("Failed to read prior report {}", path.display()))?;
            previous.get_or_insert_with(Snapshot::default).extend(rows);
        }

        self.previous = previous;
        Ok(())
    }

    /// Compute finding deltas, and host deltas when requested.
    pub fn compare(&mut self) {
        let Some(previous) = &self.previous else {
            if self.options.check_hosts {
                tracing::warn!("Host check requested without a previous snapshot, skipping");
            }
            return;
        };

        self.delta = Some(compare_snapshots(self.current.rows(), previous.rows()));

        if self.options.check_hosts {
            if !has_identity(self.current.rows()) && !has_identity(previous.rows()) {
                tracing::warn!(
                    "No host names found in either snapshot; informational findings may be missing"
                );
            }
            self.hosts = Some(compare_hosts(self.current.rows(), previous.rows()));
        }
    }

    /// Render every section the run produced, in workbook order.
    pub fn render<S: ReportSink>(&mut self, sink: &mut S) -> anyhow::Result<()> {
        let mut sections = Vec::new();
        write_section(sink, &mut sections, Section::CurrentResults, self.current.rows())?;

        if let Some(previous) = &self.previous {
            write_section(sink, &mut sections, Section::PreviousResults, previous.rows())?;
        }

        if let Some(delta) = &self.delta {
            write_section(sink, &mut sections, Section::NewIssues, &delta.newly_added)?;
            write_section(sink, &mut sections, Section::FixedIssues, &delta.newly_fixed)?;
        }

        if let Some(hosts) = &self.hosts {
            write_section(sink, &mut sections, Section::HostOverview, &hosts.host_overview)?;
            write_section(sink, &mut sections, Section::NewHosts, &hosts.new_hosts)?;
            write_section(
                sink,
                &mut sections,
                Section::DisappearedHosts,
                &hosts.disappeared_hosts,
            )?;
        }

        self.sections = sections;
        Ok(())
    }

    pub fn summary(&self) -> RunSummary {
        let delta = match (&self.previous, &self.delta) {
            (Some(previous), Some(delta)) => Some(DeltaSummary::new(
                self.current.rows(),
                previous.rows(),
                delta,
                self.hosts.as_ref(),
            )),
            _ => None,
        };

        RunSummary {
            output: None,
            current_sources: self.options.current.len(),
            previous_sources: self.options.previous.len(),
            prior_report: self
                .options
                .prior_report
                .as_ref()
                .map(|p| p.display().to_string()),
            sections: self.sections.iter().map(|s| s.name().to_string()).collect(),
            delta,
        }
    }
}

fn write_section<S: ReportSink, R: SheetRow>(
    sink: &mut S,
    written: &mut Vec<Section>,
    section: Section,
    rows: &[R],
) -> anyhow::Result<()> {
    let count = sink
        .write_section(section, rows)
        .with_context(|| format!("Failed to write section \"{section}\""))?;
    tracing::debug!(section = %section, rows = count, "Section rendered");
    written.push(section);
    Ok(())
}

fn has_identity(rows: &[FindingRow]) -> bool {
    rows.iter()
        .filter(|r| !r.is_header())
        .any(|r| !r.fqdn.is_empty() || !r.dns_names.is_empty())
}

/// Execute a full run against `sink`.
///
/// Nothing is rendered unless every input was read successfully.
pub fn run<S: ReportSink>(options: &RunOptions, sink: &mut S) -> anyhow::Result<RunSummary> {
    let mut ctx = RunContext::load_current(options)?;
    ctx.load_previous()?;
    ctx.compare();
    ctx.render(sink)?;

    let summary = ctx.summary();
    if let Some(delta) = &summary.delta {
        tracing::info!(
            new = delta.new_count,
            fixed = delta.fixed_count,
            new_hosts = ?delta.new_host_count,
            disappeared_hosts = ?delta.disappeared_host_count,
            "Comparison complete"
        );
    } else {
        tracing::info!(
            findings = ctx.current.findings().count(),
            "No previous snapshot given, only current results rendered"
        );
    }
    Ok(summary)
}

/// One command-line invocation, before it is merged with the configuration.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    pub current: Vec<PathBuf>,
    pub previous: Vec<PathBuf>,
    pub prior_report: Option<PathBuf>,
    pub include_informational: bool,
    pub check_hosts: bool,
    /// Replaces the configured output directory.
    pub output_dir: Option<String>,
}

/// What an invocation produced.
#[derive(Debug)]
pub enum Outcome {
    /// No current exports were named; an empty workbook was saved here.
    Idle(PathBuf),
    Completed(RunSummary),
}

/// Merge `invocation` into `config`, run, and save the dated workbook.
///
/// Switches given on the command line turn options on; they never turn
/// off what the configuration enables.
pub fn execute(
    invocation: Invocation,
    mut config: ReportConfig,
    now: DateTime<Utc>,
) -> anyhow::Result<Outcome> {
    if let Some(dir) = invocation.output_dir {
        config.output_dir = dir;
    }
    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("Cannot create output directory {}", config.output_dir))?;

    let include_informational = invocation.include_informational || config.include_informational;
    let mut sink = XlsxSink::new(config.output_path(now), include_informational);

    if invocation.current.is_empty() {
        let saved = sink.finish()?;
        return Ok(Outcome::Idle(saved));
    }

    let options = RunOptions {
        current: invocation.current,
        previous: invocation.previous,
        prior_report: invocation.prior_report,
        check_hosts: invocation.check_hosts || config.check_hosts,
        identity: config.identity,
    };

    let mut summary = run(&options, &mut sink)?;
    let saved = sink.finish()?;
    summary.output = Some(saved.display().to_string());
    Ok(Outcome::Completed(summary))
}
