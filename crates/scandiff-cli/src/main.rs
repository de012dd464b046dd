//! CLI entry point for the scandiff report generator.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use scandiff_cli::config::ReportConfig;
use scandiff_cli::pipeline::{self, Invocation, Outcome};

#[derive(Parser)]
#[command(name = "scandiff")]
#[command(
    about = "Parses vulnerability scan CSV exports and compares two scans (or a previous report) to find new and fixed issues"
)]
struct Cli {
    /// The new or current CSV exports.
    #[arg(long = "new", value_name = "NEW_CSV", num_args = 1..)]
    new: Vec<PathBuf>,

    /// The old CSV exports.
    #[arg(long = "old", value_name = "OLD_CSV", num_args = 1..)]
    old: Vec<PathBuf>,

    /// A previous report made with this tool.
    #[arg(long, value_name = "OLD_XLSX")]
    excel: Option<PathBuf>,

    /// Also process informational/none issues.
    #[arg(long)]
    info: bool,

    /// Check for new or disappeared hosts since the previous scan.
    /// Only works when the previous input contains informational issues.
    #[arg(long)]
    check: bool,

    /// Directory for the report (overrides config).
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Print a JSON run summary to stdout.
    #[arg(long)]
    json: bool,

    /// Config file prefix (default: scandiff).
    #[arg(short, long, default_value = "scandiff")]
    config: String,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .json()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let report_config = load_report_config(&cli.config)?;

    let invocation = Invocation {
        current: cli.new,
        previous: cli.old,
        prior_report: cli.excel,
        include_informational: cli.info,
        check_hosts: cli.check,
        output_dir: cli.output_dir,
    };

    match pipeline::execute(invocation, report_config, chrono::Utc::now())? {
        Outcome::Idle(_) => println!("{}", pipeline::NOTHING_TO_DO),
        Outcome::Completed(summary) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
        }
    }

    Ok(())
}

fn load_report_config(file_prefix: &str) -> anyhow::Result<ReportConfig> {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("SCANDIFF")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    match cfg.get::<ReportConfig>("report") {
        Ok(c) => Ok(c),
        Err(config::ConfigError::NotFound(_)) => Ok(ReportConfig::default()),
        Err(e) => Err(e).context("Invalid [report] configuration"),
    }
}
