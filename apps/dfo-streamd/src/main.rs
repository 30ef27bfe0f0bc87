mod input;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dfo_batch::{BatchReport, BatchSummary, BatchTracker, TrackerConfig};
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    Kinesis,
    Jsonl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "dfo-streamd")]
#[command(about = "Decode a stream event batch and print its partial-failure report")]
struct Cli {
    /// Batch document to read; `-` reads stdin.
    #[arg(long, default_value = "-")]
    input: PathBuf,
    #[arg(long, value_enum, default_value_t = InputFormat::Kinesis)]
    format: InputFormat,
    #[arg(long, default_value_t = 8)]
    concurrency: usize,
    /// Accept events published for the placeholder tenant `0`.
    #[arg(long)]
    allow_placeholder_tenant: bool,
    /// Fail records whose object or type is not a known name.
    #[arg(long)]
    require_classification: bool,
    /// Used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

impl Cli {
    fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            concurrency: self.concurrency,
            reject_placeholder_tenant: !self.allow_placeholder_tenant,
            require_classification: self.require_classification,
        }
    }
}

fn init_tracing(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match cli.log_format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut raw = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut raw)
            .await
            .context("failed to read batch from stdin")?;
        return Ok(raw);
    }
    tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read batch from {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let raw = read_input(&cli.input).await?;
    let records = match cli.format {
        InputFormat::Kinesis => input::kinesis_records(&raw)?,
        InputFormat::Jsonl => input::jsonl_records(&raw),
    };

    let tracker = BatchTracker::new(cli.tracker_config());
    info!(
        records = records.len(),
        checks = ?tracker.check_names(),
        "batch received"
    );
    let outcomes = tracker.process_batch_concurrent(records).await;
    let summary = BatchSummary::from_outcomes(&outcomes);
    let report = BatchReport::from_outcomes(&outcomes);
    info!(
        failed = summary.failed(),
        total = summary.total,
        "batch report ready"
    );

    println!(
        "{}",
        serde_json::to_string(&report).context("failed to encode batch report")?
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["dfo-streamd"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("-"));
        assert_eq!(cli.format, InputFormat::Kinesis);
        assert_eq!(cli.log_format, LogFormat::Compact);
        let config = cli.tracker_config();
        assert_eq!(config.concurrency, 8);
        assert!(config.reject_placeholder_tenant);
        assert!(!config.require_classification);
    }

    #[test]
    fn cli_overrides() {
        let cli = Cli::try_parse_from([
            "dfo-streamd",
            "--input",
            "batch.jsonl",
            "--format",
            "jsonl",
            "--concurrency",
            "2",
            "--allow-placeholder-tenant",
            "--require-classification",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.format, InputFormat::Jsonl);
        assert_eq!(cli.log_format, LogFormat::Json);
        let config = cli.tracker_config();
        assert_eq!(config.concurrency, 2);
        assert!(!config.reject_placeholder_tenant);
        assert!(config.require_classification);
    }

    #[tokio::test]
    async fn jsonl_batch_reports_failed_lines() {
        let raw = concat!(
            r#"{"eventId":"a","createdAt":"2023-05-01T12:00:00Z","data":{"brand":{"tenantId":"t-1"}}}"#,
            "\n",
            r#"{"eventId":"b"}"#,
            "\n",
            r#"{"eventId":"c","createdAt":{"seconds":1682942400},"data":{"brand":{"tenantId":"0"}}}"#,
            "\n",
        );
        let records = input::jsonl_records(raw.as_bytes());
        let tracker = BatchTracker::new(TrackerConfig::new());
        let outcomes = tracker.process_batch_concurrent(records).await;
        let report = serde_json::to_string(&BatchReport::from_outcomes(&outcomes)).unwrap();
        assert_eq!(
            report,
            r#"{"batchItemFailures":[{"itemIdentifier":"2"},{"itemIdentifier":"3"}]}"#
        );
    }
}
