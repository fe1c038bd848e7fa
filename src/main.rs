//! CLI entry point for the feedback reporter.
//!
//! Provides subcommands for sending one report now, running on a fixed
//! cadence, and previewing a report from a local CSV export.

use anyhow::Result;
use chrono::Utc;
use clap::builder::NonEmptyStringValueParser;
use clap::{Args, Parser, Subcommand};
use feedback_reporter::config::{DEFAULT_SUBJECT, ReportConfig};
use feedback_reporter::job::{decode_records, run_report};
use feedback_reporter::mail::{LogMailer, Mailer, SesMailer};
use feedback_reporter::report::ReportGenerator;
use feedback_reporter::store::{CsvFileStore, DynamoDbStore, RecordStore};
use feedback_reporter::window::ReportWindow;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "feedback_reporter")]
#[command(about = "Mails a periodic summary of user feedback", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and send one report for the window ending now
    Run {
        #[command(flatten)]
        report: ReportArgs,
    },
    /// Send a report every INTERVAL_SECS seconds
    Schedule {
        #[command(flatten)]
        report: ReportArgs,

        /// Seconds between runs
        #[arg(
            short = 'i',
            long,
            default_value_t = 604_800,
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        interval_secs: u64,

        /// Number of runs before exiting (0 = infinite)
        #[arg(short = 'n', long, default_value_t = 0)]
        runs: usize,
    },
    /// Print the report for a local CSV export without sending anything
    Preview {
        /// CSV file with id, description, rating, urgency, submitted_at columns
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Hours to look back from now
        #[arg(
            long,
            default_value_t = ReportWindow::DEFAULT_HOURS,
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        window_hours: u64,

        /// Explicit cutoff timestamp; overrides --window-hours
        #[arg(long)]
        since: Option<String>,
    },
}

#[derive(Args)]
struct ReportArgs {
    /// DynamoDB table holding the feedback records
    #[arg(long, env = "FEEDBACK_TABLE", value_parser = NonEmptyStringValueParser::new())]
    table: String,

    /// Sender address (must be verified in SES)
    #[arg(long, env = "REPORT_FROM")]
    from: String,

    /// Recipient addresses, comma separated
    #[arg(long, env = "REPORT_TO", value_delimiter = ',', required = true)]
    to: Vec<String>,

    /// Email subject line
    #[arg(long, env = "REPORT_SUBJECT", default_value = DEFAULT_SUBJECT)]
    subject: String,

    /// Hours of feedback each report covers
    #[arg(
        long,
        env = "REPORT_WINDOW_HOURS",
        default_value_t = ReportWindow::DEFAULT_HOURS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    window_hours: u64,

    /// Log the email instead of sending it through SES
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

impl ReportArgs {
    fn config(&self) -> Result<ReportConfig> {
        let config = ReportConfig::new(self.from.clone(), self.to.clone())
            .with_subject(self.subject.clone())
            .with_window(ReportWindow::from_hours(self.window_hours));
        config.validate()?;
        Ok(config)
    }
}

/// Store and mailer built from the ambient AWS configuration.
struct Collaborators {
    store: DynamoDbStore,
    mailer: Box<dyn Mailer>,
}

impl Collaborators {
    async fn from_args(args: &ReportArgs) -> Self {
        let aws = aws_config::load_from_env().await;
        let mailer: Box<dyn Mailer> = if args.dry_run {
            info!("Dry run enabled, reports will be logged instead of sent");
            Box::new(LogMailer)
        } else {
            Box::new(SesMailer::new(&aws))
        };

        Self {
            store: DynamoDbStore::new(&aws, args.table.clone()),
            mailer,
        }
    }
}

const DEFAULT_LOG_FILE: &str = "logs/feedback_reporter.log";

/// Splits `LOG_FILE_PATH` into the directory and file-name prefix the daily
/// appender expects, falling back to [`DEFAULT_LOG_FILE`] for missing parts.
fn log_file_location(path: &str) -> (PathBuf, OsString) {
    let path = Path::new(path);
    let default = Path::new(DEFAULT_LOG_FILE);

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => default.parent().unwrap_or(Path::new(".")),
    };
    let name = path
        .file_name()
        .or(default.file_name())
        .unwrap_or_default();

    (dir.to_path_buf(), name.to_os_string())
}

/// Installs a coloured stderr layer (`RUST_LOG`, default `info`) and a JSON
/// layer on a daily rolling file (`RUST_LOG_JSON`, default `debug`).
///
/// The returned guard flushes the file writer when dropped.
fn init_tracing() -> Result<WorkerGuard> {
    let log_file = std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_FILE.into());
    let (dir, name) = log_file_location(&log_file);
    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, name));

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_file = fmt::layer()
        .json()
        .with_writer(file_writer)
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(console)
        .with(json_file)
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _log_guard = init_tracing()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { report } => {
            let config = report.config()?;
            let collaborators = Collaborators::from_args(&report).await;

            let outcome = run_report(
                &collaborators.store,
                collaborators.mailer.as_ref(),
                &config,
                Utc::now(),
            )
            .await?;

            info!(
                cutoff = %outcome.cutoff,
                decoded = outcome.decoded,
                skipped = outcome.skipped,
                "Report run complete"
            );
        }
        Commands::Schedule {
            report,
            interval_secs,
            runs,
        } => {
            let config = report.config()?;
            let collaborators = Collaborators::from_args(&report).await;
            schedule(&collaborators, &config, interval_secs, runs).await;
        }
        Commands::Preview {
            file,
            window_hours,
            since,
        } => {
            let cutoff = since
                .unwrap_or_else(|| ReportWindow::from_hours(window_hours).cutoff_at(Utc::now()));
            let records = CsvFileStore::new(&file).records_since(&cutoff).await?;
            let (items, skipped) = decode_records(&records);

            info!(
                file = %file.display(),
                cutoff = %cutoff,
                decoded = items.len(),
                skipped,
                "Preview generated"
            );
            print!("{}", ReportGenerator::new().generate(&items));
        }
    }

    Ok(())
}

/// Runs the report on a fixed cadence. A failed run sends nothing and is
/// retried only by the next tick.
#[tracing::instrument(skip(collaborators, config))]
async fn schedule(
    collaborators: &Collaborators,
    config: &ReportConfig,
    interval_secs: u64,
    runs: usize,
) {
    if runs == 0 {
        info!(interval_secs, "Scheduling reports indefinitely. Press Ctrl+C to stop.");
    } else {
        info!(runs, interval_secs, "Scheduling reports");
    }

    let mut ticker = tokio::time::interval(tokio::time::Duration::from_secs(interval_secs));
    let mut run_count = 0;

    loop {
        if runs > 0 && run_count >= runs {
            break;
        }

        // First tick completes immediately
        ticker.tick().await;
        run_count += 1;

        match run_report(
            &collaborators.store,
            collaborators.mailer.as_ref(),
            config,
            Utc::now(),
        )
        .await
        {
            Ok(outcome) => info!(
                run = run_count,
                decoded = outcome.decoded,
                skipped = outcome.skipped,
                "Scheduled report sent"
            ),
            Err(e) => error!(run = run_count, error = %format!("{e:#}"), "Scheduled report failed"),
        }
    }

    info!(run_count, "Scheduler finished");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_location() {
        assert_eq!(
            log_file_location("/var/log/reporter/run.log"),
            (PathBuf::from("/var/log/reporter"), OsString::from("run.log"))
        );
    }

    #[test]
    fn test_log_file_location_bare_name_uses_default_dir() {
        assert_eq!(
            log_file_location("run.log"),
            (PathBuf::from("logs"), OsString::from("run.log"))
        );
    }

    #[test]
    fn test_log_file_location_without_file_name_uses_default_name() {
        assert_eq!(
            log_file_location("/"),
            (PathBuf::from("logs"), OsString::from("feedback_reporter.log"))
        );
    }

    #[test]
    fn test_preview_rejects_zero_window() {
        let args = |hours| ["feedback_reporter", "preview", "x.csv", "--window-hours", hours];

        assert!(Cli::try_parse_from(args("0")).is_err());
        assert!(Cli::try_parse_from(args("1")).is_ok());
    }
}
