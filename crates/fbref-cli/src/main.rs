use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fbref_acquire::config::{
    DEFAULT_LEAGUE_TIMEOUT_SECS, DEFAULT_LEAGUE_URL, DEFAULT_OUTPUT, DEFAULT_TEAM_DELAY_MS,
    DEFAULT_TEAM_TIMEOUT_SECS,
};
use fbref_acquire::{output, BrowserSession, HttpSource, RunReport, ScrapeConfig, ScrapeError, SourceKind};

#[derive(Parser)]
#[command(name = "fbref")]
#[command(about = "Scrape per-team stats tables from fbref into a single CSV")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long, global = true)]
    utc: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the league page, every team page, and write the combined CSV
    Scrape(ScrapeArgs),

    /// Check a previously written stats CSV for missing teams and ragged rows
    Validate {
        /// Path to the CSV file
        file: String,
    },
}

#[derive(Args)]
struct ScrapeArgs {
    /// League stats page listing every team
    #[arg(long, default_value = DEFAULT_LEAGUE_URL)]
    league_url: String,

    /// Output CSV path
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// How pages are fetched
    #[arg(long, value_enum, default_value = "browser")]
    source: SourceArg,

    /// Show the browser window instead of running headless
    #[arg(long)]
    headful: bool,

    /// Chrome/Chromium executable (auto-detected when omitted)
    #[arg(long)]
    chrome: Option<PathBuf>,

    /// Max seconds to wait for the league page to show a table
    #[arg(long, default_value_t = DEFAULT_LEAGUE_TIMEOUT_SECS)]
    league_timeout: u64,

    /// Max seconds to wait for each team page to show a table
    #[arg(long, default_value_t = DEFAULT_TEAM_TIMEOUT_SECS)]
    team_timeout: u64,

    /// Pause between team pages, in milliseconds
    #[arg(long, default_value_t = DEFAULT_TEAM_DELAY_MS)]
    delay_ms: u64,

    /// Save the raw HTML of every fetched page here
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Write a JSON run report here
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum SourceArg {
    /// Headless Chromium (runs page scripts)
    Browser,
    /// Plain HTTP (no scripts; faster, may miss script-built tables)
    Http,
}

impl ScrapeArgs {
    fn to_config(&self) -> ScrapeConfig {
        ScrapeConfig {
            league_url: self.league_url.clone(),
            output: self.output.clone(),
            source: match self.source {
                SourceArg::Browser => SourceKind::Browser,
                SourceArg::Http => SourceKind::Http,
            },
            headless: !self.headful,
            chrome_executable: self.chrome.clone(),
            league_timeout: Duration::from_secs(self.league_timeout),
            team_timeout: Duration::from_secs(self.team_timeout),
            team_delay: Duration::from_millis(self.delay_ms),
            cache_dir: self.cache_dir.clone(),
            ..ScrapeConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Map log level, suppressing noisy HTML-parsing and CDP crates at debug/trace
    let level = match cli.log_level {
        LogLevel::Error => "error",
        LogLevel::Warn  => "warn",
        LogLevel::Info  => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn,chromiumoxide=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn,chromiumoxide=info",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    if cli.utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format.to_string()))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format.to_string()))
            .init();
    }

    match cli.command {
        Commands::Scrape(args) => {
            let config = args.to_config();
            match scrape(&config).await {
                Ok(report) => {
                    if let Some(path) = &args.report {
                        output::write_json(&report, path)?;
                    }
                }
                Err(ScrapeError::LeagueTableNotFound { url, snippet }) => {
                    tracing::error!(
                        url = %url,
                        "No tables found. The page might still be blocked or structure changed."
                    );
                    tracing::error!("First 500 chars of response:\n{snippet}");
                    std::process::exit(1);
                }
                Err(e) => return Err(anyhow::Error::new(e).context("Scrape failed")),
            }
        }
        Commands::Validate { file } => {
            tracing::info!(file = %file, "Validating");
            let findings = fbref_validate::validate_csv(&file)?;
            if !findings.is_empty() {
                anyhow::bail!("{} validation findings in {file}", findings.len());
            }
            tracing::info!("Stats CSV is consistent");
        }
    }

    Ok(())
}

/// Run the pipeline on the configured page source.
async fn scrape(config: &ScrapeConfig) -> Result<RunReport, ScrapeError> {
    match config.source {
        SourceKind::Browser => {
            tracing::info!("Setting up Chrome driver");
            let session = BrowserSession::launch(config).await?;
            fbref_acquire::run_and_close(session, config).await
        }
        SourceKind::Http => {
            tracing::info!("Using plain HTTP page source");
            let source = HttpSource::new(&config.user_agent, config.league_timeout)?;
            fbref_acquire::run_and_close(source, config).await
        }
    }
}
