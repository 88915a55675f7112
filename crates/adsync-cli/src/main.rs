use std::process::ExitCode;

use adsync_core::{DateRange, DateRangeError};
use adsync_storage::PgStore;
use adsync_sync::{ConfigError, SyncConfig, SyncPipeline};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "adsync")]
#[command(about = "Sync Google Ads performance data into Supabase")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    dates: DateArgs,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply the bundled SQL migrations to DATABASE_URL.
    Migrate,
}

#[derive(Debug, Default, Args)]
struct DateArgs {
    /// Single date to sync (YYYY-MM-DD). Defaults to yesterday.
    #[arg(long, conflicts_with_all = ["date_from", "date_to"])]
    date: Option<NaiveDate>,

    /// Start of date range (YYYY-MM-DD).
    #[arg(long)]
    date_from: Option<NaiveDate>,

    /// End of date range (YYYY-MM-DD). Requires --date-from.
    #[arg(long, requires = "date_from")]
    date_to: Option<NaiveDate>,
}

impl DateArgs {
    fn range(&self, now: DateTime<Utc>) -> Result<DateRange, DateRangeError> {
        match (self.date, self.date_from) {
            (Some(day), _) => Ok(DateRange::single(day)),
            (None, Some(from)) => DateRange::new(from, self.date_to.unwrap_or(from)),
            (None, None) => Ok(DateRange::yesterday(now)),
        }
    }
}

fn load_env_files() {
    dotenvy::dotenv().ok();
    dotenvy::from_filename_override(".env.local").ok();
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("ADSYNC_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

async fn migrate() -> Result<ExitCode> {
    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
    let store = PgStore::connect(&database_url)
        .await
        .context("connecting to DATABASE_URL")?;
    store.migrate().await.context("applying migrations")?;
    Ok(ExitCode::SUCCESS)
}

async fn sync(range: DateRange) -> Result<ExitCode> {
    let config = SyncConfig::from_env().context("loading configuration")?;
    let pipeline = SyncPipeline::from_config(&config).await?;
    info!(%range, "starting google ads sync");

    let summary = pipeline.run(range).await;
    info!(
        run_id = %summary.run_id,
        status = %summary.status,
        records_synced = summary.records_synced,
        "sync finished"
    );
    Ok(ExitCode::from(summary.exit_code()))
}

#[tokio::main]
async fn main() -> ExitCode {
    load_env_files();
    init_tracing();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Some(Commands::Migrate) => migrate().await,
        None => {
            let range = match cli.dates.range(Utc::now()) {
                Ok(range) => range,
                Err(err) => Cli::command()
                    .error(ErrorKind::ValueValidation, err)
                    .exit(),
            };
            sync(range).await
        }
    };

    match outcome {
        Ok(code) => code,
        Err(err) => {
            error!(error = %format!("{err:#}"), "adsync failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 18, 6, 0, 0).single().unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_flags_means_yesterday() {
        let cli = Cli::try_parse_from(["adsync"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.dates.range(now()).unwrap(), DateRange::single(date("2026-02-17")));
    }

    #[test]
    fn single_date_and_open_ended_range() {
        let cli = Cli::try_parse_from(["adsync", "--date", "2026-02-10"]).unwrap();
        assert_eq!(cli.dates.range(now()).unwrap(), DateRange::single(date("2026-02-10")));

        let cli = Cli::try_parse_from(["adsync", "--date-from", "2026-02-01"]).unwrap();
        assert_eq!(cli.dates.range(now()).unwrap(), DateRange::single(date("2026-02-01")));

        let cli = Cli::try_parse_from([
            "adsync",
            "--date-from",
            "2026-02-01",
            "--date-to",
            "2026-02-07",
        ])
        .unwrap();
        let range = cli.dates.range(now()).unwrap();
        assert_eq!((range.from, range.to), (date("2026-02-01"), date("2026-02-07")));
    }

    #[test]
    fn invalid_flag_combinations_are_rejected() {
        assert!(Cli::try_parse_from(["adsync", "--date-to", "2026-02-07"]).is_err());
        assert!(Cli::try_parse_from([
            "adsync",
            "--date",
            "2026-02-07",
            "--date-from",
            "2026-02-01"
        ])
        .is_err());
        assert!(Cli::try_parse_from(["adsync", "--date", "02/07/2026"]).is_err());

        let cli = Cli::try_parse_from([
            "adsync",
            "--date-from",
            "2026-02-07",
            "--date-to",
            "2026-02-01",
        ])
        .unwrap();
        assert!(cli.dates.range(now()).is_err());
    }

    #[test]
    fn migrate_subcommand_parses() {
        let cli = Cli::try_parse_from(["adsync", "migrate"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Migrate)));
    }
}
