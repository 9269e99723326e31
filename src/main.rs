use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{error, info, warn};

use senamhi_scraper::config::Config;
use senamhi_scraper::driver::HttpDriver;
use senamhi_scraper::models::{FlushOutcome, QueryModeKind, QueryParams, QueryRequest};
use senamhi_scraper::registry::StationRegistry;
use senamhi_scraper::session::{cancel_on_interrupt, Session};

#[derive(Debug, Parser)]
#[command(name = "senamhi-scraper", version, about = "Download station records as CSV")]
struct Cli {
    /// Station code, as listed in the station catalog
    #[arg(short, long)]
    station: String,

    /// Configuration file (defaults to ./senamhi.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// File name for consolidated output
    #[arg(short, long)]
    output: Option<String>,

    #[command(subcommand)]
    mode: ModeCommand,
}

#[derive(Debug, Subcommand)]
enum ModeCommand {
    /// A single month
    Month {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
    },
    /// Every month of one year
    Year {
        #[arg(long)]
        year: i32,
        /// Write a single file instead of one per month
        #[arg(long)]
        consolidated: bool,
    },
    /// Every month of a range of years, both ends included
    Period {
        #[arg(long)]
        start: i32,
        #[arg(long)]
        end: i32,
        /// Write a single file instead of one per month
        #[arg(long)]
        consolidated: bool,
    },
}

impl Cli {
    fn query_params(&self) -> QueryParams {
        let (mode, start_year, month, end_year, consolidated) = match self.mode {
            ModeCommand::Month { year, month } => (QueryModeKind::Month, year, Some(month), None, false),
            ModeCommand::Year { year, consolidated } => (QueryModeKind::Year, year, None, None, consolidated),
            ModeCommand::Period {
                start,
                end,
                consolidated,
            } => (QueryModeKind::Period, start, None, Some(end), consolidated),
        };

        QueryParams {
            mode,
            start_year,
            month,
            end_year,
            consolidated,
            output_filename: self.output.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("senamhi_scraper=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load_from(cli.config.as_deref()).context("Failed to load configuration")?;

    let registry = StationRegistry::load(&config.stations_file)
        .context("Failed to load station catalog")?;
    let station = registry.find(&cli.station)?;
    info!("Station found: {}", station);

    let request = QueryRequest::from_params(cli.query_params())?;
    info!(
        "Starting {} query for {} at {}",
        request.mode.kind(),
        station.name,
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if cancel_on_interrupt(&cancel, tokio::signal::ctrl_c).await {
                error!("Second interrupt received, aborting");
                std::process::exit(130);
            }
        });
    }

    let mut driver = HttpDriver::new(&config, station)?;
    let mut session = Session::new(station, request, &config);
    info!("Writing output to {}", session.output_dir().display());
    let report = session.run(&mut driver, &cancel).await?;

    if report.total() == 0 {
        error!("No period options matched the requested dates");
        anyhow::bail!("no period options matched");
    }

    for outcome in report.outcomes.iter().filter(|o| !o.success) {
        warn!(
            "Period {} failed: {}",
            outcome.value,
            outcome.error.as_deref().unwrap_or("unknown error")
        );
    }

    match &report.flush {
        Some(FlushOutcome::Saved { path, lines }) => {
            info!("Consolidated file {} ({} lines)", path.display(), lines)
        }
        Some(FlushOutcome::NoData) => warn!("No data collected, consolidated file not written"),
        Some(FlushOutcome::Failed { path, error }) => {
            error!("Consolidated file {} not written: {}", path.display(), error)
        }
        None => {}
    }

    info!(
        "Process completed: {} periods processed successfully, {} rows, {} files",
        report,
        report.rows(),
        report.files().len()
    );

    Ok(())
}
