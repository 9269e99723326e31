use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use senamhi_scraper::catalog::PeriodCatalog;
use senamhi_scraper::parsers::{SelectLocator, TableNormalizer};

/// Run the parsers over saved HTML snapshots of the station map.
#[derive(Debug, Parser)]
#[command(name = "inspect-html")]
struct Args {
    /// Saved page or fragment containing the period <select>
    select: PathBuf,

    /// Id of the select to read; the first select when omitted
    #[arg(long)]
    select_id: Option<String>,

    /// Saved data table to normalize
    #[arg(long)]
    table: Option<PathBuf>,

    /// Table rows to skip before the data
    #[arg(long, default_value_t = 0)]
    start_line: usize,

    #[arg(long, default_value = ";")]
    separator: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("senamhi_scraper=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let html = fs::read_to_string(&args.select)
        .with_context(|| format!("Failed to read {}", args.select.display()))?;
    let locator = match args.select_id {
        Some(id) => SelectLocator::Id(id),
        None => SelectLocator::First,
    };
    let catalog = PeriodCatalog::from_select_html(&html, &locator)?;

    println!("Found {} options", catalog.options().len());
    for option in catalog.options() {
        let marker = match option.period() {
            Some(_) => "ok",
            None => "--",
        };
        println!("  [{}] {:>8} {}", marker, option.value, option.label);
    }
    println!("Available years: {:?}", catalog.available_years());

    if let Some(table_path) = args.table {
        let table = fs::read_to_string(&table_path)
            .with_context(|| format!("Failed to read {}", table_path.display()))?;
        let normalizer = TableNormalizer::new(args.separator, args.start_line);
        let rows = normalizer.normalize_rows(&table);
        println!("\n{} rows from {}", rows.len(), table_path.display());
        for row in rows {
            println!("{}", row.join(normalizer.separator()));
        }
    }

    Ok(())
}
