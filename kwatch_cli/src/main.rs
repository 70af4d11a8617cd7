mod commands;
mod output;
mod xml_output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use kwatch_lib::Settings;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "kwatch")]
#[command(about = "KOSPI/KOSDAQ watchlist with buy/sell timing signals and news sentiment")]
struct Cli {
    /// Output format: table, json, csv, markdown, xml
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Watchlist database file (defaults to KWATCH_DB or ./kwatch.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search stocks by name or code
    Search(commands::search::SearchArgs),
    /// Add a stock to the watchlist
    Add(commands::add::AddArgs),
    /// Remove a stock from the watchlist
    Remove(commands::remove::RemoveArgs),
    /// Set or clear the average purchase price of a watched stock
    AvgPrice(commands::avg_price::AvgPriceArgs),
    /// Show the watchlist with live prices and timing signals
    List,
    /// Latest quote for a stock
    Quote(commands::quote::QuoteArgs),
    /// One month of daily prices
    History(commands::history::HistoryArgs),
    /// Recent news classified by sentiment
    News(commands::news::NewsArgs),
    /// Full report: quote, timing signals, trend, news and outlook
    Show(commands::show::ShowArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("kwatch_lib=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::parse(&cli.output);

    let mut settings = Settings::from_env();
    if let Some(db) = cli.db {
        settings.db_path = db;
    }

    match &cli.command {
        Commands::Search(args) => commands::search::run(args, &settings, &format).await?,
        Commands::Add(args) => commands::add::run(args, &settings, &format).await?,
        Commands::Remove(args) => commands::remove::run(args, &settings)?,
        Commands::AvgPrice(args) => commands::avg_price::run(args, &settings, &format).await?,
        Commands::List => commands::list::run(&settings, &format).await?,
        Commands::Quote(args) => commands::quote::run(args, &settings, &format).await?,
        Commands::History(args) => commands::history::run(args, &settings, &format).await?,
        Commands::News(args) => commands::news::run(args, &settings, &format).await?,
        Commands::Show(args) => commands::show::run(args, &settings, &format).await?,
    }

    Ok(())
}
