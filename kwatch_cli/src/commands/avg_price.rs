use anyhow::{bail, Result};
use clap::Args;
use kwatch_lib::validation;
use kwatch_lib::{ReportBuilder, Settings};

use crate::output::{build_watch_rows, print_json, print_rows, print_xml, OutputFormat};
use crate::xml_output;

#[derive(Args)]
pub struct AvgPriceArgs {
    /// 5-6 digit KRX code of a watched stock
    pub code: String,

    /// Average purchase price in won; thousands separators allowed (e.g. 65,000)
    #[arg(conflicts_with = "clear")]
    pub price: Option<String>,

    /// Remove the recorded average price
    #[arg(long)]
    pub clear: bool,
}

pub async fn run(args: &AvgPriceArgs, settings: &Settings, format: &OutputFormat) -> Result<()> {
    let code = validation::validate_code(&args.code)?;
    let avg_price = match (&args.price, args.clear) {
        (Some(price), _) => Some(validation::validate_avg_price(price)?),
        (None, true) => None,
        (None, false) => bail!("provide a price or --clear"),
    };

    let db = super::open_db(settings)?;
    if !db.set_avg_price(&code, avg_price)? {
        bail!("{} is not on the watchlist; add it first", code);
    }
    let Some(item) = db.get_item(&code)? else {
        bail!("{} disappeared from the watchlist", code);
    };

    match avg_price {
        Some(price) => eprintln!("Set average price of {} to {}", code, price),
        None => eprintln!("Cleared average price of {}", code),
    }

    let builder = ReportBuilder::new(settings.chart_client(), settings.news_client()?);
    let summaries = vec![builder.summary(&item).await];

    match format {
        OutputFormat::Json => print_json(&summaries),
        OutputFormat::Xml => print_xml(xml_output::summaries_to_xml(&summaries))?,
        _ => print_rows(&build_watch_rows(&summaries), format)?,
    }

    Ok(())
}
