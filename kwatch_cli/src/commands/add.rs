use anyhow::Result;
use clap::Args;
use kwatch_lib::directory::ListedStock;
use kwatch_lib::validation;
use kwatch_lib::{Settings, WatchlistItem};

use crate::output::{build_item_rows, print_json, print_rows, print_xml, OutputFormat};
use crate::xml_output;

#[derive(Args)]
pub struct AddArgs {
    /// 5-6 digit KRX code
    pub code: String,

    /// Market: kospi (ks) or kosdaq (kq). Looked up when omitted.
    #[arg(long)]
    pub market: Option<String>,

    /// Display name. Looked up when omitted.
    #[arg(long)]
    pub name: Option<String>,
}

pub async fn run(args: &AddArgs, settings: &Settings, format: &OutputFormat) -> Result<()> {
    let code = validation::validate_code(&args.code)?;
    let market = args
        .market
        .as_deref()
        .map(validation::validate_market)
        .transpose()?;
    let name = args
        .name
        .as_deref()
        .map(validation::validate_search)
        .transpose()?;

    let stock = match (name, market) {
        (Some(name), Some(market)) => ListedStock { code, name, market },
        (name, market) => {
            let mut found = super::searcher(settings)?.resolve(&code, market).await?;
            if let Some(name) = name {
                found.name = name;
            }
            found
        }
    };

    let db = super::open_db(settings)?;
    let item = WatchlistItem::new(&stock.code, &stock.name, stock.market);
    if db.add_item(&item)? {
        eprintln!("Added {} {} ({})", item.code, item.name, item.market);
    } else {
        eprintln!("{} is already on the watchlist", item.code);
    }

    let stored: Vec<WatchlistItem> = db.get_item(&item.code)?.into_iter().collect();
    match format {
        OutputFormat::Json => print_json(&stored),
        OutputFormat::Xml => print_xml(xml_output::watchlist_to_xml(&stored))?,
        _ => print_rows(&build_item_rows(&stored), format)?,
    }

    Ok(())
}
