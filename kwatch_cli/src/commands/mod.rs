//! CLI subcommand implementations.

pub mod add;
pub mod avg_price;
pub mod history;
pub mod list;
pub mod news;
pub mod quote;
pub mod remove;
pub mod search;
pub mod show;

use anyhow::Result;
use kwatch_lib::directory::{load_directory, ListedStock};
use kwatch_lib::types::Market;
use kwatch_lib::{Db, Settings, StockSearcher};

/// Opens the watchlist database and applies the schema.
pub fn open_db(settings: &Settings) -> Result<Db> {
    let db = Db::open(&settings.db_path)?;
    db.init()?;
    Ok(db)
}

pub fn searcher(settings: &Settings) -> Result<StockSearcher> {
    Ok(StockSearcher::new(settings.chart_client(), load_directory()?))
}

/// Resolves a code to a listing: the watchlist first (when the database
/// file exists), then the embedded directory, then a live lookup.
pub async fn resolve_stock(
    settings: &Settings,
    code: &str,
    market: Option<Market>,
) -> Result<ListedStock> {
    if settings.db_path.exists() {
        let db = open_db(settings)?;
        if let Some(item) = db.get_item(code)? {
            if market.map_or(true, |m| m == item.market) {
                return Ok(ListedStock {
                    code: item.code,
                    name: item.name,
                    market: item.market,
                });
            }
        }
    }
    Ok(searcher(settings)?.resolve(code, market).await?)
}
