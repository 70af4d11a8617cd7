//! SQLite storage for the watchlist.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use kwatch_api::types::Market;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const SCHEMA_VERSION: i32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("date parse error: {0}")]
    Date(#[from] chrono::ParseError),
    #[error("unknown market '{0}' in watchlist row")]
    UnknownMarket(String),
}

/// A stock the user follows, with an optional average purchase price.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistItem {
    pub code: String,
    pub yahoo_code: String,
    pub name: String,
    pub market: Market,
    pub added_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_price: Option<f64>,
}

impl WatchlistItem {
    pub fn new(code: &str, name: &str, market: Market) -> Self {
        Self {
            code: code.to_string(),
            yahoo_code: market.to_yahoo_code(code),
            name: name.to_string(),
            market,
            added_at: Utc::now(),
            avg_price: None,
        }
    }

    pub fn with_avg_price(mut self, avg_price: Option<f64>) -> Self {
        self.avg_price = avg_price;
        self
    }
}

pub struct Db {
    conn: Connection,
}

impl Db {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    pub fn init(&self) -> Result<(), DbError> {
        let schema = include_str!("../../schema/sqlite.sql");
        self.conn.execute_batch(schema)?;

        let version: i32 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;
        if version < SCHEMA_VERSION {
            self.conn
                .pragma_update(None, "user_version", SCHEMA_VERSION)?;
        }
        Ok(())
    }

    pub fn schema_version(&self) -> Result<i32, DbError> {
        Ok(self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?)
    }

    /// Inserts `item` unless its code is already present. Returns whether a row was added.
    pub fn add_item(&self, item: &WatchlistItem) -> Result<bool, DbError> {
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO watchlist (code, yahoo_code, name, market, added_at, avg_price)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                item.code,
                item.yahoo_code,
                item.name,
                item.market.as_str(),
                format_timestamp(&item.added_at),
                item.avg_price,
            ],
        )?;
        Ok(changed == 1)
    }

    pub fn remove_item(&self, code: &str) -> Result<bool, DbError> {
        let changed = self
            .conn
            .execute("DELETE FROM watchlist WHERE code = ?1", params![code])?;
        Ok(changed == 1)
    }

    /// All items in the order they were added.
    pub fn list_items(&self) -> Result<Vec<WatchlistItem>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT code, yahoo_code, name, market, added_at, avg_price
             FROM watchlist
             ORDER BY added_at, rowid",
        )?;
        let rows = stmt.query_map([], RawItem::from_row)?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?.into_item()?);
        }
        Ok(items)
    }

    pub fn get_item(&self, code: &str) -> Result<Option<WatchlistItem>, DbError> {
        let raw = self
            .conn
            .query_row(
                "SELECT code, yahoo_code, name, market, added_at, avg_price
                 FROM watchlist WHERE code = ?1",
                params![code],
                RawItem::from_row,
            )
            .optional()?;
        raw.map(RawItem::into_item).transpose()
    }

    /// Sets (`Some`) or clears (`None`) the cost basis. Returns false when the code is not watched.
    pub fn set_avg_price(&self, code: &str, avg_price: Option<f64>) -> Result<bool, DbError> {
        let changed = self.conn.execute(
            "UPDATE watchlist SET avg_price = ?2 WHERE code = ?1",
            params![code, avg_price],
        )?;
        Ok(changed == 1)
    }

    pub fn count(&self) -> Result<i64, DbError> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM watchlist", [], |row| row.get(0))?)
    }
}

/// Fixed-width UTC timestamps so `ORDER BY added_at` sorts chronologically.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

struct RawItem {
    code: String,
    yahoo_code: String,
    name: String,
    market: String,
    added_at: String,
    avg_price: Option<f64>,
}

impl RawItem {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            code: row.get(0)?,
            yahoo_code: row.get(1)?,
            name: row.get(2)?,
            market: row.get(3)?,
            added_at: row.get(4)?,
            avg_price: row.get(5)?,
        })
    }

    fn into_item(self) -> Result<WatchlistItem, DbError> {
        let market = self
            .market
            .parse::<Market>()
            .map_err(|_| DbError::UnknownMarket(self.market.clone()))?;
        let added_at = DateTime::parse_from_rfc3339(&self.added_at)?.with_timezone(&Utc);
        Ok(WatchlistItem {
            code: self.code,
            yahoo_code: self.yahoo_code,
            name: self.name,
            market,
            added_at,
            avg_price: self.avg_price,
        })
    }
}
