use anyhow::Result;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use kwatch_lib::directory::ListedStock;
use kwatch_lib::sentiment::{AnalyzedNews, NewsAnalysis};
use kwatch_lib::timing::TimingResult;
use kwatch_lib::types::{StockHistory, StockQuote};
use kwatch_lib::{StockReport, StockSummary, WatchlistItem};

/// How many matched keywords a news row shows.
const KEYWORDS_SHOWN: usize = 4;

#[derive(Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
    Xml,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Self {
        match value {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            "markdown" | "md" => OutputFormat::Markdown,
            "xml" => OutputFormat::Xml,
            _ => OutputFormat::Table,
        }
    }
}

#[derive(Tabled, Serialize)]
pub struct StockRow {
    #[tabled(rename = "Code")]
    #[serde(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Market")]
    #[serde(rename = "Market")]
    market: String,
    #[tabled(rename = "Yahoo")]
    #[serde(rename = "Yahoo")]
    yahoo_code: String,
}

#[derive(Tabled, Serialize)]
pub struct ItemRow {
    #[tabled(rename = "Code")]
    #[serde(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Market")]
    #[serde(rename = "Market")]
    market: String,
    #[tabled(rename = "Avg Price")]
    #[serde(rename = "Avg Price")]
    avg_price: String,
    #[tabled(rename = "Added")]
    #[serde(rename = "Added")]
    added_at: String,
}

#[derive(Tabled, Serialize)]
pub struct WatchRow {
    #[tabled(rename = "Code")]
    #[serde(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Price")]
    #[serde(rename = "Price")]
    price: String,
    #[tabled(rename = "Change %")]
    #[serde(rename = "Change %")]
    change_percent: String,
    #[tabled(rename = "Avg Price")]
    #[serde(rename = "Avg Price")]
    avg_price: String,
    #[tabled(rename = "Profit %")]
    #[serde(rename = "Profit %")]
    profit_rate: String,
    #[tabled(rename = "Sell")]
    #[serde(rename = "Sell")]
    sell: String,
    #[tabled(rename = "Buy")]
    #[serde(rename = "Buy")]
    buy: String,
    #[tabled(rename = "Trend")]
    #[serde(rename = "Trend")]
    trend: String,
}

#[derive(Tabled, Serialize)]
pub struct QuoteRow {
    #[tabled(rename = "Code")]
    #[serde(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Price")]
    #[serde(rename = "Price")]
    price: String,
    #[tabled(rename = "Change")]
    #[serde(rename = "Change")]
    change: String,
    #[tabled(rename = "Change %")]
    #[serde(rename = "Change %")]
    change_percent: String,
    #[tabled(rename = "Volume")]
    #[serde(rename = "Volume")]
    volume: String,
    #[tabled(rename = "Updated")]
    #[serde(rename = "Updated")]
    updated_at: String,
}

#[derive(Tabled, Serialize)]
pub struct HistoryRow {
    #[tabled(rename = "Date")]
    #[serde(rename = "Date")]
    date: String,
    #[tabled(rename = "Open")]
    #[serde(rename = "Open")]
    open: String,
    #[tabled(rename = "High")]
    #[serde(rename = "High")]
    high: String,
    #[tabled(rename = "Low")]
    #[serde(rename = "Low")]
    low: String,
    #[tabled(rename = "Close")]
    #[serde(rename = "Close")]
    close: String,
    #[tabled(rename = "Volume")]
    #[serde(rename = "Volume")]
    volume: String,
}

#[derive(Tabled, Serialize)]
pub struct NewsRow {
    #[tabled(rename = "Sentiment")]
    #[serde(rename = "Sentiment")]
    sentiment: String,
    #[tabled(rename = "Title")]
    #[serde(rename = "Title")]
    title: String,
    #[tabled(rename = "Source")]
    #[serde(rename = "Source")]
    source: String,
    #[tabled(rename = "Keywords")]
    #[serde(rename = "Keywords")]
    keywords: String,
    #[tabled(rename = "Published")]
    #[serde(rename = "Published")]
    pub_date: String,
}

#[derive(Tabled, Serialize)]
pub struct FieldRow {
    #[tabled(rename = "Field")]
    #[serde(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    #[serde(rename = "Value")]
    value: String,
}

// -- Row builders --

pub fn build_stock_rows(stocks: &[ListedStock]) -> Vec<StockRow> {
    stocks
        .iter()
        .map(|s| StockRow {
            code: s.code.clone(),
            name: s.name.clone(),
            market: s.market.to_string(),
            yahoo_code: s.yahoo_code(),
        })
        .collect()
}

pub fn build_item_rows(items: &[WatchlistItem]) -> Vec<ItemRow> {
    items
        .iter()
        .map(|i| ItemRow {
            code: i.code.clone(),
            name: i.name.clone(),
            market: i.market.to_string(),
            avg_price: format_optional_price(i.avg_price),
            added_at: i.added_at.format("%Y-%m-%d %H:%M").to_string(),
        })
        .collect()
}

pub fn build_watch_rows(summaries: &[StockSummary]) -> Vec<WatchRow> {
    summaries
        .iter()
        .map(|s| {
            let signals = s.signals.as_ref();
            WatchRow {
                code: s.code.clone(),
                name: s.name.clone(),
                price: s
                    .quote
                    .as_ref()
                    .map(|q| format_price(q.price))
                    .unwrap_or_else(|| "-".to_string()),
                change_percent: s
                    .quote
                    .as_ref()
                    .map(|q| format_percent(q.change_percent))
                    .unwrap_or_else(|| "-".to_string()),
                avg_price: format_optional_price(s.avg_price),
                profit_rate: signals
                    .and_then(|sig| sig.profit_rate)
                    .map(format_percent)
                    .unwrap_or_else(|| "-".to_string()),
                sell: format_timing(signals.and_then(|sig| sig.sell.as_ref())),
                buy: format_timing(signals.map(|sig| &sig.buy)),
                trend: s
                    .trend
                    .map(|t| t.as_str().to_string())
                    .unwrap_or_else(|| "-".to_string()),
            }
        })
        .collect()
}

pub fn build_quote_rows(quotes: &[StockQuote]) -> Vec<QuoteRow> {
    quotes
        .iter()
        .map(|q| QuoteRow {
            code: q.code.clone(),
            name: q.name.clone(),
            price: format_price(q.price),
            change: format_signed_price(q.change),
            change_percent: format_percent(q.change_percent),
            volume: group_thousands(&q.volume.to_string()),
            updated_at: q.updated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        })
        .collect()
}

pub fn build_history_rows(history: &[StockHistory]) -> Vec<HistoryRow> {
    history
        .iter()
        .map(|h| HistoryRow {
            date: h.date.to_string(),
            open: format_price(h.open),
            high: format_price(h.high),
            low: format_price(h.low),
            close: format_price(h.close),
            volume: group_thousands(&h.volume.to_string()),
        })
        .collect()
}

/// Positive, then negative, then neutral items.
pub fn build_news_rows(analysis: &NewsAnalysis) -> Vec<NewsRow> {
    analysis
        .positive
        .iter()
        .chain(&analysis.negative)
        .chain(&analysis.neutral)
        .map(news_row)
        .collect()
}

fn news_row(news: &AnalyzedNews) -> NewsRow {
    NewsRow {
        sentiment: news.sentiment.label().to_string(),
        title: news.item.title.clone(),
        source: news.item.source.clone().unwrap_or_default(),
        keywords: news
            .matched_keywords
            .iter()
            .take(KEYWORDS_SHOWN)
            .copied()
            .collect::<Vec<_>>()
            .join(", "),
        pub_date: news.item.pub_date.clone(),
    }
}

/// Key/value overview of a report.
pub fn build_report_fields(report: &StockReport) -> Vec<FieldRow> {
    let mut rows = vec![
        field("Code", &report.code),
        field("Name", &report.name),
        field("Market", report.market.as_str()),
    ];
    match &report.quote {
        Some(q) => {
            rows.push(field("Price", &format_price(q.price)));
            rows.push(field(
                "Change",
                &format!(
                    "{} ({})",
                    format_signed_price(q.change),
                    format_percent(q.change_percent)
                ),
            ));
            rows.push(field("Volume", &group_thousands(&q.volume.to_string())));
        }
        None => rows.push(field("Price", "unavailable")),
    }
    if let Some(avg) = report.avg_price {
        rows.push(field("Avg Price", &format_price(avg)));
    }
    if let Some(signals) = &report.signals {
        if let Some(rate) = signals.profit_rate {
            rows.push(field("Profit", &format_percent(rate)));
        }
        if let Some(sell) = &signals.sell {
            rows.push(field("Sell Timing", &sell.to_string()));
        }
        rows.push(field("Buy Timing", &signals.buy.to_string()));
    }
    if let (Some(first), Some(last), Some(trend)) =
        (report.history.first(), report.history.last(), report.trend)
    {
        rows.push(field(
            "1M Trend",
            &format!(
                "{} ({} -> {})",
                trend.as_str(),
                format_price(first.close),
                format_price(last.close)
            ),
        ));
    }
    rows.push(field(
        "News",
        &format!(
            "{} (호재 {} / 악재 {} / 중립 {})",
            report.news.total(),
            report.news.positive.len(),
            report.news.negative.len(),
            report.news.neutral.len()
        ),
    ));
    rows.push(field("Outlook", &report.outlook));
    rows
}

fn field(name: &str, value: &str) -> FieldRow {
    FieldRow {
        field: name.to_string(),
        value: value.to_string(),
    }
}

// -- Printers --

/// Prints rows as a table, markdown table or CSV. JSON and XML are handled
/// by the caller because they serialize the domain values, not the rows.
pub fn print_rows<T: Tabled + Serialize>(rows: &[T], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Csv => print_csv(rows)?,
        OutputFormat::Markdown => {
            let mut table = Table::new(rows);
            table.with(Style::markdown());
            println!("{}", table);
        }
        _ => println!("{}", Table::new(rows)),
    }
    Ok(())
}

fn print_csv<T: Serialize>(rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

pub fn print_xml(xml: Result<String>) -> Result<()> {
    println!("{}", xml?);
    Ok(())
}

// -- Formatting --

/// Inserts `,` every three digits of the integer part.
pub fn group_thousands(digits: &str) -> String {
    let (sign, rest) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// Whole won amounts print without decimals.
pub fn format_price(value: f64) -> String {
    if value.fract() == 0.0 {
        group_thousands(&format!("{:.0}", value))
    } else {
        group_thousands(&format!("{:.2}", value))
    }
}

fn format_signed_price(value: f64) -> String {
    if value > 0.0 {
        format!("+{}", format_price(value))
    } else {
        format_price(value)
    }
}

fn format_optional_price(value: Option<f64>) -> String {
    value.map(format_price).unwrap_or_else(|| "-".to_string())
}

pub fn format_percent(value: f64) -> String {
    format!("{:+.2}%", value)
}

fn format_timing(result: Option<&TimingResult>) -> String {
    result
        .map(|r| r.to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
