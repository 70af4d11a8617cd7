use anyhow::Result;
use clap::Args;
use kwatch_lib::types::StockHistory;
use kwatch_lib::validation;
use kwatch_lib::{Settings, Trend};
use serde::Serialize;

use crate::output::{
    build_history_rows, format_price, print_json, print_rows, print_xml, OutputFormat,
};
use crate::xml_output;

#[derive(Args)]
pub struct HistoryArgs {
    /// 5-6 digit KRX code
    pub code: String,

    /// Market: kospi (ks) or kosdaq (kq). Looked up when omitted.
    #[arg(long)]
    pub market: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryOutput<'a> {
    code: &'a str,
    name: &'a str,
    trend: Option<Trend>,
    history: &'a [StockHistory],
}

pub async fn run(args: &HistoryArgs, settings: &Settings, format: &OutputFormat) -> Result<()> {
    let code = validation::validate_code(&args.code)?;
    let market = args
        .market
        .as_deref()
        .map(validation::validate_market)
        .transpose()?;

    let stock = super::resolve_stock(settings, &code, market).await?;
    let history = settings
        .chart_client()
        .get_history(&stock.yahoo_code())
        .await?;
    let trend = Trend::of(&history);

    if let (Some(first), Some(last), Some(trend)) = (history.first(), history.last(), trend) {
        eprintln!(
            "{} {}: {} bars, trend {} ({} -> {})",
            stock.code,
            stock.name,
            history.len(),
            trend.as_str(),
            format_price(first.close),
            format_price(last.close)
        );
    } else {
        eprintln!("{} {}: no price history", stock.code, stock.name);
    }

    let out = HistoryOutput {
        code: &stock.code,
        name: &stock.name,
        trend,
        history: &history,
    };
    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Xml => print_xml(xml_output::document_to_xml("history", &out))?,
        _ => print_rows(&build_history_rows(&history), format)?,
    }

    Ok(())
}
