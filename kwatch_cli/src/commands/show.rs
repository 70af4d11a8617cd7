use anyhow::Result;
use clap::Args;
use kwatch_lib::validation;
use kwatch_lib::{ReportBuilder, Settings};

use crate::output::{
    build_history_rows, build_news_rows, build_report_fields, print_json, print_rows, print_xml,
    OutputFormat,
};
use crate::xml_output;

#[derive(Args)]
pub struct ShowArgs {
    /// 5-6 digit KRX code
    pub code: String,

    /// Market: kospi (ks) or kosdaq (kq). Looked up when omitted.
    #[arg(long)]
    pub market: Option<String>,

    /// Average purchase price to evaluate against, overriding the watchlist value
    #[arg(long)]
    pub avg_price: Option<String>,

    /// Also print the daily price history
    #[arg(long)]
    pub history: bool,
}

pub async fn run(args: &ShowArgs, settings: &Settings, format: &OutputFormat) -> Result<()> {
    let code = validation::validate_code(&args.code)?;
    let market = args
        .market
        .as_deref()
        .map(validation::validate_market)
        .transpose()?;
    let override_price = args
        .avg_price
        .as_deref()
        .map(validation::validate_avg_price)
        .transpose()?;

    let stock = super::resolve_stock(settings, &code, market).await?;
    let avg_price = match override_price {
        Some(price) => Some(price),
        None if settings.db_path.exists() => super::open_db(settings)?
            .get_item(&code)?
            .and_then(|item| item.avg_price),
        None => None,
    };

    let builder = ReportBuilder::new(settings.chart_client(), settings.news_client()?)
        .with_news_limit(settings.news_limit);
    let report = builder.report_for(&stock, avg_price).await;

    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Xml => print_xml(xml_output::report_to_xml(&report))?,
        OutputFormat::Csv => print_rows(&build_report_fields(&report), format)?,
        _ => {
            print_rows(&build_report_fields(&report), format)?;
            if args.history && !report.history.is_empty() {
                println!();
                print_rows(&build_history_rows(&report.history), format)?;
            }
            if !report.news.is_empty() {
                println!();
                print_rows(&build_news_rows(&report.news), format)?;
            }
        }
    }

    Ok(())
}
