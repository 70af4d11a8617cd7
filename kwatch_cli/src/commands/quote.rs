use anyhow::Result;
use clap::Args;
use kwatch_lib::validation;
use kwatch_lib::Settings;

use crate::output::{build_quote_rows, print_json, print_rows, print_xml, OutputFormat};
use crate::xml_output;

#[derive(Args)]
pub struct QuoteArgs {
    /// 5-6 digit KRX code
    pub code: String,

    /// Market: kospi (ks) or kosdaq (kq). Looked up when omitted.
    #[arg(long)]
    pub market: Option<String>,
}

pub async fn run(args: &QuoteArgs, settings: &Settings, format: &OutputFormat) -> Result<()> {
    let code = validation::validate_code(&args.code)?;
    let market = args
        .market
        .as_deref()
        .map(validation::validate_market)
        .transpose()?;

    let stock = super::resolve_stock(settings, &code, market).await?;
    let quote = settings.chart_client().get_quote(&stock.yahoo_code()).await?;

    match format {
        OutputFormat::Json => print_json(&quote),
        OutputFormat::Xml => print_xml(xml_output::quote_to_xml(&quote))?,
        _ => print_rows(&build_quote_rows(std::slice::from_ref(&quote)), format)?,
    }

    Ok(())
}
