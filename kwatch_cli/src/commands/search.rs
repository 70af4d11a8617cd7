use anyhow::Result;
use clap::Args;
use kwatch_lib::Settings;

use crate::output::{build_stock_rows, print_json, print_rows, print_xml, OutputFormat};
use crate::xml_output;

#[derive(Args)]
pub struct SearchArgs {
    /// Stock name or 5-6 digit code (e.g. 삼성, 005930)
    pub query: String,
}

pub async fn run(args: &SearchArgs, settings: &Settings, format: &OutputFormat) -> Result<()> {
    let searcher = super::searcher(settings)?;
    let results = searcher.search(&args.query).await?;

    eprintln!("{} result(s) for '{}'", results.len(), args.query.trim());

    match format {
        OutputFormat::Json => print_json(&results),
        OutputFormat::Xml => print_xml(xml_output::stocks_to_xml(&results))?,
        _ => print_rows(&build_stock_rows(&results), format)?,
    }

    Ok(())
}
