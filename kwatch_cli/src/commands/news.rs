use anyhow::Result;
use clap::Args;
use kwatch_lib::sentiment::{analyze_news, NewsAnalysis, Outlook};
use kwatch_lib::validation;
use kwatch_lib::Settings;
use serde::Serialize;

use crate::output::{build_news_rows, print_json, print_rows, print_xml, OutputFormat};
use crate::xml_output;

#[derive(Args)]
pub struct NewsArgs {
    /// 5-6 digit KRX code
    pub code: String,

    /// Stock name to search news for. Looked up when omitted.
    #[arg(long)]
    pub name: Option<String>,

    /// Maximum number of articles (defaults to KWATCH_NEWS_LIMIT or 10)
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewsOutput<'a> {
    code: &'a str,
    name: Option<&'a str>,
    news: &'a NewsAnalysis,
    outlook: String,
    outlook_band: Outlook,
}

pub async fn run(args: &NewsArgs, settings: &Settings, format: &OutputFormat) -> Result<()> {
    let code = validation::validate_code(&args.code)?;
    let limit = args.limit.unwrap_or(settings.news_limit);

    let name = match &args.name {
        Some(name) => Some(validation::validate_search(name)?),
        None => match super::resolve_stock(settings, &code, None).await {
            Ok(stock) => Some(stock.name),
            Err(e) => {
                eprintln!("Could not resolve a name for {} ({}); using general feeds", code, e);
                None
            }
        },
    };

    let items = settings
        .news_client()?
        .fetch_stock_news(&code, name.as_deref(), limit)
        .await?;
    let analysis = analyze_news(&items);
    let outlook = analysis.outlook_text();

    eprintln!("{}", outlook);

    let out = NewsOutput {
        code: &code,
        name: name.as_deref(),
        news: &analysis,
        outlook,
        outlook_band: analysis.outlook(),
    };
    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Xml => print_xml(xml_output::document_to_xml("newsReport", &out))?,
        _ => print_rows(&build_news_rows(&analysis), format)?,
    }

    Ok(())
}
