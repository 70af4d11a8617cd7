use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use kwatch_lib::{ReportBuilder, Settings};

use crate::output::{build_watch_rows, print_json, print_rows, print_xml, OutputFormat};
use crate::xml_output;

pub async fn run(settings: &Settings, format: &OutputFormat) -> Result<()> {
    let db = super::open_db(settings)?;
    let items = db.list_items()?;

    if items.is_empty() {
        eprintln!("Watchlist is empty. Add a stock with `kwatch add <code>`.");
    }

    let builder = ReportBuilder::new(settings.chart_client(), settings.news_client()?);

    let pb = ProgressBar::new(items.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} ({eta}) {msg}",
        )?,
    );
    pb.set_message("fetching quotes...");

    let mut summaries = Vec::with_capacity(items.len());
    for item in &items {
        pb.set_message(format!("{} {}", item.code, item.name));
        summaries.push(builder.summary(item).await);
        pb.inc(1);
    }
    pb.finish_and_clear();

    let missing = summaries.iter().filter(|s| s.quote.is_none()).count();
    if missing > 0 {
        eprintln!("{} of {} quote(s) unavailable", missing, summaries.len());
    }

    match format {
        OutputFormat::Json => print_json(&summaries),
        OutputFormat::Xml => print_xml(xml_output::summaries_to_xml(&summaries))?,
        _ => print_rows(&build_watch_rows(&summaries), format)?,
    }

    Ok(())
}
