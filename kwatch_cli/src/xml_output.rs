use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::Serialize;
use std::io::Cursor;

use kwatch_lib::directory::ListedStock;
use kwatch_lib::types::{StockHistory, StockQuote};
use kwatch_lib::{StockReport, StockSummary, WatchlistItem};

/// Child element name for array fields.
fn singular(field: &str) -> &str {
    match field {
        "history" => "bar",
        "positive" | "negative" | "neutral" => "article",
        "matchedKeywords" => "keyword",
        "stocks" => "stock",
        _ => field,
    }
}

/// Recursively write a serde_json::Value as XML elements.
fn write_value<W: std::io::Write>(
    writer: &mut Writer<W>,
    tag: &str,
    value: &serde_json::Value,
) -> Result<(), quick_xml::Error> {
    match value {
        serde_json::Value::Null => {
            // Omit null fields entirely
        }
        serde_json::Value::Bool(b) => {
            write_text(writer, tag, if *b { "true" } else { "false" })?;
        }
        serde_json::Value::Number(n) => {
            write_text(writer, tag, &n.to_string())?;
        }
        serde_json::Value::String(s) => {
            write_text(writer, tag, s)?;
        }
        serde_json::Value::Array(arr) => {
            writer.write_event(Event::Start(BytesStart::new(tag)))?;
            let child_tag = singular(tag);
            for item in arr {
                write_value(writer, child_tag, item)?;
            }
            writer.write_event(Event::End(BytesEnd::new(tag)))?;
        }
        serde_json::Value::Object(map) => {
            writer.write_event(Event::Start(BytesStart::new(tag)))?;
            for (key, val) in map {
                write_value(writer, key, val)?;
            }
            writer.write_event(Event::End(BytesEnd::new(tag)))?;
        }
    }
    Ok(())
}

fn write_text<W: std::io::Write>(
    writer: &mut Writer<W>,
    tag: &str,
    text: &str,
) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn new_document() -> Result<Writer<Cursor<Vec<u8>>>> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    Ok(writer)
}

fn finish(writer: Writer<Cursor<Vec<u8>>>) -> Result<String> {
    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}

/// Serialize a slice of items under one root element.
fn items_to_xml<T: Serialize>(root_tag: &str, item_tag: &str, items: &[T]) -> Result<String> {
    let mut writer = new_document()?;

    if items.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(root_tag)))?;
    } else {
        writer.write_event(Event::Start(BytesStart::new(root_tag)))?;
        for item in items {
            let val = serde_json::to_value(item)?;
            write_value(&mut writer, item_tag, &val)?;
        }
        writer.write_event(Event::End(BytesEnd::new(root_tag)))?;
    }

    finish(writer)
}

/// Serialize a single value as the document root.
fn value_to_xml<T: Serialize>(root_tag: &str, value: &T) -> Result<String> {
    let mut writer = new_document()?;
    let val = serde_json::to_value(value)?;
    write_value(&mut writer, root_tag, &val)?;
    finish(writer)
}

pub fn stocks_to_xml(stocks: &[ListedStock]) -> Result<String> {
    items_to_xml("stocks", "stock", stocks)
}

pub fn watchlist_to_xml(items: &[WatchlistItem]) -> Result<String> {
    items_to_xml("watchlist", "item", items)
}

pub fn summaries_to_xml(summaries: &[StockSummary]) -> Result<String> {
    items_to_xml("watchlist", "stock", summaries)
}

pub fn quote_to_xml(quote: &StockQuote) -> Result<String> {
    value_to_xml("quote", quote)
}

pub fn history_to_xml(history: &[StockHistory]) -> Result<String> {
    items_to_xml("history", "bar", history)
}

pub fn document_to_xml<T: Serialize>(root_tag: &str, value: &T) -> Result<String> {
    value_to_xml(root_tag, value)
}

pub fn report_to_xml(report: &StockReport) -> Result<String> {
    value_to_xml("report", report)
}
