#![allow(dead_code)]

use serde_json::{json, Value};

pub fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

/// A chart response with the given meta and daily closes starting 2024-06-03.
pub fn chart_body(
    symbol: &str,
    short_name: Option<&str>,
    long_name: Option<&str>,
    price: f64,
    closes: &[Option<f64>],
) -> Value {
    let timestamps: Vec<i64> = (0..closes.len() as i64)
        .map(|i| 1_717_372_800 + i * 86_400)
        .collect();
    json!({
        "chart": {
            "result": [{
                "meta": {
                    "currency": "KRW",
                    "symbol": symbol,
                    "shortName": short_name,
                    "longName": long_name,
                    "regularMarketPrice": price,
                    "chartPreviousClose": closes.first().copied().flatten(),
                    "regularMarketVolume": 1_000_000u64,
                },
                "timestamp": timestamps,
                "indicators": {
                    "quote": [{
                        "open": closes,
                        "high": closes,
                        "low": closes,
                        "close": closes,
                        "volume": closes.iter().map(|c| c.map(|_| 1_000_000u64)).collect::<Vec<_>>(),
                    }]
                }
            }],
            "error": null
        }
    })
}

pub fn not_found_body() -> Value {
    json!({
        "chart": {
            "result": null,
            "error": {
                "code": "Not Found",
                "description": "No data found, symbol may be delisted"
            }
        }
    })
}
