//! Korean exchange segments and their Yahoo Finance ticker suffixes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The two main Korean stock exchange segments.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Market {
    #[default]
    #[serde(rename = "KOSPI")]
    Kospi,
    #[serde(rename = "KOSDAQ")]
    Kosdaq,
}

impl Market {
    pub const ALL: [Market; 2] = [Market::Kospi, Market::Kosdaq];

    pub fn as_str(&self) -> &'static str {
        match self {
            Market::Kospi => "KOSPI",
            Market::Kosdaq => "KOSDAQ",
        }
    }

    /// Yahoo Finance suffix: `.KS` for KOSPI, `.KQ` for KOSDAQ.
    pub fn yahoo_suffix(&self) -> &'static str {
        match self {
            Market::Kospi => ".KS",
            Market::Kosdaq => ".KQ",
        }
    }

    /// `005930` on KOSPI becomes `005930.KS`.
    pub fn to_yahoo_code(&self, code: &str) -> String {
        format!("{}{}", code, self.yahoo_suffix())
    }

    /// Recovers the market from a Yahoo symbol's suffix.
    pub fn from_yahoo_code(symbol: &str) -> Option<Market> {
        if symbol.ends_with(".KS") {
            Some(Market::Kospi)
        } else if symbol.ends_with(".KQ") {
            Some(Market::Kosdaq)
        } else {
            None
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Market {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kospi" | "ks" | ".ks" => Ok(Market::Kospi),
            "kosdaq" | "kq" | ".kq" => Ok(Market::Kosdaq),
            other => Err(format!("unknown market '{}'", other)),
        }
    }
}

/// Removes a trailing `.KS` / `.KQ` from a Yahoo symbol.
pub fn strip_yahoo_suffix(symbol: &str) -> &str {
    symbol
        .strip_suffix(".KS")
        .or_else(|| symbol.strip_suffix(".KQ"))
        .unwrap_or(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yahoo_code_suffixes() {
        assert_eq!(Market::Kospi.to_yahoo_code("005930"), "005930.KS");
        assert_eq!(Market::Kosdaq.to_yahoo_code("247540"), "247540.KQ");
    }

    #[test]
    fn market_from_yahoo_code() {
        assert_eq!(Market::from_yahoo_code("005930.KS"), Some(Market::Kospi));
        assert_eq!(Market::from_yahoo_code("247540.KQ"), Some(Market::Kosdaq));
        assert_eq!(Market::from_yahoo_code("AAPL"), None);
    }

    #[test]
    fn strip_suffix_only_touches_korean_suffixes() {
        assert_eq!(strip_yahoo_suffix("005930.KS"), "005930");
        assert_eq!(strip_yahoo_suffix("247540.KQ"), "247540");
        assert_eq!(strip_yahoo_suffix("BRK.B"), "BRK.B");
    }

    #[test]
    fn parse_market_case_insensitive() {
        assert_eq!("KOSPI".parse::<Market>(), Ok(Market::Kospi));
        assert_eq!("kosdaq".parse::<Market>(), Ok(Market::Kosdaq));
        assert_eq!(" kq ".parse::<Market>(), Ok(Market::Kosdaq));
        assert!("nasdaq".parse::<Market>().is_err());
    }

    #[test]
    fn serde_uses_exchange_names() {
        assert_eq!(serde_json::to_string(&Market::Kosdaq).unwrap(), "\"KOSDAQ\"");
        let m: Market = serde_json::from_str("\"KOSPI\"").unwrap();
        assert_eq!(m, Market::Kospi);
    }
}
