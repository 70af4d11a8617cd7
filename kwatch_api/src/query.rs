//! Query parameters for the chart endpoint: the [`Query`] trait and [`ChartQuery`].

use std::fmt;
use std::str::FromStr;

use url::Url;

/// Trait implemented by query builders that serialize themselves onto a URL.
pub trait Query {
    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url;
}

/// How far back the chart endpoint should reach.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChartRange {
    OneDay,
    /// Five trading days. Enough to always include the previous close.
    #[default]
    FiveDays,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl ChartRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartRange::OneDay => "1d",
            ChartRange::FiveDays => "5d",
            ChartRange::OneMonth => "1mo",
            ChartRange::ThreeMonths => "3mo",
            ChartRange::SixMonths => "6mo",
            ChartRange::OneYear => "1y",
        }
    }
}

impl fmt::Display for ChartRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartRange {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1d" => Ok(ChartRange::OneDay),
            "5d" => Ok(ChartRange::FiveDays),
            "1mo" => Ok(ChartRange::OneMonth),
            "3mo" => Ok(ChartRange::ThreeMonths),
            "6mo" => Ok(ChartRange::SixMonths),
            "1y" => Ok(ChartRange::OneYear),
            _ => Err(()),
        }
    }
}

/// Bar width of the returned series.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChartInterval {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl ChartInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartInterval::Daily => "1d",
            ChartInterval::Weekly => "1wk",
            ChartInterval::Monthly => "1mo",
        }
    }
}

impl fmt::Display for ChartInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for `GET /v8/finance/chart/{symbol}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChartQuery {
    pub range: ChartRange,
    pub interval: ChartInterval,
}

impl ChartQuery {
    /// Latest session plus enough prior sessions to know the previous close.
    pub fn quote() -> Self {
        Self {
            range: ChartRange::FiveDays,
            interval: ChartInterval::Daily,
        }
    }

    /// Trailing month of daily bars.
    pub fn history() -> Self {
        Self {
            range: ChartRange::OneMonth,
            interval: ChartInterval::Daily,
        }
    }

    pub fn with_range(mut self, range: ChartRange) -> Self {
        self.range = range;
        self
    }

    pub fn with_interval(mut self, interval: ChartInterval) -> Self {
        self.interval = interval;
        self
    }
}

impl Query for ChartQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("range", self.range.as_str())
            .append_pair("interval", self.interval.as_str())
            .append_pair("includePrePost", "false");
        url
    }
}
