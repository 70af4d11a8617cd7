//! Buy/sell timing signals.
//!
//! Four-level step functions over the profit rate against the user's cost
//! basis, or, when no cost basis is recorded, over where the current price
//! sits within the trailing month of closes. Every function here is pure.
//!
//! Sell timing and buy timing are deliberately antagonistic: a large profit
//! is a good moment to sell and a bad moment to buy. Both are shown side by
//! side and never merged into one recommendation.

use std::fmt;

use kwatch_api::types::StockHistory;
use serde::{Deserialize, Serialize};

/// Profit rate at or above which selling is "great" (and buying "terrible").
pub const GREAT_PROFIT: f64 = 15.0;
/// Lower bound of the "good" sell band.
pub const GOOD_PROFIT: f64 = 5.0;
/// Lower bound of the "bad" sell band. Anything below is "terrible".
pub const BAD_PROFIT: f64 = -5.0;
/// Within this many percent of the trailing low, buying is "great".
pub const NEAR_LOW_PCT: f64 = 10.0;
/// Within this many percent of the trailing high, buying is "terrible".
pub const NEAR_HIGH_PCT: f64 = 10.0;

/// Discrete timing level.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum TimingLevel {
    Great,
    Good,
    Bad,
    Terrible,
}

impl TimingLevel {
    /// Display order of the signal lamps. Always rendered in this sequence.
    pub const ALL: [TimingLevel; 4] = [
        TimingLevel::Great,
        TimingLevel::Good,
        TimingLevel::Bad,
        TimingLevel::Terrible,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimingLevel::Great => "great",
            TimingLevel::Good => "good",
            TimingLevel::Bad => "bad",
            TimingLevel::Terrible => "terrible",
        }
    }

    /// Korean label shown next to the lamps.
    pub fn label(&self) -> &'static str {
        match self {
            TimingLevel::Great => "아주좋음",
            TimingLevel::Good => "좋음",
            TimingLevel::Bad => "나쁨",
            TimingLevel::Terrible => "매우나쁨",
        }
    }
}

impl fmt::Display for TimingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A timing level together with its localized label.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingResult {
    pub level: TimingLevel,
    pub label: &'static str,
}

impl TimingResult {
    pub fn new(level: TimingLevel) -> Self {
        Self {
            level,
            label: level.label(),
        }
    }

    /// Four lamps in `great, good, bad, terrible` order, the active one lit.
    pub fn lights(&self) -> String {
        TimingLevel::ALL
            .iter()
            .map(|l| if *l == self.level { '●' } else { '○' })
            .collect()
    }
}

impl From<TimingLevel> for TimingResult {
    fn from(level: TimingLevel) -> Self {
        Self::new(level)
    }
}

impl fmt::Display for TimingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.lights(), self.label)
    }
}

/// Percent gain or loss of `current_price` against `avg_price`.
///
/// `avg_price` must be positive; with zero the result is not finite.
/// Callers holding no cost basis use [`buy_timing_from_history`] instead.
pub fn calc_profit_rate(current_price: f64, avg_price: f64) -> f64 {
    (current_price - avg_price) / avg_price * 100.0
}

/// Higher profit means a better moment to sell.
pub fn sell_timing(profit_rate: f64) -> TimingResult {
    let level = if profit_rate >= GREAT_PROFIT {
        TimingLevel::Great
    } else if profit_rate >= GOOD_PROFIT {
        TimingLevel::Good
    } else if profit_rate >= BAD_PROFIT {
        TimingLevel::Bad
    } else {
        TimingLevel::Terrible
    };
    TimingResult::new(level)
}

/// Mirror image of [`sell_timing`]: the deeper the holder's loss, the better a fresh buy looks.
pub fn buy_timing_from_profit(profit_rate: f64) -> TimingResult {
    let level = if profit_rate >= GREAT_PROFIT {
        TimingLevel::Terrible
    } else if profit_rate >= GOOD_PROFIT {
        TimingLevel::Bad
    } else if profit_rate >= BAD_PROFIT {
        TimingLevel::Good
    } else {
        TimingLevel::Great
    };
    TimingResult::new(level)
}

/// Buy timing from where `current_price` sits within the trailing closes.
pub fn buy_timing_from_history(current_price: f64, history: &[StockHistory]) -> TimingResult {
    let closes: Vec<f64> = history.iter().map(|h| h.close).collect();
    buy_timing_from_closes(current_price, &closes)
}

/// Buy timing from a raw close series.
///
/// First match wins: within 10% above the low is "great", at or below the
/// mean is "good", within 10% below the high is "terrible", otherwise "bad".
/// An empty series is neutral ("good").
pub fn buy_timing_from_closes(current_price: f64, closes: &[f64]) -> TimingResult {
    if closes.is_empty() {
        return TimingResult::new(TimingLevel::Good);
    }

    let min = closes.iter().copied().fold(f64::INFINITY, f64::min);
    let max = closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = closes.iter().sum::<f64>() / closes.len() as f64;

    let from_min = (current_price - min) / min * 100.0;
    let from_max = (max - current_price) / max * 100.0;

    let level = if from_min <= NEAR_LOW_PCT {
        TimingLevel::Great
    } else if current_price <= mean {
        TimingLevel::Good
    } else if from_max <= NEAR_HIGH_PCT {
        TimingLevel::Terrible
    } else {
        TimingLevel::Bad
    };
    TimingResult::new(level)
}

/// Signals shown for one ticker.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimingSignals {
    /// Present only when a cost basis is recorded.
    pub profit_rate: Option<f64>,
    /// Present only when a cost basis is recorded.
    pub sell: Option<TimingResult>,
    pub buy: TimingResult,
}

/// Picks the right timing functions for what the caller knows.
///
/// Returns `None` when there is no usable price. A cost basis that is not
/// positive counts as absent, so the profit-rate functions are never fed a
/// zero denominator.
pub fn evaluate(
    current_price: f64,
    avg_price: Option<f64>,
    history: &[StockHistory],
) -> Option<TimingSignals> {
    if !(current_price > 0.0) {
        return None;
    }
    let signals = match avg_price.filter(|p| *p > 0.0) {
        Some(avg) => {
            let rate = calc_profit_rate(current_price, avg);
            TimingSignals {
                profit_rate: Some(rate),
                sell: Some(sell_timing(rate)),
                buy: buy_timing_from_profit(rate),
            }
        }
        None => TimingSignals {
            profit_rate: None,
            sell: None,
            buy: buy_timing_from_history(current_price, history),
        },
    };
    Some(signals)
}
