mod chart;
pub use self::chart::{ChartBody, ChartEnvelope, ChartError, ChartIndicators, ChartMeta, ChartQuoteBars, ChartResult};

mod market;
pub use self::market::{strip_yahoo_suffix, Market};

mod quote;
pub use self::quote::{StockHistory, StockQuote};

mod news;
pub use self::news::NewsItem;
