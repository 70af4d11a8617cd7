use serde::{Deserialize, Serialize};

/// A news headline pulled from an RSS feed.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    pub description: String,
    /// Raw RFC 2822 date from the feed, kept verbatim.
    pub pub_date: String,
    /// Publisher name, when the feed exposes one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}
