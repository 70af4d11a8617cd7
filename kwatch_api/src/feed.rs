//! RSS news provider: Google News search with Yonhap feeds as fallback.

use std::sync::OnceLock;
use std::time::Duration;

use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use url::Url;

use crate::{types::NewsItem, user_agent::get_user_agent, Error};

/// Request timeout for feed downloads.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Google News RSS search endpoint.
pub const GOOGLE_NEWS_SEARCH_URL: &str = "https://news.google.com/rss/search";

/// Publisher used when a Google News title carries no ` - Publisher` tail.
const DEFAULT_SOURCE: &str = "Google 뉴스";

/// A general market feed tried when the per-stock search yields nothing.
#[derive(Clone, Debug)]
pub struct FallbackFeed {
    pub url: String,
    pub source: String,
}

impl FallbackFeed {
    pub fn new(url: &str, source: &str) -> Self {
        Self {
            url: url.to_string(),
            source: source.to_string(),
        }
    }

    /// Yonhap economy then Yonhap stock-market feeds.
    pub fn defaults() -> Vec<FallbackFeed> {
        vec![
            FallbackFeed::new("https://www.yna.co.kr/rss/economy.xml", "연합뉴스"),
            FallbackFeed::new("https://www.yna.co.kr/rss/stock.xml", "연합뉴스 증권"),
        ]
    }
}

/// One `<item>` of an RSS 2.0 channel, text exactly as found in the feed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RssItem {
    pub title: String,
    pub link: String,
    pub description: String,
    pub pub_date: String,
}

/// Fetches stock news from RSS feeds.
pub struct NewsClient {
    client: reqwest::Client,
    search_url: String,
    fallbacks: Vec<FallbackFeed>,
}

impl NewsClient {
    /// Google News search plus the Yonhap economy and stock feeds.
    pub fn new() -> Result<Self, Error> {
        Self::with_urls(GOOGLE_NEWS_SEARCH_URL, FallbackFeed::defaults())
    }

    /// Custom feed locations (for testing with wiremock).
    pub fn with_urls(search_url: &str, fallbacks: Vec<FallbackFeed>) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        Ok(Self {
            client,
            search_url: search_url.to_string(),
            fallbacks,
        })
    }

    /// Returns up to `limit` recent headlines for a stock.
    ///
    /// With a stock name, Google News is searched for `"{name} 주가"` first.
    /// When that fails or comes back empty, each fallback feed is tried in
    /// order and the first non-empty one wins. If every feed fails the result
    /// is empty; individual feed failures are only logged.
    pub async fn fetch_stock_news(
        &self,
        code: &str,
        stock_name: Option<&str>,
        limit: usize,
    ) -> Result<Vec<NewsItem>, Error> {
        if let Some(name) = stock_name.map(str::trim).filter(|n| !n.is_empty()) {
            match self.search(name, limit).await {
                Ok(items) if !items.is_empty() => return Ok(items),
                Ok(_) => tracing::warn!("No Google News results for {} ({})", name, code),
                Err(e) => tracing::warn!("Google News search failed for {} ({}): {}", name, code, e),
            }
        }

        for feed in &self.fallbacks {
            match self.fetch_feed(&feed.url).await {
                Ok(items) => {
                    let news: Vec<NewsItem> = items
                        .into_iter()
                        .take(limit)
                        .map(|item| NewsItem {
                            title: strip_html(&item.title),
                            link: item.link,
                            description: strip_html(&item.description),
                            pub_date: item.pub_date,
                            source: Some(feed.source.clone()),
                        })
                        .collect();
                    if !news.is_empty() {
                        return Ok(news);
                    }
                }
                Err(e) => tracing::warn!("Fallback feed {} failed: {}", feed.url, e),
            }
        }

        Ok(Vec::new())
    }

    async fn search(&self, name: &str, limit: usize) -> Result<Vec<NewsItem>, Error> {
        let mut url = Url::parse(&self.search_url).map_err(|e| {
            tracing::error!("Invalid search URL {}: {}", self.search_url, e);
            Error::RequestFailed
        })?;
        url.query_pairs_mut()
            .append_pair("q", &format!("{} 주가", name))
            .append_pair("hl", "ko")
            .append_pair("gl", "KR")
            .append_pair("ceid", "KR:ko");

        let items = self.fetch_feed(url.as_str()).await?;
        Ok(items
            .into_iter()
            .take(limit)
            .map(|item| {
                let raw_title = strip_html(&item.title);
                NewsItem {
                    title: clean_title(&raw_title),
                    link: item.link,
                    description: strip_html(&item.description),
                    pub_date: item.pub_date,
                    source: Some(extract_source(&raw_title)),
                }
            })
            .collect())
    }

    async fn fetch_feed(&self, url: &str) -> Result<Vec<RssItem>, Error> {
        tracing::debug!("GET {}", url);
        let resp = self.client.get(url).send().await.map_err(|e| {
            tracing::error!("Failed to fetch feed {}: {}", url, e);
            Error::RequestFailed
        })?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read feed body: {}", e);
            Error::RequestFailed
        })?;
        if !status.is_success() {
            let snippet: String = body.chars().take(200).collect();
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }
        parse_rss(&body)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    Description,
    PubDate,
}

/// Parses the `<item>` elements of an RSS 2.0 document.
///
/// Text may arrive as escaped character data or as CDATA sections; both are
/// concatenated per field. Elements other than title, link, description and
/// pubDate are ignored.
pub fn parse_rss(xml: &str) -> Result<Vec<RssItem>, Error> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut current: Option<RssItem> = None;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"item" => current = Some(RssItem::default()),
                b"title" => field = Some(Field::Title),
                b"link" => field = Some(Field::Link),
                b"description" => field = Some(Field::Description),
                b"pubDate" => field = Some(Field::PubDate),
                _ => field = None,
            },
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"item" {
                    if let Some(item) = current.take() {
                        items.push(item);
                    }
                }
                field = None;
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map(|t| t.into_owned())
                    .unwrap_or_else(|_| String::from_utf8_lossy(&e).into_owned());
                append_field(current.as_mut(), field, &text);
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e).into_owned();
                append_field(current.as_mut(), field, &text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Feed(format!(
                    "error at position {}: {}",
                    reader.error_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(items)
}

fn append_field(item: Option<&mut RssItem>, field: Option<Field>, text: &str) {
    let (Some(item), Some(field)) = (item, field) else {
        return;
    };
    let target = match field {
        Field::Title => &mut item.title,
        Field::Link => &mut item.link,
        Field::Description => &mut item.description,
        Field::PubDate => &mut item.pub_date,
    };
    target.push_str(text);
}

fn tag_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").ok()).as_ref()
}

fn source_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r" - ([^-]+)$").ok()).as_ref()
}

/// Removes HTML tags and decodes the handful of entities feeds actually use.
pub fn strip_html(html: &str) -> String {
    let stripped = match tag_regex() {
        Some(re) => re.replace_all(html, "").into_owned(),
        None => html.to_string(),
    };
    stripped
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .trim()
        .to_string()
}

/// Publisher from a Google News title of the form `"headline - Publisher"`.
pub fn extract_source(title: &str) -> String {
    source_regex()
        .and_then(|re| re.captures(title))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| DEFAULT_SOURCE.to_string())
}

/// The headline with its ` - Publisher` tail removed.
pub fn clean_title(title: &str) -> String {
    match source_regex() {
        Some(re) => re.replace(title, "").trim().to_string(),
        None => title.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_html_removes_tags_and_entities() {
        let html = r#"<a href="https://x">삼성전자 &amp; SK하이닉스</a>&nbsp;<b>&quot;반도체&quot;</b> "#;
        assert_eq!(strip_html(html), "삼성전자 & SK하이닉스&nbsp;\"반도체\"");
    }

    #[test]
    fn extract_source_takes_last_segment() {
        assert_eq!(extract_source("삼성전자, 신고가 경신 - 한국경제"), "한국경제");
        assert_eq!(extract_source("K-반도체 수출 증가 - 연합뉴스"), "연합뉴스");
    }

    #[test]
    fn extract_source_defaults_without_publisher() {
        assert_eq!(extract_source("제목만 있는 기사"), "Google 뉴스");
    }

    #[test]
    fn clean_title_drops_publisher() {
        assert_eq!(clean_title("삼성전자, 신고가 경신 - 한국경제"), "삼성전자, 신고가 경신");
        assert_eq!(clean_title("제목만 있는 기사"), "제목만 있는 기사");
    }

    #[test]
    fn parse_rss_reads_items_only() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel>
  <title>채널 제목</title>
  <item>
    <title>첫 기사 - 매일경제</title>
    <link>https://news.example/1</link>
    <description>&lt;a href="x"&gt;요약&lt;/a&gt;</description>
    <pubDate>Mon, 03 Jun 2024 09:00:00 GMT</pubDate>
  </item>
  <item>
    <title><![CDATA[둘째 <b>기사</b>]]></title>
    <link>https://news.example/2</link>
    <description/>
    <pubDate>Mon, 03 Jun 2024 10:00:00 GMT</pubDate>
  </item>
</channel></rss>"#;
        let items = parse_rss(xml).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "첫 기사 - 매일경제");
        assert_eq!(items[0].description, "<a href=\"x\">요약</a>");
        assert_eq!(items[1].title, "둘째 <b>기사</b>");
        assert_eq!(items[1].description, "");
        assert_eq!(items[1].pub_date, "Mon, 03 Jun 2024 10:00:00 GMT");
    }

    #[test]
    fn parse_rss_rejects_broken_markup() {
        let result = parse_rss("<rss><channel><item><title>x</channel></rss>");
        assert!(matches!(result, Err(Error::Feed(_))));
    }
}
