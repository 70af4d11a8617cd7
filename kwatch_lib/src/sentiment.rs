//! Keyword-based news sentiment.
//!
//! Each headline is scanned for fixed Korean finance terms. A keyword counts
//! once per item no matter how often it occurs, and there is no negation
//! handling: "상승 우려" hits both lists.

use std::fmt;

use kwatch_api::types::NewsItem;
use serde::Serialize;

/// Terms that mark good news, in match-report order.
pub const POSITIVE_KEYWORDS: &[&str] = &[
    "상승", "급등", "흑자", "최대", "성장", "수주", "계약", "개발", "신제품",
    "허가", "승인", "매출", "영업이익", "흑자전환", "신고가", "호실적", "증가",
    "확대", "수출", "투자", "협약", "파트너", "상향",
];

/// Terms that mark bad news, in match-report order.
pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "하락", "급락", "적자", "손실", "소송", "리콜", "조사", "혐의", "규제",
    "제재", "부진", "감소", "하향", "취소", "신저가", "적자전환", "경고",
    "우려", "위기", "악화", "하락세", "매출감소",
];

/// Share of positive items at or above which the outlook is a strong uptrend.
pub const STRONG_UP_RATIO: f64 = 0.7;
/// Lower bound of the mild-uptrend band.
pub const MILD_UP_RATIO: f64 = 0.5;
/// Lower bound of the mild-downtrend band. Anything below is a strong downtrend.
pub const MILD_DOWN_RATIO: f64 = 0.3;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }

    /// Korean bucket name as shown in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "호재",
            Sentiment::Negative => "악재",
            Sentiment::Neutral => "중립",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A news item with its classification.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedNews {
    pub item: NewsItem,
    pub sentiment: Sentiment,
    /// Positive hits in list order, then negative hits in list order.
    pub matched_keywords: Vec<&'static str>,
}

/// A batch of news partitioned by sentiment. Input order is kept inside each bucket.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct NewsAnalysis {
    pub positive: Vec<AnalyzedNews>,
    pub negative: Vec<AnalyzedNews>,
    pub neutral: Vec<AnalyzedNews>,
}

impl NewsAnalysis {
    pub fn total(&self) -> usize {
        self.positive.len() + self.negative.len() + self.neutral.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn outlook(&self) -> Outlook {
        Outlook::from_counts(self.positive.len(), self.negative.len())
    }

    pub fn outlook_text(&self) -> String {
        outlook_text(self.positive.len(), self.negative.len())
    }
}

/// Classifies one item over `"{title} {description}"`.
pub fn analyze_item(item: &NewsItem) -> AnalyzedNews {
    let text = format!("{} {}", item.title, item.description);

    let positive: Vec<&'static str> = POSITIVE_KEYWORDS
        .iter()
        .copied()
        .filter(|kw| text.contains(kw))
        .collect();
    let negative: Vec<&'static str> = NEGATIVE_KEYWORDS
        .iter()
        .copied()
        .filter(|kw| text.contains(kw))
        .collect();

    let sentiment = match positive.len().cmp(&negative.len()) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        // Ties with at least one hit lean positive.
        std::cmp::Ordering::Equal if !positive.is_empty() => Sentiment::Positive,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    };

    let mut matched_keywords = positive;
    matched_keywords.extend(negative);

    AnalyzedNews {
        item: item.clone(),
        sentiment,
        matched_keywords,
    }
}

/// Classifies every item and splits the batch into the three buckets.
pub fn analyze_news(news: &[NewsItem]) -> NewsAnalysis {
    let mut analysis = NewsAnalysis::default();
    for analyzed in news.iter().map(analyze_item) {
        match analyzed.sentiment {
            Sentiment::Positive => analysis.positive.push(analyzed),
            Sentiment::Negative => analysis.negative.push(analyzed),
            Sentiment::Neutral => analysis.neutral.push(analyzed),
        }
    }
    analysis
}

/// Outlook band derived from positive vs negative item counts.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outlook {
    Insufficient,
    StrongUp,
    MildUp,
    MildDown,
    StrongDown,
}

impl Outlook {
    /// Neutral items are not part of the ratio.
    pub fn from_counts(positive: usize, negative: usize) -> Self {
        let total = positive + negative;
        if total == 0 {
            return Outlook::Insufficient;
        }
        let ratio = positive as f64 / total as f64;
        if ratio >= STRONG_UP_RATIO {
            Outlook::StrongUp
        } else if ratio >= MILD_UP_RATIO {
            Outlook::MildUp
        } else if ratio >= MILD_DOWN_RATIO {
            Outlook::MildDown
        } else {
            Outlook::StrongDown
        }
    }

    /// Short verdict appended to the count summary.
    pub fn verdict(&self) -> Option<&'static str> {
        match self {
            Outlook::Insufficient => None,
            Outlook::StrongUp => Some("단기 상승 우세"),
            Outlook::MildUp => Some("소폭 상승 우세"),
            Outlook::MildDown => Some("소폭 하락 우세"),
            Outlook::StrongDown => Some("단기 하락 우세"),
        }
    }
}

/// One-line outlook summary for the given counts.
pub fn outlook_text(positive: usize, negative: usize) -> String {
    match Outlook::from_counts(positive, negative).verdict() {
        None => "관련 뉴스가 부족하여 전망을 분석하기 어렵습니다.".to_string(),
        Some(verdict) => format!(
            "호재 {}건 / 악재 {}건 기준 — {}",
            positive, negative, verdict
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn news(title: &str, description: &str) -> NewsItem {
        NewsItem {
            title: title.to_string(),
            link: format!("https://news.example/{}", title),
            description: description.to_string(),
            pub_date: String::new(),
            source: None,
        }
    }

    #[test]
    fn keyword_lists_are_fixed() {
        assert_eq!(POSITIVE_KEYWORDS.len(), 23);
        assert_eq!(NEGATIVE_KEYWORDS.len(), 22);
        assert_eq!(POSITIVE_KEYWORDS[0], "상승");
        assert_eq!(NEGATIVE_KEYWORDS[21], "매출감소");
    }

    #[test]
    fn single_positive_keyword() {
        let a = analyze_item(&news("삼성전자 상승", ""));
        assert_eq!(a.sentiment, Sentiment::Positive);
        assert_eq!(a.matched_keywords, vec!["상승"]);
    }

    #[test]
    fn repeated_keyword_counts_once() {
        let a = analyze_item(&news("하락 하락 하락", "상승 성장"));
        assert_eq!(a.matched_keywords, vec!["상승", "성장", "하락"]);
        assert_eq!(a.sentiment, Sentiment::Positive);
    }

    #[test]
    fn negative_majority() {
        let a = analyze_item(&news("실적 부진에 급락", "소송 리스크 확대"));
        // positive: 확대; negative: 급락, 소송, 부진
        assert_eq!(a.sentiment, Sentiment::Negative);
        assert_eq!(a.matched_keywords, vec!["확대", "급락", "소송", "부진"]);
    }

    #[test]
    fn tie_with_hits_leans_positive() {
        let a = analyze_item(&news("상승 우려", ""));
        assert_eq!(a.sentiment, Sentiment::Positive);
        assert_eq!(a.matched_keywords, vec!["상승", "우려"]);
    }

    #[test]
    fn no_hits_is_neutral() {
        let a = analyze_item(&news("코스피 마감 시황", "장 마감"));
        assert_eq!(a.sentiment, Sentiment::Neutral);
        assert!(a.matched_keywords.is_empty());
    }

    #[test]
    fn overlapping_terms_each_count() {
        // 하락세 contains 하락; 흑자전환 contains 흑자
        let a = analyze_item(&news("흑자전환 후 하락세", ""));
        assert_eq!(a.matched_keywords, vec!["흑자", "흑자전환", "하락", "하락세"]);
        assert_eq!(a.sentiment, Sentiment::Positive);
    }

    #[test]
    fn title_and_description_are_joined_with_space() {
        // "상" + "승" across the boundary must not match.
        let a = analyze_item(&news("상", "승"));
        assert_eq!(a.sentiment, Sentiment::Neutral);
    }

    #[test]
    fn partition_preserves_order_and_size() {
        let batch = vec![
            news("A 상승", ""),
            news("B 하락", ""),
            news("C 시황", ""),
            news("D 수주", ""),
            news("E 적자", ""),
            news("F", ""),
        ];
        let analysis = analyze_news(&batch);
        assert_eq!(analysis.total(), batch.len());
        let titles = |v: &[AnalyzedNews]| v.iter().map(|a| a.item.title.clone()).collect::<Vec<_>>();
        assert_eq!(titles(&analysis.positive), vec!["A 상승", "D 수주"]);
        assert_eq!(titles(&analysis.negative), vec!["B 하락", "E 적자"]);
        assert_eq!(titles(&analysis.neutral), vec!["C 시황", "F"]);
    }

    #[test]
    fn empty_batch() {
        let analysis = analyze_news(&[]);
        assert!(analysis.is_empty());
        assert_eq!(analysis.outlook(), Outlook::Insufficient);
    }

    #[test]
    fn outlook_bands() {
        assert_eq!(Outlook::from_counts(0, 0), Outlook::Insufficient);
        assert_eq!(Outlook::from_counts(7, 3), Outlook::StrongUp);
        assert_eq!(Outlook::from_counts(1, 0), Outlook::StrongUp);
        assert_eq!(Outlook::from_counts(5, 5), Outlook::MildUp);
        assert_eq!(Outlook::from_counts(6, 4), Outlook::MildUp);
        assert_eq!(Outlook::from_counts(3, 7), Outlook::MildDown);
        assert_eq!(Outlook::from_counts(4, 6), Outlook::MildDown);
        assert_eq!(Outlook::from_counts(2, 8), Outlook::StrongDown);
        assert_eq!(Outlook::from_counts(0, 3), Outlook::StrongDown);
    }

    #[test]
    fn outlook_messages() {
        assert_eq!(
            outlook_text(0, 0),
            "관련 뉴스가 부족하여 전망을 분석하기 어렵습니다."
        );
        assert_eq!(outlook_text(7, 3), "호재 7건 / 악재 3건 기준 — 단기 상승 우세");
        assert_eq!(outlook_text(1, 1), "호재 1건 / 악재 1건 기준 — 소폭 상승 우세");
        assert_eq!(outlook_text(2, 3), "호재 2건 / 악재 3건 기준 — 소폭 하락 우세");
        assert_eq!(outlook_text(0, 4), "호재 0건 / 악재 4건 기준 — 단기 하락 우세");
    }

    #[test]
    fn analysis_outlook_uses_bucket_sizes() {
        let analysis = analyze_news(&[news("상승", ""), news("하락", ""), news("시황", "")]);
        assert_eq!(analysis.outlook_text(), outlook_text(1, 1));
    }
}
