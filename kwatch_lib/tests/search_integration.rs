mod common;

use common::{chart_body, not_found_body};
use kwatch_lib::directory::{load_directory, ListedStock, StockDirectory};
use kwatch_lib::types::Market;
use kwatch_lib::{Client, KwatchError, StockSearcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn small_directory() -> StockDirectory {
    StockDirectory::new(vec![
        ListedStock {
            code: "005930".to_string(),
            name: "삼성전자".to_string(),
            market: Market::Kospi,
        },
        ListedStock {
            code: "247540".to_string(),
            name: "에코프로비엠".to_string(),
            market: Market::Kosdaq,
        },
    ])
}

async fn mount_chart(server: &MockServer, symbol: &str, status: u16, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v8/finance/chart/{}", symbol)))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn name_query_uses_directory_only() {
    let server = MockServer::start().await;
    let searcher = StockSearcher::new(
        Client::with_base_url(&server.uri()),
        load_directory().unwrap(),
    );

    let results = searcher.search("삼성").await.unwrap();

    assert_eq!(results.len(), 8);
    assert_eq!(results[0].code, "005930");
    assert!(results.iter().all(|s| s.name.contains("삼성")));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_query_returns_nothing() {
    let server = MockServer::start().await;
    let searcher = StockSearcher::new(Client::with_base_url(&server.uri()), small_directory());

    assert!(searcher.search("").await.unwrap().is_empty());
    assert!(searcher.search("   ").await.unwrap().is_empty());
}

#[tokio::test]
async fn overlong_query_is_rejected() {
    let server = MockServer::start().await;
    let searcher = StockSearcher::new(Client::with_base_url(&server.uri()), small_directory());

    let err = searcher.search(&"a".repeat(101)).await.unwrap_err();
    assert!(matches!(err, KwatchError::InvalidInput(_)));
}

#[tokio::test]
async fn code_query_finds_unlisted_kosdaq_stock() {
    let server = MockServer::start().await;
    mount_chart(&server, "012345.KS", 404, not_found_body()).await;
    mount_chart(
        &server,
        "012345.KQ",
        200,
        chart_body("012345.KQ", Some("테스트바이오"), None, 5000.0, &[Some(5000.0)]),
    )
    .await;

    let searcher = StockSearcher::new(Client::with_base_url(&server.uri()), small_directory());
    let results = searcher.search("12345").await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].code, "012345");
    assert_eq!(results[0].name, "테스트바이오");
    assert_eq!(results[0].market, Market::Kosdaq);
}

#[tokio::test]
async fn remote_duplicate_of_local_hit_is_dropped() {
    let server = MockServer::start().await;
    mount_chart(
        &server,
        "005930.KS",
        200,
        chart_body("005930.KS", Some("SamsungElec"), None, 72000.0, &[Some(72000.0)]),
    )
    .await;
    mount_chart(&server, "005930.KQ", 404, not_found_body()).await;

    let searcher = StockSearcher::new(Client::with_base_url(&server.uri()), small_directory());
    let results = searcher.search("005930").await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "삼성전자");
}

#[tokio::test]
async fn bogus_remote_records_are_filtered() {
    let server = MockServer::start().await;
    // Only a long name with a comma.
    mount_chart(
        &server,
        "111111.KS",
        200,
        chart_body("111111.KS", None, Some("Foo Co., Ltd."), 1000.0, &[Some(1000.0)]),
    )
    .await;
    // No price.
    mount_chart(
        &server,
        "111111.KQ",
        200,
        chart_body("111111.KQ", Some("제로"), None, 0.0, &[]),
    )
    .await;

    let searcher = StockSearcher::new(Client::with_base_url(&server.uri()), small_directory());
    assert!(searcher.search("111111").await.unwrap().is_empty());
}

#[tokio::test]
async fn provider_errors_are_skipped() {
    let server = MockServer::start().await;
    mount_chart(&server, "222222.KS", 500, serde_json::json!({"oops": true})).await;
    mount_chart(
        &server,
        "222222.KQ",
        200,
        chart_body("222222.KQ", Some("반도체소재"), None, 12000.0, &[Some(12000.0)]),
    )
    .await;

    let searcher = StockSearcher::new(Client::with_base_url(&server.uri()), small_directory());
    let results = searcher.search("222222").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].market, Market::Kosdaq);
}

#[tokio::test]
async fn resolve_prefers_directory() {
    let server = MockServer::start().await;
    let searcher = StockSearcher::new(Client::with_base_url(&server.uri()), small_directory());

    let stock = searcher.resolve("247540", None).await.unwrap();
    assert_eq!(stock.name, "에코프로비엠");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn resolve_unknown_code_is_not_found() {
    let server = MockServer::start().await;
    mount_chart(&server, "333333.KS", 404, not_found_body()).await;
    mount_chart(&server, "333333.KQ", 404, not_found_body()).await;

    let searcher = StockSearcher::new(Client::with_base_url(&server.uri()), small_directory());
    let err = searcher.resolve("333333", None).await.unwrap_err();
    assert!(matches!(err, KwatchError::NotFound(_)));
}

#[tokio::test]
async fn resolve_with_market_only_queries_that_market() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/444444.KQ"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_body(
            "444444.KQ",
            Some("코스닥전용"),
            None,
            3000.0,
            &[Some(3000.0)],
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/444444.KS"))
        .respond_with(ResponseTemplate::new(404).set_body_json(not_found_body()))
        .expect(0)
        .mount(&server)
        .await;

    let searcher = StockSearcher::new(Client::with_base_url(&server.uri()), small_directory());
    let stock = searcher.resolve("444444", Some(Market::Kosdaq)).await.unwrap();
    assert_eq!(stock.name, "코스닥전용");
}
