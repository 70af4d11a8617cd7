use kwatch_api::{Client, ChartQuery, Error};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[tokio::test]
async fn get_quote_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("chart_005930.json");

    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/005930.KS"))
        .and(query_param("range", "5d"))
        .and(query_param("interval", "1d"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let quote = client.get_quote("005930.KS").await.unwrap();

    assert_eq!(quote.code, "005930");
    assert_eq!(quote.name, "SamsungElec");
    assert_eq!(quote.price, 72000.0);
    assert_eq!(quote.change, 1000.0);
    assert!((quote.change_percent - 1.408_450_7).abs() < 1e-6);
    assert_eq!(quote.volume, 15_321_456);
}

#[tokio::test]
async fn get_history_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("chart_005930.json");

    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/005930.KS"))
        .and(query_param("range", "1mo"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let history = client.get_history("005930.KS").await.unwrap();

    // The null session is dropped.
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].date.to_string(), "2024-06-03");
    assert_eq!(history[0].close, 71000.0);
    assert_eq!(history[2].date.to_string(), "2024-06-06");
    assert_eq!(history[2].close, 72000.0);
    assert!(history.windows(2).all(|w| w[0].date < w[1].date));
}

#[tokio::test]
async fn unknown_symbol_is_no_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/999999.KQ"))
        .respond_with(ResponseTemplate::new(404).set_body_string(load_fixture("chart_not_found.json")))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let result = client.get_quote("999999.KQ").await;
    match result {
        Err(Error::NoData { symbol, description }) => {
            assert_eq!(symbol, "999999.KQ");
            assert!(description.contains("delisted"));
        }
        other => panic!("expected NoData, got {:?}", other.map(|q| q.code)),
    }
}

#[tokio::test]
async fn empty_result_is_no_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/005930.KS"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"chart":{"result":[],"error":null}}"#),
        )
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let result = client.get_chart("005930.KS", &ChartQuery::quote()).await;
    assert!(matches!(result, Err(Error::NoData { .. })));
}

#[tokio::test]
async fn server_error_keeps_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/005930.KS"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let result = client.get_quote("005930.KS").await;
    match result {
        Err(Error::HttpStatus { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "Internal Server Error");
        }
        _ => panic!("expected HttpStatus"),
    }
}

#[tokio::test]
async fn malformed_json_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/005930.KS"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let result = client.get_history("005930.KS").await;
    assert!(matches!(result, Err(Error::RequestFailed)));
}
