//! MOEX ISS 클라이언트 통합 테스트 (mockito HTTP 서버).

use chrono::NaiveDate;
use hedge_core::{HedgeError, Instrument};
use hedge_data::{MarketDataProvider, MoexClient};
use mockito::{Matcher, Server};

fn sber() -> Instrument {
    Instrument {
        ticker: "SBER".to_string(),
        board: "TQBR".to_string(),
        engine: "stock".to_string(),
        market: "shares".to_string(),
        title: String::new(),
        history_from: Some(NaiveDate::from_ymd_opt(2013, 3, 25).unwrap()),
        history_till: None,
        is_primary: true,
    }
}

fn history_body(dates: &[&str], total: u64, index: u64, page_size: u64) -> String {
    let rows: Vec<String> = dates
        .iter()
        .map(|d| {
            format!(
                r#"{{"BOARDID": "TQBR", "TRADEDATE": "{}", "SECID": "SBER", "OPEN": 270.0, "CLOSE": 272.5, "HIGH": 273.0, "LOW": 269.1, "VOLUME": 1000}}"#,
                d
            )
        })
        .collect();
    format!(
        r#"[{{"charsetinfo": {{"name": "utf-8"}}}}, {{"history": [{}], "history.cursor": [{{"INDEX": {}, "TOTAL": {}, "PAGESIZE": {}}}]}}]"#,
        rows.join(","),
        index,
        total,
        page_size
    )
}

#[tokio::test]
async fn test_describe_primary_board() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/iss/securities/SBER.json")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("iss.json".into(), "extended".into()),
            Matcher::UrlEncoded("iss.only".into(), "boards".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"[{"charsetinfo": {"name": "utf-8"}},
                {"boards": [
                  {"secid": "SBER", "boardid": "TQBR", "title": "Т+: Акции", "market": "shares",
                   "engine": "stock", "history_from": "2013-03-25", "history_till": "2024-01-05",
                   "is_primary": 1},
                  {"secid": "SBER", "boardid": "SMAL", "title": "Неполные лоты", "market": "shares",
                   "engine": "stock", "history_from": null, "history_till": null, "is_primary": 0}
                ]}]"#,
        )
        .create_async()
        .await;

    let client = MoexClient::with_base_url(server.url()).unwrap();
    let instrument = client.describe("SBER").await.unwrap();

    assert_eq!(instrument.board, "TQBR");
    assert_eq!(instrument.engine, "stock");
    assert!(instrument.is_primary);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_describe_unknown_ticker() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/iss/securities/NOPE.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"[{"charsetinfo": {"name": "utf-8"}}, {"boards": []}]"#)
        .create_async()
        .await;

    let client = MoexClient::with_base_url(server.url()).unwrap();
    let err = client.describe("NOPE").await.unwrap_err();
    assert!(matches!(err, HedgeError::InstrumentNotFound(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_describe_first_board_not_primary() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/iss/securities/ODD.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"[{"charsetinfo": {"name": "utf-8"}},
                {"boards": [{"secid": "ODD", "boardid": "SMAL", "market": "shares",
                             "engine": "stock", "is_primary": 0}]}]"#,
        )
        .create_async()
        .await;

    let client = MoexClient::with_base_url(server.url()).unwrap();
    let err = client.describe("ODD").await.unwrap_err();
    assert!(matches!(err, HedgeError::InstrumentNotFound(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_is_provider_failure() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/iss/securities/SBER.json")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let client = MoexClient::with_base_url(server.url()).unwrap();
    let err = client.describe("SBER").await.unwrap_err();
    match err {
        HedgeError::ProviderQueryFailed(msg) => assert!(msg.contains("503"), "{}", msg),
        other => panic!("unexpected error: {:?}", other),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_malformed_json_is_provider_failure() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/iss/securities/SBER.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let client = MoexClient::with_base_url(server.url()).unwrap();
    let err = client.describe("SBER").await.unwrap_err();
    match err {
        HedgeError::ProviderQueryFailed(msg) => assert!(msg.starts_with("Parse error"), "{}", msg),
        other => panic!("unexpected error: {:?}", other),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_history_follows_cursor() {
    let mut server = Server::new_async().await;
    let path = "/iss/history/engines/stock/markets/shares/boards/TQBR/securities/SBER.json";

    let first = server
        .mock("GET", path)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("start".into(), "0".into()),
            Matcher::UrlEncoded("from".into(), "2024-01-01".into()),
            Matcher::UrlEncoded("till".into(), "2024-01-31".into()),
            Matcher::UrlEncoded("iss.only".into(), "history,history.cursor".into()),
        ]))
        .with_status(200)
        .with_body(history_body(&["2024-01-03", "2024-01-04"], 5, 0, 2))
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("GET", path)
        .match_query(Matcher::UrlEncoded("start".into(), "2".into()))
        .with_status(200)
        .with_body(history_body(&["2024-01-05", "2024-01-08"], 5, 2, 2))
        .expect(1)
        .create_async()
        .await;
    let third = server
        .mock("GET", path)
        .match_query(Matcher::UrlEncoded("start".into(), "4".into()))
        .with_status(200)
        .with_body(history_body(&["2024-01-09"], 5, 4, 2))
        .expect(1)
        .create_async()
        .await;

    let client = MoexClient::with_base_url(server.url()).unwrap();
    let items = client
        .history(
            &sber(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .await
        .unwrap();

    let dates: Vec<String> = items.iter().map(|i| i.trade_date.to_string()).collect();
    assert_eq!(
        dates,
        vec!["2024-01-03", "2024-01-04", "2024-01-05", "2024-01-08", "2024-01-09"]
    );
    assert_eq!(items[0].close, 272.5);

    first.assert_async().await;
    second.assert_async().await;
    third.assert_async().await;
}

#[tokio::test]
async fn test_history_empty_page_before_total() {
    let mut server = Server::new_async().await;
    let path = "/iss/history/engines/stock/markets/shares/boards/TQBR/securities/SBER.json";

    server
        .mock("GET", path)
        .match_query(Matcher::UrlEncoded("start".into(), "0".into()))
        .with_status(200)
        .with_body(history_body(&["2024-01-03"], 10, 0, 1))
        .create_async()
        .await;
    server
        .mock("GET", path)
        .match_query(Matcher::UrlEncoded("start".into(), "1".into()))
        .with_status(200)
        .with_body(history_body(&[], 10, 1, 1))
        .create_async()
        .await;

    let client = MoexClient::with_base_url(server.url()).unwrap();
    let err = client
        .history(
            &sber(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, HedgeError::ProviderQueryFailed(_)));
}

#[tokio::test]
async fn test_history_range() {
    let mut server = Server::new_async().await;
    server
        .mock(
            "GET",
            "/iss/history/engines/stock/markets/shares/boards/TQBR/securities/SBER/dates.json",
        )
        .match_query(Matcher::UrlEncoded("marketprice_board".into(), "1".into()))
        .with_status(200)
        .with_body(
            r#"[{"charsetinfo": {"name": "utf-8"}},
                {"dates": [{"from": "2013-03-25", "till": "2024-05-16"}]}]"#,
        )
        .create_async()
        .await;

    let client = MoexClient::with_base_url(server.url()).unwrap();
    let range = client.history_range(&sber()).await.unwrap();
    assert_eq!(range.from, NaiveDate::from_ymd_opt(2013, 3, 25).unwrap());
    assert_eq!(range.till, NaiveDate::from_ymd_opt(2024, 5, 16).unwrap());
}

#[tokio::test]
async fn test_future_underlying_tom_suffix() {
    let mut server = Server::new_async().await;
    server
        .mock(
            "GET",
            "/iss/engines/futures/markets/forts/securities/GLDRUBF.json",
        )
        .match_query(Matcher::UrlEncoded("iss.only".into(), "securities".into()))
        .with_status(200)
        .with_body(
            r#"[{"charsetinfo": {"name": "utf-8"}},
                {"securities": [{"SECID": "GLDRUBF", "ASSETCODE": "GLDRUBTOM"}]}]"#,
        )
        .create_async()
        .await;

    let client = MoexClient::with_base_url(server.url()).unwrap();
    assert_eq!(
        client.future_underlying("GLDRUBF").await.unwrap(),
        "GLDRUB_TOM"
    );
}
