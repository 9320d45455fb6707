// crates/dashboard-gateway/tests/http_contract.rs
//
// HttpGateway against a mock gateway: request shapes and error mapping.

use std::time::Duration;

use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dashboard_core::{Credentials, OrderRequest, OrderType, Side, Symbol, UserId};
use dashboard_gateway::{Gateway, GatewayConfig, GatewayError, HttpGateway};

fn gateway(server: &MockServer) -> HttpGateway {
    HttpGateway::new(GatewayConfig {
        base_url: format!("{}/", server.uri()),
        timeout: Duration::from_secs(2),
    })
    .unwrap()
}

#[tokio::test]
async fn connect_posts_credentials_and_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/binance/connect"))
        .and(body_json(json!({"api_key": "k", "api_secret": "s", "user_id": "default"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "connected"})))
        .expect(1)
        .mount(&server)
        .await;

    gateway(&server)
        .connect(&UserId::default(), &Credentials::new("k", "s"))
        .await
        .unwrap();
}

#[tokio::test]
async fn connect_accepts_empty_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/binance/connect"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    assert!(gateway(&server)
        .connect(&UserId::default(), &Credentials::new("k", "s"))
        .await
        .is_ok());
}

#[tokio::test]
async fn balances_query_by_user_in_arrival_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/binance/balances"))
        .and(query_param("user_id", "desk-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "balances": [
                {"asset": "USDT", "free": "100.0", "locked": "0.0"},
                {"asset": "BTC", "free": "0.01", "locked": "0.0"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let rows = gateway(&server).balances(&UserId::new("desk-7")).await.unwrap();
    let assets: Vec<&str> = rows.iter().map(|b| b.asset.as_str()).collect();
    assert_eq!(assets, ["USDT", "BTC"]);
    assert_eq!(rows[1].free, Decimal::new(1, 2));
}

#[tokio::test]
async fn balances_without_field_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/binance/balances"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    assert!(gateway(&server).balances(&UserId::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_amount_is_reported_with_asset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/binance/balances"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "balances": [{"asset": "ETH", "free": "lots", "locked": "0"}]
        })))
        .mount(&server)
        .await;

    let err = gateway(&server).balances(&UserId::default()).await.unwrap_err();
    assert!(matches!(err, GatewayError::MalformedBalance { ref asset, .. } if asset == "ETH"));
}

#[tokio::test]
async fn non_json_balances_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/binance/balances"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = gateway(&server).balances(&UserId::default()).await.unwrap_err();
    assert!(matches!(err, GatewayError::Decode(_)));
}

#[tokio::test]
async fn unauthorized_carries_gateway_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/binance/balances"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "link Binance first"})))
        .mount(&server)
        .await;

    let err = gateway(&server).balances(&UserId::default()).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(
        err,
        GatewayError::Status { status: 401, message: "link Binance first".into() }
    );
}

#[tokio::test]
async fn order_posts_snapshot_and_returns_opaque_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/binance/order"))
        .and(body_json(json!({
            "symbol": "BTCUSDT",
            "side": "BUY",
            "type": "MARKET",
            "quantity": 0.001,
            "user_id": "default"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"orderId": 123456, "status": "FILLED"})))
        .expect(1)
        .mount(&server)
        .await;

    let order = OrderRequest::market(Symbol::BtcUsdt, Side::Buy, Decimal::new(1, 3)).unwrap();
    let body = gateway(&server).place_order(&UserId::default(), &order).await.unwrap();
    assert_eq!(body["status"], "FILLED");
}

#[tokio::test]
async fn limit_order_sends_price() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/binance/order"))
        .and(body_json(json!({
            "symbol": "ETHUSDT",
            "side": "SELL",
            "type": "LIMIT",
            "quantity": 0.5,
            "price": 3200.5,
            "user_id": "default"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let order = OrderRequest::new(
        Symbol::EthUsdt,
        Side::Sell,
        OrderType::Limit,
        Decimal::new(5, 1),
        Some(Decimal::new(32005, 1)),
    )
    .unwrap();
    let body = gateway(&server).place_order(&UserId::default(), &order).await.unwrap();
    assert!(body.is_null());
}

#[tokio::test]
async fn order_failure_keeps_plain_text_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/binance/order"))
        .respond_with(ResponseTemplate::new(400).set_body_string("order failed"))
        .mount(&server)
        .await;

    let order = OrderRequest::market(Symbol::BtcUsdt, Side::Sell, Decimal::ONE).unwrap();
    let err = gateway(&server).place_order(&UserId::default(), &order).await.unwrap_err();
    assert_eq!(err, GatewayError::Status { status: 400, message: "order failed".into() });
}

#[tokio::test]
async fn slow_gateway_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/binance/connect"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let gw = HttpGateway::new(GatewayConfig {
        base_url: server.uri(),
        timeout: Duration::from_millis(50),
    })
    .unwrap();
    let err = gw
        .connect(&UserId::default(), &Credentials::new("k", "s"))
        .await
        .unwrap_err();
    assert_eq!(err, GatewayError::Timeout);
}

#[tokio::test]
async fn unreachable_gateway_is_a_transport_error() {
    let gw = HttpGateway::new(GatewayConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout: Duration::from_secs(2),
    })
    .unwrap();
    let err = gw.balances(&UserId::default()).await.unwrap_err();
    assert!(matches!(err, GatewayError::Transport(_) | GatewayError::Timeout));
}
