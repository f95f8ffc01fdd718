//! 전체 라우터 통합 테스트
//!
//! 실제 거래소 대신 고정 응답을 돌려주는 계정 구현을 등록하고
//! `oneshot`으로 요청을 보냅니다.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{HeaderValue, Request, StatusCode},
    Router,
};
use cryptobot_api::{create_router, ApiErrorResponse, AppState};
use cryptobot_core::{
    BotAuthHeaders, CanonicalTrade, CredentialVault, Exchange, ExchangeEndpointConfig,
    VaultBuilder, NONCE_HEADER, SIGNATURE_HEADER,
};
use cryptobot_exchange::{
    AssetHolding, AssetReport, ExchangeAccount, ExchangeError, ExchangeResult, TradeQuery,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use rust_decimal_macros::dec;
use serde_json::Value;
use tower::ServiceExt;

const BOT_SECRET: &str = "router-test-secret";
const USER: &str = "123456789012345678";

/// 동작을 고를 수 있는 가짜 거래소 계정.
#[derive(Clone, Copy)]
enum Behavior {
    Succeed,
    TimeOut,
}

struct FakeAccount {
    exchange: Exchange,
    behavior: Behavior,
}

#[async_trait]
impl ExchangeAccount for FakeAccount {
    fn exchange(&self) -> Exchange {
        self.exchange
    }

    async fn fetch_assets(&self, _user_id: &str) -> ExchangeResult<AssetReport> {
        match self.behavior {
            Behavior::Succeed => Ok(AssetReport::Coins(vec![AssetHolding {
                currency: "BTC".to_string(),
                unit_currency: "KRW".to_string(),
                balance: dec!(0.5),
                locked: dec!(0),
                avg_buy_price: dec!(90000000),
                current_price: dec!(95000000),
            }])),
            Behavior::TimeOut => Err(ExchangeError::Timeout("operation timed out".to_string())),
        }
    }

    async fn fetch_trades(
        &self,
        _user_id: &str,
        query: &TradeQuery,
    ) -> ExchangeResult<Vec<CanonicalTrade>> {
        match self.behavior {
            Behavior::Succeed => Ok(vec![CanonicalTrade {
                exchange: self.exchange.display_name().to_string(),
                symbol: query.market.clone(),
                side: "bid".to_string(),
                price: "95000000".to_string(),
                amount: "0.001".to_string(),
                timestamp: "2025-01-01T00:00:00+09:00".to_string(),
                order_type: query.state.clone(),
                paid_fee: "23.75".to_string(),
            }]),
            Behavior::TimeOut => Err(ExchangeError::Timeout("operation timed out".to_string())),
        }
    }
}

fn vault() -> Arc<CredentialVault> {
    Arc::new(VaultBuilder::new().bot_secret(BOT_SECRET).build())
}

fn app_with(state: AppState) -> Router {
    let handle = PrometheusBuilder::new().build_recorder().handle();
    create_router(Arc::new(state), handle, Duration::from_secs(30))
}

fn fake_app(behavior: Behavior) -> Router {
    app_with(AppState::new(vault()).with_account(Arc::new(FakeAccount {
        exchange: Exchange::Bithumb,
        behavior,
    })))
}

fn signed(uri: &str) -> Request<Body> {
    signed_with(uri, BOT_SECRET)
}

fn signed_with(uri: &str, secret: &str) -> Request<Body> {
    let headers = BotAuthHeaders::now(secret);
    let mut builder = Request::builder().uri(uri);
    for (name, value) in headers.pairs() {
        builder = builder.header(name, value);
    }
    builder.body(Body::empty()).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

fn error_code(body: &[u8]) -> String {
    let error: ApiErrorResponse = serde_json::from_slice(body).unwrap();
    error.code
}

#[tokio::test]
async fn test_health_is_public() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(fake_app(Behavior::Succeed), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn test_metrics_is_public() {
    let request = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let (status, _) = send(fake_app(Behavior::Succeed), request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_missing_headers_rejected() {
    let request = Request::builder()
        .uri("/api/my-assets?discord_id=1")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(fake_app(Behavior::Succeed), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_malformed_nonce_is_bad_request() {
    let request = Request::builder()
        .uri("/api/my-assets?discord_id=1")
        .header(NONCE_HEADER, "not-a-number")
        .header(SIGNATURE_HEADER, "00")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(fake_app(Behavior::Succeed), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "BAD_REQUEST");
}

#[tokio::test]
async fn test_undecodable_nonce_is_bad_request() {
    let request = Request::builder()
        .uri("/api/my-assets?discord_id=1")
        .header(NONCE_HEADER, HeaderValue::from_bytes(b"17\xff35").unwrap())
        .header(SIGNATURE_HEADER, "00")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(fake_app(Behavior::Succeed), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "BAD_REQUEST");
}

#[tokio::test]
async fn test_stale_nonce_rejected() {
    let stale = BotAuthHeaders::generate(BOT_SECRET, chrono::Utc::now().timestamp_millis() - 60_000);
    let mut builder = Request::builder().uri("/api/my-assets?discord_id=1");
    for (name, value) in stale.pairs() {
        builder = builder.header(name, value);
    }
    let (status, _) = send(fake_app(Behavior::Succeed), builder.body(Body::empty()).unwrap()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_secret_rejected() {
    let (status, _) = send(
        fake_app(Behavior::Succeed),
        signed_with("/api/my-assets?discord_id=1", "not-the-bot-secret"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_bot_secret_is_internal_error() {
    let app = app_with(AppState::new(Arc::new(VaultBuilder::new().build())));
    let (status, body) = send(app, signed("/api/my-assets?discord_id=1")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_code(&body), "INTERNAL_ERROR");
}

#[tokio::test]
async fn test_my_assets_returns_coins() {
    let (status, body) = send(
        fake_app(Behavior::Succeed),
        signed(&format!("/api/my-assets?discord_id={}", USER)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["coins"][0]["currency"], "BTC");
}

#[tokio::test]
async fn test_missing_discord_id_is_bad_request() {
    let (status, body) = send(fake_app(Behavior::Succeed), signed("/api/my-assets")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "BAD_REQUEST");
}

#[tokio::test]
async fn test_trades_use_default_filter() {
    let (status, body) = send(
        fake_app(Behavior::Succeed),
        signed(&format!("/api/trades?discord_id={}&exchange=BITHUMB", USER)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    let trade = &json[0];
    assert_eq!(trade["exchange"], "Bithumb");
    assert_eq!(trade["symbol"], "KRW-BTC");
    assert_eq!(trade["ord_type"], "wait");
    assert!(trade.get("order_type").is_none());
}

#[tokio::test]
async fn test_unknown_exchange_is_unsupported() {
    let (status, body) = send(
        fake_app(Behavior::Succeed),
        signed("/api/assets/exchange?discord_id=1&exchange=okx"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "UNSUPPORTED_EXCHANGE");
}

#[tokio::test]
async fn test_exchange_timeout_is_gateway_timeout() {
    let (status, body) = send(
        fake_app(Behavior::TimeOut),
        signed("/api/assets/exchange?discord_id=1&exchange=bithumb"),
    )
    .await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(error_code(&body), "EXCHANGE_TIMEOUT");
}

/// 연동되지 않은 거래소 계정은 네트워크 호출 없이 404.
#[tokio::test]
async fn test_unlinked_user_is_not_found() {
    let endpoints = ExchangeEndpointConfig {
        bithumb_base_url: "http://127.0.0.1:9".to_string(),
        gateio_base_url: "http://127.0.0.1:9".to_string(),
        timeout_secs: 1,
    };
    let state = AppState::from_config(vault(), &endpoints).unwrap();
    let (status, body) = send(
        app_with(state),
        signed(&format!("/api/my-assets?discord_id={}", USER)),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "EXCHANGE_NOT_LINKED");
}

#[tokio::test]
async fn test_gateio_trades_unsupported() {
    let state = AppState::from_config(vault(), &ExchangeEndpointConfig::default()).unwrap();
    let (status, body) = send(
        app_with(state),
        signed(&format!("/api/trades?discord_id={}&exchange=gateio", USER)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "UNSUPPORTED_EXCHANGE");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let request = Request::builder().uri("/nowhere").body(Body::empty()).unwrap();
    let (status, _) = send(fake_app(Behavior::Succeed), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
