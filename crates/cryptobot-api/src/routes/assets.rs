//! 자산 조회 endpoint.
//!
//! - `GET /api/my-assets?discord_id=..`: 빗썸 보유 코인
//! - `GET /api/assets/exchange?discord_id=..&exchange=..`: 거래소별 자산

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use cryptobot_core::Exchange;
use cryptobot_exchange::AssetReport;
use serde::Deserialize;
use tracing::info;

use super::{bad_query, observe_exchange};
use crate::error::{into_api_error, ApiResult};
use crate::state::AppState;

/// `/api/my-assets` 쿼리.
#[derive(Debug, Deserialize)]
pub struct MyAssetsQuery {
    /// 디스코드 사용자 ID
    pub discord_id: String,
}

/// `/api/assets/exchange` 쿼리.
#[derive(Debug, Deserialize)]
pub struct ExchangeAssetsQuery {
    pub discord_id: String,
    /// 거래소 이름 (대소문자 무시)
    pub exchange: String,
}

/// 빗썸 보유 자산 조회.
pub async fn my_assets(
    State(state): State<Arc<AppState>>,
    query: Result<Query<MyAssetsQuery>, QueryRejection>,
) -> ApiResult<Json<AssetReport>> {
    let Query(query) = query.map_err(|e| into_api_error(bad_query(e)))?;
    fetch_assets(&state, &query.discord_id, Exchange::Bithumb).await
}

/// 거래소별 자산 조회.
///
/// 빗썸은 코인 목록, Gate.io는 총 잔고 요약을 반환합니다.
pub async fn exchange_assets(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ExchangeAssetsQuery>, QueryRejection>,
) -> ApiResult<Json<AssetReport>> {
    let Query(query) = query.map_err(|e| into_api_error(bad_query(e)))?;
    let exchange: Exchange = query.exchange.parse().map_err(into_api_error)?;
    fetch_assets(&state, &query.discord_id, exchange).await
}

async fn fetch_assets(
    state: &AppState,
    user_id: &str,
    exchange: Exchange,
) -> ApiResult<Json<AssetReport>> {
    let account = state.account(exchange).map_err(into_api_error)?;
    let report = observe_exchange(exchange, "assets", account.fetch_assets(user_id))
        .await
        .map_err(into_api_error)?;

    info!(exchange = %exchange, "자산 조회 완료");
    Ok(Json(report))
}

/// 자산 조회 라우터 생성.
pub fn assets_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/my-assets", get(my_assets))
        .route("/assets/exchange", get(exchange_assets))
}
