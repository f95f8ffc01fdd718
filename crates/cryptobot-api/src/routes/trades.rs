//! 주문 내역 조회 endpoint.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use cryptobot_core::{CanonicalTrade, Exchange};
use cryptobot_exchange::TradeQuery;
use serde::Deserialize;
use tracing::info;

use super::{bad_query, observe_exchange};
use crate::error::{into_api_error, ApiResult};
use crate::state::AppState;

/// `/api/trades` 쿼리.
#[derive(Debug, Deserialize)]
pub struct TradesQuery {
    pub discord_id: String,
    pub exchange: String,
    /// 마켓과 주문 상태 (기본값 KRW-BTC, wait)
    #[serde(flatten)]
    pub filter: TradeQuery,
}

/// 주문 내역 조회.
///
/// 결과는 거래소 중립 형식(`CanonicalTrade`)의 배열입니다. 거래소가
/// 정상 상태가 아닌 응답을 주면 빈 배열을 반환합니다.
pub async fn trade_history(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TradesQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<CanonicalTrade>>> {
    let Query(query) = query.map_err(|e| into_api_error(bad_query(e)))?;
    let exchange: Exchange = query.exchange.parse().map_err(into_api_error)?;
    let account = state.account(exchange).map_err(into_api_error)?;

    let trades = observe_exchange(
        exchange,
        "trades",
        account.fetch_trades(&query.discord_id, &query.filter),
    )
    .await
    .map_err(into_api_error)?;

    info!(
        exchange = %exchange,
        market = %query.filter.market,
        count = trades.len(),
        "주문 내역 조회 완료"
    );
    Ok(Json(trades))
}

/// 주문 내역 라우터 생성.
pub fn trades_router() -> Router<Arc<AppState>> {
    Router::new().route("/trades", get(trade_history))
}
