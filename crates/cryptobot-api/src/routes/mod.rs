//! API 라우트 모듈.
//!
//! - `/health`: 헬스 체크 (인증 없음)
//! - `/api/my-assets`, `/api/assets/exchange`: 자산 조회
//! - `/api/trades`: 주문 내역 조회
//!
//! `/api/**` 라우트는 모두 봇 서명 검증 미들웨어 뒤에 있습니다.

pub mod assets;
pub mod health;
pub mod trades;

pub use assets::{assets_router, exchange_assets, my_assets};
pub use health::{health_check, health_ready, health_router, HealthResponse};
pub use trades::{trade_history, trades_router};

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::{extract::rejection::QueryRejection, middleware, Router};
use cryptobot_core::{BotError, Exchange};
use cryptobot_exchange::ExchangeResult;

use crate::auth::bot_auth_middleware;
use crate::metrics::record_exchange_call;
use crate::state::AppState;

/// 전체 API 라우터 생성.
pub fn create_api_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(assets_router())
        .merge(trades_router())
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            bot_auth_middleware,
        ));

    Router::new()
        .merge(health_router())
        .nest("/api", api)
        .with_state(state)
}

/// 쿼리 파싱 실패를 400 응답용 에러로 변환합니다.
pub(crate) fn bad_query(rejection: QueryRejection) -> BotError {
    BotError::BadRequest(rejection.body_text())
}

/// 거래소 호출 결과와 소요 시간을 메트릭으로 남깁니다.
pub(crate) async fn observe_exchange<T, F>(
    exchange: Exchange,
    operation: &'static str,
    call: F,
) -> ExchangeResult<T>
where
    F: Future<Output = ExchangeResult<T>>,
{
    let start = Instant::now();
    let result = call.await;
    let outcome = match &result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    record_exchange_call(exchange.as_str(), operation, outcome, start.elapsed());
    result
}
