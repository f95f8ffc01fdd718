//! 디스코드 봇용 REST 게이트웨이.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API (자산, 주문 내역 조회)
//! - 봇 요청 서명(nonce + HMAC-SHA256) 검증 미들웨어
//! - 헬스 체크 엔드포인트
//! - Prometheus 메트릭
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: 봇 서명 검증 미들웨어
//! - [`metrics`]: Prometheus 메트릭 수집
//! - [`middleware`]: HTTP 미들웨어

pub mod auth;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use auth::bot_auth_middleware;
pub use error::{into_api_error, ApiErrorResponse, ApiResult};
pub use metrics::setup_metrics_recorder;
pub use middleware::metrics_layer;
pub use routes::create_api_router;
pub use state::AppState;

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, middleware as axum_middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Prometheus 메트릭 렌더링.
async fn metrics_handler(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}

/// 전체 라우터 생성.
///
/// `/metrics`는 인증 없이 별도 상태로 노출됩니다. `request_timeout`을
/// 넘긴 요청은 408로 끝납니다.
pub fn create_router(
    state: Arc<AppState>,
    metrics_handle: PrometheusHandle,
    request_timeout: Duration,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics_handle);

    Router::new()
        .merge(metrics_router)
        .merge(create_api_router(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    request_timeout,
                )),
        )
        // 메트릭 미들웨어 (모든 요청에 적용)
        .layer(axum_middleware::from_fn(metrics_layer))
}
