//! 헬스 체크 endpoint.
//!
//! 인증 없이 접근할 수 있으며 시크릿 값이나 사용자 ID는 노출하지 않습니다.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use cryptobot_core::Exchange;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::state::AppState;

/// 헬스 체크 응답 구조체.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// 전체 서비스 상태 ("healthy" | "unhealthy")
    pub status: String,

    /// API 버전
    pub version: String,

    /// 서버 업타임(초)
    pub uptime_secs: i64,

    /// 현재 시간 (ISO 8601)
    pub timestamp: String,

    /// 개별 컴포넌트 상태
    pub components: ComponentHealth,
}

/// 개별 컴포넌트 상태.
#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// 봇 서명 키
    pub bot_secret: ComponentStatus,

    /// 자격증명 저장소
    pub vault: ComponentStatus,

    /// 빗썸 연동
    pub bithumb: ComponentStatus,

    /// Gate.io 연동
    pub gateio: ComponentStatus,
}

/// 컴포넌트 상태.
#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentStatus {
    /// 상태 ("up" | "down" | "not_configured")
    pub status: String,

    /// 추가 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentStatus {
    /// 정상 상태.
    pub fn up() -> Self {
        Self {
            status: "up".to_string(),
            message: None,
        }
    }

    /// 비정상 상태.
    pub fn down(message: impl Into<String>) -> Self {
        Self {
            status: "down".to_string(),
            message: Some(message.into()),
        }
    }

    /// 미설정 상태.
    pub fn not_configured() -> Self {
        Self {
            status: "not_configured".to_string(),
            message: None,
        }
    }

    /// 정상 상태 + 부가 정보.
    pub fn up_with_info(message: impl Into<String>) -> Self {
        Self {
            status: "up".to_string(),
            message: Some(message.into()),
        }
    }
}

/// Liveness 체크. 프로세스가 살아 있으면 항상 200.
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Readiness 체크.
///
/// 봇 시크릿이 없으면 모든 `/api` 요청이 500으로 끝나므로 503을 반환합니다.
pub async fn health_ready(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let bot_secret = if state.vault.has_bot_secret() {
        ComponentStatus::up()
    } else {
        ComponentStatus::down("봇 서명 키 미설정")
    };

    let vault = ComponentStatus::up_with_info(format!(
        "mode={}, users={}",
        state.vault.mode(),
        state.vault.user_count()
    ));

    let exchanges = state.exchanges();
    let exchange_status = |exchange: Exchange| {
        if exchanges.contains(&exchange) {
            ComponentStatus::up()
        } else {
            ComponentStatus::not_configured()
        }
    };

    let ready = state.vault.has_bot_secret();
    let response = HealthResponse {
        status: if ready { "healthy" } else { "unhealthy" }.to_string(),
        version: state.version.clone(),
        uptime_secs: state.uptime_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        components: ComponentHealth {
            bot_secret,
            vault,
            bithumb: exchange_status(Exchange::Bithumb),
            gateio: exchange_status(Exchange::Gateio),
        },
    };

    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}

/// 헬스 체크 라우터 생성.
pub fn health_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(health_ready))
}
