//! API 에러 응답 타입.
//!
//! 모든 엔드포인트(인증 미들웨어 포함)가 같은 에러 형식을 사용합니다.
//!
//! ```json
//! {
//!   "code": "EXCHANGE_NOT_LINKED",
//!   "message": "거래소 계정을 먼저 연동해 주세요",
//!   "timestamp": 1738300800
//! }
//! ```

use axum::http::StatusCode;
use axum::Json;
use cryptobot_core::BotError;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// API 에러 응답.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "UNAUTHORIZED", "EXCHANGE_NOT_LINKED")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 에러 발생 타임스탬프 (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiErrorResponse>)>;

/// 에러 분류를 HTTP 응답으로 변환합니다.
///
/// 내부 원인은 로그에만 남기고 호출자에게는 일반적인 메시지를 보냅니다.
pub fn into_api_error(err: impl Into<BotError>) -> (StatusCode, Json<ApiErrorResponse>) {
    let err = err.into();
    let (status, code, message) = match &err {
        BotError::NotConfigured(detail) => {
            warn!(detail = %detail, "거래소 미연동 요청");
            (
                StatusCode::NOT_FOUND,
                "EXCHANGE_NOT_LINKED",
                "거래소 계정을 먼저 연동해 주세요".to_string(),
            )
        }
        BotError::Unauthorized => (
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
            "인증에 실패했습니다".to_string(),
        ),
        BotError::BadRequest(detail) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone()),
        BotError::ExchangeUnavailable { timed_out, message } => {
            warn!(timed_out, error = %message, "거래소 호출 실패");
            if *timed_out {
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    "EXCHANGE_TIMEOUT",
                    "거래소 응답 시간이 초과되었습니다".to_string(),
                )
            } else {
                (
                    StatusCode::BAD_GATEWAY,
                    "EXCHANGE_UNAVAILABLE",
                    "거래소 응답을 받지 못했습니다".to_string(),
                )
            }
        }
        BotError::UnsupportedExchange(detail) => (
            StatusCode::BAD_REQUEST,
            "UNSUPPORTED_EXCHANGE",
            detail.clone(),
        ),
        BotError::Config(detail) | BotError::Internal(detail) => {
            error!(error = %detail, "요청 처리 중 내부 에러");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "서버 내부 오류가 발생했습니다".to_string(),
            )
        }
    };

    (status, Json(ApiErrorResponse::new(code, message)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_response_new() {
        let error = ApiErrorResponse::new("TEST_ERROR", "Test message");
        assert_eq!(error.code, "TEST_ERROR");
        assert!(error.timestamp.is_some());

        let json: serde_json::Value = serde_json::to_value(&error).unwrap();
        assert_eq!(json["message"], "Test message");
        assert!(json["timestamp"].is_i64());
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (BotError::NotConfigured("x".into()), StatusCode::NOT_FOUND, "EXCHANGE_NOT_LINKED"),
            (BotError::Unauthorized, StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            (BotError::BadRequest("nonce".into()), StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            (
                BotError::ExchangeUnavailable { timed_out: true, message: "t".into() },
                StatusCode::GATEWAY_TIMEOUT,
                "EXCHANGE_TIMEOUT",
            ),
            (
                BotError::ExchangeUnavailable { timed_out: false, message: "e".into() },
                StatusCode::BAD_GATEWAY,
                "EXCHANGE_UNAVAILABLE",
            ),
            (
                BotError::UnsupportedExchange("okx".into()),
                StatusCode::BAD_REQUEST,
                "UNSUPPORTED_EXCHANGE",
            ),
            (BotError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        ];

        for (err, status, code) in cases {
            let (actual_status, Json(body)) = into_api_error(err);
            assert_eq!(actual_status, status);
            assert_eq!(body.code, code);
        }
    }

    #[test]
    fn test_internal_detail_not_exposed() {
        let (_, Json(body)) = into_api_error(BotError::Internal("secret path /run/x".into()));
        assert!(!body.message.contains("/run/x"));
    }
}
