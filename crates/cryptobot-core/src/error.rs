//! 봇 게이트웨이의 에러 타입.
//!
//! 컴포넌트별 에러(`VaultError`, `AuthRejection`, 거래소 에러)는 모두
//! 이 모듈의 [`BotError`]로 수렴하며, API 계층은 이 분류만 보고
//! 응답 상태 코드를 결정합니다.

use thiserror::Error;

/// 요청 처리 중 발생하는 에러 분류.
///
/// 메시지에는 절대 시크릿 값이 포함되지 않습니다.
#[derive(Debug, Error)]
pub enum BotError {
    /// 설정 에러 (시작 시점 전용, 치명적)
    #[error("설정 에러: {0}")]
    Config(String),

    /// 사용자/거래소 자격증명 또는 봇 시크릿 미설정
    #[error("자격증명 미설정: {0}")]
    NotConfigured(String),

    /// 인증 실패
    #[error("인증 실패")]
    Unauthorized,

    /// 잘못된 요청
    #[error("잘못된 요청: {0}")]
    BadRequest(String),

    /// 거래소 호출 실패 또는 타임아웃
    #[error("거래소 응답 없음: {message}")]
    ExchangeUnavailable {
        /// 타임아웃으로 인한 실패인지 여부
        timed_out: bool,
        message: String,
    },

    /// 지원하지 않는 거래소/상태 조합
    #[error("지원하지 않는 거래소입니다: {0}")]
    UnsupportedExchange(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_message() {
        let err = BotError::ExchangeUnavailable {
            timed_out: true,
            message: "timeout".to_string(),
        };
        assert_eq!(err.to_string(), "거래소 응답 없음: timeout");
        assert_eq!(BotError::Unauthorized.to_string(), "인증 실패");
    }
}
