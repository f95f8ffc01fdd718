//! 거래소 에러 타입.

use cryptobot_core::{BotError, VaultError};
use thiserror::Error;

/// 거래소 관련 에러.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// 네트워크/연결 에러
    #[error("Network error: {0}")]
    NetworkError(String),

    /// 타임아웃
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// 거래소가 API 키를 거부함
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 요청 한도 초과
    #[error("Rate limit exceeded")]
    RateLimited,

    /// API 에러 코드
    #[error("API error {code}: {message}")]
    ApiError { code: i32, message: String },

    /// 파싱/역직렬화 에러
    #[error("Parse error: {0}")]
    ParseError(String),

    /// 서명에 필요한 키 재료 없음 (네트워크 호출 전 실패)
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// 요청 서명 실패
    #[error("Signing error: {0}")]
    Signing(String),

    /// 자격증명 저장소 설정 에러 (서버 측 문제)
    #[error("Configuration error: {0}")]
    Config(String),

    /// 지원되지 않는 작업
    #[error("Not supported: {0}")]
    NotSupported(String),
}

impl ExchangeError {
    /// 메트릭 라벨용 에러 종류.
    pub fn kind(&self) -> &'static str {
        match self {
            ExchangeError::NetworkError(_) => "network",
            ExchangeError::Timeout(_) => "timeout",
            ExchangeError::Unauthorized(_) => "unauthorized",
            ExchangeError::RateLimited => "rate_limited",
            ExchangeError::ApiError { .. } => "api_error",
            ExchangeError::ParseError(_) => "parse",
            ExchangeError::MissingCredential(_) => "missing_credential",
            ExchangeError::Signing(_) => "signing",
            ExchangeError::Config(_) => "config",
            ExchangeError::NotSupported(_) => "not_supported",
        }
    }
}

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExchangeError::Timeout(err.to_string())
        } else if err.is_connect() {
            ExchangeError::NetworkError(err.to_string())
        } else if err.is_decode() {
            ExchangeError::ParseError(err.to_string())
        } else {
            ExchangeError::NetworkError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ExchangeError {
    fn from(err: serde_json::Error) -> Self {
        ExchangeError::ParseError(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for ExchangeError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        ExchangeError::Signing(err.to_string())
    }
}

impl From<VaultError> for ExchangeError {
    fn from(err: VaultError) -> Self {
        match err {
            VaultError::CredentialNotConfigured { .. } | VaultError::BotSecretNotConfigured => {
                ExchangeError::MissingCredential(err.to_string())
            }
            VaultError::Config(message) => ExchangeError::Config(message),
        }
    }
}

impl From<ExchangeError> for BotError {
    fn from(err: ExchangeError) -> Self {
        match err {
            ExchangeError::Timeout(message) => BotError::ExchangeUnavailable {
                timed_out: true,
                message,
            },
            ExchangeError::MissingCredential(message) => BotError::NotConfigured(message),
            ExchangeError::NotSupported(message) => BotError::UnsupportedExchange(message),
            ExchangeError::Signing(message) => BotError::Internal(message),
            ExchangeError::Config(message) => BotError::Config(message),
            other => BotError::ExchangeUnavailable {
                timed_out: false,
                message: other.to_string(),
            },
        }
    }
}
