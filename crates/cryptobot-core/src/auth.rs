//! 봇 요청 인증.
//!
//! 보호된 모든 요청 앞에서 실행되는 무상태 검증기입니다.
//!
//! # 검증 절차
//!
//! 1. `X-Bot-Nonce`, `X-Bot-Signature` 헤더가 모두 있어야 합니다.
//! 2. nonce는 정수(epoch 밀리초)여야 합니다.
//! 3. `|서버 시각 - nonce| <= 10000ms` 이어야 합니다 (양방향 시계 오차 허용).
//! 4. `HMAC-SHA256(봇 시크릿, nonce 문자열)`을 계산합니다.
//! 5. 제출된 서명과 상수 시간으로 비교합니다.
//!
//! 거부 사유는 로그와 메트릭에만 남기고, 호출자에게는 일반적인
//! 메시지만 돌려줍니다.

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;
use thiserror::Error;

use crate::error::BotError;
use crate::vault::{expose_bot_secret, CredentialVault};

type HmacSha256 = Hmac<Sha256>;

/// nonce 헤더 이름.
pub const NONCE_HEADER: &str = "X-Bot-Nonce";

/// 서명 헤더 이름.
pub const SIGNATURE_HEADER: &str = "X-Bot-Signature";

/// nonce 허용 시간 창 (밀리초).
pub const NONCE_WINDOW_MS: u64 = 10_000;

/// 인증 거부 사유.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthRejection {
    #[error("nonce 또는 서명 헤더가 없습니다")]
    MissingHeaders,
    #[error("nonce 형식이 올바르지 않습니다")]
    MalformedNonce,
    #[error("nonce가 허용 시간 범위를 벗어났습니다")]
    StaleNonce,
    #[error("서명이 일치하지 않습니다")]
    SignatureMismatch,
    #[error("서명 검증 중 내부 오류")]
    Internal,
}

impl AuthRejection {
    /// 메트릭/로그 라벨.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthRejection::MissingHeaders => "missing_headers",
            AuthRejection::MalformedNonce => "malformed_nonce",
            AuthRejection::StaleNonce => "stale_nonce",
            AuthRejection::SignatureMismatch => "signature_mismatch",
            AuthRejection::Internal => "internal",
        }
    }
}

impl From<AuthRejection> for BotError {
    fn from(rejection: AuthRejection) -> Self {
        match rejection {
            AuthRejection::MalformedNonce => BotError::BadRequest(rejection.to_string()),
            AuthRejection::Internal => BotError::Internal(rejection.to_string()),
            _ => BotError::Unauthorized,
        }
    }
}

/// 요청에서 추출한 인증 정보.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthChallenge {
    /// nonce (epoch 밀리초)
    pub nonce: i64,
    /// 제출된 nonce 원문 (서명 대상)
    pub nonce_text: String,
    /// 제출된 서명 (hex)
    pub signature: String,
}

impl AuthChallenge {
    /// 헤더 값에서 인증 정보를 추출합니다.
    pub fn parse(nonce: Option<&str>, signature: Option<&str>) -> Result<Self, AuthRejection> {
        let (nonce_text, signature) = match (nonce, signature) {
            (Some(nonce), Some(signature)) => (nonce, signature),
            _ => return Err(AuthRejection::MissingHeaders),
        };

        let nonce = nonce_text
            .parse::<i64>()
            .map_err(|_| AuthRejection::MalformedNonce)?;

        Ok(Self {
            nonce,
            nonce_text: nonce_text.to_string(),
            signature: signature.to_string(),
        })
    }

    /// 서버 시각과의 차이 (밀리초, 절댓값).
    pub fn skew_ms(&self, now_ms: i64) -> u64 {
        now_ms.abs_diff(self.nonce)
    }
}

/// 봇 요청 검증기.
///
/// 저장소의 봇 시크릿만 읽으며 I/O나 공유 가변 상태가 없습니다.
#[derive(Debug, Clone)]
pub struct RequestAuthenticator {
    vault: Arc<CredentialVault>,
}

impl RequestAuthenticator {
    /// 새 검증기 생성.
    pub fn new(vault: Arc<CredentialVault>) -> Self {
        Self { vault }
    }

    /// 현재 시각 기준으로 요청을 검증합니다.
    pub fn verify(
        &self,
        nonce: Option<&str>,
        signature: Option<&str>,
    ) -> Result<AuthChallenge, AuthRejection> {
        self.verify_at(nonce, signature, Utc::now().timestamp_millis())
    }

    /// 주어진 서버 시각(`now_ms`) 기준으로 요청을 검증합니다.
    pub fn verify_at(
        &self,
        nonce: Option<&str>,
        signature: Option<&str>,
        now_ms: i64,
    ) -> Result<AuthChallenge, AuthRejection> {
        let challenge = AuthChallenge::parse(nonce, signature)?;

        if challenge.skew_ms(now_ms) > NONCE_WINDOW_MS {
            return Err(AuthRejection::StaleNonce);
        }

        let secret = self
            .vault
            .bot_secret()
            .map_err(|_| AuthRejection::Internal)?;
        let mut mac = HmacSha256::new_from_slice(expose_bot_secret(secret))
            .map_err(|_| AuthRejection::Internal)?;
        mac.update(challenge.nonce_text.as_bytes());

        // hex 디코딩은 대소문자를 구분하지 않음. verify_slice는 상수 시간 비교.
        let submitted = hex::decode(challenge.signature.to_ascii_lowercase())
            .map_err(|_| AuthRejection::SignatureMismatch)?;
        mac.verify_slice(&submitted)
            .map_err(|_| AuthRejection::SignatureMismatch)?;

        Ok(challenge)
    }
}

/// nonce 문자열에 대한 서명을 계산합니다 (소문자 hex).
pub fn sign_nonce(secret: &str, nonce_text: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(nonce_text.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// 봇 클라이언트가 보내는 인증 헤더 쌍.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotAuthHeaders {
    pub nonce: String,
    pub signature: String,
}

impl BotAuthHeaders {
    /// 주어진 시각으로 헤더를 생성합니다.
    pub fn generate(secret: &str, now_ms: i64) -> Self {
        let nonce = now_ms.to_string();
        let signature = sign_nonce(secret, &nonce);
        Self { nonce, signature }
    }

    /// 현재 시각으로 헤더를 생성합니다.
    pub fn now(secret: &str) -> Self {
        Self::generate(secret, Utc::now().timestamp_millis())
    }

    /// (헤더 이름, 값) 쌍.
    pub fn pairs(&self) -> [(&'static str, &str); 2] {
        [
            (NONCE_HEADER, self.nonce.as_str()),
            (SIGNATURE_HEADER, self.signature.as_str()),
        ]
    }
}
