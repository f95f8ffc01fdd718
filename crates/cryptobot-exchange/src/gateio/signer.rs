//! Gate.io v4 요청 서명.
//!
//! 서명 문자열:
//! ```text
//! METHOD\n/api/v4/path\nquery\nhex(SHA512(body))\ntimestamp
//! ```
//! 위 문자열의 HMAC-SHA512를 `SIGN` 헤더로, API 키를 `KEY` 헤더로,
//! 초 단위 타임스탬프를 `Timestamp` 헤더로 보냅니다.

use chrono::Utc;
use cryptobot_core::{Credential, Exchange};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha512};

use crate::error::ExchangeError;
use crate::traits::ExchangeResult;

type HmacSha512 = Hmac<Sha512>;

/// 서명된 요청 헤더.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateioSignedHeaders {
    pub key: String,
    pub timestamp: String,
    pub sign: String,
}

impl GateioSignedHeaders {
    /// (헤더 이름, 값) 쌍.
    pub fn pairs(&self) -> [(&'static str, &str); 3] {
        [
            ("KEY", self.key.as_str()),
            ("Timestamp", self.timestamp.as_str()),
            ("SIGN", self.sign.as_str()),
        ]
    }
}

/// 한 사용자의 Gate.io 요청 서명기.
pub struct GateioSigner<'a> {
    credential: &'a Credential,
}

impl<'a> GateioSigner<'a> {
    /// 저장소의 자격증명으로 서명기를 만듭니다.
    ///
    /// # Errors
    /// 키 또는 시크릿이 비어 있으면 `ExchangeError::MissingCredential`.
    pub fn new(credential: &'a Credential) -> ExchangeResult<Self> {
        if !credential.is_complete() {
            return Err(ExchangeError::MissingCredential(format!(
                "{} API 키가 비어 있습니다",
                Exchange::Gateio.display_name()
            )));
        }
        Ok(Self { credential })
    }

    /// 주어진 타임스탬프(초)로 서명합니다.
    pub fn sign_at(
        &self,
        method: &str,
        path: &str,
        query: &str,
        body: &str,
        timestamp_secs: i64,
    ) -> ExchangeResult<GateioSignedHeaders> {
        let body_hash = hex::encode(Sha512::digest(body.as_bytes()));
        let payload = format!(
            "{}\n{}\n{}\n{}\n{}",
            method, path, query, body_hash, timestamp_secs
        );

        let mut mac = HmacSha512::new_from_slice(self.credential.expose_secret().as_bytes())
            .map_err(|e| ExchangeError::Signing(e.to_string()))?;
        mac.update(payload.as_bytes());

        Ok(GateioSignedHeaders {
            key: self.credential.api_key().to_string(),
            timestamp: timestamp_secs.to_string(),
            sign: hex::encode(mac.finalize().into_bytes()),
        })
    }

    /// 현재 시각으로 서명합니다.
    pub fn sign(
        &self,
        method: &str,
        path: &str,
        query: &str,
        body: &str,
    ) -> ExchangeResult<GateioSignedHeaders> {
        self.sign_at(method, path, query, body, Utc::now().timestamp())
    }
}
