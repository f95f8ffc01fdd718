//! 빗썸 JWT 요청 서명.
//!
//! 빗썸 v1 API는 `Authorization: Bearer <JWT>` 헤더로 인증합니다.
//! 토큰은 사용자 시크릿으로 HS256 서명하며, 쿼리 파라미터가 있는
//! 요청은 쿼리 문자열의 SHA-512 해시를 클레임에 포함합니다.

use chrono::Utc;
use cryptobot_core::{Credential, Exchange};
use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use uuid::Uuid;

use crate::error::ExchangeError;
use crate::traits::ExchangeResult;

/// 쿼리 해시 알고리즘 이름.
pub const QUERY_HASH_ALG: &str = "SHA512";

/// 빗썸 JWT 클레임.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BithumbClaims {
    pub access_key: String,
    pub nonce: String,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_hash_alg: Option<String>,
}

/// 파라미터를 `application/x-www-form-urlencoded` 형식으로 직렬화합니다.
///
/// 파라미터 순서는 유지되며, 이 문자열이 그대로 해시되고 전송됩니다.
pub fn encode_query(params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return String::new();
    }
    Url::parse_with_params("http://localhost/", params)
        .ok()
        .and_then(|url| url.query().map(str::to_string))
        .unwrap_or_default()
}

/// 쿼리 문자열의 SHA-512 해시 (소문자 hex, 128자).
pub fn query_hash(query: &str) -> String {
    hex::encode(Sha512::digest(query.as_bytes()))
}

/// 한 사용자의 빗썸 요청 서명기.
pub struct BithumbSigner<'a> {
    credential: &'a Credential,
}

impl<'a> BithumbSigner<'a> {
    /// 저장소의 자격증명으로 서명기를 만듭니다.
    ///
    /// # Errors
    /// 키 또는 시크릿이 비어 있으면 `ExchangeError::MissingCredential`.
    pub fn new(credential: &'a Credential) -> ExchangeResult<Self> {
        if !credential.is_complete() {
            return Err(ExchangeError::MissingCredential(format!(
                "{} API 키가 비어 있습니다",
                Exchange::Bithumb.display_name()
            )));
        }
        Ok(Self { credential })
    }

    /// 클레임을 만듭니다. 빈 쿼리는 해시 클레임을 생략합니다.
    pub fn claims_at(&self, query: &str, timestamp_ms: i64) -> BithumbClaims {
        let (query_hash, query_hash_alg) = if query.is_empty() {
            (None, None)
        } else {
            (Some(query_hash(query)), Some(QUERY_HASH_ALG.to_string()))
        };

        BithumbClaims {
            access_key: self.credential.api_key().to_string(),
            nonce: Uuid::new_v4().to_string(),
            timestamp: timestamp_ms,
            query_hash,
            query_hash_alg,
        }
    }

    /// 서명된 JWT를 만듭니다.
    pub fn token(&self, query: &str) -> ExchangeResult<String> {
        let claims = self.claims_at(query, Utc::now().timestamp_millis());
        let key = EncodingKey::from_secret(self.credential.expose_secret().as_bytes());
        Ok(encode(&Header::default(), &claims, &key)?)
    }

    /// `Authorization` 헤더 값.
    pub fn authorization(&self, query: &str) -> ExchangeResult<String> {
        Ok(format!("Bearer {}", self.token(query)?))
    }
}
