//! 빗썸 REST 클라이언트.

use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, warn};

use super::signer::{encode_query, BithumbSigner};
use crate::error::ExchangeError;
use crate::normalizer::{wrap_bithumb_envelope, BITHUMB_STATUS_OK};
use crate::traits::ExchangeResult;

/// 주문 내역 조회 페이지 크기.
const ORDERS_PAGE_LIMIT: &str = "10";

/// 빗썸 REST 클라이언트.
///
/// 사용자 상태를 갖지 않으며, 서명기는 요청마다 전달받습니다.
#[derive(Debug, Clone)]
pub struct BithumbClient {
    base_url: String,
    client: Client,
}

impl BithumbClient {
    /// 새 클라이언트 생성.
    ///
    /// # Errors
    /// HTTP 클라이언트 생성에 실패하면 `ExchangeError::NetworkError`를 반환합니다.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> ExchangeResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| {
                ExchangeError::NetworkError(format!("HTTP 클라이언트 생성 실패: {}", e))
            })?;

        Ok(Self::with_client(base_url, client))
    }

    /// 기존 HTTP 클라이언트로 생성.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// 전체 계좌 조회 (`/v1/accounts`).
    pub async fn accounts(&self, signer: &BithumbSigner<'_>) -> ExchangeResult<Vec<Value>> {
        match self.signed_get("/v1/accounts", &[], signer).await? {
            Value::Array(rows) => Ok(rows),
            other => Err(ExchangeError::ParseError(format!(
                "계좌 응답이 배열이 아닙니다: {}",
                json_kind(&other)
            ))),
        }
    }

    /// 주문 내역 조회 (`/v1/orders`).
    ///
    /// 배열 응답은 `{"status":"0000","data":[...]}` 형태로 감싸서 반환합니다.
    pub async fn orders(
        &self,
        signer: &BithumbSigner<'_>,
        market: &str,
        state: &str,
    ) -> ExchangeResult<Value> {
        let params = [
            ("market", market),
            ("state", state),
            ("page", "1"),
            ("limit", ORDERS_PAGE_LIMIT),
            ("order_by", "desc"),
        ];
        let body = self.signed_get("/v1/orders", &params, signer).await?;
        Ok(wrap_bithumb_envelope(body))
    }

    /// 공개 시세의 종가 (`/public/ticker/{pair}`).
    ///
    /// 조회 실패는 `None`으로 처리합니다.
    pub async fn closing_price(&self, pair: &str) -> Option<Decimal> {
        let endpoint = format!("/public/ticker/{}", pair);
        let body = match self.public_get(&endpoint).await {
            Ok(body) => body,
            Err(e) => {
                warn!(pair, error = %e, "[BITHUMB] 현재가 조회 실패");
                return None;
            }
        };

        if body.get("status").and_then(Value::as_str) != Some(BITHUMB_STATUS_OK) {
            warn!(pair, status = ?body.get("status"), "[BITHUMB] 현재가 응답 상태 이상");
            return None;
        }

        body.get("data")
            .and_then(|data| data.get("closing_price"))
            .and_then(parse_decimal)
    }

    /// 공개 API 요청 (인증 불필요).
    async fn public_get(&self, endpoint: &str) -> ExchangeResult<Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        handle_response(response).await
    }

    /// 서명된 API 요청.
    ///
    /// 해시 대상 쿼리와 실제 전송 쿼리는 같은 문자열입니다.
    async fn signed_get(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        signer: &BithumbSigner<'_>,
    ) -> ExchangeResult<Value> {
        let query = encode_query(params);
        let url = if query.is_empty() {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}{}?{}", self.base_url, endpoint, query)
        };

        debug!("GET (signed) {}", endpoint);

        let response = self
            .client
            .get(&url)
            .header("Authorization", signer.authorization(&query)?)
            .send()
            .await?;

        handle_response(response).await
    }
}

/// API 응답 처리.
async fn handle_response(response: reqwest::Response) -> ExchangeResult<Value> {
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        return serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "[BITHUMB] 응답 파싱 실패");
            ExchangeError::ParseError(e.to_string())
        });
    }

    // {"error": {"name": "...", "message": "..."}}
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ExchangeError::Unauthorized(message),
        StatusCode::TOO_MANY_REQUESTS => ExchangeError::RateLimited,
        _ => ExchangeError::ApiError {
            code: status.as_u16() as i32,
            message,
        },
    })
}

/// 문자열 또는 숫자 JSON 값을 Decimal로 파싱.
pub(crate) fn parse_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
