//! Gate.io v4 REST 클라이언트.

use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

use super::signer::GateioSigner;
use crate::bithumb::encode_query;
use crate::error::ExchangeError;
use crate::traits::ExchangeResult;

/// v4 API 경로 접두사.
const API_PREFIX: &str = "/api/v4";

/// Gate.io REST 클라이언트.
#[derive(Debug, Clone)]
pub struct GateioClient {
    base_url: String,
    client: Client,
}

impl GateioClient {
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

    /// 총 잔고 조회 (`/wallet/total_balance`, USDT 환산).
    ///
    /// `total.amount`가 없으면 0을 반환합니다.
    pub async fn total_balance(&self, signer: &GateioSigner<'_>) -> ExchangeResult<Decimal> {
        let body = self.signed_get("/wallet/total_balance", &[], signer).await?;

        let amount = body
            .get("total")
            .and_then(|total| total.get("amount"))
            .and_then(Value::as_str)
            .map(|s| {
                s.parse::<Decimal>()
                    .map_err(|e| ExchangeError::ParseError(format!("total.amount: {}", e)))
            })
            .transpose()?
            .unwrap_or(Decimal::ZERO);

        debug!(total_usdt = %amount, "[GATE.IO] 총 잔고");
        Ok(amount)
    }

    /// 현물 최종 체결가 (`/spot/tickers?currency_pair=`).
    pub async fn last_price(&self, pair: &str) -> ExchangeResult<Decimal> {
        let body = self
            .public_get("/spot/tickers", &[("currency_pair", pair)])
            .await?;

        body.get(0)
            .and_then(|ticker| ticker.get("last"))
            .and_then(Value::as_str)
            .ok_or_else(|| ExchangeError::ParseError(format!("{} 시세 없음", pair)))?
            .parse::<Decimal>()
            .map_err(|e| ExchangeError::ParseError(format!("{} last: {}", pair, e)))
    }

    /// 공개 API 요청.
    async fn public_get(&self, endpoint: &str, params: &[(&str, &str)]) -> ExchangeResult<Value> {
        let url = self.url(endpoint, &encode_query(params));
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        handle_response(response).await
    }

    /// 서명된 API 요청.
    async fn signed_get(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        signer: &GateioSigner<'_>,
    ) -> ExchangeResult<Value> {
        let query = encode_query(params);
        let path = format!("{}{}", API_PREFIX, endpoint);
        let headers = signer.sign("GET", &path, &query, "")?;

        debug!("GET (signed) {}", path);

        let mut request = self.client.get(self.url(endpoint, &query));
        for (name, value) in headers.pairs() {
            request = request.header(name, value);
        }

        let response = request.send().await?;
        handle_response(response).await
    }

    fn url(&self, endpoint: &str, query: &str) -> String {
        if query.is_empty() {
            format!("{}{}{}", self.base_url, API_PREFIX, endpoint)
        } else {
            format!("{}{}{}?{}", self.base_url, API_PREFIX, endpoint, query)
        }
    }
}

/// API 응답 처리.
///
/// 에러 본문 형식: `{"label": "INVALID_KEY", "message": "..."}`
async fn handle_response(response: reqwest::Response) -> ExchangeResult<Value> {
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        return serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "[GATE.IO] 응답 파싱 실패");
            ExchangeError::ParseError(e.to_string())
        });
    }

    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .map(|v| {
            let label = v.get("label").and_then(Value::as_str).unwrap_or_default();
            let message = v.get("message").and_then(Value::as_str).unwrap_or_default();
            format!("{} {}", label, message).trim().to_string()
        })
        .filter(|m| !m.is_empty())
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
