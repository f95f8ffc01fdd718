//! 빗썸 거래소 연동.
//!
//! - [`signer`]: JWT(HS256) 요청 서명과 쿼리 해시
//! - [`client`]: REST 호출과 응답 에러 매핑
//! - [`BithumbAccount`]: 사용자 단위 자산/주문 조회

pub mod client;
pub mod signer;

pub use client::BithumbClient;
pub use signer::{encode_query, query_hash, BithumbClaims, BithumbSigner, QUERY_HASH_ALG};

use async_trait::async_trait;
use cryptobot_core::{CanonicalTrade, CredentialVault, Exchange};
use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::normalizer::normalize_bithumb_orders;
use crate::traits::{AssetHolding, AssetReport, ExchangeAccount, ExchangeResult, TradeQuery};
use client::parse_decimal;

/// 원화 코드. 현재가는 항상 1입니다.
const KRW: &str = "KRW";

/// 빗썸 사용자 계정.
pub struct BithumbAccount {
    vault: Arc<CredentialVault>,
    client: BithumbClient,
}

impl BithumbAccount {
    /// 새 계정 핸들 생성.
    pub fn new(vault: Arc<CredentialVault>, client: BithumbClient) -> Self {
        Self { vault, client }
    }

    /// 계좌 한 줄을 보유 자산으로 변환합니다.
    ///
    /// 평균 매수가가 0이면 현재가로 대체합니다.
    async fn to_holding(&self, row: &Value) -> AssetHolding {
        let text = |key: &str| {
            row.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let number = |key: &str| row.get(key).and_then(parse_decimal).unwrap_or(Decimal::ZERO);

        let currency = text("currency");
        let current_price = if currency.eq_ignore_ascii_case(KRW) {
            Decimal::ONE
        } else {
            self.client
                .closing_price(&format!("{}_{}", currency, KRW))
                .await
                .unwrap_or(Decimal::ZERO)
        };

        let avg_buy_price = match number("avg_buy_price") {
            price if price.is_zero() => current_price,
            price => price,
        };

        AssetHolding {
            currency,
            unit_currency: text("unit_currency"),
            balance: number("balance"),
            locked: number("locked"),
            avg_buy_price,
            current_price,
        }
    }
}

#[async_trait]
impl ExchangeAccount for BithumbAccount {
    fn exchange(&self) -> Exchange {
        Exchange::Bithumb
    }

    #[instrument(skip(self), fields(exchange = "bithumb"))]
    async fn fetch_assets(&self, user_id: &str) -> ExchangeResult<AssetReport> {
        let credential = self.vault.get_credential(user_id, Exchange::Bithumb)?;
        let signer = BithumbSigner::new(credential)?;

        let rows = self.client.accounts(&signer).await?;
        let mut holdings = Vec::with_capacity(rows.len());
        for row in &rows {
            holdings.push(self.to_holding(row).await);
        }

        info!(count = holdings.len(), "[BITHUMB] 자산 조회 완료");
        Ok(AssetReport::Coins(holdings))
    }

    #[instrument(skip(self), fields(exchange = "bithumb"))]
    async fn fetch_trades(
        &self,
        user_id: &str,
        query: &TradeQuery,
    ) -> ExchangeResult<Vec<CanonicalTrade>> {
        let credential = self.vault.get_credential(user_id, Exchange::Bithumb)?;
        let signer = BithumbSigner::new(credential)?;

        let raw = self
            .client
            .orders(&signer, &query.market, &query.state)
            .await?;
        let trades = normalize_bithumb_orders(&raw);

        info!(count = trades.len(), market = %query.market, "[BITHUMB] 주문 내역 조회 완료");
        Ok(trades)
    }
}
