//! Gate.io 거래소 연동.
//!
//! 총 잔고(USDT 환산)와 원화 추정치만 제공합니다. 주문 내역 조회는
//! 지원하지 않습니다.

pub mod client;
pub mod signer;

pub use client::GateioClient;
pub use signer::{GateioSignedHeaders, GateioSigner};

use async_trait::async_trait;
use cryptobot_core::{CanonicalTrade, CredentialVault, Exchange};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::bithumb::BithumbClient;
use crate::error::ExchangeError;
use crate::traits::{AssetReport, ExchangeAccount, ExchangeResult, GateioBalanceSummary, TradeQuery};
use crate::valuation::usd_krw_rate;

/// Gate.io 사용자 계정.
///
/// 원화 환산에 빗썸 BTC 시세가 필요하므로 빗썸 공개 API 클라이언트를
/// 함께 보관합니다.
pub struct GateioAccount {
    vault: Arc<CredentialVault>,
    client: GateioClient,
    krw_quotes: BithumbClient,
}

impl GateioAccount {
    /// 새 계정 핸들 생성.
    pub fn new(vault: Arc<CredentialVault>, client: GateioClient, krw_quotes: BithumbClient) -> Self {
        Self {
            vault,
            client,
            krw_quotes,
        }
    }
}

#[async_trait]
impl ExchangeAccount for GateioAccount {
    fn exchange(&self) -> Exchange {
        Exchange::Gateio
    }

    #[instrument(skip(self), fields(exchange = "gateio"))]
    async fn fetch_assets(&self, user_id: &str) -> ExchangeResult<AssetReport> {
        let credential = self.vault.get_credential(user_id, Exchange::Gateio)?;
        let signer = GateioSigner::new(credential)?;

        let total_usdt = self.client.total_balance(&signer).await?;

        let btc_krw = self.krw_quotes.closing_price("BTC_KRW").await;
        let btc_usdt = match self.client.last_price("BTC_USDT").await {
            Ok(price) => Some(price),
            Err(e) => {
                warn!(error = %e, "[GATE.IO] BTC_USDT 시세 조회 실패");
                None
            }
        };
        let rate = usd_krw_rate(btc_krw, btc_usdt);

        let summary = GateioBalanceSummary::new(total_usdt, rate);
        info!(
            total_usdt = %summary.total_usdt,
            usd_krw_rate = %summary.usd_krw_rate,
            rate_is_fallback = summary.rate_is_fallback,
            "[GATE.IO] 총 잔고 조회 완료"
        );
        Ok(AssetReport::Summary(summary))
    }

    async fn fetch_trades(
        &self,
        _user_id: &str,
        _query: &TradeQuery,
    ) -> ExchangeResult<Vec<CanonicalTrade>> {
        Err(ExchangeError::NotSupported(format!(
            "{} 주문 내역 조회는 지원하지 않습니다",
            Exchange::Gateio.display_name()
        )))
    }
}
