//! 거래소 계정 trait 정의.

use async_trait::async_trait;
use cryptobot_core::{CanonicalTrade, Exchange};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::valuation::UsdKrwRate;
use crate::ExchangeError;

/// 거래소 작업을 위한 Result 타입.
pub type ExchangeResult<T> = Result<T, ExchangeError>;

/// 기본 조회 마켓.
pub const DEFAULT_MARKET: &str = "KRW-BTC";

/// 기본 주문 상태 (미체결).
pub const DEFAULT_ORDER_STATE: &str = "wait";

/// 주문 내역 조회 조건.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TradeQuery {
    /// 마켓 코드 (예: "KRW-BTC")
    #[serde(default = "default_market")]
    pub market: String,
    /// 주문 상태 (예: "wait", "done", "cancel")
    #[serde(default = "default_state")]
    pub state: String,
}

fn default_market() -> String {
    DEFAULT_MARKET.to_string()
}

fn default_state() -> String {
    DEFAULT_ORDER_STATE.to_string()
}

impl Default for TradeQuery {
    fn default() -> Self {
        Self {
            market: default_market(),
            state: default_state(),
        }
    }
}

impl TradeQuery {
    /// 새 조회 조건 생성.
    pub fn new(market: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            market: market.into(),
            state: state.into(),
        }
    }
}

/// 보유 자산 한 줄 (빗썸 계좌 기준).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetHolding {
    /// 화폐 코드 (예: "BTC")
    pub currency: String,
    /// 평가 기준 화폐 (예: "KRW")
    pub unit_currency: String,
    /// 주문 가능 수량
    pub balance: Decimal,
    /// 주문에 묶인 수량
    pub locked: Decimal,
    /// 평균 매수가 (0이면 현재가로 대체됨)
    pub avg_buy_price: Decimal,
    /// 현재가 (조회 실패 시 0)
    pub current_price: Decimal,
}

/// Gate.io 총 잔고 요약.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateioBalanceSummary {
    /// 총 잔고 (USDT 환산)
    pub total_usdt: Decimal,
    /// 적용한 USD/KRW 환율
    pub usd_krw_rate: Decimal,
    /// 환율이 고정 대체값인지 여부
    pub rate_is_fallback: bool,
    /// 원화 환산 추정치
    pub total_krw_estimate: Decimal,
}

impl GateioBalanceSummary {
    /// 총 잔고와 환율로 요약을 만듭니다.
    pub fn new(total_usdt: Decimal, rate: UsdKrwRate) -> Self {
        Self {
            total_usdt,
            usd_krw_rate: rate.rate,
            rate_is_fallback: rate.approximate,
            total_krw_estimate: (total_usdt * rate.rate).round_dp(0),
        }
    }
}

/// 자산 조회 결과.
///
/// 직렬화 형태: `{"coins": [...]}` 또는 `{"summary": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetReport {
    /// 코인별 보유 내역
    Coins(Vec<AssetHolding>),
    /// 총 잔고 요약
    Summary(GateioBalanceSummary),
}

/// 사용자 계정 단위의 거래소 인터페이스.
///
/// 구현체는 저장소에서 자격증명을 읽고, 요청에 서명하고, 응답을
/// 정규화합니다.
#[async_trait]
pub trait ExchangeAccount: Send + Sync {
    /// 거래소 식별자.
    fn exchange(&self) -> Exchange;

    /// 사용자의 보유 자산 조회.
    async fn fetch_assets(&self, user_id: &str) -> ExchangeResult<AssetReport>;

    /// 사용자의 주문/체결 내역 조회.
    async fn fetch_trades(
        &self,
        user_id: &str,
        query: &TradeQuery,
    ) -> ExchangeResult<Vec<CanonicalTrade>>;
}
