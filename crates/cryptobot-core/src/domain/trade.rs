//! 통합 거래 기록.

use serde::{Deserialize, Serialize};

/// 원본 필드가 없거나 null일 때 사용하는 표시 문자열.
pub const INFO_UNAVAILABLE: &str = "정보 없음";

/// 거래소 중립적인 주문/거래 기록.
///
/// 모든 필드는 표시용 문자열입니다. 가격, 수량, 수수료는 거래소가 보낸
/// 문자열 표현을 그대로 유지하여 소수점 정밀도 손실을 막습니다.
///
/// 직렬화 키와 순서는 봇 클라이언트와의 계약입니다:
/// `exchange, symbol, side, price, amount, timestamp, ord_type, paid_fee`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalTrade {
    /// 거래소 표시 이름 (예: "Bithumb")
    pub exchange: String,
    /// 마켓 심볼 (예: "KRW-BTC")
    pub symbol: String,
    /// 주문 방향 (예: "bid", "ask", "buy", "sell", "etc")
    pub side: String,
    /// 주문 가격
    pub price: String,
    /// 주문 수량
    pub amount: String,
    /// 주문 생성 시각
    pub timestamp: String,
    /// 주문 유형 (예: "limit", "price", "market")
    #[serde(rename = "ord_type")]
    pub order_type: String,
    /// 지불한 수수료
    pub paid_fee: String,
}
