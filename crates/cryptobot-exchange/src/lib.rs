//! 거래소 요청 서명 및 응답 정규화.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - ExchangeAccount trait: 사용자 단위 자산/주문 조회 인터페이스
//! - 빗썸 커넥터 (JWT 서명, REST)
//! - Gate.io 커넥터 (v4 HMAC-SHA512 서명, REST)
//! - 빗썸 주문/체결 응답 정규화
//! - BTC 가격 기반 USD/KRW 환율 추정

pub mod bithumb;
pub mod error;
pub mod gateio;
pub mod normalizer;
pub mod traits;
pub mod valuation;

pub use bithumb::{BithumbAccount, BithumbClient, BithumbSigner};
pub use error::*;
pub use gateio::{GateioAccount, GateioClient, GateioSigner};
pub use normalizer::{
    normalize_bithumb_order, normalize_bithumb_orders, normalize_bithumb_transaction,
    normalize_bithumb_transactions, wrap_bithumb_envelope,
};
pub use traits::*;
pub use valuation::{usd_krw_rate, UsdKrwRate, FALLBACK_USD_KRW_RATE};
