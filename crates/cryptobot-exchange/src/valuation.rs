//! USD/KRW 환율 추정.
//!
//! 별도 환율 소스 없이 BTC 원화 가격(빗썸)과 BTC 달러 가격(Gate.io)의
//! 비율로 환율을 추정합니다. 표시용 근사치이며 평가 기준으로 쓰지 않습니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::warn;

/// 가격을 구할 수 없을 때 사용하는 고정 환율.
pub const FALLBACK_USD_KRW_RATE: Decimal = dec!(1350);

/// 추정 환율.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsdKrwRate {
    /// 1 USD 당 원화
    pub rate: Decimal,
    /// 고정 대체값 사용 여부
    pub approximate: bool,
}

impl UsdKrwRate {
    /// 고정 대체 환율.
    pub fn fallback() -> Self {
        Self {
            rate: FALLBACK_USD_KRW_RATE,
            approximate: true,
        }
    }
}

/// BTC 가격 두 개로 USD/KRW 환율을 추정합니다.
///
/// 두 가격이 모두 양수일 때만 비율을 사용하고, 그 외에는
/// [`FALLBACK_USD_KRW_RATE`]를 반환합니다.
pub fn usd_krw_rate(btc_krw: Option<Decimal>, btc_usdt: Option<Decimal>) -> UsdKrwRate {
    match (btc_krw, btc_usdt) {
        (Some(krw), Some(usdt)) if krw > Decimal::ZERO && usdt > Decimal::ZERO => {
            match krw.checked_div(usdt) {
                Some(rate) => UsdKrwRate {
                    rate: rate.round_dp(2),
                    approximate: false,
                },
                None => UsdKrwRate::fallback(),
            }
        }
        _ => {
            warn!(
                btc_krw = ?btc_krw,
                btc_usdt = ?btc_usdt,
                fallback = %FALLBACK_USD_KRW_RATE,
                "BTC 가격을 구할 수 없어 고정 환율을 사용합니다"
            );
            UsdKrwRate::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_from_btc_prices() {
        let rate = usd_krw_rate(Some(dec!(135000000)), Some(dec!(100000)));
        assert_eq!(rate.rate, dec!(1350));
        assert!(!rate.approximate);

        let rate = usd_krw_rate(Some(dec!(140000000)), Some(dec!(96000)));
        assert_eq!(rate.rate, dec!(1458.33));
    }

    #[test]
    fn test_fallback_when_price_missing_or_zero() {
        for (krw, usdt) in [
            (None, Some(dec!(100000))),
            (Some(dec!(135000000)), None),
            (Some(dec!(135000000)), Some(Decimal::ZERO)),
            (Some(Decimal::ZERO), Some(dec!(100000))),
        ] {
            let rate = usd_krw_rate(krw, usdt);
            assert_eq!(rate, UsdKrwRate::fallback());
            assert_eq!(rate.rate, dec!(1350));
        }
    }
}
