//! 거래소 식별자.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BotError;

/// 게이트웨이가 연동하는 거래소.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Exchange {
    /// 빗썸
    Bithumb,
    /// 게이트아이오
    Gateio,
}

impl Exchange {
    /// 설정/쿼리에서 사용하는 소문자 식별자.
    pub fn as_str(&self) -> &'static str {
        match self {
            Exchange::Bithumb => "bithumb",
            Exchange::Gateio => "gateio",
        }
    }

    /// 통합 거래 기록에 표시되는 이름.
    pub fn display_name(&self) -> &'static str {
        match self {
            Exchange::Bithumb => "Bithumb",
            Exchange::Gateio => "Gate.io",
        }
    }

    /// 지원하는 모든 거래소.
    pub fn all() -> [Exchange; 2] {
        [Exchange::Bithumb, Exchange::Gateio]
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Exchange {
    type Err = BotError;

    /// 대소문자를 구분하지 않습니다.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bithumb" => Ok(Exchange::Bithumb),
            "gateio" => Ok(Exchange::Gateio),
            _ => Err(BotError::UnsupportedExchange(s.to_string())),
        }
    }
}
