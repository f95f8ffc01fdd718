//! 애플리케이션 상태.
//!
//! 모든 핸들러가 공유하는 상태입니다. 자격증명 저장소는 라우터가 만들어지기
//! 전에 로드되며 이후에는 읽기 전용이므로 잠금 없이 `Arc`로 공유합니다.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use cryptobot_core::{BotError, CredentialVault, Exchange, ExchangeEndpointConfig, RequestAuthenticator};
use cryptobot_exchange::{BithumbAccount, BithumbClient, ExchangeAccount, GateioAccount, GateioClient};

/// 핸들러 공유 상태.
pub struct AppState {
    /// 사용자별 거래소 자격증명과 봇 시크릿
    pub vault: Arc<CredentialVault>,
    /// 봇 요청 검증기
    pub authenticator: RequestAuthenticator,
    /// 거래소별 계정 조회기
    accounts: HashMap<Exchange, Arc<dyn ExchangeAccount>>,
    /// API 버전
    pub version: String,
    /// 서버 시작 시각
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// 거래소 연동 없이 상태를 생성합니다.
    pub fn new(vault: Arc<CredentialVault>) -> Self {
        Self {
            authenticator: RequestAuthenticator::new(Arc::clone(&vault)),
            vault,
            accounts: HashMap::new(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: Utc::now(),
        }
    }

    /// 거래소 계정 조회기를 등록합니다. 같은 거래소는 덮어씁니다.
    pub fn with_account(mut self, account: Arc<dyn ExchangeAccount>) -> Self {
        self.accounts.insert(account.exchange(), account);
        self
    }

    /// 설정의 엔드포인트로 빗썸과 Gate.io 계정 조회기를 구성합니다.
    pub fn from_config(
        vault: Arc<CredentialVault>,
        endpoints: &ExchangeEndpointConfig,
    ) -> Result<Self, BotError> {
        let bithumb = BithumbClient::new(&endpoints.bithumb_base_url, endpoints.timeout_secs)
            .map_err(|e| BotError::Config(format!("빗썸 클라이언트 생성 실패: {}", e)))?;
        let gateio = GateioClient::new(&endpoints.gateio_base_url, endpoints.timeout_secs)
            .map_err(|e| BotError::Config(format!("Gate.io 클라이언트 생성 실패: {}", e)))?;

        let bithumb_account = BithumbAccount::new(Arc::clone(&vault), bithumb.clone());
        let gateio_account = GateioAccount::new(Arc::clone(&vault), gateio, bithumb);

        Ok(Self::new(vault)
            .with_account(Arc::new(bithumb_account))
            .with_account(Arc::new(gateio_account)))
    }

    /// 거래소 계정 조회기를 반환합니다.
    pub fn account(&self, exchange: Exchange) -> Result<&Arc<dyn ExchangeAccount>, BotError> {
        self.accounts
            .get(&exchange)
            .ok_or_else(|| BotError::UnsupportedExchange(exchange.to_string()))
    }

    /// 등록된 거래소 목록.
    pub fn exchanges(&self) -> Vec<Exchange> {
        Exchange::all()
            .into_iter()
            .filter(|exchange| self.accounts.contains_key(exchange))
            .collect()
    }

    /// 서버 가동 시간 (초).
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}
