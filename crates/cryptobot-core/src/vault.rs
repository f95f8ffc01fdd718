//! 자격증명 저장소.
//!
//! 사용자별/거래소별 API 키 쌍과 봇 서명 키를 메모리에 보관합니다.
//!
//! - 프로세스 시작 시 [`CredentialVault::load`]로 한 번만 생성됩니다.
//! - 생성 이후 변경 API가 없으므로 `Arc<CredentialVault>`로 공유하면
//!   잠금 없이 동시에 읽을 수 있습니다.
//! - 로드가 실패하면 저장소 값 자체가 만들어지지 않습니다.
//!
//! ## 로드 모드
//! - **File**: `bot-access-key_file`이 설정된 경우. 모든 시크릿을 파일에서
//!   읽고 앞뒤 공백을 제거합니다. 읽을 수 없는 파일은 치명적 에러입니다.
//! - **Inline**: 그 외. 설정 값을 그대로 사용합니다.

use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::{ApiConfig, ExchangeKeyConfig, KeysConfig};
use crate::domain::{Credential, Exchange};
use crate::error::BotError;

/// 저장소 에러.
///
/// 메시지에는 파일 경로, 사용자 ID, 거래소 이름만 포함되며
/// 시크릿 값은 절대 포함되지 않습니다.
#[derive(Debug, Error)]
pub enum VaultError {
    /// 시작 시점 설정 에러 (치명적)
    #[error("설정 에러: {0}")]
    Config(String),

    /// 사용자/거래소 자격증명 미설정
    #[error("{exchange} API 키가 서버에 설정되지 않았습니다 (user: {user_id})")]
    CredentialNotConfigured { user_id: String, exchange: Exchange },

    /// 봇 서명 키 미설정
    #[error("봇 서명 키(bot-access-key)가 로드되지 않았습니다")]
    BotSecretNotConfigured,
}

impl From<VaultError> for BotError {
    fn from(err: VaultError) -> Self {
        match err {
            VaultError::Config(msg) => BotError::Config(msg),
            other => BotError::NotConfigured(other.to_string()),
        }
    }
}

/// 시크릿 로드 모드.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// 파일 경로에서 읽기 (운영, Docker secrets)
    File,
    /// 설정 값 직접 사용 (개발)
    Inline,
}

impl LoadMode {
    /// 설정에서 로드 모드를 결정합니다.
    ///
    /// `bot-access-key_file`의 존재 여부가 저장소 전체의 모드를 결정합니다.
    pub fn resolve(config: &ApiConfig) -> Self {
        if config.bot_access_key_file.is_some() {
            LoadMode::File
        } else {
            LoadMode::Inline
        }
    }

    /// 한 거래소의 키 쌍을 읽습니다.
    ///
    /// 키 쌍이 설정되지 않았거나 비어 있으면 `Ok(None)`을 반환합니다.
    fn read_pair(
        &self,
        exchange: Exchange,
        source: &ExchangeKeyConfig,
    ) -> Result<Option<(String, String)>, VaultError> {
        let pair = match self {
            LoadMode::File => match (&source.key_file, &source.secret_file) {
                (Some(key_path), Some(secret_path)) => {
                    Some((read_secret(key_path)?, read_secret(secret_path)?))
                }
                (None, None) => None,
                _ => {
                    warn!(
                        exchange = %exchange,
                        "key_file/secret_file 중 하나만 설정됨, 거래소를 등록하지 않습니다"
                    );
                    None
                }
            },
            LoadMode::Inline => match (&source.key, &source.secret) {
                (Some(key), Some(secret)) => Some((key.clone(), secret.clone())),
                _ => None,
            },
        };

        match pair {
            Some((key, secret)) if !key.is_empty() && !secret.is_empty() => {
                Ok(Some((key, secret)))
            }
            Some(_) => {
                warn!(exchange = %exchange, "빈 API 키 또는 시크릿, 거래소를 등록하지 않습니다");
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

impl fmt::Display for LoadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadMode::File => f.write_str("file"),
            LoadMode::Inline => f.write_str("inline"),
        }
    }
}

/// 시크릿 파일을 읽고 앞뒤 공백을 제거합니다.
fn read_secret(path: &Path) -> Result<String, VaultError> {
    std::fs::read_to_string(path)
        .map(|content| content.trim().to_string())
        .map_err(|e| {
            error!(path = %path.display(), error = %e, "시크릿 파일 읽기 실패");
            VaultError::Config(format!(
                "시크릿 파일을 읽을 수 없습니다: {} ({})",
                path.display(),
                e.kind()
            ))
        })
}

fn key_source(keys: &KeysConfig, exchange: Exchange) -> &ExchangeKeyConfig {
    match exchange {
        Exchange::Bithumb => &keys.bithumb,
        Exchange::Gateio => &keys.gateio,
    }
}

/// 불변 자격증명 저장소.
pub struct CredentialVault {
    users: HashMap<String, HashMap<Exchange, Credential>>,
    bot_secret: Option<SecretString>,
    mode: LoadMode,
}

impl CredentialVault {
    /// 설정에서 저장소를 로드합니다.
    ///
    /// # Errors
    /// 파일 모드에서 시크릿 파일을 읽을 수 없으면 `VaultError::Config`를
    /// 반환합니다. 이 경우 프로세스는 트래픽을 받기 전에 종료해야 합니다.
    pub fn load(config: &ApiConfig) -> Result<Self, VaultError> {
        let mode = LoadMode::resolve(config);
        info!(mode = %mode, "Loading credential vault");

        let mut builder = VaultBuilder::new().with_mode(mode);

        let bot_secret = match (mode, &config.bot_access_key_file) {
            (LoadMode::File, Some(path)) => Some(read_secret(path)?),
            _ => config.bot_access_key.clone(),
        };
        match bot_secret {
            Some(secret) if !secret.is_empty() => builder = builder.bot_secret(secret),
            _ => warn!("봇 서명 키가 설정되지 않았습니다. 모든 보호된 요청이 거부됩니다"),
        }

        let mut loaded = Vec::new();
        for exchange in Exchange::all() {
            if let Some((key, secret)) = mode.read_pair(exchange, key_source(&config.keys, exchange))? {
                loaded.push((exchange, Credential::new(key, secret)));
            }
        }

        match config.keys.user_id.as_deref() {
            Some(user_id) if !user_id.is_empty() => {
                for (exchange, credential) in loaded {
                    builder = builder.credential(user_id, exchange, credential);
                }
            }
            _ if !loaded.is_empty() => {
                warn!(
                    count = loaded.len(),
                    "user_id가 설정되지 않아 로드한 거래소 키를 등록하지 않습니다"
                );
            }
            _ => {}
        }

        let vault = builder.build();
        info!(
            mode = %vault.mode,
            users = vault.user_count(),
            has_bot_secret = vault.has_bot_secret(),
            "Credential vault loaded"
        );
        if let Some(user_id) = config.keys.user_id.as_deref().filter(|id| !id.is_empty()) {
            info!(user_id, exchanges = ?vault.linked_exchanges(user_id), "연동된 거래소");
        }
        Ok(vault)
    }

    /// 사용자/거래소의 자격증명을 조회합니다.
    ///
    /// 같은 인자로 여러 번 호출해도 항상 같은 자격증명을 반환합니다.
    ///
    /// # Errors
    /// 사용자를 모르거나, 해당 거래소가 연동되지 않았거나, API 키가 비어
    /// 있으면 `VaultError::CredentialNotConfigured`를 반환합니다.
    pub fn get_credential(&self, user_id: &str, exchange: Exchange) -> Result<&Credential, VaultError> {
        self.users
            .get(user_id)
            .and_then(|exchanges| exchanges.get(&exchange))
            .filter(|credential| credential.is_complete())
            .ok_or_else(|| VaultError::CredentialNotConfigured {
                user_id: user_id.to_string(),
                exchange,
            })
    }

    /// 봇 서명 키를 반환합니다.
    pub fn bot_secret(&self) -> Result<&SecretString, VaultError> {
        self.bot_secret
            .as_ref()
            .ok_or(VaultError::BotSecretNotConfigured)
    }

    /// 봇 서명 키 로드 여부.
    pub fn has_bot_secret(&self) -> bool {
        self.bot_secret.is_some()
    }

    /// 로드 모드.
    pub fn mode(&self) -> LoadMode {
        self.mode
    }

    /// 등록된 사용자 수.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// 사용자가 연동한 거래소 목록.
    pub fn linked_exchanges(&self, user_id: &str) -> Vec<Exchange> {
        let mut exchanges: Vec<Exchange> = self
            .users
            .get(user_id)
            .map(|map| map.keys().copied().collect())
            .unwrap_or_default();
        exchanges.sort_by_key(|e| e.as_str());
        exchanges
    }
}

impl fmt::Debug for CredentialVault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialVault")
            .field("mode", &self.mode)
            .field("users", &self.users.len())
            .field("bot_secret", &self.bot_secret.as_ref().map(|_| "***REDACTED***"))
            .finish()
    }
}

/// 저장소 빌더.
///
/// `build()`가 빌더를 소비하므로 생성된 저장소는 변경할 수 없습니다.
#[derive(Default)]
pub struct VaultBuilder {
    users: HashMap<String, HashMap<Exchange, Credential>>,
    bot_secret: Option<SecretString>,
    mode: Option<LoadMode>,
}

impl VaultBuilder {
    /// 빈 빌더 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 로드 모드를 기록합니다 (기본값: Inline).
    pub fn with_mode(mut self, mode: LoadMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// 봇 서명 키를 설정합니다.
    pub fn bot_secret(mut self, secret: impl Into<String>) -> Self {
        self.bot_secret = Some(SecretString::from(secret.into()));
        self
    }

    /// 사용자 자격증명을 등록합니다.
    ///
    /// 키나 시크릿이 비어 있는 자격증명은 등록하지 않습니다.
    pub fn credential(
        mut self,
        user_id: impl Into<String>,
        exchange: Exchange,
        credential: Credential,
    ) -> Self {
        let user_id = user_id.into();
        if !credential.is_complete() {
            warn!(user_id = %user_id, exchange = %exchange, "불완전한 자격증명은 등록하지 않습니다");
            return self;
        }
        self.users
            .entry(user_id)
            .or_default()
            .insert(exchange, credential);
        self
    }

    /// 저장소를 생성합니다.
    pub fn build(self) -> CredentialVault {
        CredentialVault {
            users: self.users,
            bot_secret: self.bot_secret,
            mode: self.mode.unwrap_or(LoadMode::Inline),
        }
    }
}

/// 봇 서명 키를 바이트로 노출합니다 (HMAC 키 용도).
pub(crate) fn expose_bot_secret(secret: &SecretString) -> &[u8] {
    secret.expose_secret().as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExchangeKeyConfig;

    fn inline_config() -> ApiConfig {
        ApiConfig {
            bot_access_key_file: None,
            bot_access_key: Some("bot-secret".to_string()),
            keys: KeysConfig {
                user_id: Some("user-1".to_string()),
                bithumb: ExchangeKeyConfig {
                    key: Some("bithumb-key".to_string()),
                    secret: Some("bithumb-secret".to_string()),
                    ..Default::default()
                },
                gateio: ExchangeKeyConfig::default(),
            },
        }
    }

    #[test]
    fn test_resolve_mode() {
        let mut config = inline_config();
        assert_eq!(LoadMode::resolve(&config), LoadMode::Inline);

        config.bot_access_key_file = Some("/run/secrets/bot".into());
        assert_eq!(LoadMode::resolve(&config), LoadMode::File);
    }

    #[test]
    fn test_inline_load() {
        let vault = CredentialVault::load(&inline_config()).unwrap();

        assert_eq!(vault.mode(), LoadMode::Inline);
        let credential = vault.get_credential("user-1", Exchange::Bithumb).unwrap();
        assert_eq!(credential.api_key(), "bithumb-key");
        assert_eq!(credential.expose_secret(), "bithumb-secret");
        assert_eq!(vault.bot_secret().unwrap().expose_secret(), "bot-secret");
    }

    #[test]
    fn test_missing_exchange_is_not_configured() {
        let vault = CredentialVault::load(&inline_config()).unwrap();

        let err = vault.get_credential("user-1", Exchange::Gateio).unwrap_err();
        assert!(matches!(
            err,
            VaultError::CredentialNotConfigured { exchange: Exchange::Gateio, .. }
        ));
    }

    #[test]
    fn test_unknown_user_is_not_configured() {
        let vault = CredentialVault::load(&inline_config()).unwrap();

        let err = vault.get_credential("unknownUser", Exchange::Bithumb).unwrap_err();
        assert!(matches!(err, VaultError::CredentialNotConfigured { .. }));
        assert!(matches!(BotError::from(err), BotError::NotConfigured(_)));
    }

    #[test]
    fn test_get_credential_idempotent() {
        let vault = CredentialVault::load(&inline_config()).unwrap();

        let first = vault.get_credential("user-1", Exchange::Bithumb).unwrap();
        let second = vault.get_credential("user-1", Exchange::Bithumb).unwrap();
        assert_eq!(first.api_key(), second.api_key());
        assert_eq!(first.expose_secret(), second.expose_secret());
    }

    #[test]
    fn test_incomplete_inline_pair_not_registered() {
        let mut config = inline_config();
        config.keys.gateio.key = Some("gate-key".to_string());
        config.keys.gateio.secret = Some(String::new());

        let vault = CredentialVault::load(&config).unwrap();
        assert!(vault.get_credential("user-1", Exchange::Gateio).is_err());
        assert_eq!(vault.linked_exchanges("user-1"), vec![Exchange::Bithumb]);
    }

    #[test]
    fn test_missing_bot_secret() {
        let mut config = inline_config();
        config.bot_access_key = None;

        let vault = CredentialVault::load(&config).unwrap();
        assert!(!vault.has_bot_secret());
        assert!(matches!(
            vault.bot_secret(),
            Err(VaultError::BotSecretNotConfigured)
        ));
    }

    #[test]
    fn test_missing_user_id_registers_nothing() {
        let mut config = inline_config();
        config.keys.user_id = None;

        let vault = CredentialVault::load(&config).unwrap();
        assert_eq!(vault.user_count(), 0);
    }

    #[test]
    fn test_builder_skips_incomplete_credentials() {
        let vault = VaultBuilder::new()
            .credential("a", Exchange::Bithumb, Credential::new("", "secret"))
            .credential("b", Exchange::Gateio, Credential::new("key", "secret"))
            .build();

        assert!(vault.get_credential("a", Exchange::Bithumb).is_err());
        assert!(vault.get_credential("b", Exchange::Gateio).is_ok());
        assert_eq!(vault.user_count(), 1);
    }

    #[test]
    fn test_debug_redacts_bot_secret() {
        let vault = VaultBuilder::new().bot_secret("do-not-print").build();
        let debug_str = format!("{:?}", vault);
        assert!(!debug_str.contains("do-not-print"));
    }
}
