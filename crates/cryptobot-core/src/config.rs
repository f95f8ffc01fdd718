//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//! TOML 파일을 먼저 읽고 `CRYPTOBOT__` 접두사 환경 변수로 덮어씁니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 거래소 엔드포인트 설정
    #[serde(default)]
    pub exchange: ExchangeEndpointConfig,
    /// 자격증명 소스 설정
    #[serde(default)]
    pub api: ApiConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 전체 타임아웃 (초)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
    /// span 진입/종료 이벤트 출력 여부
    #[serde(default)]
    pub span_events: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            span_events: false,
        }
    }
}

/// 거래소 REST 엔드포인트 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExchangeEndpointConfig {
    /// 빗썸 REST API 기본 URL
    #[serde(default = "default_bithumb_url")]
    pub bithumb_base_url: String,
    /// Gate.io REST API 기본 URL
    #[serde(default = "default_gateio_url")]
    pub gateio_base_url: String,
    /// 거래소 요청 타임아웃 (초)
    #[serde(default = "default_exchange_timeout")]
    pub timeout_secs: u64,
}

fn default_bithumb_url() -> String {
    "https://api.bithumb.com".to_string()
}
fn default_gateio_url() -> String {
    "https://api.gateio.ws".to_string()
}
fn default_exchange_timeout() -> u64 {
    10
}

impl Default for ExchangeEndpointConfig {
    fn default() -> Self {
        Self {
            bithumb_base_url: default_bithumb_url(),
            gateio_base_url: default_gateio_url(),
            timeout_secs: default_exchange_timeout(),
        }
    }
}

/// 자격증명 소스 설정.
///
/// `bot-access-key_file`이 존재하면 모든 시크릿을 파일에서 읽는
/// 파일 모드가 선택됩니다. 그렇지 않으면 인라인 값을 사용합니다.
#[derive(Clone, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    /// 봇 서명 키 파일 경로 (파일 모드 선택자)
    #[serde(
        rename = "bot-access-key_file",
        alias = "bot_access_key_file",
        default
    )]
    pub bot_access_key_file: Option<PathBuf>,
    /// 봇 서명 키 값 (인라인 모드)
    #[serde(rename = "bot-access-key", alias = "bot_access_key", default)]
    pub bot_access_key: Option<String>,
    /// 거래소 키 설정
    #[serde(default)]
    pub keys: KeysConfig,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bot_access_key_file", &self.bot_access_key_file)
            .field("bot_access_key", &redacted(&self.bot_access_key))
            .field("keys", &self.keys)
            .finish()
    }
}

/// 사용자별 거래소 키 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct KeysConfig {
    /// 키를 등록할 사용자 식별자 (디스코드 사용자 ID)
    #[serde(default, alias = "user-key")]
    pub user_id: Option<String>,
    /// 빗썸 키
    #[serde(default)]
    pub bithumb: ExchangeKeyConfig,
    /// Gate.io 키
    #[serde(default)]
    pub gateio: ExchangeKeyConfig,
}

/// 한 거래소의 키 소스.
#[derive(Clone, Default, Deserialize, Serialize)]
pub struct ExchangeKeyConfig {
    /// API 키 파일 경로 (파일 모드)
    #[serde(default)]
    pub key_file: Option<PathBuf>,
    /// 시크릿 키 파일 경로 (파일 모드)
    #[serde(default)]
    pub secret_file: Option<PathBuf>,
    /// API 키 값 (인라인 모드)
    #[serde(default)]
    pub key: Option<String>,
    /// 시크릿 키 값 (인라인 모드)
    #[serde(default)]
    pub secret: Option<String>,
}

impl fmt::Debug for ExchangeKeyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExchangeKeyConfig")
            .field("key_file", &self.key_file)
            .field("secret_file", &self.secret_file)
            .field("key", &redacted(&self.key))
            .field("secret", &redacted(&self.secret))
            .finish()
    }
}

fn redacted(value: &Option<String>) -> Option<&'static str> {
    value.as_ref().map(|_| "***REDACTED***")
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("CRYPTOBOT")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    ///
    /// `CRYPTOBOT_CONFIG` 환경 변수가 있으면 그 경로를 사용합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        let path = std::env::var("CRYPTOBOT_CONFIG")
            .unwrap_or_else(|_| "config/default.toml".to_string());
        Self::load(path)
    }
}
