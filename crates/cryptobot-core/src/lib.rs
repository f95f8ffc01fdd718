//! # Cryptobot Core
//!
//! 봇 게이트웨이의 핵심 도메인 모델과 보안 컴포넌트를 제공합니다.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 거래소 식별자, 자격증명, 통합 거래 기록 타입
//! - 자격증명 저장소 (파일/인라인 로드, 시작 후 불변)
//! - 봇 요청 인증 (nonce 시간 창 + HMAC-SHA256 서명)
//! - 에러 분류 체계
//! - 설정 관리
//! - 로깅 인프라

pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod vault;

pub use auth::{
    sign_nonce, AuthChallenge, AuthRejection, BotAuthHeaders, RequestAuthenticator,
    NONCE_HEADER, NONCE_WINDOW_MS, SIGNATURE_HEADER,
};
pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use vault::{CredentialVault, LoadMode, VaultBuilder, VaultError};
