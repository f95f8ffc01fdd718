//! 봇 요청 인증.
//!
//! 서명 검증 자체는 `cryptobot_core::auth`에 있고, 이 모듈은 HTTP 계층의
//! 게이트 역할만 합니다.

mod middleware;

pub use middleware::bot_auth_middleware;
