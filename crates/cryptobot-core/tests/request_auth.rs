//! 봇 요청 인증 통합 테스트
//!
//! 서버 시각을 고정해 nonce 허용 범위와 서명 검증을 확인합니다.

use std::sync::Arc;

use cryptobot_core::{
    sign_nonce, AuthRejection, BotAuthHeaders, BotError, RequestAuthenticator, VaultBuilder,
    NONCE_WINDOW_MS,
};
use proptest::prelude::*;

const SECRET: &str = "shared-bot-secret";
const SERVER_NOW: i64 = 1_735_689_600_000;

fn authenticator() -> RequestAuthenticator {
    let vault = VaultBuilder::new().bot_secret(SECRET).build();
    RequestAuthenticator::new(Arc::new(vault))
}

#[test]
fn test_current_nonce_accepted() {
    let headers = BotAuthHeaders::generate(SECRET, SERVER_NOW);
    let challenge = authenticator()
        .verify_at(Some(&headers.nonce), Some(&headers.signature), SERVER_NOW)
        .unwrap();

    assert_eq!(challenge.nonce_text, SERVER_NOW.to_string());
    assert_eq!(challenge.skew_ms(SERVER_NOW), 0);
}

#[test]
fn test_nonce_twenty_seconds_old_rejected() {
    let headers = BotAuthHeaders::generate(SECRET, SERVER_NOW - 20_000);
    let rejection = authenticator()
        .verify_at(Some(&headers.nonce), Some(&headers.signature), SERVER_NOW)
        .unwrap_err();

    assert_eq!(rejection, AuthRejection::StaleNonce);
    assert_eq!(rejection.reason(), "stale_nonce");
}

#[test]
fn test_every_single_bit_flip_rejected() {
    let auth = authenticator();
    let nonce = SERVER_NOW.to_string();
    let expected = hex::decode(sign_nonce(SECRET, &nonce)).unwrap();

    for byte in 0..expected.len() {
        for bit in 0..8 {
            let mut tampered = expected.clone();
            tampered[byte] ^= 1 << bit;
            let signature = hex::encode(&tampered);

            assert_eq!(
                auth.verify_at(Some(&nonce), Some(&signature), SERVER_NOW),
                Err(AuthRejection::SignatureMismatch),
                "byte {} bit {}",
                byte,
                bit
            );
        }
    }
}

#[test]
fn test_truncated_signature_rejected() {
    let nonce = SERVER_NOW.to_string();
    let signature = sign_nonce(SECRET, &nonce);

    assert_eq!(
        authenticator().verify_at(Some(&nonce), Some(&signature[..62]), SERVER_NOW),
        Err(AuthRejection::SignatureMismatch)
    );
}

#[test]
fn test_signature_covers_submitted_nonce_text() {
    // 같은 정수라도 다른 문자열이면 다른 서명
    let nonce = format!("+{}", SERVER_NOW);
    let signature = sign_nonce(SECRET, &SERVER_NOW.to_string());

    assert_eq!(
        authenticator().verify_at(Some(&nonce), Some(&signature), SERVER_NOW),
        Err(AuthRejection::SignatureMismatch)
    );

    let signature = sign_nonce(SECRET, &nonce);
    assert!(authenticator()
        .verify_at(Some(&nonce), Some(&signature), SERVER_NOW)
        .is_ok());
}

#[test]
fn test_rejections_map_to_error_taxonomy() {
    assert!(matches!(
        BotError::from(AuthRejection::MissingHeaders),
        BotError::Unauthorized
    ));
    assert!(matches!(
        BotError::from(AuthRejection::SignatureMismatch),
        BotError::Unauthorized
    ));
    assert!(matches!(
        BotError::from(AuthRejection::MalformedNonce),
        BotError::BadRequest(_)
    ));
    assert!(matches!(
        BotError::from(AuthRejection::Internal),
        BotError::Internal(_)
    ));
}

proptest! {
    #[test]
    fn prop_nonce_inside_window_accepted(offset in -(NONCE_WINDOW_MS as i64)..=(NONCE_WINDOW_MS as i64)) {
        let headers = BotAuthHeaders::generate(SECRET, SERVER_NOW + offset);
        let result = authenticator()
            .verify_at(Some(&headers.nonce), Some(&headers.signature), SERVER_NOW);
        prop_assert!(result.is_ok());
    }

    #[test]
    fn prop_nonce_outside_window_rejected(
        distance in (NONCE_WINDOW_MS as i64 + 1)..10_000_000i64,
        future in any::<bool>(),
    ) {
        let nonce = if future { SERVER_NOW + distance } else { SERVER_NOW - distance };
        let headers = BotAuthHeaders::generate(SECRET, nonce);
        let result = authenticator()
            .verify_at(Some(&headers.nonce), Some(&headers.signature), SERVER_NOW);
        prop_assert_eq!(result, Err(AuthRejection::StaleNonce));
    }

    #[test]
    fn prop_non_numeric_nonce_is_malformed(nonce in "[a-zA-Z][a-zA-Z0-9]{0,20}") {
        let result = authenticator().verify_at(Some(&nonce), Some("00"), SERVER_NOW);
        prop_assert_eq!(result, Err(AuthRejection::MalformedNonce));
    }
}
