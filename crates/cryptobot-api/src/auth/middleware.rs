//! 봇 요청 서명 검증 미들웨어.
//!
//! `/api/**` 라우트 앞에 놓여 `X-Bot-Nonce`, `X-Bot-Signature` 헤더를
//! 검증합니다. 검증이 끝나기 전에는 핸들러(거래소 호출)가 실행되지 않습니다.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use cryptobot_core::{AuthRejection, NONCE_HEADER, SIGNATURE_HEADER};
use tracing::warn;

use crate::error::into_api_error;
use crate::metrics::record_auth_rejection;
use crate::state::AppState;

/// 봇 서명 검증 미들웨어.
///
/// 거절 사유는 로그와 메트릭 라벨로만 남고 응답 본문에는 일반 메시지만
/// 들어갑니다.
pub async fn bot_auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let verdict = verify_headers(&state, request.headers());

    match verdict {
        Ok(_) => next.run(request).await,
        Err(rejection) => reject(rejection),
    }
}

/// 헤더가 없으면 401, 있지만 문자열로 읽을 수 없는 nonce는 400입니다.
fn verify_headers(state: &AppState, headers: &HeaderMap) -> Result<(), AuthRejection> {
    let (nonce, signature) = match (headers.get(NONCE_HEADER), headers.get(SIGNATURE_HEADER)) {
        (Some(nonce), Some(signature)) => (nonce, signature),
        _ => return Err(AuthRejection::MissingHeaders),
    };

    let nonce = nonce.to_str().map_err(|_| AuthRejection::MalformedNonce)?;
    // 읽을 수 없는 서명은 빈 서명으로 검증되어 불일치로 끝남
    let signature = signature.to_str().unwrap_or_default();

    state
        .authenticator
        .verify(Some(nonce), Some(signature))
        .map(|_| ())
}

fn reject(rejection: AuthRejection) -> Response {
    let reason = rejection.reason();
    record_auth_rejection(reason);
    warn!(reason, "봇 요청 인증 거절");
    into_api_error(rejection).into_response()
}
