//! Prometheus 메트릭 설정 및 유틸리티.
//!
//! HTTP 요청 메트릭과 게이트웨이 메트릭(인증 거절, 거래소 호출)을 수집하고
//! `/metrics` 엔드포인트로 노출합니다.

use std::time::Duration;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

const LATENCY_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// Prometheus 메트릭 레코더를 설정하고 핸들을 반환합니다.
///
/// 레코더가 이미 설치되어 있으면 에러를 반환합니다.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            LATENCY_BUCKETS,
        )?
        .set_buckets_for_metric(
            Matcher::Full("exchange_request_duration_seconds".to_string()),
            LATENCY_BUCKETS,
        )?
        .install_recorder()
}

// ============================================================================
// HTTP 메트릭
// ============================================================================

/// HTTP 요청 카운터 증가.
pub fn record_http_request(method: &str, path: &str) {
    counter!("http_requests_total", "method" => method.to_string(), "path" => path.to_string())
        .increment(1);
}

/// HTTP 응답 카운터 증가.
pub fn record_http_response(method: &str, path: &str, status: u16) {
    counter!(
        "http_responses_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// HTTP 요청 지속 시간 기록.
pub fn record_http_duration(method: &str, path: &str, duration_secs: f64) {
    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_secs);
}

// ============================================================================
// 게이트웨이 메트릭
// ============================================================================

/// 봇 인증 거절 카운터 증가.
pub fn record_auth_rejection(reason: &'static str) {
    counter!("bot_auth_rejections_total", "reason" => reason).increment(1);
}

/// 거래소 호출 결과와 소요 시간 기록.
///
/// `outcome`은 "ok" 또는 에러 코드 라벨입니다.
pub fn record_exchange_call(
    exchange: &'static str,
    operation: &'static str,
    outcome: &'static str,
    elapsed: Duration,
) {
    counter!(
        "exchange_requests_total",
        "exchange" => exchange,
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
    histogram!(
        "exchange_request_duration_seconds",
        "exchange" => exchange,
        "operation" => operation
    )
    .record(elapsed.as_secs_f64());
}
