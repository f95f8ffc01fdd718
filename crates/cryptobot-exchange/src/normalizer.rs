//! 거래소 응답 정규화.
//!
//! 빗썸의 원시 JSON 응답을 [`CanonicalTrade`] 목록으로 변환합니다.
//!
//! - 응답 envelope의 `status`가 `"0000"`이 아니면 빈 목록
//! - `data`가 없거나 배열이 아니면 빈 목록
//! - 값이 없거나 null인 필드는 `"정보 없음"`
//! - 문자열은 그대로, 숫자는 JSON 표기 그대로 복사 (부동소수점 재해석 없음)

use cryptobot_core::{CanonicalTrade, Exchange, INFO_UNAVAILABLE};
use serde_json::{json, Value};
use tracing::{debug, warn};

/// 빗썸 정상 응답 상태 코드.
pub const BITHUMB_STATUS_OK: &str = "0000";

/// 필드 값을 표시용 문자열로 변환합니다.
fn field_text(record: &Value, key: &str) -> String {
    match record.get(key) {
        None | Some(Value::Null) => INFO_UNAVAILABLE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// 응답 envelope에서 레코드 배열을 꺼냅니다.
fn envelope_records<'a>(raw: &'a Value, kind: &str) -> Option<&'a Vec<Value>> {
    let status = raw.get("status").and_then(Value::as_str);
    if status != Some(BITHUMB_STATUS_OK) {
        warn!(kind, status = ?raw.get("status"), "[BITHUMB] 상태 코드가 0000이 아님");
        return None;
    }

    match raw.get("data") {
        Some(Value::Array(records)) => Some(records),
        _ => {
            warn!(kind, "[BITHUMB] data 배열 없음");
            None
        }
    }
}

/// 배열 응답을 정상 envelope로 감쌉니다.
///
/// 빗썸 `/v1/orders`는 envelope 없이 배열만 반환하기도 합니다.
pub fn wrap_bithumb_envelope(body: Value) -> Value {
    match body {
        Value::Array(_) => json!({ "status": BITHUMB_STATUS_OK, "data": body }),
        other => other,
    }
}

/// 빗썸 주문 한 건을 변환합니다.
pub fn normalize_bithumb_order(record: &Value) -> CanonicalTrade {
    CanonicalTrade {
        exchange: Exchange::Bithumb.display_name().to_string(),
        symbol: field_text(record, "market"),
        side: field_text(record, "side"),
        price: field_text(record, "price"),
        amount: field_text(record, "volume"),
        timestamp: field_text(record, "created_at"),
        order_type: field_text(record, "ord_type"),
        paid_fee: field_text(record, "paid_fee"),
    }
}

/// 빗썸 주문 목록 응답을 변환합니다.
pub fn normalize_bithumb_orders(raw: &Value) -> Vec<CanonicalTrade> {
    let Some(records) = envelope_records(raw, "orders") else {
        return Vec::new();
    };

    let trades: Vec<CanonicalTrade> = records.iter().map(normalize_bithumb_order).collect();
    debug!(count = trades.len(), "[BITHUMB] 주문 내역 정규화 완료");
    trades
}

/// 구형 체결 내역의 `search` 코드를 매수/매도로 변환합니다.
fn legacy_side(record: &Value) -> &'static str {
    let code = match record.get("search") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };
    match code.as_str() {
        "1" => "buy",
        "2" => "sell",
        _ => "etc",
    }
}

/// 구형 빗썸 체결 내역 한 건을 변환합니다.
pub fn normalize_bithumb_transaction(record: &Value) -> CanonicalTrade {
    CanonicalTrade {
        exchange: Exchange::Bithumb.display_name().to_string(),
        symbol: field_text(record, "order_currency"),
        side: legacy_side(record).to_string(),
        price: field_text(record, "price"),
        amount: field_text(record, "units_traded"),
        timestamp: field_text(record, "transaction_date"),
        order_type: field_text(record, "ord_type"),
        paid_fee: field_text(record, "paid_fee"),
    }
}

/// 구형 빗썸 체결 내역 목록을 변환합니다.
pub fn normalize_bithumb_transactions(raw: &Value) -> Vec<CanonicalTrade> {
    let Some(records) = envelope_records(raw, "transactions") else {
        return Vec::new();
    };

    records.iter().map(normalize_bithumb_transaction).collect()
}
