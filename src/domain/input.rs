use crate::domain::payment::{PayQuery, PaymentCallback, VerifyQuery};
use crate::error::RelayError;

pub struct PaymentInput {
    pub user_id: u64,
    pub amount: u64,
    pub order_id: String,
    pub duration: u64,
}

pub fn parse_pay_query(query: &PayQuery) -> Result<PaymentInput, RelayError> {
    let missing = RelayError::IncompletePaymentRequest;
    Ok(PaymentInput {
        user_id: positive_int(query.user_id.as_deref()).ok_or(missing("user_id"))?,
        amount: positive_int(query.amount.as_deref()).ok_or(missing("amount"))?,
        order_id: non_empty(query.order_id.as_deref()).ok_or(missing("order_id"))?,
        duration: positive_int(query.duration.as_deref()).ok_or(missing("duration"))?,
    })
}

pub fn parse_verify_query(query: &VerifyQuery) -> Result<PaymentCallback, RelayError> {
    let missing = RelayError::IncompleteCallback;
    Ok(PaymentCallback {
        authority: non_empty(query.authority.as_deref()).ok_or(missing("Authority"))?,
        status: non_empty(query.status.as_deref()).ok_or(missing("Status"))?,
        order_id: non_empty(query.order_id.as_deref()).ok_or(missing("order_id"))?,
        amount: positive_int(query.amount.as_deref()).ok_or(missing("amount"))?,
        duration: positive_int(query.duration.as_deref()).ok_or(missing("duration"))?,
    })
}

/// Returned untrimmed: order ids and authorities must round-trip byte for byte.
fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.filter(|v| !v.trim().is_empty()).map(str::to_string)
}

/// Zero is rejected along with absent and non-numeric values.
fn positive_int(raw: Option<&str>) -> Option<u64> {
    raw.map(str::trim)
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|v| *v > 0)
}
