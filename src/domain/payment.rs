use serde::{Deserialize, Serialize};

/// Raw query of the initiation endpoint. Every field is optional so that a
/// missing value is reported by the relay itself instead of an extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayQuery {
    pub user_id: Option<String>,
    pub amount: Option<String>,
    pub order_id: Option<String>,
    pub duration: Option<String>,
}

/// Raw query of the gateway callback. Zarinpal sends `Authority` and `Status`
/// capitalised; the rest is what we put into the callback URL ourselves.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyQuery {
    #[serde(rename = "Authority")]
    pub authority: Option<String>,
    #[serde(rename = "Status")]
    pub status: Option<String>,
    pub order_id: Option<String>,
    pub amount: Option<String>,
    pub duration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub user_id: u64,
    pub amount: u64,
    pub order_id: String,
    pub duration: u64,
    pub callback_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentCallback {
    pub authority: String,
    pub status: String,
    pub order_id: String,
    pub amount: u64,
    pub duration: u64,
}

impl PaymentCallback {
    pub fn is_ok(&self) -> bool {
        self.status == "OK"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub order_id: String,
    pub status: NotificationStatus,
    pub ref_id: String,
    pub amount: u64,
    pub duration: u64,
}

impl NotificationPayload {
    pub fn completed(callback: &PaymentCallback, ref_id: &str) -> Self {
        Self {
            order_id: callback.order_id.clone(),
            status: NotificationStatus::Completed,
            ref_id: ref_id.to_string(),
            amount: callback.amount,
            duration: callback.duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_serializes_with_downstream_field_names() {
        let callback = PaymentCallback {
            authority: "A1".to_string(),
            status: "OK".to_string(),
            order_id: "ord-1".to_string(),
            amount: 100_000,
            duration: 30,
        };
        let payload = NotificationPayload::completed(&callback, "REF1");
        let v = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "order_id": "ord-1",
                "status": "completed",
                "ref_id": "REF1",
                "amount": 100000,
                "duration": 30
            })
        );
    }

    #[test]
    fn only_exact_ok_status_counts_as_paid() {
        let mut callback = PaymentCallback {
            authority: "A1".to_string(),
            status: "OK".to_string(),
            order_id: "ord-1".to_string(),
            amount: 1,
            duration: 1,
        };
        assert!(callback.is_ok());
        callback.status = "NOK".to_string();
        assert!(!callback.is_ok());
        callback.status = "ok".to_string();
        assert!(!callback.is_ok());
    }
}
