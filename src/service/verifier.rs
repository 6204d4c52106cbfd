use crate::config::AppConfig;
use crate::domain::input::parse_verify_query;
use crate::domain::payment::{NotificationPayload, VerifyQuery};
use crate::error::RelayError;
use crate::gateways::{PaymentGateway, VerifyOutcome, VerifyPaymentRequest};
use crate::service::notifier::Notifier;
use std::sync::Arc;
use url::form_urlencoded;

#[derive(Clone)]
pub struct PaymentVerifier {
    pub config: Arc<AppConfig>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub notifier: Arc<dyn Notifier>,
}

impl PaymentVerifier {
    /// Handles one gateway callback end to end. `Ok` carries the redirect
    /// target (success or failure page); `Err` is a terminal error page.
    pub async fn verify(&self, query: &VerifyQuery) -> Result<String, RelayError> {
        let callback = parse_verify_query(query)?;

        if !callback.is_ok() {
            tracing::warn!(order_id = %callback.order_id, status = %callback.status, "payment cancelled by payer");
            return Ok(self.failure_redirect(&[("reason", "cancelled")]));
        }

        let outcome = self
            .gateway
            .verify_payment(VerifyPaymentRequest {
                merchant_code: self.config.merchant_code.clone(),
                status: "OK".to_string(),
                amount: callback.amount,
                authority: callback.authority.clone(),
            })
            .await
            .map_err(|source| {
                let detail = format!("{source:#}");
                tracing::error!(order_id = %callback.order_id, error = %detail, "payment verification failed");
                RelayError::GatewayUnavailable {
                    stage: "payment verification",
                    source,
                }
            })?;

        let ref_id = match outcome {
            VerifyOutcome::Verified { ref_id } => ref_id,
            VerifyOutcome::Rejected(rejection) => {
                tracing::warn!(
                    order_id = %callback.order_id,
                    authority = %callback.authority,
                    code = %rejection.code,
                    message = %rejection.message,
                    "gateway refused verification"
                );
                return Ok(self.failure_redirect(&[
                    ("reason", "verification_failed"),
                    ("error", rejection.code.as_str()),
                ]));
            }
        };

        // TODO: write the notification to a durable outbox and deliver it with
        // backoff so a downstream outage does not strand a settled payment.
        let payload = NotificationPayload::completed(&callback, &ref_id);
        let receipt = self.notifier.notify(&payload).await.map_err(|e| {
            let detail = format!("{e:#}");
            tracing::error!(
                order_id = %callback.order_id,
                ref_id = %ref_id,
                error = %detail,
                "payment settled but downstream notification failed"
            );
            RelayError::NotificationFailed {
                ref_id: ref_id.clone(),
                status: None,
                detail,
            }
        })?;

        if !receipt.is_recorded() {
            tracing::error!(
                order_id = %callback.order_id,
                ref_id = %ref_id,
                status = receipt.status,
                body = %receipt.body,
                "payment settled but downstream did not record it"
            );
            return Err(RelayError::NotificationFailed {
                ref_id,
                status: Some(receipt.status),
                detail: format!("HTTP {}", receipt.status),
            });
        }

        tracing::info!(order_id = %callback.order_id, ref_id = %ref_id, "payment verified and recorded");
        Ok(with_query(&self.config.success_page(), &[("ref_id", ref_id.as_str())]))
    }

    fn failure_redirect(&self, pairs: &[(&str, &str)]) -> String {
        with_query(&self.config.failure_page(), pairs)
    }
}

fn with_query(base: &str, pairs: &[(&str, &str)]) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().copied())
        .finish();
    format!("{base}?{query}")
}
