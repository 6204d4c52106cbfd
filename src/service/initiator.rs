use crate::config::AppConfig;
use crate::domain::input::parse_pay_query;
use crate::domain::payment::{PayQuery, PaymentRequest};
use crate::error::RelayError;
use crate::gateways::{CreateOutcome, CreatePaymentRequest, PaymentGateway};
use std::sync::Arc;
use url::form_urlencoded;

#[derive(Clone)]
pub struct PaymentInitiator {
    pub config: Arc<AppConfig>,
    pub gateway: Arc<dyn PaymentGateway>,
}

impl PaymentInitiator {
    /// Returns the hosted payment page URL the payer should be redirected to.
    pub async fn initiate(&self, query: &PayQuery) -> Result<String, RelayError> {
        let input = parse_pay_query(query)?;
        let request = PaymentRequest {
            callback_url: callback_url(&self.config, &input.order_id, input.amount, input.duration),
            user_id: input.user_id,
            amount: input.amount,
            order_id: input.order_id,
            duration: input.duration,
        };

        tracing::info!(
            user_id = request.user_id,
            order_id = %request.order_id,
            amount = request.amount,
            gateway = self.gateway.name(),
            "requesting payment"
        );

        let outcome = self
            .gateway
            .create_payment(CreatePaymentRequest {
                merchant_code: self.config.merchant_code.clone(),
                amount: request.amount,
                callback_url: request.callback_url.clone(),
                description: self.config.payment_description.clone(),
            })
            .await
            .map_err(|source| {
                let detail = format!("{source:#}");
                tracing::error!(order_id = %request.order_id, error = %detail, "payment request failed");
                RelayError::GatewayUnavailable {
                    stage: "payment request",
                    source,
                }
            })?;

        match outcome {
            CreateOutcome::Created {
                authority,
                payment_url,
            } => {
                tracing::info!(order_id = %request.order_id, %authority, "redirecting to gateway");
                Ok(payment_url)
            }
            CreateOutcome::Rejected(rejection) => {
                tracing::warn!(
                    order_id = %request.order_id,
                    code = %rejection.code,
                    message = %rejection.message,
                    "gateway rejected payment request"
                );
                Err(RelayError::GatewayRejected {
                    code: rejection.code,
                    message: rejection.message,
                })
            }
        }
    }
}

/// The gateway echoes this URL back verbatim, so it is the only carrier of
/// `order_id`, `amount` and `duration` between the two steps.
pub fn callback_url(config: &AppConfig, order_id: &str, amount: u64, duration: u64) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("order_id", order_id)
        .append_pair("amount", &amount.to_string())
        .append_pair("duration", &duration.to_string())
        .finish();
    format!("{}?{}", config.verify_callback_base(), query)
}
