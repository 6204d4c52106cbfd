use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod mock;
pub mod zarinpal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePaymentRequest {
    pub merchant_code: String,
    pub amount: u64,
    pub callback_url: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyPaymentRequest {
    pub merchant_code: String,
    /// Always `"OK"`: verification is only attempted for callbacks the gateway marked paid.
    pub status: String,
    pub amount: u64,
    pub authority: String,
}

/// A structured refusal from the gateway, as opposed to a transport failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayRejection {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created { authority: String, payment_url: String },
    Rejected(GatewayRejection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    Verified { ref_id: String },
    Rejected(GatewayRejection),
}

/// `Err` is reserved for transport problems (timeouts, refused connections,
/// unparseable bodies); business failures come back as `Rejected`.
#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync {
    fn name(&self) -> &'static str;

    async fn create_payment(&self, request: CreatePaymentRequest) -> Result<CreateOutcome>;

    async fn verify_payment(&self, request: VerifyPaymentRequest) -> Result<VerifyOutcome>;
}
