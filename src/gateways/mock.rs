use crate::gateways::{
    CreateOutcome, CreatePaymentRequest, GatewayRejection, PaymentGateway, VerifyOutcome,
    VerifyPaymentRequest,
};
use anyhow::{bail, Result};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    Create(CreatePaymentRequest),
    Verify(VerifyPaymentRequest),
}

/// Offline stand-in for the real gateway. Behaviour is one of
/// `ALWAYS_SUCCESS` (default), `ALWAYS_FAILURE` or `ALWAYS_TIMEOUT`.
#[derive(Clone)]
pub struct MockGateway {
    pub behavior: String,
    pub start_pay_url: String,
    /// Fixed ref id for verifications; a fresh one is generated when unset.
    pub ref_id: Option<String>,
    calls: Arc<Mutex<Vec<GatewayCall>>>,
}

impl MockGateway {
    pub fn new(behavior: impl Into<String>, start_pay_url: impl Into<String>) -> Self {
        Self {
            behavior: behavior.into(),
            start_pay_url: start_pay_url.into(),
            ref_id: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_ref_id(mut self, ref_id: impl Into<String>) -> Self {
        self.ref_id = Some(ref_id.into());
        self
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: GatewayCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn rejection(&self) -> Option<GatewayRejection> {
        (self.behavior == "ALWAYS_FAILURE").then(|| GatewayRejection {
            code: "-9".to_string(),
            message: "mock decline".to_string(),
        })
    }
}

#[async_trait::async_trait]
impl PaymentGateway for MockGateway {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_payment(&self, request: CreatePaymentRequest) -> Result<CreateOutcome> {
        self.record(GatewayCall::Create(request));
        if self.behavior == "ALWAYS_TIMEOUT" {
            bail!("mock gateway timeout");
        }
        if let Some(rejection) = self.rejection() {
            return Ok(CreateOutcome::Rejected(rejection));
        }

        let authority = format!("MOCK{}", uuid::Uuid::new_v4().simple());
        Ok(CreateOutcome::Created {
            payment_url: format!("{}/{}", self.start_pay_url, authority),
            authority,
        })
    }

    async fn verify_payment(&self, request: VerifyPaymentRequest) -> Result<VerifyOutcome> {
        self.record(GatewayCall::Verify(request));
        if self.behavior == "ALWAYS_TIMEOUT" {
            bail!("mock gateway timeout");
        }
        if let Some(rejection) = self.rejection() {
            return Ok(VerifyOutcome::Rejected(rejection));
        }

        let ref_id = self
            .ref_id
            .clone()
            .unwrap_or_else(|| (uuid::Uuid::new_v4().as_u128() % 1_000_000_000).to_string());
        Ok(VerifyOutcome::Verified { ref_id })
    }
}
