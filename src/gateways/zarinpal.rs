use crate::gateways::{
    CreateOutcome, CreatePaymentRequest, GatewayRejection, PaymentGateway, VerifyOutcome,
    VerifyPaymentRequest,
};
use anyhow::{anyhow, Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

const CODE_SUCCESS: i64 = 100;
const CODE_ALREADY_VERIFIED: i64 = 101;

pub struct ZarinpalGateway {
    pub base_url: String,
    pub start_pay_url: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

impl ZarinpalGateway {
    async fn post(&self, path: &str, body: Value) -> Result<(StatusCode, String)> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .json(&body)
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    anyhow!("gateway timed out after {} ms", self.timeout_ms)
                } else {
                    anyhow::Error::new(e).context(format!("POST {url} failed"))
                }
            })?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .with_context(|| format!("reading gateway response from {url}"))?;
        Ok((status, text))
    }
}

#[async_trait::async_trait]
impl PaymentGateway for ZarinpalGateway {
    fn name(&self) -> &'static str {
        "zarinpal"
    }

    async fn create_payment(&self, request: CreatePaymentRequest) -> Result<CreateOutcome> {
        let body = json!({
            "merchant_id": request.merchant_code,
            "amount": request.amount,
            "callback_url": request.callback_url,
            "description": request.description,
        });
        let (status, text) = self.post("/pg/v4/payment/request.json", body).await?;

        match read_envelope(status, &text, &[CODE_SUCCESS])? {
            Ok(data) => {
                let authority = data
                    .get("authority")
                    .and_then(Value::as_str)
                    .filter(|a| !a.is_empty())
                    .ok_or_else(|| anyhow!("gateway accepted payment without an authority"))?
                    .to_string();
                let payment_url = format!("{}/{}", self.start_pay_url, authority);
                Ok(CreateOutcome::Created {
                    authority,
                    payment_url,
                })
            }
            Err(rejection) => Ok(CreateOutcome::Rejected(rejection)),
        }
    }

    async fn verify_payment(&self, request: VerifyPaymentRequest) -> Result<VerifyOutcome> {
        let body = json!({
            "merchant_id": request.merchant_code,
            "amount": request.amount,
            "authority": request.authority,
        });
        let (status, text) = self.post("/pg/v4/payment/verify.json", body).await?;

        match read_envelope(status, &text, &[CODE_SUCCESS, CODE_ALREADY_VERIFIED])? {
            Ok(data) => {
                let ref_id = data
                    .get("ref_id")
                    .and_then(scalar_string)
                    .ok_or_else(|| anyhow!("gateway verified payment without a ref_id"))?;
                Ok(VerifyOutcome::Verified { ref_id })
            }
            Err(rejection) => Ok(VerifyOutcome::Rejected(rejection)),
        }
    }
}

/// Splits a v4 envelope into its `data` object or a rejection. Zarinpal sends
/// `errors: []` on success and `data: []` on failure, with any HTTP status.
fn read_envelope(
    status: StatusCode,
    body: &str,
    accepted: &[i64],
) -> Result<std::result::Result<Value, GatewayRejection>> {
    let v: Value = serde_json::from_str(body).with_context(|| {
        format!(
            "unparseable gateway response (HTTP {}): {}",
            status.as_u16(),
            body.chars().take(200).collect::<String>()
        )
    })?;

    if let Some(errors) = v
        .get("errors")
        .filter(|e| e.as_object().is_some_and(|o| !o.is_empty()))
    {
        return Ok(Err(rejection_from(errors)));
    }

    let data = v
        .get("data")
        .filter(|d| d.is_object())
        .ok_or_else(|| anyhow!("gateway response without data (HTTP {})", status.as_u16()))?;

    match data.get("code").and_then(Value::as_i64) {
        Some(code) if accepted.contains(&code) => Ok(Ok(data.clone())),
        _ => Ok(Err(rejection_from(data))),
    }
}

fn rejection_from(v: &Value) -> GatewayRejection {
    GatewayRejection {
        code: v
            .get("code")
            .and_then(scalar_string)
            .unwrap_or_else(|| "UNKNOWN".to_string()),
        message: v
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown gateway error")
            .to_string(),
    }
}

fn scalar_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
