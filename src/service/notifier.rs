use crate::domain::payment::NotificationPayload;
use anyhow::{anyhow, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyReceipt {
    pub status: u16,
    pub body: String,
}

impl NotifyReceipt {
    pub fn is_recorded(&self) -> bool {
        self.status == 200
    }
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, payload: &NotificationPayload) -> Result<NotifyReceipt>;
}

/// Posts settled payments to the downstream application server.
#[derive(Clone)]
pub struct DownstreamNotifier {
    pub callback_url: String,
    pub secret: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

#[async_trait::async_trait]
impl Notifier for DownstreamNotifier {
    async fn notify(&self, payload: &NotificationPayload) -> Result<NotifyReceipt> {
        let resp = self
            .client
            .post(&self.callback_url)
            .bearer_auth(&self.secret)
            .json(payload)
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    anyhow!("downstream timed out after {} ms", self.timeout_ms)
                } else {
                    anyhow::Error::new(e).context("downstream notification failed")
                }
            })?;

        let status = resp.status().as_u16();
        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(status, error = %e, "could not read downstream response body");
                format!("<unreadable body: {e}>")
            }
        };
        Ok(NotifyReceipt { status, body })
    }
}
