#![allow(dead_code)]

use anyhow::{bail, Result};
use payment_relay::config::AppConfig;
use payment_relay::domain::payment::NotificationPayload;
use payment_relay::gateways::mock::MockGateway;
use payment_relay::service::notifier::{Notifier, NotifyReceipt};
use payment_relay::AppState;
use std::io::Write;
use std::sync::{Arc, Mutex};

pub const BASE_URL: &str = "https://app.example.com";
pub const START_PAY: &str = "https://sandbox.zarinpal.com/pg/StartPay";

pub fn config() -> AppConfig {
    AppConfig::from_lookup(|name| match name {
        "ZARINPAL_MERCHANT_CODE" => Some("merchant-1".to_string()),
        "REPLIT_APP_URL" => Some(format!("{BASE_URL}/")),
        "PHP_SECRET_KEY" => Some("s3cret".to_string()),
        _ => None,
    })
    .unwrap()
}

/// Answers every notification with a fixed HTTP status, or fails the call
/// outright when `status` is `None`.
pub struct RecordingNotifier {
    pub status: Option<u16>,
    pub payloads: Mutex<Vec<NotificationPayload>>,
}

impl RecordingNotifier {
    pub fn answering(status: u16) -> Arc<Self> {
        Arc::new(Self {
            status: Some(status),
            payloads: Mutex::new(Vec::new()),
        })
    }

    pub fn unreachable() -> Arc<Self> {
        Arc::new(Self {
            status: None,
            payloads: Mutex::new(Vec::new()),
        })
    }

    pub fn payloads(&self) -> Vec<NotificationPayload> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, payload: &NotificationPayload) -> Result<NotifyReceipt> {
        self.payloads.lock().unwrap().push(payload.clone());
        match self.status {
            Some(status) => Ok(NotifyReceipt {
                status,
                body: format!("{{\"status\":\"code {status}\"}}"),
            }),
            None => bail!("connection refused"),
        }
    }
}

pub fn state(gateway: &MockGateway, notifier: Arc<RecordingNotifier>) -> AppState {
    AppState::new(Arc::new(config()), Arc::new(gateway.clone()), notifier)
}

/// Collects formatted log lines so tests can assert on emitted events.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
        tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogBuffer {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
