use thiserror::Error;

const LIVE_API_URL: &str = "https://api.zarinpal.com";
const LIVE_START_PAY_URL: &str = "https://www.zarinpal.com/pg/StartPay";
const SANDBOX_API_URL: &str = "https://sandbox.zarinpal.com";
const SANDBOX_START_PAY_URL: &str = "https://sandbox.zarinpal.com/pg/StartPay";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable {0} is missing or empty")]
    Missing(&'static str),
    #[error("environment variable {name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayAdapter {
    Zarinpal,
    Mock,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub merchant_code: String,
    /// Base URL of the downstream application, without a trailing slash.
    pub public_base_url: String,
    pub shared_secret: String,
    pub sandbox: bool,
    pub gateway_adapter: GatewayAdapter,
    pub mock_behavior: String,
    pub gateway_base_url: String,
    pub start_pay_url: String,
    pub gateway_timeout_ms: u64,
    pub notify_timeout_ms: u64,
    pub payment_description: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any key lookup, so tests never touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let optional = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let merchant_code = required("ZARINPAL_MERCHANT_CODE")?;
        let public_base_url = required("REPLIT_APP_URL")?.trim_end_matches('/').to_string();
        if public_base_url.is_empty() {
            return Err(ConfigError::Missing("REPLIT_APP_URL"));
        }
        let shared_secret = required("PHP_SECRET_KEY")?;

        let sandbox = match optional("ZARINPAL_SANDBOX") {
            None => false,
            Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid {
                name: "ZARINPAL_SANDBOX",
                value: v,
            })?,
        };

        let gateway_adapter = match optional("GATEWAY_ADAPTER").map(|v| v.to_uppercase()) {
            None => GatewayAdapter::Zarinpal,
            Some(v) if v == "ZARINPAL" => GatewayAdapter::Zarinpal,
            Some(v) if v == "MOCK" => GatewayAdapter::Mock,
            Some(v) => {
                return Err(ConfigError::Invalid {
                    name: "GATEWAY_ADAPTER",
                    value: v,
                })
            }
        };

        let (default_api, default_start_pay) = if sandbox {
            (SANDBOX_API_URL, SANDBOX_START_PAY_URL)
        } else {
            (LIVE_API_URL, LIVE_START_PAY_URL)
        };

        Ok(Self {
            bind_addr: optional("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            merchant_code,
            public_base_url,
            shared_secret,
            sandbox,
            gateway_adapter,
            mock_behavior: optional("MOCK_BEHAVIOR").unwrap_or_else(|| "ALWAYS_SUCCESS".to_string()),
            gateway_base_url: optional("ZARINPAL_BASE_URL")
                .unwrap_or_else(|| default_api.to_string())
                .trim_end_matches('/')
                .to_string(),
            start_pay_url: optional("ZARINPAL_START_PAY_URL")
                .unwrap_or_else(|| default_start_pay.to_string())
                .trim_end_matches('/')
                .to_string(),
            gateway_timeout_ms: parse_millis(optional("GATEWAY_TIMEOUT_MS"), "GATEWAY_TIMEOUT_MS")?,
            notify_timeout_ms: parse_millis(optional("NOTIFY_TIMEOUT_MS"), "NOTIFY_TIMEOUT_MS")?,
            payment_description: optional("PAYMENT_DESCRIPTION")
                .unwrap_or_else(|| "Premium subscription purchase".to_string()),
        })
    }

    pub fn verify_callback_base(&self) -> String {
        format!("{}/payment/verify", self.public_base_url)
    }

    pub fn failure_page(&self) -> String {
        format!("{}/payment-failed", self.public_base_url)
    }

    pub fn success_page(&self) -> String {
        format!("{}/payment-success", self.public_base_url)
    }

    pub fn downstream_callback_url(&self) -> String {
        format!("{}/api/php/payment-callback", self.public_base_url)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_millis(raw: Option<String>, name: &'static str) -> Result<u64, ConfigError> {
    match raw {
        None => Ok(10_000),
        Some(v) => match v.parse::<u64>() {
            Ok(ms) if ms > 0 => Ok(ms),
            _ => Err(ConfigError::Invalid { name, value: v }),
        },
    }
}
