pub mod config;
pub mod domain {
    pub mod input;
    pub mod payment;
}
pub mod error;
pub mod gateways;
pub mod http {
    pub mod handlers {
        pub mod ops;
        pub mod payments;
    }
    pub mod pages;
}
pub mod service {
    pub mod initiator;
    pub mod notifier;
    pub mod verifier;
}

use axum::routing::get;
use axum::Router;
use config::{AppConfig, GatewayAdapter};
use gateways::mock::MockGateway;
use gateways::zarinpal::ZarinpalGateway;
use gateways::PaymentGateway;
use service::initiator::PaymentInitiator;
use service::notifier::{DownstreamNotifier, Notifier};
use service::verifier::PaymentVerifier;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub initiator: PaymentInitiator,
    pub verifier: PaymentVerifier,
}

impl AppState {
    pub fn new(
        config: Arc<AppConfig>,
        gateway: Arc<dyn PaymentGateway>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            initiator: PaymentInitiator {
                config: config.clone(),
                gateway: gateway.clone(),
            },
            verifier: PaymentVerifier {
                config: config.clone(),
                gateway,
                notifier,
            },
            config,
        }
    }

    /// Wires the configured gateway adapter and the downstream notifier.
    pub fn from_config(config: AppConfig) -> Self {
        let client = reqwest::Client::new();
        let gateway: Arc<dyn PaymentGateway> = match config.gateway_adapter {
            GatewayAdapter::Zarinpal => Arc::new(ZarinpalGateway {
                base_url: config.gateway_base_url.clone(),
                start_pay_url: config.start_pay_url.clone(),
                timeout_ms: config.gateway_timeout_ms,
                client: client.clone(),
            }),
            GatewayAdapter::Mock => Arc::new(MockGateway::new(
                config.mock_behavior.clone(),
                config.start_pay_url.clone(),
            )),
        };
        let notifier = Arc::new(DownstreamNotifier {
            callback_url: config.downstream_callback_url(),
            secret: config.shared_secret.clone(),
            timeout_ms: config.notify_timeout_ms,
            client,
        });
        Self::new(Arc::new(config), gateway, notifier)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(http::handlers::payments::health))
        .route("/payment/pay", get(http::handlers::payments::pay))
        .route("/payment/verify", get(http::handlers::payments::verify))
        .route("/ops/readiness", get(http::handlers::ops::readiness))
        .route("/ops/liveness", get(http::handlers::ops::liveness))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
