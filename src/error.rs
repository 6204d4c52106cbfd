use crate::http::pages::ErrorPage;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("payment request is missing {0}")]
    IncompletePaymentRequest(&'static str),

    #[error("gateway callback is missing {0}")]
    IncompleteCallback(&'static str),

    #[error("gateway rejected payment request with code {code}: {message}")]
    GatewayRejected { code: String, message: String },

    #[error("gateway call failed during {stage}")]
    GatewayUnavailable {
        stage: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// The gateway settled the payment but the downstream server did not record it.
    #[error("downstream did not record payment {ref_id}: {detail}")]
    NotificationFailed {
        ref_id: String,
        status: Option<u16>,
        detail: String,
    },
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::IncompletePaymentRequest(_) | Self::IncompleteCallback(_) => StatusCode::BAD_REQUEST,
            Self::GatewayRejected { .. }
            | Self::GatewayUnavailable { .. }
            | Self::NotificationFailed { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn page(&self) -> ErrorPage {
        match self {
            Self::IncompletePaymentRequest(_) => ErrorPage::new(
                "Error: the payment request is incomplete (code 1). Please start the payment from the bot.",
            ),
            Self::IncompleteCallback(_) => {
                ErrorPage::new("Error: the data returned from the payment gateway is incomplete (code 2).")
            }
            Self::GatewayRejected { code, .. } => {
                ErrorPage::new("Error connecting to the payment gateway").line(format!("Error code: {code}"))
            }
            Self::GatewayUnavailable { stage, source } => {
                ErrorPage::new(format!("Unexpected error in the payment system during {stage}"))
                    .line(format!("{source:#}"))
            }
            Self::NotificationFailed { ref_id, .. } => ErrorPage::new("Internal error")
                .line(
                    "Your payment was completed, but there was a problem registering it with the bot. \
                     Please contact support.",
                )
                .line(format!("Reference number: {ref_id}")),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status_code(), self.page().into_html()).into_response()
    }
}
