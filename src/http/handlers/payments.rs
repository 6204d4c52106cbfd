use crate::domain::payment::{PayQuery, VerifyQuery};
use crate::error::RelayError;
use crate::AppState;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

pub async fn pay(
    State(state): State<AppState>,
    query: Result<Query<PayQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "unreadable payment request query");
            return RelayError::IncompletePaymentRequest("query string").into_response();
        }
    };

    match state.initiator.initiate(&query).await {
        Ok(payment_url) => found(payment_url),
        Err(err) => {
            tracing::warn!(error = %err, "payment initiation ended with error page");
            err.into_response()
        }
    }
}

pub async fn verify(
    State(state): State<AppState>,
    query: Result<Query<VerifyQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "unreadable gateway callback query");
            return RelayError::IncompleteCallback("query string").into_response();
        }
    };

    match state.verifier.verify(&query).await {
        Ok(target) => found(target),
        Err(err) => {
            tracing::warn!(error = %err, "payment verification ended with error page");
            err.into_response()
        }
    }
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Plain 302: the gateway and the downstream pages expect a GET on follow-up.
fn found(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}
