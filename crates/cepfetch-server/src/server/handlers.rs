//! HTTP request handlers for the web server.

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use cepfetch_core::{Address, ProviderId, RaceError};
use serde::Deserialize;

use super::AppState;

const PROVIDER_HEADER: &str = "x-cepfetch-provider";

#[derive(Debug, Deserialize)]
pub struct LookupParams {
    pub cep: Option<String>,
}

/// `GET /?cep=<code>`: race the providers and relay the first answer.
pub async fn lookup_address(
    State(state): State<AppState>,
    Query(params): Query<LookupParams>,
) -> Response {
    let raw = params.cep.unwrap_or_default();

    match state.coordinator.lookup(&raw).await {
        Ok((provider, address)) => address_response(provider, &address),
        Err(error) => error_response(&error),
    }
}

pub async fn health() -> &'static str {
    "ok"
}

fn address_response(provider: ProviderId, address: &Address) -> Response {
    let body = match serde_json::to_string_pretty(address) {
        Ok(body) => body,
        Err(error) => {
            tracing::error!(%provider, %error, "failed to encode address");
            return (StatusCode::INTERNAL_SERVER_ERROR, "failed to encode address").into_response();
        }
    };

    tracing::debug!(%provider, payload = %body, "returning address");

    let mut response = (
        StatusCode::OK,
        [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        body,
    )
        .into_response();
    response
        .headers_mut()
        .insert(PROVIDER_HEADER, HeaderValue::from_static(provider.as_str()));
    response
}

fn error_response(error: &RaceError) -> Response {
    let (status, message) = match error {
        RaceError::MissingParameter => (
            StatusCode::BAD_REQUEST,
            String::from("missing required query parameter 'cep'"),
        ),
        RaceError::Lookup { provider, .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("postal code lookup failed at {}", provider.display_name()),
        ),
        RaceError::Timeout { deadline_ms } => (
            StatusCode::GATEWAY_TIMEOUT,
            format!("no provider answered within {deadline_ms} ms"),
        ),
    };

    (status, message).into_response()
}
