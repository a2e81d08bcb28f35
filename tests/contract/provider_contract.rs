#[path = "../support/mod.rs"]
mod support;

use std::sync::Arc;

use cepfetch_core::{
    AddressSource, BrasilApiSource, HttpError, HttpErrorKind, LookupErrorKind, ProviderId,
    ViaCepSource,
};
use support::{query, DelayedHttpClient, SE_BRASILAPI_BODY, SE_VIACEP_BODY};

struct ProviderCase {
    id: ProviderId,
    valid_body: &'static str,
    build: fn(Arc<DelayedHttpClient>) -> Arc<dyn AddressSource>,
}

fn provider_cases() -> Vec<ProviderCase> {
    vec![
        ProviderCase {
            id: ProviderId::ViaCep,
            valid_body: SE_VIACEP_BODY,
            build: |client| Arc::new(ViaCepSource::with_http_client(client)),
        },
        ProviderCase {
            id: ProviderId::BrasilApi,
            valid_body: SE_BRASILAPI_BODY,
            build: |client| Arc::new(BrasilApiSource::with_http_client(client)),
        },
    ]
}

#[tokio::test]
async fn valid_body_decodes_into_the_providers_own_schema() {
    for case in provider_cases() {
        let client = DelayedHttpClient::json(0, 200, case.valid_body);
        let source = (case.build)(client);

        assert_eq!(source.id(), case.id);
        let address = source
            .lookup(&query())
            .await
            .unwrap_or_else(|error| panic!("provider '{}' lookup failed: {error}", case.id));

        assert_eq!(address.provider(), case.id, "provider '{}': payload tag", case.id);
        assert_eq!(address.state(), "SP", "provider '{}': state", case.id);
        assert_eq!(address.city(), "São Paulo", "provider '{}': city", case.id);
        assert_eq!(address.street(), "Praça da Sé", "provider '{}': street", case.id);
    }
}

#[tokio::test]
async fn every_lookup_issues_exactly_one_request_even_on_failure() {
    let responses = [
        (200, "not json"),
        (500, "Internal Server Error"),
        (429, "Too Many Requests"),
    ];

    for case in provider_cases() {
        for (status, body) in responses {
            let client = DelayedHttpClient::json(0, status, body);
            let source = (case.build)(client.clone());

            let result = source.lookup(&query()).await;

            assert!(result.is_err(), "provider '{}': {status} must fail", case.id);
            assert_eq!(
                client.request_count(),
                1,
                "provider '{}': no retries after {status}",
                case.id
            );
        }
    }
}

#[tokio::test]
async fn malformed_bodies_are_classified_as_decode_errors() {
    let bodies = ["", "null", "42", "{\"cep\": 1001000}", "{\"cep\":"];

    for case in provider_cases() {
        for body in bodies {
            let client = DelayedHttpClient::json(0, 200, body);
            let source = (case.build)(client);

            let error = source
                .lookup(&query())
                .await
                .expect_err("malformed body must fail");

            assert_eq!(
                error.kind(),
                LookupErrorKind::Decode,
                "provider '{}' body {body:?}",
                case.id
            );
        }
    }
}

#[tokio::test]
async fn transport_errors_are_classified_and_name_the_provider() {
    for case in provider_cases() {
        let client = DelayedHttpClient::new(0, Err(HttpError::timeout("request timeout")));
        let source = (case.build)(client);

        let error = source.lookup(&query()).await.expect_err("must fail");

        assert_eq!(error.kind(), LookupErrorKind::Transport);
        assert_eq!(error.code(), "lookup.transport");
        assert!(
            error.message().contains(case.id.as_str()),
            "provider '{}': message should name the provider",
            case.id
        );
    }
}

#[tokio::test]
async fn unreadable_bodies_are_classified_as_decode_errors() {
    for case in provider_cases() {
        let client = DelayedHttpClient::new(
            0,
            Err(HttpError::new(
                HttpErrorKind::Body,
                "failed to read response body: invalid utf-8",
            )),
        );
        let source = (case.build)(client);

        let error = source.lookup(&query()).await.expect_err("must fail");

        assert_eq!(
            error.kind(),
            LookupErrorKind::Decode,
            "provider '{}': unreadable body",
            case.id
        );
        assert_eq!(error.code(), "lookup.decode");
        assert!(error.message().contains(case.id.as_str()));
    }
}
