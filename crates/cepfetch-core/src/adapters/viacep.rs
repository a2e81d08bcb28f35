use std::sync::Arc;

use serde_json::Value;

use super::{decode_body, ensure_success, join_url};
use crate::data_source::{AddressSource, LookupError, LookupFuture};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::{Address, PostalCode, ProviderId, ViaCepAddress};

pub const VIACEP_BASE_URL: &str = "http://viacep.com.br";

/// ViaCEP adapter (`GET /ws/{cep}/json/`).
#[derive(Clone)]
pub struct ViaCepSource {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
}

impl Default for ViaCepSource {
    fn default() -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()))
    }
}

impl ViaCepSource {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: String::from(VIACEP_BASE_URL),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, query: &PostalCode) -> String {
        join_url(
            &self.base_url,
            &format!("ws/{}/json/", query.path_segment()),
        )
    }
}

impl AddressSource for ViaCepSource {
    fn id(&self) -> ProviderId {
        ProviderId::ViaCep
    }

    fn lookup<'a>(&'a self, query: &'a PostalCode) -> LookupFuture<'a> {
        Box::pin(async move {
            let request =
                HttpRequest::get(self.endpoint(query)).with_header("accept", "application/json");
            tracing::debug!(provider = %self.id(), url = %request.url, "querying upstream");

            let response = self
                .http_client
                .execute(request)
                .await
                .map_err(|error| LookupError::from_http(ProviderId::ViaCep, &error))?;
            ensure_success(ProviderId::ViaCep, &response)?;

            let value: Value = decode_body(ProviderId::ViaCep, &response.body)?;
            // ViaCEP answers unknown codes with 200 and `{"erro": true}`.
            if reports_not_found(&value) {
                return Err(LookupError::upstream(
                    response.status,
                    format!("viacep has no address for postal code '{query}'"),
                ));
            }

            let address: ViaCepAddress = serde_json::from_value(value).map_err(|error| {
                LookupError::decode(format!("viacep response could not be decoded: {error}"))
            })?;
            Ok(Address::ViaCep(address))
        })
    }
}

fn reports_not_found(value: &Value) -> bool {
    match value.get("erro") {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
        _ => false,
    }
}
