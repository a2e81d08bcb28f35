use std::sync::Arc;

use super::{decode_body, ensure_success, join_url};
use crate::data_source::{AddressSource, LookupError, LookupFuture};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::{Address, BrasilApiAddress, PostalCode, ProviderId};

pub const BRASILAPI_BASE_URL: &str = "https://brasilapi.com.br";

/// BrasilAPI adapter (`GET /api/cep/v1/{cep}`).
#[derive(Clone)]
pub struct BrasilApiSource {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
}

impl Default for BrasilApiSource {
    fn default() -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()))
    }
}

impl BrasilApiSource {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: String::from(BRASILAPI_BASE_URL),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, query: &PostalCode) -> String {
        join_url(
            &self.base_url,
            &format!("api/cep/v1/{}", query.path_segment()),
        )
    }
}

impl AddressSource for BrasilApiSource {
    fn id(&self) -> ProviderId {
        ProviderId::BrasilApi
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
                .map_err(|error| LookupError::from_http(ProviderId::BrasilApi, &error))?;
            ensure_success(ProviderId::BrasilApi, &response)?;

            let address: BrasilApiAddress = decode_body(ProviderId::BrasilApi, &response.body)?;
            Ok(Address::BrasilApi(address))
        })
    }
}
