mod brasilapi;
mod viacep;

pub use brasilapi::{BrasilApiSource, BRASILAPI_BASE_URL};
pub use viacep::{ViaCepSource, VIACEP_BASE_URL};

use serde::de::DeserializeOwned;

use crate::data_source::LookupError;
use crate::http_client::HttpResponse;
use crate::ProviderId;

/// Rejects non-2xx responses with an upstream error tagged by provider.
fn ensure_success(provider: ProviderId, response: &HttpResponse) -> Result<(), LookupError> {
    if response.is_success() {
        return Ok(());
    }

    Err(LookupError::upstream(
        response.status,
        format!(
            "{} upstream returned status {}",
            provider.as_str(),
            response.status
        ),
    ))
}

fn decode_body<T: DeserializeOwned>(provider: ProviderId, body: &str) -> Result<T, LookupError> {
    serde_json::from_str(body).map_err(|error| {
        LookupError::decode(format!(
            "{} response could not be decoded: {error}",
            provider.as_str()
        ))
    })
}

fn join_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}
