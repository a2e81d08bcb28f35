//! Scripted sources and transports shared by the integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cepfetch_core::{
    Address, AddressSource, BrasilApiAddress, HttpClient, HttpError, HttpRequest, HttpResponse,
    LookupError, LookupFuture, PostalCode, ProviderId, ViaCepAddress,
};

pub const SE_VIACEP_BODY: &str = r#"{
  "cep": "01001-000",
  "logradouro": "Praça da Sé",
  "complemento": "lado ímpar",
  "unidade": "",
  "bairro": "Sé",
  "localidade": "São Paulo",
  "uf": "SP",
  "estado": "São Paulo",
  "regiao": "Sudeste",
  "ibge": "3550308",
  "gia": "1004",
  "ddd": "11",
  "siafi": "7107"
}"#;

pub const SE_BRASILAPI_BODY: &str = r#"{
  "cep": "01001000",
  "state": "SP",
  "city": "São Paulo",
  "neighborhood": "Sé",
  "street": "Praça da Sé",
  "service": "open-cep"
}"#;

pub fn query() -> PostalCode {
    PostalCode::parse("01001000").expect("valid postal code")
}

pub fn viacep_address() -> Address {
    Address::from(ViaCepAddress {
        cep: String::from("01001-000"),
        logradouro: String::from("Praça da Sé"),
        localidade: String::from("São Paulo"),
        uf: String::from("SP"),
        ..ViaCepAddress::default()
    })
}

pub fn brasilapi_address() -> Address {
    Address::from(BrasilApiAddress {
        cep: String::from("01001000"),
        state: String::from("SP"),
        city: String::from("São Paulo"),
        neighborhood: String::from("Sé"),
        street: String::from("Praça da Sé"),
        service: String::from("open-cep"),
    })
}

#[derive(Clone)]
pub enum Script {
    Answer(Address),
    Fail(LookupError),
    Hang,
}

/// Source that waits `delay`, then plays its script. Counts calls started and
/// calls that ran to completion.
pub struct ScriptedSource {
    id: ProviderId,
    delay: Duration,
    script: Script,
    started: AtomicUsize,
    finished: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(id: ProviderId, delay_ms: u64, script: Script) -> Arc<Self> {
        Arc::new(Self {
            id,
            delay: Duration::from_millis(delay_ms),
            script,
            started: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
        })
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

impl AddressSource for ScriptedSource {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn lookup<'a>(&'a self, _query: &'a PostalCode) -> LookupFuture<'a> {
        Box::pin(async move {
            self.started.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            let result = match &self.script {
                Script::Answer(address) => Ok(address.clone()),
                Script::Fail(error) => Err(error.clone()),
                Script::Hang => std::future::pending().await,
            };
            self.finished.fetch_add(1, Ordering::SeqCst);
            result
        })
    }
}

pub fn erase(source: &Arc<ScriptedSource>) -> Arc<dyn AddressSource> {
    source.clone()
}

/// Transport that answers every request with the same result after `delay`.
pub struct DelayedHttpClient {
    delay: Duration,
    response: Result<HttpResponse, HttpError>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl DelayedHttpClient {
    pub fn new(delay_ms: u64, response: Result<HttpResponse, HttpError>) -> Arc<Self> {
        Arc::new(Self {
            delay: Duration::from_millis(delay_ms),
            response,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn json(delay_ms: u64, status: u16, body: &str) -> Arc<Self> {
        Self::new(delay_ms, Ok(HttpResponse::new(status, body)))
    }

    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .len()
    }

    pub fn recorded_urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .iter()
            .map(|request| request.url.clone())
            .collect()
    }
}

impl HttpClient for DelayedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .push(request);
        let response = self.response.clone();
        let delay = self.delay;
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            response
        })
    }
}
