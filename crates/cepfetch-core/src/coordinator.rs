use std::env;
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::{BrasilApiSource, ViaCepSource};
use crate::data_source::AddressSource;
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::race::{CancellationPolicy, Race, RaceOutcome, DEFAULT_DEADLINE_MS};
use crate::{Address, PostalCode, ProviderId, RaceError, ValidationError};

pub const ENV_VIACEP_URL: &str = "CEPFETCH_VIACEP_URL";
pub const ENV_BRASILAPI_URL: &str = "CEPFETCH_BRASILAPI_URL";
pub const ENV_DEADLINE_MS: &str = "CEPFETCH_DEADLINE_MS";

/// Source registry and race entry point.
///
/// Immutable once built; every call starts an independent [`Race`], so one
/// coordinator can be shared across concurrent requests.
pub struct RaceCoordinator {
    sources: Vec<Arc<dyn AddressSource>>,
    deadline: Duration,
    cancellation: CancellationPolicy,
}

impl Default for RaceCoordinator {
    fn default() -> Self {
        Self {
            sources: vec![
                Arc::new(ViaCepSource::default()),
                Arc::new(BrasilApiSource::default()),
            ],
            deadline: Duration::from_millis(DEFAULT_DEADLINE_MS),
            cancellation: CancellationPolicy::default(),
        }
    }
}

impl RaceCoordinator {
    pub fn new(
        sources: Vec<Arc<dyn AddressSource>>,
        deadline: Duration,
    ) -> Result<Self, ValidationError> {
        if sources.is_empty() {
            return Err(ValidationError::NoSources);
        }
        if deadline.is_zero() {
            return Err(ValidationError::ZeroDeadline);
        }

        Ok(Self {
            sources,
            deadline,
            cancellation: CancellationPolicy::default(),
        })
    }

    pub fn builder() -> RaceCoordinatorBuilder {
        RaceCoordinatorBuilder::new()
    }

    pub fn with_cancellation(mut self, cancellation: CancellationPolicy) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub const fn deadline(&self) -> Duration {
        self.deadline
    }

    pub const fn cancellation(&self) -> CancellationPolicy {
        self.cancellation
    }

    /// Registered providers, in registration order.
    pub fn providers(&self) -> Vec<ProviderId> {
        self.sources.iter().map(|source| source.id()).collect()
    }

    /// Dispatches `query` to every source without waiting.
    pub fn start(&self, query: PostalCode) -> Race {
        Race::start(query, &self.sources).with_cancellation(self.cancellation)
    }

    pub async fn race(&self, query: PostalCode) -> RaceOutcome {
        self.start(query).resolve(self.deadline).await
    }

    /// Parses `raw` and races it.
    ///
    /// # Errors
    ///
    /// [`RaceError::MissingParameter`] for a blank query (nothing is
    /// dispatched), otherwise the losing or timed-out race.
    pub async fn lookup(&self, raw: &str) -> Result<(ProviderId, Address), RaceError> {
        let query = PostalCode::parse(raw).map_err(|_| RaceError::MissingParameter)?;
        self.race(query).await.into_result()
    }
}

/// Builder for a [`RaceCoordinator`] over the built-in providers.
///
/// # Environment Variables
///
/// | Variable | Effect |
/// |----------|--------|
/// | `CEPFETCH_VIACEP_URL` | ViaCEP base URL |
/// | `CEPFETCH_BRASILAPI_URL` | BrasilAPI base URL |
/// | `CEPFETCH_DEADLINE_MS` | Race deadline in milliseconds |
///
/// # Example
///
/// ```rust,ignore
/// use cepfetch_core::RaceCoordinatorBuilder;
///
/// let coordinator = RaceCoordinatorBuilder::new()
///     .with_env()?
///     .with_brasilapi_enabled(false)
///     .build()?;
/// ```
pub struct RaceCoordinatorBuilder {
    http_client: Option<Arc<dyn HttpClient>>,
    viacep_url: Option<String>,
    brasilapi_url: Option<String>,
    enable_viacep: bool,
    enable_brasilapi: bool,
    extra_sources: Vec<Arc<dyn AddressSource>>,
    deadline: Duration,
    cancellation: CancellationPolicy,
}

impl Default for RaceCoordinatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RaceCoordinatorBuilder {
    pub fn new() -> Self {
        Self {
            http_client: None,
            viacep_url: None,
            brasilapi_url: None,
            enable_viacep: true,
            enable_brasilapi: true,
            extra_sources: Vec::new(),
            deadline: Duration::from_millis(DEFAULT_DEADLINE_MS),
            cancellation: CancellationPolicy::default(),
        }
    }

    /// Reads overrides from the process environment.
    pub fn with_env(self) -> Result<Self, ValidationError> {
        self.with_env_from(|name| env::var(name).ok())
    }

    /// Reads overrides through `lookup`, keyed by the `CEPFETCH_*` names.
    pub fn with_env_from<F>(mut self, lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_VIACEP_URL).filter(|url| !url.trim().is_empty()) {
            self.viacep_url = Some(url);
        }
        if let Some(url) = lookup(ENV_BRASILAPI_URL).filter(|url| !url.trim().is_empty()) {
            self.brasilapi_url = Some(url);
        }
        if let Some(raw) = lookup(ENV_DEADLINE_MS) {
            let millis = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ValidationError::InvalidSetting {
                    name: ENV_DEADLINE_MS,
                    value: raw.clone(),
                })?;
            self.deadline = Duration::from_millis(millis);
        }
        Ok(self)
    }

    /// Shares one transport between the built-in sources.
    pub fn with_http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    pub fn with_viacep_url(mut self, url: impl Into<String>) -> Self {
        self.viacep_url = Some(url.into());
        self
    }

    pub fn with_brasilapi_url(mut self, url: impl Into<String>) -> Self {
        self.brasilapi_url = Some(url.into());
        self
    }

    pub fn with_viacep_enabled(mut self, enabled: bool) -> Self {
        self.enable_viacep = enabled;
        self
    }

    pub fn with_brasilapi_enabled(mut self, enabled: bool) -> Self {
        self.enable_brasilapi = enabled;
        self
    }

    /// Registers an additional source alongside the built-in ones.
    pub fn with_source(mut self, source: Arc<dyn AddressSource>) -> Self {
        self.extra_sources.push(source);
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationPolicy) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn build(self) -> Result<RaceCoordinator, ValidationError> {
        let mut sources: Vec<Arc<dyn AddressSource>> = Vec::new();
        let needs_transport = self.enable_viacep || self.enable_brasilapi;
        let http_client: Option<Arc<dyn HttpClient>> = match self.http_client {
            Some(client) => Some(client),
            None if needs_transport => Some(Arc::new(ReqwestHttpClient::new())),
            None => None,
        };

        if let Some(http_client) = http_client {
            if self.enable_viacep {
                let mut source = ViaCepSource::with_http_client(Arc::clone(&http_client));
                if let Some(url) = self.viacep_url {
                    source = source.with_base_url(url);
                }
                sources.push(Arc::new(source));
            }

            if self.enable_brasilapi {
                let mut source = BrasilApiSource::with_http_client(http_client);
                if let Some(url) = self.brasilapi_url {
                    source = source.with_base_url(url);
                }
                sources.push(Arc::new(source));
            }
        }

        sources.extend(self.extra_sources);

        Ok(RaceCoordinator::new(sources, self.deadline)?.with_cancellation(self.cancellation))
    }
}
