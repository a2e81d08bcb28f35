//! Address source contract and lookup error taxonomy.
//!
//! Every upstream provider implements [`AddressSource`]. Failures of any kind
//! are returned as [`LookupError`] values; a source never panics or leaves a
//! lookup unanswered.
//!
//! | Kind | Cause |
//! |------|-------|
//! | [`LookupErrorKind::Transport`] | Network or connection failure |
//! | [`LookupErrorKind::Decode`] | Body not parseable into the provider schema |
//! | [`LookupErrorKind::Upstream`] | Non-success status or provider not-found marker |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::http_client::{HttpError, HttpErrorKind};
use crate::{Address, PostalCode, ProviderId};

/// Provider-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupErrorKind {
    Transport,
    Decode,
    Upstream,
}

/// Structured lookup failure carried inside a failed [`ProviderOutcome`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupError {
    kind: LookupErrorKind,
    message: String,
    status: Option<u16>,
}

impl LookupError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: LookupErrorKind::Transport,
            message: message.into(),
            status: None,
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: LookupErrorKind::Decode,
            message: message.into(),
            status: None,
        }
    }

    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: LookupErrorKind::Upstream,
            message: message.into(),
            status: Some(status),
        }
    }

    /// Maps a transport failure. An unreadable body is a decode failure since
    /// the provider did answer; every other kind is a transport failure.
    pub fn from_http(provider: ProviderId, error: &HttpError) -> Self {
        match error.kind() {
            HttpErrorKind::Body => Self::decode(format!(
                "{} response body unreadable: {}",
                provider.as_str(),
                error.message()
            )),
            HttpErrorKind::Timeout | HttpErrorKind::Connect | HttpErrorKind::Other => {
                Self::transport(format!(
                    "{} transport error: {}",
                    provider.as_str(),
                    error.message()
                ))
            }
        }
    }

    pub const fn kind(&self) -> LookupErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Upstream HTTP status, when the provider answered at all.
    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            LookupErrorKind::Transport => "lookup.transport",
            LookupErrorKind::Decode => "lookup.decode",
            LookupErrorKind::Upstream => "lookup.upstream",
        }
    }
}

impl Display for LookupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for LookupError {}

/// Result of one dispatched lookup, tagged with the provider that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderOutcome {
    Success {
        provider: ProviderId,
        payload: Address,
    },
    Failure {
        provider: ProviderId,
        error: LookupError,
    },
}

impl ProviderOutcome {
    pub fn from_result(provider: ProviderId, result: Result<Address, LookupError>) -> Self {
        match result {
            Ok(payload) => Self::Success { provider, payload },
            Err(error) => Self::Failure { provider, error },
        }
    }

    pub const fn provider(&self) -> ProviderId {
        match self {
            Self::Success { provider, .. } | Self::Failure { provider, .. } => *provider,
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Boxed future returned by [`AddressSource::lookup`].
pub type LookupFuture<'a> = Pin<Box<dyn Future<Output = Result<Address, LookupError>> + Send + 'a>>;

/// Upstream address provider contract.
///
/// Implementations differ only in upstream address, request construction and
/// response-schema parsing. Each call issues exactly one outbound request and
/// never retries.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use cepfetch_core::{Address, AddressSource, LookupFuture, PostalCode, ProviderId};
///
/// struct FixedSource(Address);
///
/// impl AddressSource for FixedSource {
///     fn id(&self) -> ProviderId {
///         ProviderId::ViaCep
///     }
///
///     fn lookup<'a>(&'a self, _query: &'a PostalCode) -> LookupFuture<'a> {
///         Box::pin(async move { Ok(self.0.clone()) })
///     }
/// }
/// ```
pub trait AddressSource: Send + Sync {
    /// Returns the provider identifier used to tag outcomes.
    fn id(&self) -> ProviderId;

    /// Resolves a postal code to an address.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] on transport failure, undecodable body, or an
    /// upstream error status.
    fn lookup<'a>(&'a self, query: &'a PostalCode) -> LookupFuture<'a>;
}
