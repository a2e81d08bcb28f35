use thiserror::Error;

use crate::data_source::LookupError;
use crate::ProviderId;

/// Validation and configuration errors exposed by `cepfetch-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("postal code cannot be empty")]
    EmptyPostalCode,

    #[error("invalid provider '{value}', expected one of viacep, brasilapi")]
    InvalidProvider { value: String },

    #[error("at least one address source must be enabled")]
    NoSources,
    #[error("race deadline must be greater than zero")]
    ZeroDeadline,
    #[error("invalid value '{value}' for {name}")]
    InvalidSetting { name: &'static str, value: String },
}

/// Caller-facing failure of a single postal-code lookup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RaceError {
    #[error("missing required parameter 'cep'")]
    MissingParameter,

    #[error("{provider} answered first with an error: {source}")]
    Lookup {
        provider: ProviderId,
        #[source]
        source: LookupError,
    },

    #[error("no provider answered within {deadline_ms} ms")]
    Timeout { deadline_ms: u64 },
}

impl RaceError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingParameter => "race.missing_parameter",
            Self::Lookup { .. } => "race.lookup_failed",
            Self::Timeout { .. } => "race.timeout",
        }
    }
}
