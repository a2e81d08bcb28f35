use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Canonical identifiers for the upstream address providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    ViaCep,
    BrasilApi,
}

impl ProviderId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ViaCep => "viacep",
            Self::BrasilApi => "brasilapi",
        }
    }

    /// Human-facing provider name used in log lines.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::ViaCep => "ViaCEP",
            Self::BrasilApi => "BrasilAPI",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "viacep" => Ok(Self::ViaCep),
            "brasilapi" => Ok(Self::BrasilApi),
            other => Err(ValidationError::InvalidProvider {
                value: other.to_owned(),
            }),
        }
    }
}
