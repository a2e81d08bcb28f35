//! Command-line and environment configuration for the `cepfetch` server.
//!
//! # Options
//!
//! | Option | Env | Default |
//! |--------|-----|---------|
//! | `--bind` | `CEPFETCH_BIND` | `0.0.0.0:8080` |
//! | `--deadline-ms` | `CEPFETCH_DEADLINE_MS` | `1000` |
//! | `--viacep-url` | `CEPFETCH_VIACEP_URL` | `http://viacep.com.br` |
//! | `--brasilapi-url` | `CEPFETCH_BRASILAPI_URL` | `https://brasilapi.com.br` |
//! | `--disable-viacep` | | `false` |
//! | `--disable-brasilapi` | | `false` |
//! | `--cancel-losers` | | `false` |
//! | `--verbose` | | `false` |

use std::net::SocketAddr;
use std::time::Duration;

use cepfetch_core::{
    CancellationPolicy, RaceCoordinator, RaceCoordinatorBuilder, ValidationError,
    BRASILAPI_BASE_URL, DEFAULT_DEADLINE_MS, VIACEP_BASE_URL,
};
use clap::Parser;

/// Answers `GET /?cep=<postal code>` with the first address provider to respond.
#[derive(Debug, Parser)]
#[command(name = "cepfetch", author, version, about)]
pub struct Cli {
    /// Address to listen on.
    #[arg(long, env = "CEPFETCH_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Time allowed for the first provider to answer.
    #[arg(long, env = "CEPFETCH_DEADLINE_MS", default_value_t = DEFAULT_DEADLINE_MS)]
    pub deadline_ms: u64,

    #[arg(long, env = "CEPFETCH_VIACEP_URL", default_value = VIACEP_BASE_URL)]
    pub viacep_url: String,

    #[arg(long, env = "CEPFETCH_BRASILAPI_URL", default_value = BRASILAPI_BASE_URL)]
    pub brasilapi_url: String,

    #[arg(long)]
    pub disable_viacep: bool,

    #[arg(long)]
    pub disable_brasilapi: bool,

    /// Abort lookups still in flight once a provider has answered.
    #[arg(long)]
    pub cancel_losers: bool,

    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn cancellation(&self) -> CancellationPolicy {
        if self.cancel_losers {
            CancellationPolicy::Abort
        } else {
            CancellationPolicy::Detach
        }
    }

    pub fn coordinator(&self) -> Result<RaceCoordinator, ValidationError> {
        RaceCoordinatorBuilder::new()
            .with_viacep_url(&self.viacep_url)
            .with_brasilapi_url(&self.brasilapi_url)
            .with_viacep_enabled(!self.disable_viacep)
            .with_brasilapi_enabled(!self.disable_brasilapi)
            .with_deadline(Duration::from_millis(self.deadline_ms))
            .with_cancellation(self.cancellation())
            .build()
    }

    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "cepfetch=debug,cepfetch_core=debug,tower_http=debug"
        } else {
            "cepfetch=info,cepfetch_core=info"
        }
    }
}
