//! First-arrival race over dispatched lookups.
//!
//! A [`Race`] moves through `Idle -> Dispatched -> {Won, Lost, TimedOut}`:
//! [`Race::start`] dispatches, [`Race::resolve`] consumes the race and yields
//! the terminal [`RaceOutcome`]. The first outcome to arrive decides the race
//! whether it is a success or a failure; everything after it is ignored.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::data_source::{AddressSource, LookupError, ProviderOutcome};
use crate::dispatch::{dispatch, Dispatch};
use crate::{Address, PostalCode, ProviderId, RaceError};

pub const DEFAULT_DEADLINE_MS: u64 = 1_000;

/// What happens to lookups still running once the race has resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CancellationPolicy {
    /// Leave them running; their outcomes land in the channel and are dropped.
    #[default]
    Detach,
    /// Abort them as soon as the race resolves.
    Abort,
}

/// Terminal result of one race.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RaceOutcome {
    Won {
        provider: ProviderId,
        payload: Address,
    },
    Lost {
        provider: ProviderId,
        error: LookupError,
    },
    TimedOut {
        deadline: Duration,
    },
}

impl RaceOutcome {
    pub const fn provider(&self) -> Option<ProviderId> {
        match self {
            Self::Won { provider, .. } | Self::Lost { provider, .. } => Some(*provider),
            Self::TimedOut { .. } => None,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Won { .. } => "won",
            Self::Lost { .. } => "lost",
            Self::TimedOut { .. } => "timed_out",
        }
    }

    pub fn into_result(self) -> Result<(ProviderId, Address), RaceError> {
        match self {
            Self::Won { provider, payload } => Ok((provider, payload)),
            Self::Lost { provider, error } => Err(RaceError::Lookup {
                provider,
                source: error,
            }),
            Self::TimedOut { deadline } => Err(RaceError::Timeout {
                deadline_ms: duration_ms(deadline),
            }),
        }
    }
}

impl From<ProviderOutcome> for RaceOutcome {
    fn from(outcome: ProviderOutcome) -> Self {
        match outcome {
            ProviderOutcome::Success { provider, payload } => Self::Won { provider, payload },
            ProviderOutcome::Failure { provider, error } => Self::Lost { provider, error },
        }
    }
}

/// Waits for the first outcome or the deadline, whichever comes first.
///
/// Reads at most one outcome. A channel that closes without delivering
/// anything is treated as silent and resolves at the deadline.
pub async fn race(
    outcomes: &mut mpsc::Receiver<ProviderOutcome>,
    deadline: Duration,
) -> RaceOutcome {
    let first = async {
        match outcomes.recv().await {
            Some(outcome) => outcome,
            None => std::future::pending().await,
        }
    };

    match tokio::time::timeout(deadline, first).await {
        Ok(outcome) => RaceOutcome::from(outcome),
        Err(_) => RaceOutcome::TimedOut { deadline },
    }
}

/// A single dispatched query awaiting resolution.
#[derive(Debug)]
pub struct Race {
    query: PostalCode,
    dispatch: Dispatch,
    started: Instant,
    cancellation: CancellationPolicy,
}

impl Race {
    pub fn start(query: PostalCode, sources: &[Arc<dyn AddressSource>]) -> Self {
        let started = Instant::now();
        let dispatch = dispatch(&query, sources);
        Self {
            query,
            dispatch,
            started,
            cancellation: CancellationPolicy::default(),
        }
    }

    pub fn with_cancellation(mut self, cancellation: CancellationPolicy) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub async fn resolve(mut self, deadline: Duration) -> RaceOutcome {
        let outcome = race(self.dispatch.outcomes_mut(), deadline).await;
        let latency_ms = duration_ms(self.started.elapsed());

        match &outcome {
            RaceOutcome::Won { provider, .. } => {
                tracing::info!(
                    %provider,
                    postal_code = %self.query,
                    latency_ms,
                    "address resolved"
                );
            }
            RaceOutcome::Lost { provider, error } => {
                tracing::warn!(
                    %provider,
                    postal_code = %self.query,
                    code = error.code(),
                    error = %error,
                    latency_ms,
                    "first provider to answer failed"
                );
            }
            RaceOutcome::TimedOut { deadline } => {
                tracing::warn!(
                    postal_code = %self.query,
                    deadline_ms = duration_ms(*deadline),
                    "no provider answered before the deadline"
                );
            }
        }

        if self.cancellation == CancellationPolicy::Abort {
            let aborted = self.dispatch.abort_pending();
            if aborted > 0 {
                tracing::debug!(aborted, "aborted outstanding lookups");
            }
        }

        outcome
    }
}

pub(crate) fn duration_ms(duration: Duration) -> u64 {
    duration.as_millis().min(u128::from(u64::MAX)) as u64
}
