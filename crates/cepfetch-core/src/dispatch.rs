//! Fan-out of one query to every registered source.

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use crate::data_source::{AddressSource, ProviderOutcome};
use crate::PostalCode;

/// In-flight lookups for one query.
///
/// The outcome channel holds one slot per dispatched source, so every task can
/// deposit its outcome and finish even if nobody ever reads it.
#[derive(Debug)]
pub struct Dispatch {
    outcomes: mpsc::Receiver<ProviderOutcome>,
    tasks: Vec<JoinHandle<()>>,
}

impl Dispatch {
    pub fn outcomes_mut(&mut self) -> &mut mpsc::Receiver<ProviderOutcome> {
        &mut self.outcomes
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Aborts every lookup that has not finished yet.
    pub fn abort_pending(&self) -> usize {
        let mut aborted = 0;
        for task in self.tasks.iter().filter(|task| !task.is_finished()) {
            task.abort();
            aborted += 1;
        }
        aborted
    }

    pub fn into_parts(self) -> (mpsc::Receiver<ProviderOutcome>, Vec<JoinHandle<()>>) {
        (self.outcomes, self.tasks)
    }
}

/// Starts one task per source and returns immediately.
///
/// Must be called from within a Tokio runtime. Outcomes arrive in completion
/// order; the position of a source in `sources` carries no priority.
pub fn dispatch(query: &PostalCode, sources: &[Arc<dyn AddressSource>]) -> Dispatch {
    let (sender, outcomes) = mpsc::channel(sources.len().max(1));

    let tasks = sources
        .iter()
        .map(|source| {
            let source = Arc::clone(source);
            let query = query.clone();
            let sender = sender.clone();

            tokio::spawn(async move {
                let provider = source.id();
                tracing::debug!(%provider, postal_code = %query, "lookup dispatched");

                let result = source.lookup(&query).await;
                let outcome = ProviderOutcome::from_result(provider, result);

                match sender.try_send(outcome) {
                    Ok(()) => {}
                    Err(TrySendError::Closed(_)) => {
                        tracing::debug!(%provider, "race already resolved; outcome discarded");
                    }
                    Err(TrySendError::Full(_)) => {
                        tracing::warn!(%provider, "outcome channel full; outcome discarded");
                    }
                }
            })
        })
        .collect();

    Dispatch { outcomes, tasks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::{LookupError, LookupFuture};
    use crate::{Address, BrasilApiAddress, ProviderId};
    use std::time::Duration;

    struct DelayedSource {
        id: ProviderId,
        delay: Duration,
    }

    impl AddressSource for DelayedSource {
        fn id(&self) -> ProviderId {
            self.id
        }

        fn lookup<'a>(&'a self, _query: &'a PostalCode) -> LookupFuture<'a> {
            Box::pin(async move {
                tokio::time::sleep(self.delay).await;
                if self.id == ProviderId::ViaCep {
                    Err(LookupError::transport("unreachable"))
                } else {
                    Ok(Address::from(BrasilApiAddress::default()))
                }
            })
        }
    }

    fn sources() -> Vec<Arc<dyn AddressSource>> {
        vec![
            Arc::new(DelayedSource {
                id: ProviderId::ViaCep,
                delay: Duration::from_millis(20),
            }),
            Arc::new(DelayedSource {
                id: ProviderId::BrasilApi,
                delay: Duration::from_millis(10),
            }),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn outcomes_arrive_in_completion_order() {
        let query = PostalCode::parse("01001000").expect("valid postal code");
        let mut dispatch = dispatch(&query, &sources());
        assert_eq!(dispatch.len(), 2);

        let first = dispatch.outcomes_mut().recv().await.expect("first outcome");
        let second = dispatch.outcomes_mut().recv().await.expect("second outcome");

        assert_eq!(first.provider(), ProviderId::BrasilApi);
        assert!(first.is_success());
        assert_eq!(second.provider(), ProviderId::ViaCep);
        assert!(!second.is_success());
    }

    #[tokio::test(start_paused = true)]
    async fn unread_outcomes_do_not_block_tasks() {
        let query = PostalCode::parse("01001000").expect("valid postal code");
        let dispatch = dispatch(&query, &sources());
        let (_outcomes, tasks) = dispatch.into_parts();

        for task in tasks {
            task.await.expect("task should finish without reader");
        }
    }

    #[tokio::test]
    async fn empty_source_list_dispatches_nothing() {
        let query = PostalCode::parse("01001000").expect("valid postal code");
        let mut dispatch = dispatch(&query, &[]);

        assert!(dispatch.is_empty());
        assert!(dispatch.outcomes_mut().recv().await.is_none());
    }
}
