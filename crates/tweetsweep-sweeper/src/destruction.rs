//! Destruction driver
//!
//! Deletes every marked record through a [`DeletionApi`] and moves confirmed
//! deletions to the destroyed set, one id at a time.

use crate::pause::{until, Pause, SystemPause};
use crate::{DestructionConfig, DestructionReport, FailureReason, Result, SweepError};
use std::time::Duration;
use tracing::{debug, info, warn};
use tweetsweep_domain::{AuthError, Credentials, DeleteOutcome, DeletionApi, RecordId};
use tweetsweep_store::DecisionLedger;

/// Shortest wait after a rate-limit response
pub const MIN_RATE_LIMIT_WAIT: Duration = Duration::from_secs(1);

/// Progress notifications emitted during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestructionEvent {
    /// About to delete an id
    Attempt {
        /// Id being deleted
        id: RecordId,
        /// 1-based position in this run
        position: usize,
        /// Ids in this run
        total: usize,
    },
    /// The id is gone remotely and recorded as destroyed
    Destroyed(RecordId),
    /// The id stays marked
    Failed(RecordId, FailureReason),
    /// Blocking until the rate window resets
    Waiting {
        /// Id that will be retried
        id: RecordId,
        /// Wait length
        duration: Duration,
    },
    /// Retrying after a transient error
    Retrying {
        /// Id being retried
        id: RecordId,
        /// Attempt about to start
        attempt: u32,
        /// Message of the failure
        error: String,
    },
}

/// Drives remote deletion of the marked set
///
/// # Examples
///
/// ```no_run
/// use tweetsweep_sweeper::{Destroyer, DestructionConfig, Session};
/// # fn demo<A: tweetsweep_domain::DeletionApi>(
/// #     api: &A,
/// #     credentials: &tweetsweep_domain::Credentials,
/// # ) -> Result<(), Box<dyn std::error::Error>> {
/// let mut session = Session::open("archive")?;
/// let mut destroyer = Destroyer::new(api, DestructionConfig::default());
/// let remote = destroyer.authenticate(credentials)?;
/// let report = destroyer.run(&remote, &mut session.ledger)?;
/// println!("{}", report.summary());
/// # Ok(())
/// # }
/// ```
pub struct Destroyer<'a, A: DeletionApi, P: Pause = SystemPause> {
    api: &'a A,
    config: DestructionConfig,
    pause: P,
}

impl<'a, A: DeletionApi> Destroyer<'a, A, SystemPause> {
    /// Create a driver that waits in real time
    pub fn new(api: &'a A, config: DestructionConfig) -> Self {
        Self::with_pause(api, config, SystemPause)
    }
}

impl<'a, A: DeletionApi, P: Pause> Destroyer<'a, A, P> {
    /// Create a driver with a custom time source
    pub fn with_pause(api: &'a A, config: DestructionConfig, pause: P) -> Self {
        Self { api, config, pause }
    }

    /// The time source
    pub fn pause(&self) -> &P {
        &self.pause
    }

    /// Check the credentials against the remote API
    pub fn authenticate(&self, credentials: &Credentials) -> Result<A::Session> {
        Ok(self.api.authenticate(credentials)?)
    }

    /// Delete every marked id
    pub fn run(&mut self, remote: &A::Session, ledger: &mut DecisionLedger) -> Result<DestructionReport> {
        self.run_with(remote, ledger, |_| {})
    }

    /// Delete every marked id, reporting progress to `on_event`
    ///
    /// Ids are processed in sorted order. Per-item failures are collected in
    /// the report and leave the id marked. A ledger write failure or revoked
    /// credentials end the run with an error; ids destroyed before that point
    /// are already on disk.
    pub fn run_with<F>(
        &mut self,
        remote: &A::Session,
        ledger: &mut DecisionLedger,
        mut on_event: F,
    ) -> Result<DestructionReport>
    where
        F: FnMut(&DestructionEvent),
    {
        self.config.validate()?;

        let queue: Vec<RecordId> = ledger.marked().cloned().collect();
        let total = queue.len();
        info!("Destroying {} marked records", total);

        let mut report = DestructionReport::new();
        let mut pace = false;

        for (index, id) in queue.into_iter().enumerate() {
            on_event(&DestructionEvent::Attempt {
                id: id.clone(),
                position: index + 1,
                total,
            });

            let mut attempts = 0u32;
            loop {
                if pace {
                    self.wait(self.config.request_delay());
                }
                pace = true;

                let outcome = self.api.delete(remote, &id);
                debug!("Delete {} returned {:?}", id, outcome);

                let failure = match outcome {
                    DeleteOutcome::Deleted | DeleteOutcome::AlreadyDeleted => {
                        ledger.mark_destroyed(&id)?;
                        info!("Destroyed {}", id);
                        on_event(&DestructionEvent::Destroyed(id.clone()));
                        report.destroyed.push(id.clone());
                        break;
                    }
                    DeleteOutcome::RateLimited { reset_at } => {
                        let duration =
                            (until(self.pause.now(), reset_at) + self.config.rate_limit_margin()).max(MIN_RATE_LIMIT_WAIT);
                        info!("Rate limited on {}, waiting {}s", id, duration.as_secs());
                        on_event(&DestructionEvent::Waiting {
                            id: id.clone(),
                            duration,
                        });
                        report.rate_limit_waits += 1;
                        report.waited += duration;
                        self.wait(duration);
                        pace = false;
                        continue;
                    }
                    DeleteOutcome::Transient(error) => {
                        attempts += 1;
                        if attempts >= self.config.max_transient_attempts {
                            FailureReason::TransientExhausted {
                                attempts,
                                last_error: error,
                            }
                        } else {
                            debug!("Transient error on {} (attempt {}): {}", id, attempts, error);
                            on_event(&DestructionEvent::Retrying {
                                id: id.clone(),
                                attempt: attempts + 1,
                                error,
                            });
                            self.wait(self.config.transient_delay());
                            pace = false;
                            continue;
                        }
                    }
                    DeleteOutcome::NotFound => FailureReason::NotFound,
                    DeleteOutcome::PermissionDenied => FailureReason::PermissionDenied,
                    DeleteOutcome::Rejected(message) => FailureReason::Rejected(message),
                    DeleteOutcome::Unauthorized => {
                        warn!(
                            "Credentials rejected after {} of {} records",
                            report.destroyed.len(),
                            total
                        );
                        return Err(SweepError::Auth(AuthError(
                            "credentials were revoked during the run".to_string(),
                        )));
                    }
                };

                warn!("Could not destroy {}: {}", id, failure);
                on_event(&DestructionEvent::Failed(id.clone(), failure.clone()));
                report.failed.push((id.clone(), failure));
                break;
            }
        }

        report.remaining = ledger.counts().marked;
        info!(
            "Destruction finished: {} destroyed, {} failed, {} still marked",
            report.destroyed.len(),
            report.total_failed(),
            report.remaining
        );
        Ok(report)
    }

    fn wait(&mut self, duration: Duration) {
        if !duration.is_zero() {
            self.pause.pause(duration);
        }
    }
}

