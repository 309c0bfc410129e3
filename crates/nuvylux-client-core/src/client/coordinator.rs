//! Decides what to do with a failed response and makes sure concurrent
//! requests that hit an expired session share a single refresh call

use futures::channel::oneshot;
use reqwest::StatusCode;
use std::{future::Future, mem, sync::Mutex};
use tracing::{debug, info};

use crate::{client::is_public_route, RefreshFailed, ResponseFailure};

pub(crate) type RefreshOutcome = Result<(), RefreshFailed>;

/// What the gateway should do with a failed response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Disposition {
    /// Hand the failure back to the caller unchanged
    Propagate,
    /// Refresh the session (or wait for the refresh in flight) then replay
    RefreshAndReplay,
    /// Authorization denied, end the session
    EndSession,
}

/// Checks are applied in order, the first that matches wins
pub(crate) fn classify(path: &str, already_retried: bool, failure: &ResponseFailure) -> Disposition {
    if is_public_route(path) {
        return Disposition::Propagate;
    }
    if failure.status == StatusCode::UNAUTHORIZED && !already_retried {
        return Disposition::RefreshAndReplay;
    }
    if failure.status == StatusCode::FORBIDDEN || failure.signals_auth_failure() {
        return Disposition::EndSession;
    }
    Disposition::Propagate
}

#[derive(Debug, Default)]
enum CoordinatorState {
    #[default]
    Idle,
    RefreshInFlight {
        waiters: Vec<oneshot::Sender<RefreshOutcome>>,
    },
}

/// Result of [`RefreshCoordinator::refresh_once`] as seen by one request
#[derive(Debug)]
pub(crate) struct Settled {
    pub outcome: RefreshOutcome,
    /// Only the request that issued the refresh call is the leader. Any
    /// follow up for the whole batch (clearing the session) is its job
    pub led: bool,
}

enum Ticket {
    Leader,
    Follower(oneshot::Receiver<RefreshOutcome>),
}

#[derive(Debug, Default)]
pub(crate) struct RefreshCoordinator {
    state: Mutex<CoordinatorState>,
}

impl RefreshCoordinator {
    /// Runs `refresh` unless a refresh is already in flight, in which case it
    /// waits for that one. Every caller in the same window gets the same
    /// outcome.
    ///
    /// `on_failure` only runs for the leader and always before any waiter is
    /// released
    pub(crate) async fn refresh_once<F, Fut, E>(&self, refresh: F, on_failure: E) -> Settled
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RefreshOutcome>,
        E: FnOnce(&RefreshFailed),
    {
        match self.join_or_lead() {
            Ticket::Follower(rx) => {
                debug!("refresh already in flight, waiting for it");
                let outcome = rx.await.unwrap_or(Err(RefreshFailed::Abandoned));
                Settled {
                    outcome,
                    led: false,
                }
            }
            Ticket::Leader => {
                info!("starting session refresh");
                let mut guard = LeaderGuard {
                    coordinator: self,
                    settled: false,
                };
                let outcome = refresh().await;
                if let Err(err) = &outcome {
                    on_failure(err);
                }
                guard.settle(outcome.clone());
                Settled { outcome, led: true }
            }
        }
    }

    pub(crate) fn is_refresh_in_flight(&self) -> bool {
        matches!(
            *self.state.lock().expect("mutex poisoned"),
            CoordinatorState::RefreshInFlight { .. }
        )
    }

    /// The check of the in-flight flag and setting it must be one step
    fn join_or_lead(&self) -> Ticket {
        let mut state = self.state.lock().expect("mutex poisoned");
        match &mut *state {
            CoordinatorState::RefreshInFlight { waiters } => {
                let (tx, rx) = oneshot::channel();
                waiters.push(tx);
                Ticket::Follower(rx)
            }
            CoordinatorState::Idle => {
                *state = CoordinatorState::RefreshInFlight {
                    waiters: Vec::new(),
                };
                Ticket::Leader
            }
        }
    }

    /// Returns to idle and releases every queued request with `outcome`
    fn release(&self, outcome: RefreshOutcome) {
        let previous = mem::take(&mut *self.state.lock().expect("mutex poisoned"));
        let CoordinatorState::RefreshInFlight { waiters } = previous else {
            debug_assert!(false, "released a refresh that was not in flight");
            return;
        };
        debug!(
            waiter_count = waiters.len(),
            ?outcome,
            "releasing queued requests"
        );
        for waiter in waiters {
            // An error only means that request is no longer waiting
            let _ = waiter.send(outcome.clone());
        }
    }
}

/// Makes sure the queue is released even if the leader's future is dropped
/// before the refresh completes
struct LeaderGuard<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl LeaderGuard<'_> {
    fn settle(&mut self, outcome: RefreshOutcome) {
        self.settled = true;
        self.coordinator.release(outcome);
    }
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.coordinator.release(Err(RefreshFailed::Abandoned));
        }
    }
}
