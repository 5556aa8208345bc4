//! The `{data, loading, error}` container owned by each controller or facade.
//!
//! # Design
//! State lives in a `tokio::sync::watch` channel: the owner writes through
//! the sender, and observers either borrow a snapshot or subscribe to change
//! notifications. There is one `loading` flag per container, not a counter,
//! so overlapping requests share it.
//!
//! Every request takes a `Ticket` from `begin`. Under
//! `SettlePolicy::LastSettled` tickets are ignored and whichever request
//! settles last owns the final state. Under `SettlePolicy::LatestIssued` only
//! the newest ticket may write; older results are dropped on arrival.
//! Generation bumps and settle checks both happen inside the channel's write
//! lock, so a stale settle can never interleave with a newer `begin`.
//!
//! Callers hold a `Pending` guard across the await. If the request future is
//! dropped before it settles, the guard settles the ticket with no result, so
//! `loading` never outlives the request that set it.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::debug;

/// Snapshot of one request lifecycle container.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestState<T> {
    /// Result of the last successful request. Failures leave it untouched.
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> RequestState<T> {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Which settled request is allowed to write state when several overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettlePolicy {
    /// Every settlement writes; the last one to resolve wins.
    #[default]
    LastSettled,
    /// Only the most recently issued request writes; stale ones are dropped.
    LatestIssued,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ticket(u64);

pub(crate) struct StateCell<T> {
    tx: watch::Sender<RequestState<T>>,
    issued: AtomicU64,
    policy: SettlePolicy,
}

impl<T> StateCell<T> {
    pub(crate) fn new(policy: SettlePolicy) -> Self {
        let (tx, _) = watch::channel(RequestState::default());
        Self {
            tx,
            issued: AtomicU64::new(0),
            policy,
        }
    }

    pub(crate) fn policy(&self) -> SettlePolicy {
        self.policy
    }

    /// Enter Pending: `loading = true`, `error` cleared, `data` kept.
    pub(crate) fn begin(&self) -> Ticket {
        let mut ticket = Ticket(0);
        self.tx.send_modify(|state| {
            ticket = Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1);
            state.loading = true;
            state.error = None;
        });
        ticket
    }

    pub(crate) fn succeed(&self, ticket: Ticket, data: T) -> bool {
        self.settle(ticket, |state| {
            state.data = Some(data);
            state.error = None;
        })
    }

    pub(crate) fn fail(&self, ticket: Ticket, message: String) -> bool {
        let message = if message.is_empty() {
            "request failed".to_string()
        } else {
            message
        };
        self.settle(ticket, |state| state.error = Some(message))
    }

    fn settle(&self, ticket: Ticket, apply: impl FnOnce(&mut RequestState<T>)) -> bool {
        self.tx.send_if_modified(|state| {
            if self.policy == SettlePolicy::LatestIssued {
                let latest = self.issued.load(Ordering::SeqCst);
                if ticket.0 != latest {
                    debug!(ticket = ticket.0, latest, "discarding stale response");
                    return false;
                }
            }
            apply(state);
            state.loading = false;
            true
        })
    }

    /// Guard `ticket` until it settles.
    pub(crate) fn pending(&self, ticket: Ticket) -> Pending<'_, T> {
        Pending {
            cell: self,
            ticket: Some(ticket),
        }
    }

    pub(crate) fn with<R>(&self, f: impl FnOnce(&RequestState<T>) -> R) -> R {
        f(&self.tx.borrow())
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<RequestState<T>> {
        self.tx.subscribe()
    }
}

impl<T: Clone> StateCell<T> {
    pub(crate) fn snapshot(&self) -> RequestState<T> {
        self.tx.borrow().clone()
    }
}

/// An issued ticket that has not settled yet.
pub(crate) struct Pending<'a, T> {
    cell: &'a StateCell<T>,
    ticket: Option<Ticket>,
}

impl<T> Pending<'_, T> {
    pub(crate) fn succeed(mut self, data: T) -> bool {
        match self.ticket.take() {
            Some(ticket) => self.cell.succeed(ticket, data),
            None => false,
        }
    }

    pub(crate) fn fail(mut self, message: String) -> bool {
        match self.ticket.take() {
            Some(ticket) => self.cell.fail(ticket, message),
            None => false,
        }
    }
}

impl<T> Drop for Pending<'_, T> {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            debug!(ticket = ticket.0, "request dropped before settling");
            self.cell.settle(ticket, |_| {});
        }
    }
}
