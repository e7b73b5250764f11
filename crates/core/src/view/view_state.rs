//! Per-view load state.
//!
//! Every view goes `Idle -> Loading -> Loaded | Failed`. Each load takes a
//! ticket, and only the latest ticket may settle the state, so a slow
//! response can never overwrite a newer one.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::errors::{Error, Result};

/// How a failure is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Inline message; the server said no.
    Rejected,
    /// Connectivity banner with a reconnect action.
    Unreachable,
    /// Already handled globally; the user is sent to login.
    Unauthorized,
    /// Caught before anything was sent.
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ViewError {
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind, ErrorKind::Unreachable)
    }
}

impl From<&Error> for ViewError {
    fn from(error: &Error) -> Self {
        let kind = match error {
            Error::Validation(_) => ErrorKind::Invalid,
            Error::Unreachable(_) => ErrorKind::Unreachable,
            Error::Unauthorized(_) => ErrorKind::Unauthorized,
            _ => ErrorKind::Rejected,
        };
        let message = match error {
            Error::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        };
        Self { kind, message }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(ViewError),
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Idle
    }
}

impl<T> ViewState<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ViewError> {
        match self {
            ViewState::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// Identifies one load. Only the most recent ticket may settle the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

/// Holds one view's state and fences out-of-order results.
#[derive(Debug)]
pub struct ViewController<T> {
    state: RwLock<ViewState<T>>,
    latest: AtomicU64,
}

impl<T: Clone> Default for ViewController<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> ViewController<T> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(ViewState::Idle),
            latest: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> ViewState<T> {
        self.state
            .read()
            .map(|s| s.clone())
            .unwrap_or(ViewState::Idle)
    }

    /// Moves to `Loading` and hands out a fresh ticket. Earlier tickets are
    /// now stale.
    pub fn begin(&self) -> RequestTicket {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        *state = ViewState::Loading;
        RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Settles the view with `result` if `ticket` is still the latest.
    ///
    /// Returns whether the result was applied.
    pub fn complete(&self, ticket: RequestTicket, result: Result<T>) -> bool {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        // Checked under the write lock, the same lock begin() takes.
        if !self.is_current(ticket) {
            log::debug!("Dropping stale result for ticket {:?}", ticket);
            return false;
        }
        *state = match result {
            Ok(data) => ViewState::Loaded(data),
            Err(e) => ViewState::Failed(ViewError::from(&e)),
        };
        true
    }

    /// Runs `load` under a fresh ticket and settles the view with its result.
    pub async fn load<F, Fut>(&self, load: F) -> ViewState<T>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let ticket = self.begin();
        let result = load().await;
        self.complete(ticket, result);
        self.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_ticket_cannot_overwrite_newer_result() {
        let view: ViewController<Vec<u32>> = ViewController::new();
        let first = view.begin();
        let second = view.begin();

        assert!(view.complete(second, Ok(vec![2])));
        assert!(!view.complete(first, Ok(vec![1])));
        assert_eq!(view.state(), ViewState::Loaded(vec![2]));
    }

    #[test]
    fn test_failures_are_classified() {
        let view: ViewController<u32> = ViewController::new();

        let ticket = view.begin();
        view.complete(ticket, Err(Error::unreachable("dns")));
        let error = view.state().error().cloned().unwrap();
        assert_eq!(error.kind, ErrorKind::Unreachable);
        assert!(error.is_retryable());

        let ticket = view.begin();
        view.complete(ticket, Err(Error::rejected("Bankroll not found")));
        assert_eq!(
            view.state().error().cloned(),
            Some(ViewError {
                kind: ErrorKind::Rejected,
                message: "Bankroll not found".to_string()
            })
        );

        let ticket = view.begin();
        view.complete(ticket, Err(Error::Unauthorized("expired".to_string())));
        assert_eq!(view.state().error().unwrap().kind, ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn test_load_settles_state() {
        let view: ViewController<u32> = ViewController::new();
        let state = view.load(|| async { Ok(7) }).await;
        assert_eq!(state.data(), Some(&7));
    }
}
