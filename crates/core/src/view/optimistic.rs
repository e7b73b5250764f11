//! Tentative local values that the server always overrides.

use crate::bankrolls::{Bankroll, BankrollAdjustment};

/// A value shown to the user before the server has confirmed it.
///
/// `apply_local` stacks a tentative change on top of the last known value.
/// `confirm` replaces everything with the server's value, whatever the local
/// state was.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimisticValue<T> {
    confirmed: T,
    tentative: Option<T>,
}

impl<T: Clone> OptimisticValue<T> {
    pub fn new(confirmed: T) -> Self {
        Self {
            confirmed,
            tentative: None,
        }
    }

    /// What to display: the tentative value if one is pending.
    pub fn current(&self) -> &T {
        self.tentative.as_ref().unwrap_or(&self.confirmed)
    }

    pub fn confirmed(&self) -> &T {
        &self.confirmed
    }

    pub fn is_tentative(&self) -> bool {
        self.tentative.is_some()
    }

    /// Applies a local change to the displayed value.
    pub fn apply_local(&mut self, change: impl FnOnce(&T) -> T) {
        let next = change(self.current());
        self.tentative = Some(next);
    }

    /// Takes the server's value. Pending local changes are discarded.
    pub fn confirm(&mut self, authoritative: T) {
        self.confirmed = authoritative;
        self.tentative = None;
    }

    /// Drops pending local changes, e.g. after the request failed.
    pub fn rollback(&mut self) {
        self.tentative = None;
    }
}

impl OptimisticValue<Bankroll> {
    /// Folds the outcome of a game write into the displayed bankroll.
    ///
    /// The local adjustment is applied first. A bankroll sent back by the
    /// server then replaces it, so the value only stays tentative when the
    /// response carried none.
    pub fn settle(&mut self, adjustment: Option<&BankrollAdjustment>, server: Option<&Bankroll>) {
        if let Some(adjustment) = adjustment {
            self.apply_local(|b| b.with_adjustment(adjustment));
        }
        if let Some(server) = server {
            self.confirm(server.clone());
        }
    }
}
