//! Bankroll API seam.
//!
//! The transport crate implements this trait against the REST backend.
//! Services and tests only ever see the trait.

use async_trait::async_trait;

use super::bankrolls_model::{
    Bankroll, BankrollSessionFilter, BankrollStats, BankrollUpdate, NewBankroll,
};
use crate::errors::Result;
use crate::sessions::Session;

/// Trait defining the contract for bankroll endpoints.
#[async_trait]
pub trait BankrollApiTrait: Send + Sync {
    /// `GET /bankrolls`
    async fn list(&self) -> Result<Vec<Bankroll>>;

    /// `GET /bankrolls/:id`
    async fn get(&self, bankroll_id: &str) -> Result<Bankroll>;

    /// `POST /bankrolls`
    async fn create(&self, new_bankroll: &NewBankroll) -> Result<Bankroll>;

    /// `PUT /bankrolls/:id`
    async fn update(&self, bankroll_id: &str, update: &BankrollUpdate) -> Result<Bankroll>;

    /// `POST /bankrolls/:id/archive`
    async fn archive(&self, bankroll_id: &str) -> Result<Bankroll>;

    /// `DELETE /bankrolls/:id`
    ///
    /// Returns whether the backend confirmed the deletion.
    async fn delete(&self, bankroll_id: &str) -> Result<bool>;

    /// `GET /bankrolls/:id/sessions`
    async fn sessions(
        &self,
        bankroll_id: &str,
        filter: &BankrollSessionFilter,
    ) -> Result<Vec<Session>>;

    /// `GET /bankrolls/:id/sessions/active`
    ///
    /// `None` when the bankroll has no running or paused session.
    async fn active_session(&self, bankroll_id: &str) -> Result<Option<Session>>;

    /// `GET /bankrolls/stats`
    async fn stats(&self) -> Result<BankrollStats>;
}
