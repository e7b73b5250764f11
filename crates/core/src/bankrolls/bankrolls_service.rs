use log::{debug, info};
use std::sync::Arc;

use super::bankrolls_constants::DEFAULT_SESSION_PAGE_SIZE;
use super::bankrolls_model::{
    Bankroll, BankrollAdjustment, BankrollSessionFilter, BankrollStats, BankrollUpdate,
    NewBankroll,
};
use super::bankrolls_traits::BankrollApiTrait;
use crate::errors::Result;
use crate::sessions::Session;

/// Service for bankroll CRUD. Input is validated before any request goes out.
#[derive(Clone)]
pub struct BankrollService {
    api: Arc<dyn BankrollApiTrait>,
}

impl BankrollService {
    pub fn new(api: Arc<dyn BankrollApiTrait>) -> Self {
        Self { api }
    }

    pub async fn list_bankrolls(&self) -> Result<Vec<Bankroll>> {
        let bankrolls = self.api.list().await?;
        debug!("Loaded {} bankrolls", bankrolls.len());
        Ok(bankrolls)
    }

    pub async fn get_bankroll(&self, bankroll_id: &str) -> Result<Bankroll> {
        self.api.get(bankroll_id).await
    }

    pub async fn create_bankroll(&self, new_bankroll: NewBankroll) -> Result<Bankroll> {
        new_bankroll.validate()?;
        let created = self.api.create(&new_bankroll).await?;
        info!("Created bankroll {} ({})", created.name, created.id);
        Ok(created)
    }

    pub async fn update_bankroll(
        &self,
        bankroll_id: &str,
        update: BankrollUpdate,
    ) -> Result<Bankroll> {
        update.validate()?;
        debug!("Updating bankroll {}: {:?}", bankroll_id, update);
        self.api.update(bankroll_id, &update).await
    }

    pub async fn archive_bankroll(&self, bankroll_id: &str) -> Result<Bankroll> {
        self.api.archive(bankroll_id).await
    }

    pub async fn delete_bankroll(&self, bankroll_id: &str) -> Result<bool> {
        let deleted = self.api.delete(bankroll_id).await?;
        if deleted {
            info!("Deleted bankroll {}", bankroll_id);
        }
        Ok(deleted)
    }

    /// Lists a bankroll's sessions, newest first as the backend orders them.
    pub async fn bankroll_sessions(
        &self,
        bankroll_id: &str,
        mut filter: BankrollSessionFilter,
    ) -> Result<Vec<Session>> {
        if filter.limit.is_none() {
            filter.limit = Some(DEFAULT_SESSION_PAGE_SIZE);
        }
        self.api.sessions(bankroll_id, &filter).await
    }

    pub async fn bankroll_stats(&self) -> Result<BankrollStats> {
        self.api.stats().await
    }

    /// Applies a tentative adjustment to a locally held bankroll list.
    ///
    /// Only the matching bankroll changes. The next server read replaces the
    /// figure unconditionally.
    pub fn apply_adjustment(
        bankrolls: &[Bankroll],
        adjustment: &BankrollAdjustment,
    ) -> Vec<Bankroll> {
        bankrolls
            .iter()
            .map(|b| b.with_adjustment(adjustment))
            .collect()
    }
}
