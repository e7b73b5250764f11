use log::{debug, warn};
use std::sync::Arc;

use super::overlay_model::{OverlayKind, OverlaySnapshot};
use crate::bankrolls::BankrollApiTrait;
use crate::errors::Result;

/// Polls the two read endpoints an overlay needs. Never writes.
#[derive(Clone)]
pub struct OverlayService {
    api: Arc<dyn BankrollApiTrait>,
}

impl OverlayService {
    pub fn new(api: Arc<dyn BankrollApiTrait>) -> Self {
        Self { api }
    }

    /// Reads the bankroll and its active session.
    ///
    /// The bankroll read must succeed. A failed session read shows as
    /// "no active session" rather than failing the poll.
    pub async fn snapshot(&self, bankroll_id: &str) -> Result<OverlaySnapshot> {
        let bankroll = self.api.get(bankroll_id).await?;

        let session = match self.api.active_session(bankroll_id).await {
            Ok(session) => session.filter(|s| s.is_active()),
            Err(e) => {
                warn!(
                    "Active session read failed for bankroll {}: {}",
                    bankroll_id, e
                );
                None
            }
        };

        debug!(
            "Overlay snapshot for {}: session {:?}",
            bankroll_id,
            session.as_ref().map(|s| s.id.as_str())
        );
        Ok(OverlaySnapshot::new(&bankroll, session.as_ref()))
    }

    pub async fn render(&self, bankroll_id: &str, kind: OverlayKind) -> Result<String> {
        let snapshot = self.snapshot(bankroll_id).await?;
        Ok(kind.render(&snapshot))
    }
}
