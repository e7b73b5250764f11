//! Best-effort local cache of active sessions.
//!
//! The cache only helps a restarted client find its way back to sessions the
//! server still considers active. It is pruned or confirmed against server
//! truth and never treated as authoritative.

use chrono::{DateTime, Utc};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use super::sessions_model::Session;
use super::sessions_traits::SessionApiTrait;
use crate::errors::{Error, Result};

/// What the client remembers about one active session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecoveryRecord {
    pub bankroll_id: String,
    #[serde(default)]
    pub session_name: Option<String>,
    #[serde(default)]
    pub recovered_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl SessionRecoveryRecord {
    pub fn new(bankroll_id: impl Into<String>, session_name: Option<String>) -> Self {
        Self {
            bankroll_id: bankroll_id.into(),
            session_name,
            recovered_at: None,
            last_updated: None,
        }
    }

    pub fn from_session(session: &Session) -> Option<Self> {
        let bankroll_id = session.owning_bankroll_id()?;
        Some(Self {
            bankroll_id: bankroll_id.to_string(),
            session_name: session.name.clone(),
            recovered_at: Some(Utc::now()),
            last_updated: None,
        })
    }
}

/// Session id -> record, persisted as one JSON document.
pub type SessionRecoveryMap = BTreeMap<String, SessionRecoveryRecord>;

/// Storage for the recovery document.
pub trait SessionStateStoreTrait: Send + Sync {
    fn load_all(&self) -> Result<SessionRecoveryMap>;
    fn save_all(&self, states: &SessionRecoveryMap) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// In-memory store for tests and ephemeral runs.
#[derive(Default)]
pub struct InMemorySessionStateStore {
    states: Mutex<SessionRecoveryMap>,
}

impl InMemorySessionStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStateStoreTrait for InMemorySessionStateStore {
    fn load_all(&self) -> Result<SessionRecoveryMap> {
        let states = self
            .states
            .lock()
            .map_err(|e| Error::storage(e.to_string()))?;
        Ok(states.clone())
    }

    fn save_all(&self, states: &SessionRecoveryMap) -> Result<()> {
        let mut guard = self
            .states
            .lock()
            .map_err(|e| Error::storage(e.to_string()))?;
        *guard = states.clone();
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .states
            .lock()
            .map_err(|e| Error::storage(e.to_string()))?;
        guard.clear();
        Ok(())
    }
}

/// Cached entries confirmed against the server's active sessions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecoverySync {
    pub server_sessions: Vec<Session>,
    pub local_states: SessionRecoveryMap,
    pub needs_recovery: bool,
    pub synced_sessions: Vec<(Session, SessionRecoveryRecord)>,
}

/// Reads and writes the recovery cache. Storage failures are logged and
/// never reach the caller.
#[derive(Clone)]
pub struct SessionRecoveryService {
    api: Arc<dyn SessionApiTrait>,
    store: Arc<dyn SessionStateStoreTrait>,
}

impl SessionRecoveryService {
    pub fn new(api: Arc<dyn SessionApiTrait>, store: Arc<dyn SessionStateStoreTrait>) -> Self {
        Self { api, store }
    }

    fn read_states(&self) -> SessionRecoveryMap {
        self.store.load_all().unwrap_or_else(|e| {
            error!("Failed to read session recovery cache: {}", e);
            SessionRecoveryMap::new()
        })
    }

    fn write_states(&self, states: &SessionRecoveryMap) {
        if let Err(e) = self.store.save_all(states) {
            error!("Failed to write session recovery cache: {}", e);
        }
    }

    /// Stores a record for `session_id`, stamping `last_updated`.
    pub fn save_session_state(&self, session_id: &str, mut record: SessionRecoveryRecord) {
        record.last_updated = Some(Utc::now());
        let mut states = self.read_states();
        states.insert(session_id.to_string(), record);
        self.write_states(&states);
    }

    pub fn load_session_state(&self, session_id: &str) -> Option<SessionRecoveryRecord> {
        self.read_states().remove(session_id)
    }

    pub fn remove_session_state(&self, session_id: &str) {
        let mut states = self.read_states();
        if states.remove(session_id).is_some() {
            self.write_states(&states);
        }
    }

    pub fn clear_all_session_states(&self) {
        if let Err(e) = self.store.clear() {
            error!("Failed to clear session recovery cache: {}", e);
        }
    }

    pub fn get_all_session_states(&self) -> SessionRecoveryMap {
        self.read_states()
    }

    /// Records every server-active session that names its bankroll.
    pub fn remember_sessions(&self, sessions: &[Session]) {
        let mut states = self.read_states();
        let now = Utc::now();
        for session in sessions.iter().filter(|s| s.is_active()) {
            if let Some(mut record) = SessionRecoveryRecord::from_session(session) {
                record.last_updated = Some(now);
                states.insert(session.id.clone(), record);
            }
        }
        self.write_states(&states);
    }

    /// Confirms the cache against the server's active sessions.
    ///
    /// Every cached entry the server no longer reports as active is evicted.
    /// Recovery is needed whenever the server holds active sessions, cached
    /// or not. When the server cannot be asked, the cache is left as it is.
    pub async fn initialize_session_recovery(&self) -> Result<RecoverySync> {
        let server_sessions = self.api.list_active().await.map_err(|e| {
            warn!("Session recovery skipped, active sessions unavailable: {}", e);
            e
        })?;
        let local_states = self.read_states();

        let (kept, stale): (SessionRecoveryMap, SessionRecoveryMap) =
            local_states.into_iter().partition(|(id, _)| {
                server_sessions
                    .iter()
                    .any(|s| s.id == *id && s.is_active())
            });
        if !stale.is_empty() {
            info!("Evicting {} stale cached sessions", stale.len());
            self.write_states(&kept);
        }

        let synced_sessions: Vec<(Session, SessionRecoveryRecord)> = server_sessions
            .iter()
            .filter_map(|s| kept.get(&s.id).map(|r| (s.clone(), r.clone())))
            .collect();

        Ok(RecoverySync {
            needs_recovery: !server_sessions.is_empty(),
            server_sessions,
            local_states: kept,
            synced_sessions,
        })
    }
}
