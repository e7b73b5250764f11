use log::{debug, info, warn};
use std::sync::{Arc, RwLock};

use super::sessions_model::{
    ActiveSessionMap, ConflictAction, ConflictCheck, NewSession, RecoveryCheck, Session,
    SessionConflict, SessionCreateRequest, SessionCreation, SessionStart,
};
use super::sessions_traits::SessionApiTrait;
use crate::bankrolls::Bankroll;
use crate::errors::{Error, Result};
use crate::events::{ClientEvent, ClientEventSink};

/// Keeps the client's view of active sessions consistent with the server.
///
/// The `bankrollName -> activeSession` projection is rebuilt from scratch on
/// every load and swapped in as a whole. Readers never see a half-built map.
///
/// Creating, pausing, resuming or completing a session does not touch the
/// projection. It catches up on the next [`SessionService::load_active_sessions`],
/// which callers holding the bankroll list run after a write.
#[derive(Clone)]
pub struct SessionService {
    api: Arc<dyn SessionApiTrait>,
    event_sink: Arc<dyn ClientEventSink>,
    projection: Arc<RwLock<ActiveSessionMap>>,
}

impl SessionService {
    pub fn new(api: Arc<dyn SessionApiTrait>, event_sink: Arc<dyn ClientEventSink>) -> Self {
        Self {
            api,
            event_sink,
            projection: Arc::new(RwLock::new(ActiveSessionMap::new())),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Pure helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Joins active sessions to bankrolls by id and keys them by bankroll name.
    ///
    /// Sessions whose bankroll is unknown, and sessions that are not active,
    /// are dropped.
    pub fn build_projection(sessions: &[Session], bankrolls: &[Bankroll]) -> ActiveSessionMap {
        let mut projection = ActiveSessionMap::new();
        for session in sessions.iter().filter(|s| s.is_active()) {
            let Some(bankroll_id) = session.owning_bankroll_id() else {
                continue;
            };
            match bankrolls.iter().find(|b| b.id == bankroll_id) {
                Some(bankroll) => {
                    projection.insert(bankroll.name.clone(), session.clone());
                }
                None => debug!(
                    "Dropping active session {} for unknown bankroll {}",
                    session.id, bankroll_id
                ),
            }
        }
        projection
    }

    /// Answers a conflict check from a list of active sessions.
    pub fn derive_conflict(sessions: &[Session], bankroll_id: &str) -> ConflictCheck {
        sessions
            .iter()
            .find(|s| s.is_active() && s.belongs_to(bankroll_id))
            .cloned()
            .map(ConflictCheck::found)
            .unwrap_or_else(ConflictCheck::none)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Projection
    // ─────────────────────────────────────────────────────────────────────────

    /// Snapshot of the current projection.
    pub fn active_projection(&self) -> ActiveSessionMap {
        self.projection
            .read()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    /// The active session on the named bankroll, if the projection has one.
    pub fn active_session_for(&self, bankroll_name: &str) -> Option<Session> {
        self.projection
            .read()
            .ok()
            .and_then(|p| p.get(bankroll_name).cloned())
    }

    fn replace_projection(&self, projection: ActiveSessionMap) {
        let names: Vec<String> = projection.keys().cloned().collect();
        match self.projection.write() {
            Ok(mut guard) => *guard = projection,
            Err(e) => {
                warn!("Active session projection lock poisoned: {}", e);
                return;
            }
        }
        self.event_sink.emit(ClientEvent::ActiveSessionsReloaded {
            bankroll_names: names,
        });
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Server operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Reloads active sessions from the server and rebuilds the projection.
    pub async fn load_active_sessions(&self, bankrolls: &[Bankroll]) -> Result<ActiveSessionMap> {
        let sessions = self.api.list_active().await?;
        let projection = Self::build_projection(&sessions, bankrolls);
        debug!(
            "Active sessions: {} from server, {} projected",
            sessions.len(),
            projection.len()
        );
        self.replace_projection(projection.clone());
        Ok(projection)
    }

    /// Checks whether a bankroll already has an active session.
    ///
    /// The dedicated endpoint is asked first. When it fails or answers
    /// inconsistently, the answer is derived from the active session list.
    pub async fn check_conflicts(&self, bankroll_id: &str) -> Result<ConflictCheck> {
        match self.api.check_conflicts(bankroll_id).await {
            Ok(check) if check.is_consistent() => return Ok(check),
            Ok(_) => warn!(
                "Conflict check for bankroll {} named no session, deriving from active list",
                bankroll_id
            ),
            Err(e) if e.is_unauthorized() => return Err(e),
            Err(e) => debug!("Conflict check endpoint failed ({}), deriving", e),
        }
        let sessions = self.api.list_active().await?;
        Ok(Self::derive_conflict(&sessions, bankroll_id))
    }

    /// Creates a session, first applying `action` to any active session on
    /// the same bankroll.
    ///
    /// With `ConflictAction::Fail` an existing session yields
    /// `Error::SessionConflict` and nothing is created.
    pub async fn create_with_conflict_resolution(
        &self,
        new_session: NewSession,
        action: ConflictAction,
    ) -> Result<SessionCreation> {
        new_session.validate()?;
        let check = self.check_conflicts(&new_session.bankroll_id).await?;

        let previous_session_action = match (check.active_session, action) {
            (None, _) => None,
            (Some(existing), ConflictAction::Fail) => {
                info!(
                    "Bankroll {} already has active session {}",
                    new_session.bankroll_id, existing.id
                );
                return Err(Error::SessionConflict(Box::new(SessionConflict::for_session(
                    Some(existing),
                ))));
            }
            (Some(existing), action) => {
                self.apply_conflict_action(&existing, action).await?;
                Some(action)
            }
        };

        let request = SessionCreateRequest::new(new_session, action);
        let session = self.api.create(&request).await.map_err(into_conflict)?;
        info!(
            "Created session {} on bankroll {}",
            session.id, request.session.bankroll_id
        );
        self.event_sink.emit(ClientEvent::SessionStarted {
            session_id: session.id.clone(),
            bankroll_id: request.session.bankroll_id.clone(),
            previous_session_action,
        });
        Ok(SessionCreation {
            session,
            previous_session_action,
        })
    }

    /// Starts a session only if the bankroll is free. A conflict is returned
    /// as data so the caller can present the suggested actions.
    pub async fn create_session_with_recovery(&self, new_session: NewSession) -> Result<SessionStart> {
        match self
            .create_with_conflict_resolution(new_session, ConflictAction::Fail)
            .await
        {
            Ok(creation) => Ok(SessionStart::Created(creation.session)),
            Err(Error::SessionConflict(conflict)) => Ok(SessionStart::Conflict(*conflict)),
            Err(e) => Err(e),
        }
    }

    async fn apply_conflict_action(&self, existing: &Session, action: ConflictAction) -> Result<()> {
        match action {
            ConflictAction::Resume => {
                self.resume_session(&existing.id).await?;
            }
            ConflictAction::PauseExisting => {
                self.pause_session(&existing.id).await?;
            }
            ConflictAction::CompleteExisting => {
                self.complete_session(&existing.id).await?;
            }
            ConflictAction::Fail => {}
        }
        Ok(())
    }

    pub async fn pause_session(&self, session_id: &str) -> Result<Session> {
        let session = self.api.pause(session_id).await?;
        self.emit_status(&session);
        Ok(session)
    }

    /// Resumes a session. When the resume endpoint is unavailable the
    /// session is read back as is.
    pub async fn resume_session(&self, session_id: &str) -> Result<Session> {
        let session = match self.api.resume(session_id).await {
            Ok(session) => session,
            Err(e) if e.is_connectivity() || e.is_unauthorized() => return Err(e),
            Err(e) => {
                debug!("Resume endpoint failed for {} ({}), reading session", session_id, e);
                self.api.get(session_id).await?
            }
        };
        self.emit_status(&session);
        Ok(session)
    }

    pub async fn complete_session(&self, session_id: &str) -> Result<Session> {
        let session = self.api.complete(session_id).await?;
        self.emit_status(&session);
        Ok(session)
    }

    /// Asks the server to recompute session aggregates from its games.
    ///
    /// The backend also does this on its own, so a rejection is logged and
    /// ignored.
    pub async fn update_stats(&self, session_id: &str) -> Result<()> {
        match self.api.update_stats(session_id).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_connectivity() || e.is_unauthorized() => Err(e),
            Err(e) => {
                warn!("Session stats update for {} failed: {}", session_id, e);
                Ok(())
            }
        }
    }

    /// Reports the active sessions the server currently holds.
    pub async fn check_and_recover_sessions(&self) -> Result<RecoveryCheck> {
        let sessions = self.api.list_active().await?;
        info!("Found {} active sessions", sessions.len());
        Ok(RecoveryCheck {
            has_active_sessions: !sessions.is_empty(),
            sessions,
        })
    }

    fn emit_status(&self, session: &Session) {
        self.event_sink.emit(ClientEvent::SessionStatusChanged {
            session_id: session.id.clone(),
            status: session.status.as_str().to_string(),
        });
    }
}

/// Maps a backend `ACTIVE_SESSION_EXISTS` rejection to a structured conflict.
fn into_conflict(error: Error) -> Error {
    if !error.is_conflict() {
        return error;
    }
    match error {
        Error::Rejected { details, .. } => {
            Error::SessionConflict(Box::new(SessionConflict::from_details(details.as_ref())))
        }
        other => other,
    }
}
