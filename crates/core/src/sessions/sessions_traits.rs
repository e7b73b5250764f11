use async_trait::async_trait;

use super::sessions_model::{ConflictCheck, Session, SessionCreateRequest, SessionStatus};
use crate::errors::Result;

/// Trait defining the contract for session endpoints.
#[async_trait]
pub trait SessionApiTrait: Send + Sync {
    /// `GET /sessions/active`
    async fn list_active(&self) -> Result<Vec<Session>>;

    /// `GET /sessions`, optionally filtered by status.
    async fn list(&self, status: Option<SessionStatus>) -> Result<Vec<Session>>;

    /// `GET /sessions/:id`
    async fn get(&self, session_id: &str) -> Result<Session>;

    /// `POST /sessions`
    ///
    /// A bankroll that already has an active session is reported as
    /// `Error::SessionConflict` when the request does not force creation.
    async fn create(&self, request: &SessionCreateRequest) -> Result<Session>;

    /// `POST /sessions/:id/complete`
    async fn complete(&self, session_id: &str) -> Result<Session>;

    /// `POST /sessions/:id/pause`
    async fn pause(&self, session_id: &str) -> Result<Session>;

    /// `POST /sessions/resume/:id`
    async fn resume(&self, session_id: &str) -> Result<Session>;

    /// `GET /sessions/check-conflicts/:bankrollId`
    async fn check_conflicts(&self, bankroll_id: &str) -> Result<ConflictCheck>;

    /// `POST /sessions/:id/update-stats`
    async fn update_stats(&self, session_id: &str) -> Result<()>;
}
