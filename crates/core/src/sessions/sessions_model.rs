//! Session domain models and conflict-resolution types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::bankrolls::BankrollRef;
use crate::errors::{Result, ValidationError};
use crate::utils::serde_lenient::{decimal_or_zero, lenient_u32, opt_string_id, string_id};
use crate::utils::time_utils::minutes_since;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    #[serde(alias = "active")]
    Running,
    Paused,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Running => "running",
            SessionStatus::Paused => "paused",
            SessionStatus::Completed => "completed",
        }
    }

    /// Running and paused sessions still block a new session on the same bankroll.
    pub fn is_active(&self) -> bool {
        matches!(self, SessionStatus::Running | SessionStatus::Paused)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "running" | "active" => Ok(SessionStatus::Running),
            "paused" => Ok(SessionStatus::Paused),
            "completed" => Ok(SessionStatus::Completed),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown session status '{}'",
                other
            ))),
        }
    }
}

/// A bounded period of play against one bankroll.
///
/// The totals are computed and owned by the server. The client never
/// recomputes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(deserialize_with = "string_id")]
    pub id: String,
    #[serde(default, deserialize_with = "opt_string_id")]
    pub bankroll_id: Option<String>,
    #[serde(default)]
    pub bankroll: Option<BankrollRef>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: SessionStatus,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub total_buyins: Decimal,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub total_cashes: Decimal,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub game_count: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub cash_count: u32,
}

impl Session {
    /// The bankroll this session belongs to, from the flat id or the embedded reference.
    pub fn owning_bankroll_id(&self) -> Option<&str> {
        self.bankroll_id
            .as_deref()
            .or_else(|| self.bankroll.as_ref().map(|b| b.id.as_str()))
    }

    pub fn belongs_to(&self, bankroll_id: &str) -> bool {
        self.owning_bankroll_id() == Some(bankroll_id)
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Cashes minus buy-ins as reported by the server.
    pub fn profit(&self) -> Decimal {
        self.total_cashes - self.total_buyins
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed session")
    }

    /// Minutes since the session started, or zero when the start is unknown.
    pub fn current_duration_minutes(&self, now: DateTime<Utc>) -> i64 {
        self.start_time
            .map(|start| minutes_since(start, now))
            .unwrap_or(0)
    }
}

/// `bankrollName -> activeSession`, rebuilt from server truth on every load.
pub type ActiveSessionMap = BTreeMap<String, Session>;

/// Input model for starting a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSession {
    pub bankroll_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub notes: Option<String>,
}

impl NewSession {
    pub fn new(bankroll_id: impl Into<String>, name: Option<String>) -> Self {
        Self {
            bankroll_id: bankroll_id.into(),
            name,
            location: None,
            notes: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.bankroll_id.trim().is_empty() {
            return Err(ValidationError::MissingField("bankroll_id".to_string()).into());
        }
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err(ValidationError::InvalidInput(
                "Session name cannot be blank".to_string(),
            )
            .into());
        }
        Ok(())
    }
}

/// What to do with an existing active session when starting a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConflictAction {
    Resume,
    PauseExisting,
    CompleteExisting,
    #[default]
    Fail,
}

impl ConflictAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictAction::Resume => "resume",
            ConflictAction::PauseExisting => "pause_existing",
            ConflictAction::CompleteExisting => "complete_existing",
            ConflictAction::Fail => "fail",
        }
    }
}

impl fmt::Display for ConflictAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConflictAction {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "resume" => Ok(ConflictAction::Resume),
            "pause_existing" | "pause" => Ok(ConflictAction::PauseExisting),
            "complete_existing" | "complete" => Ok(ConflictAction::CompleteExisting),
            "fail" => Ok(ConflictAction::Fail),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown conflict action '{}'",
                other
            ))),
        }
    }
}

/// One entry in the menu of ways out of a session conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedAction {
    pub action: ConflictAction,
    pub label: String,
}

impl SuggestedAction {
    /// The menu offered whenever a bankroll already has an active session.
    pub fn default_menu() -> Vec<SuggestedAction> {
        vec![
            SuggestedAction {
                action: ConflictAction::Resume,
                label: "Resume existing session".to_string(),
            },
            SuggestedAction {
                action: ConflictAction::PauseExisting,
                label: "Pause existing and create new".to_string(),
            },
            SuggestedAction {
                action: ConflictAction::CompleteExisting,
                label: "Complete existing and create new".to_string(),
            },
        ]
    }
}

/// Structured conflict returned when a bankroll already has an active session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConflict {
    #[serde(rename = "activeSession", alias = "active_session", default)]
    pub active_session: Option<Session>,
    #[serde(default)]
    pub suggested_actions: Vec<SuggestedAction>,
    #[serde(default)]
    pub message: Option<String>,
}

impl SessionConflict {
    pub fn for_session(active_session: Option<Session>) -> Self {
        Self {
            active_session,
            suggested_actions: SuggestedAction::default_menu(),
            message: Some("There is already an active session for this bankroll".to_string()),
        }
    }

    /// Builds a conflict from the body of a backend rejection. Missing parts
    /// fall back to the default menu.
    pub fn from_details(details: Option<&serde_json::Value>) -> Self {
        let mut conflict = details
            .and_then(|value| serde_json::from_value::<SessionConflict>(value.clone()).ok())
            .unwrap_or_else(|| SessionConflict::for_session(None));
        if conflict.suggested_actions.is_empty() {
            conflict.suggested_actions = SuggestedAction::default_menu();
        }
        conflict
    }
}

/// Answer to "does this bankroll already have an active session?".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConflictCheck {
    #[serde(default)]
    pub has_active_session: bool,
    #[serde(default)]
    pub active_session: Option<Session>,
}

impl ConflictCheck {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn found(session: Session) -> Self {
        Self {
            has_active_session: true,
            active_session: Some(session),
        }
    }

    /// A usable answer names the blocking session whenever it claims one exists.
    pub fn is_consistent(&self) -> bool {
        !self.has_active_session || self.active_session.is_some()
    }
}

/// Body of `POST /sessions`, carrying the caller's conflict decision.
#[derive(Debug, Clone, Serialize)]
pub struct SessionCreateRequest {
    #[serde(flatten)]
    pub session: NewSession,
    pub force_create: bool,
    pub action_on_conflict: ConflictAction,
}

impl SessionCreateRequest {
    pub fn new(session: NewSession, action_on_conflict: ConflictAction) -> Self {
        Self {
            session,
            force_create: action_on_conflict != ConflictAction::Fail,
            action_on_conflict,
        }
    }
}

/// Result of a create that went through conflict resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionCreation {
    pub session: Session,
    /// The action applied to a pre-existing session, if there was one.
    pub previous_session_action: Option<ConflictAction>,
}

/// Outcome of starting a session without a pre-chosen conflict action.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionStart {
    Created(Session),
    Conflict(SessionConflict),
}

impl SessionStart {
    pub fn is_conflict(&self) -> bool {
        matches!(self, SessionStart::Conflict(_))
    }
}

/// Snapshot of the server's active sessions at startup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecoveryCheck {
    pub has_active_sessions: bool,
    pub sessions: Vec<Session>,
}
