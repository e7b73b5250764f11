//! Client event types.

use serde::{Deserialize, Serialize};

use crate::bankrolls::BankrollAdjustment;
use crate::sessions::ConflictAction;

/// Events emitted by client services.
///
/// `BankrollAdjusted` is deliberately separate from the session events. A
/// view showing session details must not reload just because money moved
/// on the bankroll.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// A monetary change on one bankroll. Carries no session data.
    BankrollAdjusted(BankrollAdjustment),

    /// The active-session projection was rebuilt from the server.
    ActiveSessionsReloaded { bankroll_names: Vec<String> },

    /// A new session was created.
    SessionStarted {
        session_id: String,
        bankroll_id: String,
        previous_session_action: Option<ConflictAction>,
    },

    /// A session was paused, resumed or completed.
    SessionStatusChanged { session_id: String, status: String },

    /// The backend rejected our credentials. They have been cleared and the
    /// user has to sign in again.
    AuthenticationRequired { reason: String },

    /// The signed-in user changed (login, register, logout).
    AuthStateChanged { authenticated: bool },
}

impl ClientEvent {
    pub fn bankroll_adjusted(adjustment: BankrollAdjustment) -> Self {
        Self::BankrollAdjusted(adjustment)
    }

    pub fn authentication_required(reason: impl Into<String>) -> Self {
        Self::AuthenticationRequired {
            reason: reason.into(),
        }
    }

    /// True for events that should trigger a reload of session views.
    pub fn affects_sessions(&self) -> bool {
        matches!(
            self,
            Self::ActiveSessionsReloaded { .. }
                | Self::SessionStarted { .. }
                | Self::SessionStatusChanged { .. }
        )
    }
}
