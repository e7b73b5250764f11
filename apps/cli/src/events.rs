//! Client event sink for the terminal.

use bankrollgod_core::events::{ClientEvent, ClientEventSink};
use tracing::{debug, info, warn};

/// Reports client events through `tracing`.
///
/// `AuthenticationRequired` is the one event a user has to act on, so it is
/// logged as a warning with the command to run.
#[derive(Clone, Default)]
pub struct TerminalEventSink;

impl ClientEventSink for TerminalEventSink {
    fn emit(&self, event: ClientEvent) {
        match event {
            ClientEvent::AuthenticationRequired { reason } => {
                warn!("{}. Sign in again with `bankrollgod login`.", reason);
            }
            ClientEvent::BankrollAdjusted(adjustment) => {
                info!(
                    "Bankroll {} adjusted by {} ({:?})",
                    adjustment.bankroll_id, adjustment.amount, adjustment.source
                );
            }
            ClientEvent::SessionStarted {
                session_id,
                bankroll_id,
                previous_session_action,
            } => match previous_session_action {
                Some(action) => info!(
                    "Session {} started on bankroll {} after '{}' on the previous one",
                    session_id,
                    bankroll_id,
                    action.as_str()
                ),
                None => info!("Session {} started on bankroll {}", session_id, bankroll_id),
            },
            ClientEvent::SessionStatusChanged { session_id, status } => {
                info!("Session {} is now {}", session_id, status);
            }
            other => debug!("client event: {:?}", other),
        }
    }
}
