//! Sessions module - models, API seam, reconciliation and recovery cache.

mod session_recovery;
mod sessions_model;
mod sessions_service;
mod sessions_traits;



pub use session_recovery::{
    InMemorySessionStateStore, RecoverySync, SessionRecoveryMap, SessionRecoveryRecord,
    SessionRecoveryService, SessionStateStoreTrait,
};
pub use sessions_model::{
    ActiveSessionMap, ConflictAction, ConflictCheck, NewSession, RecoveryCheck, Session,
    SessionConflict, SessionCreateRequest, SessionCreation, SessionStart, SessionStatus,
    SuggestedAction,
};
pub use sessions_service::SessionService;
pub use sessions_traits::SessionApiTrait;
