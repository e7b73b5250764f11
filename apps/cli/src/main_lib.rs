use std::sync::Arc;

use bankrollgod_client::{BankrollGodClient, FileCredentialStore, FileSessionStateStore};
use bankrollgod_core::{
    auth::{AuthService, CredentialStoreTrait},
    bankrolls::BankrollService,
    events::ClientEventSink,
    games::GameService,
    overlay::OverlayService,
    sessions::{SessionRecoveryService, SessionService, SessionStateStoreTrait},
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{config::Config, events::TerminalEventSink};

/// Everything a command needs, built once at startup.
pub struct AppState {
    pub config: Config,
    pub client: Arc<BankrollGodClient>,
    pub auth_service: Arc<AuthService>,
    pub bankroll_service: Arc<BankrollService>,
    pub session_service: Arc<SessionService>,
    pub recovery_service: Arc<SessionRecoveryService>,
    pub game_service: Arc<GameService>,
    pub overlay_service: Arc<OverlayService>,
}

pub fn init_tracing() {
    let log_format = std::env::var("BRG_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).without_time())
            .init();
    }
}

pub fn build_state(config: Config) -> anyhow::Result<Arc<AppState>> {
    tracing::debug!("Data directory in use: {}", config.data_dir.display());

    let event_sink: Arc<dyn ClientEventSink> = Arc::new(TerminalEventSink);
    let credentials: Arc<dyn CredentialStoreTrait> =
        Arc::new(FileCredentialStore::in_dir(&config.data_dir));
    let session_states: Arc<dyn SessionStateStoreTrait> =
        Arc::new(FileSessionStateStore::in_dir(&config.data_dir));

    let client = Arc::new(BankrollGodClient::new(
        config.client_config(),
        credentials.clone(),
        event_sink.clone(),
    )?);
    tracing::debug!("API base URL: {}", client.base_url());

    let auth_service = Arc::new(AuthService::new(
        client.clone(),
        client.clone(),
        credentials,
        event_sink.clone(),
    ));
    let bankroll_service = Arc::new(BankrollService::new(client.clone()));
    let session_service = Arc::new(SessionService::new(client.clone(), event_sink.clone()));
    let recovery_service = Arc::new(SessionRecoveryService::new(
        client.clone(),
        session_states,
    ));
    let game_service = Arc::new(GameService::new(client.clone(), event_sink));
    let overlay_service = Arc::new(OverlayService::new(client.clone()));

    Ok(Arc::new(AppState {
        config,
        client,
        auth_service,
        bankroll_service,
        session_service,
        recovery_service,
        game_service,
        overlay_service,
    }))
}
