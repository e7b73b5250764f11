//! Core API traits implemented against the REST backend.

use async_trait::async_trait;
use reqwest::Method;
use rust_decimal::Decimal;
use serde_json::json;

use bankrollgod_core::auth::{
    AuthApiTrait, AuthPayload, LoginCredentials, PasswordChange, ProfileUpdate, RegisterRequest,
    SystemApiTrait, User,
};
use bankrollgod_core::bankrolls::{
    Bankroll, BankrollApiTrait, BankrollSessionFilter, BankrollStats, BankrollUpdate,
    NewBankroll, DELETE_CONFIRMATION,
};
use bankrollgod_core::errors::{Error, Result};
use bankrollgod_core::games::{Game, GameApiTrait, GameUpdate, GameWithBankroll, NewGame};
use bankrollgod_core::sessions::{
    ConflictCheck, Session, SessionApiTrait, SessionCreateRequest, SessionStatus,
};

use crate::client::{build_path, BankrollGodClient, ACCOUNT_DELETE_PATH};
use crate::envelope::ApiEnvelope;

fn auth_payload(envelope: &ApiEnvelope) -> Result<AuthPayload> {
    let token = envelope
        .token()
        .ok_or_else(|| Error::Unexpected("No token in auth response".to_string()))?;
    let user = envelope
        .user()?
        .ok_or_else(|| Error::Unexpected("No user in auth response".to_string()))?;
    Ok(AuthPayload { token, user })
}

fn profile(envelope: &ApiEnvelope) -> Result<User> {
    envelope
        .user()?
        .ok_or_else(|| Error::Unexpected("No user in profile response".to_string()))
}

fn conflict_check(envelope: &ApiEnvelope) -> Result<ConflictCheck> {
    // The flag sits at the top level; older deployments nest it under data.
    if envelope.body().get("hasActiveSession").is_some() {
        envelope.decode()
    } else {
        envelope.entity("conflict")
    }
}

fn game_with_bankroll(envelope: &ApiEnvelope) -> Result<GameWithBankroll> {
    Ok(GameWithBankroll {
        game: envelope.entity("game")?,
        bankroll: envelope.field("bankroll"),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Auth & system
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl AuthApiTrait for BankrollGodClient {
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthPayload> {
        let envelope = self
            .send_json(Method::POST, "/auth/login", credentials)
            .await?;
        auth_payload(&envelope)
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthPayload> {
        let envelope = self
            .send_json(Method::POST, "/auth/register", request)
            .await?;
        auth_payload(&envelope)
    }

    async fn logout(&self) -> Result<()> {
        self.post_empty("/auth/logout").await?;
        Ok(())
    }

    async fn me(&self) -> Result<User> {
        profile(&self.fetch("/auth/me").await?)
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        profile(&self.send_json(Method::PUT, "/auth/me", update).await?)
    }

    async fn change_password(&self, change: &PasswordChange) -> Result<()> {
        self.send_json(Method::PUT, "/auth/password", change).await?;
        Ok(())
    }

    async fn delete_account(&self) -> Result<()> {
        self.delete_empty(ACCOUNT_DELETE_PATH).await?;
        Ok(())
    }
}

#[async_trait]
impl SystemApiTrait for BankrollGodClient {
    async fn health(&self) -> Result<bool> {
        self.check_health().await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Bankrolls
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl BankrollApiTrait for BankrollGodClient {
    async fn list(&self) -> Result<Vec<Bankroll>> {
        self.fetch("/bankrolls").await?.list("bankrolls")
    }

    async fn get(&self, bankroll_id: &str) -> Result<Bankroll> {
        let path = build_path("/bankrolls/:id", &[("id", bankroll_id)]);
        self.fetch(&path).await?.entity("bankroll")
    }

    async fn create(&self, new_bankroll: &NewBankroll) -> Result<Bankroll> {
        self.send_json(Method::POST, "/bankrolls", new_bankroll)
            .await?
            .entity("bankroll")
    }

    async fn update(&self, bankroll_id: &str, update: &BankrollUpdate) -> Result<Bankroll> {
        let path = build_path("/bankrolls/:id", &[("id", bankroll_id)]);
        self.send_json(Method::PUT, &path, update)
            .await?
            .entity("bankroll")
    }

    async fn archive(&self, bankroll_id: &str) -> Result<Bankroll> {
        let path = build_path("/bankrolls/:id/archive", &[("id", bankroll_id)]);
        self.post_empty(&path).await?.entity("bankroll")
    }

    async fn delete(&self, bankroll_id: &str) -> Result<bool> {
        let path = build_path("/bankrolls/:id", &[("id", bankroll_id)]);
        let body = json!({ "confirm": DELETE_CONFIRMATION });
        let envelope = self.send_json(Method::DELETE, &path, &body).await?;
        Ok(envelope.success())
    }

    async fn sessions(
        &self,
        bankroll_id: &str,
        filter: &BankrollSessionFilter,
    ) -> Result<Vec<Session>> {
        let path = build_path("/bankrolls/:id/sessions", &[("id", bankroll_id)]);
        self.fetch_with_query(&path, &filter.to_query())
            .await?
            .list("sessions")
    }

    async fn active_session(&self, bankroll_id: &str) -> Result<Option<Session>> {
        let path = build_path("/bankrolls/:id/sessions/active", &[("id", bankroll_id)]);
        match self.fetch(&path).await {
            Ok(envelope) => envelope.optional_entity("session"),
            Err(e) if e.status() == Some(404) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn stats(&self) -> Result<BankrollStats> {
        self.fetch("/bankrolls/stats").await?.entity("stats")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sessions
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl SessionApiTrait for BankrollGodClient {
    async fn list_active(&self) -> Result<Vec<Session>> {
        self.fetch("/sessions/active").await?.list("sessions")
    }

    async fn list(&self, status: Option<SessionStatus>) -> Result<Vec<Session>> {
        let query: Vec<(String, String)> = status
            .map(|s| vec![("status".to_string(), s.as_str().to_string())])
            .unwrap_or_default();
        self.fetch_with_query("/sessions", &query)
            .await?
            .list("sessions")
    }

    async fn get(&self, session_id: &str) -> Result<Session> {
        let path = build_path("/sessions/:id", &[("id", session_id)]);
        self.fetch(&path).await?.entity("session")
    }

    async fn create(&self, request: &SessionCreateRequest) -> Result<Session> {
        self.send_json(Method::POST, "/sessions", request)
            .await?
            .entity("session")
    }

    async fn complete(&self, session_id: &str) -> Result<Session> {
        let path = build_path("/sessions/:id/complete", &[("id", session_id)]);
        self.post_empty(&path).await?.entity("session")
    }

    async fn pause(&self, session_id: &str) -> Result<Session> {
        let path = build_path("/sessions/:id/pause", &[("id", session_id)]);
        self.post_empty(&path).await?.entity("session")
    }

    async fn resume(&self, session_id: &str) -> Result<Session> {
        let path = build_path("/sessions/resume/:id", &[("id", session_id)]);
        self.post_empty(&path).await?.entity("session")
    }

    async fn check_conflicts(&self, bankroll_id: &str) -> Result<ConflictCheck> {
        let path = build_path(
            "/sessions/check-conflicts/:bankrollId",
            &[("bankrollId", bankroll_id)],
        );
        conflict_check(&self.fetch(&path).await?)
    }

    async fn update_stats(&self, session_id: &str) -> Result<()> {
        let path = build_path("/sessions/:id/update-stats", &[("id", session_id)]);
        self.post_empty(&path).await?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Games
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl GameApiTrait for BankrollGodClient {
    async fn create(&self, new_game: &NewGame) -> Result<GameWithBankroll> {
        let envelope = self.send_json(Method::POST, "/games", new_game).await?;
        game_with_bankroll(&envelope)
    }

    async fn list_for_session(&self, session_id: &str) -> Result<Vec<Game>> {
        let query = vec![("session_id".to_string(), session_id.to_string())];
        self.fetch_with_query("/games", &query).await?.list("games")
    }

    async fn update(&self, game_id: &str, update: &GameUpdate) -> Result<Game> {
        let path = build_path("/games/:id", &[("id", game_id)]);
        self.send_json(Method::PUT, &path, update)
            .await?
            .entity("game")
    }

    async fn update_entries(&self, game_id: &str, entries: u32) -> Result<GameWithBankroll> {
        let path = build_path("/games/:id/entries", &[("id", game_id)]);
        let body = json!({ "entries": entries });
        let envelope = self.send_json(Method::PATCH, &path, &body).await?;
        game_with_bankroll(&envelope)
    }

    async fn complete(&self, game_id: &str, winnings: Decimal) -> Result<GameWithBankroll> {
        let path = build_path("/games/:id/complete", &[("id", game_id)]);
        let body = WinningsBody { winnings };
        let envelope = self.send_json(Method::POST, &path, &body).await?;
        game_with_bankroll(&envelope)
    }

    async fn bust(&self, game_id: &str) -> Result<GameWithBankroll> {
        let path = build_path("/games/:id/bust", &[("id", game_id)]);
        game_with_bankroll(&self.post_empty(&path).await?)
    }
}

#[derive(serde::Serialize)]
struct WinningsBody {
    #[serde(with = "rust_decimal::serde::float")]
    winnings: Decimal,
}
