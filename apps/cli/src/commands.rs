//! Subcommand handlers.

use anyhow::{anyhow, bail, Context};
use chrono::Utc;

use bankrollgod_core::auth::{AuthOutcome, LoginCredentials, RegisterRequest};
use bankrollgod_core::bankrolls::{Bankroll, BankrollApiTrait, BankrollSessionFilter, NewBankroll};
use bankrollgod_core::games::{Game, NewGame};
use bankrollgod_core::sessions::{
    ConflictAction, NewSession, Session, SessionApiTrait, SessionRecoveryRecord, SessionStart,
    SessionStatus,
};
use bankrollgod_core::stats;
use bankrollgod_core::view::OptimisticValue;

use crate::cli::{BankrollCommand, GameCommand, RegisterArgs, SessionCommand};
use crate::main_lib::AppState;
use crate::output;

/// Completed sessions read for per-bankroll statistics.
const STATS_SESSION_LIMIT: u32 = 500;

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

fn signed_in(outcome: AuthOutcome) -> anyhow::Result<()> {
    match outcome {
        AuthOutcome::Success { user } => {
            println!("Signed in as {} <{}>", user.display_name(), user.email);
            Ok(())
        }
        AuthOutcome::Failed { error } => Err(anyhow!(error)),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Auth & system
// ─────────────────────────────────────────────────────────────────────────────

pub async fn health(state: &AppState) -> anyhow::Result<()> {
    if state.auth_service.test_backend_connection().await {
        println!("Backend reachable at {}", state.client.root_url());
        Ok(())
    } else {
        bail!("Backend not reachable at {}", state.client.root_url())
    }
}

pub async fn login(state: &AppState, email: String, password: String) -> anyhow::Result<()> {
    let outcome = state
        .auth_service
        .login(LoginCredentials::new(email, password))
        .await;
    signed_in(outcome)
}

pub async fn register(state: &AppState, args: RegisterArgs) -> anyhow::Result<()> {
    let request = RegisterRequest {
        username: args.username,
        email: args.email,
        password: args.password,
        first_name: args.first_name,
        last_name: args.last_name,
    };
    signed_in(state.auth_service.register(request).await)
}

pub async fn logout(state: &AppState) -> anyhow::Result<()> {
    state.auth_service.logout().await;
    state.recovery_service.clear_all_session_states();
    println!("Signed out");
    Ok(())
}

pub async fn whoami(state: &AppState) -> anyhow::Result<()> {
    let auth = state.auth_service.initialize().await;
    let user = auth.user.ok_or_else(|| anyhow!("Not signed in"))?;
    let suffix = if auth.backend_connected {
        ""
    } else {
        " (backend offline, cached profile)"
    };
    println!("{} <{}>{}", user.display_name(), user.email, suffix);
    Ok(())
}

pub async fn delete_account(state: &AppState, confirmation: &str) -> anyhow::Result<()> {
    state.auth_service.delete_account(confirmation).await?;
    state.recovery_service.clear_all_session_states();
    println!("Account deleted");
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Bankrolls
// ─────────────────────────────────────────────────────────────────────────────

pub async fn bankrolls(state: &AppState, command: BankrollCommand) -> anyhow::Result<()> {
    let service = &state.bankroll_service;
    match command {
        BankrollCommand::List => {
            let bankrolls = service.list_bankrolls().await?;
            if bankrolls.is_empty() {
                println!("No bankrolls yet");
            }
            print_lines(bankrolls.iter().map(output::bankroll_line).collect());
        }
        BankrollCommand::Show { id } => {
            let bankroll = service.get_bankroll(&id).await?;
            println!("{}", output::bankroll_line(&bankroll));
            let active = BankrollApiTrait::active_session(state.client.as_ref(), &id).await?;
            match active.filter(Session::is_active) {
                Some(session) => println!("Active: {}", output::session_line(&session, Utc::now())),
                None => println!("No active session"),
            }
        }
        BankrollCommand::Create {
            name,
            bankroll_type,
            currency,
            starting_amount,
            goal,
            description,
        } => {
            let bankroll = service
                .create_bankroll(NewBankroll {
                    name,
                    bankroll_type,
                    currency,
                    starting_amount,
                    goal_amount: goal,
                    description,
                })
                .await?;
            println!("Created {}", output::bankroll_line(&bankroll));
        }
        BankrollCommand::Archive { id } => {
            let bankroll = service.archive_bankroll(&id).await?;
            println!("Archived {}", output::bankroll_line(&bankroll));
        }
        BankrollCommand::Delete { id, yes } => {
            if !yes {
                bail!("Deleting a bankroll removes its sessions and games. Pass --yes to confirm.");
            }
            if !service.delete_bankroll(&id).await? {
                bail!("Bankroll {} was not deleted", id);
            }
            println!("Deleted bankroll {}", id);
        }
        BankrollCommand::Sessions {
            id,
            status,
            limit,
            offset,
        } => {
            let filter = BankrollSessionFilter {
                status,
                limit,
                offset,
            };
            let sessions = service.bankroll_sessions(&id, filter).await?;
            let now = Utc::now();
            print_lines(sessions.iter().map(|s| output::session_line(s, now)).collect());
        }
        BankrollCommand::Stats { id: None } => {
            print_lines(output::bankroll_totals_lines(&service.bankroll_stats().await?));
        }
        BankrollCommand::Stats { id: Some(id) } => {
            let bankroll = service.get_bankroll(&id).await?;
            let filter = BankrollSessionFilter {
                status: Some(SessionStatus::Completed),
                limit: Some(STATS_SESSION_LIMIT),
                offset: None,
            };
            let sessions = service.bankroll_sessions(&id, filter).await?;
            let profits = stats::session_profits(&sessions);
            let summary = stats::session_stats(&profits);
            let ruin = stats::risk_of_ruin(
                summary.average_profit,
                summary.variance,
                bankroll.current_amount,
            );
            println!("{}", output::bankroll_line(&bankroll));
            print_lines(output::session_stats_lines(&summary, ruin));
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Sessions
// ─────────────────────────────────────────────────────────────────────────────

pub async fn sessions(state: &AppState, command: SessionCommand) -> anyhow::Result<()> {
    let service = &state.session_service;
    match command {
        SessionCommand::Active => {
            let bankrolls = state.bankroll_service.list_bankrolls().await?;
            let projection = service.load_active_sessions(&bankrolls).await?;
            if projection.is_empty() {
                println!("No active sessions");
            }
            let now = Utc::now();
            for (bankroll_name, session) in &projection {
                println!("{}: {}", bankroll_name, output::session_line(session, now));
            }
            let sessions: Vec<Session> = projection.into_values().collect();
            state.recovery_service.remember_sessions(&sessions);
        }
        SessionCommand::Start {
            bankroll_id,
            name,
            location,
            on_conflict,
        } => {
            let mut new_session = NewSession::new(bankroll_id, name);
            new_session.location = location;
            let session = match on_conflict {
                ConflictAction::Fail => match service.create_session_with_recovery(new_session).await? {
                    SessionStart::Created(session) => session,
                    SessionStart::Conflict(conflict) => {
                        print_lines(output::conflict_lines(&conflict));
                        bail!("Session not started");
                    }
                },
                action => {
                    service
                        .create_with_conflict_resolution(new_session, action)
                        .await?
                        .session
                }
            };
            if let Some(record) = SessionRecoveryRecord::from_session(&session) {
                state.recovery_service.save_session_state(&session.id, record);
            }
            println!("Started {}", output::session_line(&session, Utc::now()));
        }
        SessionCommand::Pause { id } => {
            let session = service.pause_session(&id).await?;
            println!("Paused {}", output::session_line(&session, Utc::now()));
        }
        SessionCommand::Resume { id } => {
            let session = service.resume_session(&id).await?;
            println!("Resumed {}", output::session_line(&session, Utc::now()));
        }
        SessionCommand::Complete { id } => {
            service.update_stats(&id).await?;
            let session = service.complete_session(&id).await?;
            state.recovery_service.remove_session_state(&id);
            println!("Completed {}", output::session_line(&session, Utc::now()));
        }
        SessionCommand::Games { id } => {
            let games = state.game_service.list_for_session(&id).await?;
            print_lines(games.iter().map(output::game_line).collect());
            print_lines(output::game_stats_lines(&stats::game_stats(&games)));
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Games
// ─────────────────────────────────────────────────────────────────────────────

/// The session a game belongs to, the game itself and the owning bankroll id.
async fn game_context(
    state: &AppState,
    session_id: &str,
    game_id: &str,
) -> anyhow::Result<(Session, Game, String)> {
    let session = SessionApiTrait::get(state.client.as_ref(), session_id).await?;
    let bankroll_id = session
        .owning_bankroll_id()
        .map(str::to_string)
        .with_context(|| format!("Session {} has no bankroll", session_id))?;
    let game = state
        .game_service
        .list_for_session(session_id)
        .await?
        .into_iter()
        .find(|g| g.id == game_id)
        .with_context(|| format!("Game {} not found in session {}", game_id, session_id))?;
    Ok((session, game, bankroll_id))
}

pub async fn games(state: &AppState, command: GameCommand) -> anyhow::Result<()> {
    let service = &state.game_service;
    let session_id = match &command {
        GameCommand::Start { session, .. }
        | GameCommand::Entries { session, .. }
        | GameCommand::Complete { session, .. }
        | GameCommand::Bust { session, .. } => session.clone(),
    };

    match command {
        GameCommand::Start {
            session,
            name,
            buy_in,
            entries,
            game_type,
        } => {
            let active = SessionApiTrait::get(state.client.as_ref(), &session).await?;
            let bankroll_id = active
                .owning_bankroll_id()
                .with_context(|| format!("Session {} has no bankroll", session))?;
            let mut bankroll = displayed_bankroll(state, bankroll_id).await?;
            let mut new_game = NewGame::new(session.clone(), name, game_type, buy_in);
            new_game.entries = entries;
            let started = service.start_game(&active, new_game).await?;
            println!("Started {}", output::game_line(&started.game));
            bankroll.settle(Some(&started.adjustment), started.bankroll.as_ref());
            print_bankroll(&bankroll);
        }
        GameCommand::Entries { game, entries, .. } => {
            let (_, game, bankroll_id) = game_context(state, &session_id, &game).await?;
            let mut bankroll = displayed_bankroll(state, &bankroll_id).await?;
            let updated = service.update_entries(&game, &bankroll_id, entries).await?;
            println!("Updated {}", output::game_line(&updated.game));
            bankroll.settle(updated.adjustment.as_ref(), updated.bankroll.as_ref());
            print_bankroll(&bankroll);
        }
        GameCommand::Complete { game, winnings, .. } => {
            let (_, game, bankroll_id) = game_context(state, &session_id, &game).await?;
            let mut bankroll = displayed_bankroll(state, &bankroll_id).await?;
            let completion = service.complete_game(&game, &bankroll_id, winnings).await?;
            println!(
                "Completed {}, net {}",
                output::game_line(&completion.game),
                output::signed(completion.net_profit)
            );
            bankroll.settle(completion.adjustment.as_ref(), completion.bankroll.as_ref());
            print_bankroll(&bankroll);
        }
        GameCommand::Bust { game, .. } => {
            let (_, game, bankroll_id) = game_context(state, &session_id, &game).await?;
            let completion = service.bust_game(&game, &bankroll_id).await?;
            println!(
                "Busted {}, net {}",
                output::game_line(&completion.game),
                output::signed(completion.net_profit)
            );
        }
    }

    state.session_service.update_stats(&session_id).await?;
    Ok(())
}

async fn displayed_bankroll(
    state: &AppState,
    bankroll_id: &str,
) -> anyhow::Result<OptimisticValue<Bankroll>> {
    let bankroll = state.bankroll_service.get_bankroll(bankroll_id).await?;
    Ok(OptimisticValue::new(bankroll))
}

fn print_bankroll(bankroll: &OptimisticValue<Bankroll>) {
    println!("{}", output::optimistic_bankroll_line(bankroll));
}

// ─────────────────────────────────────────────────────────────────────────────
// Recovery
// ─────────────────────────────────────────────────────────────────────────────

pub async fn recover(state: &AppState) -> anyhow::Result<()> {
    let sync = state.recovery_service.initialize_session_recovery().await?;
    if !sync.needs_recovery {
        println!("No active sessions to recover");
        return Ok(());
    }

    println!(
        "Recovering {} active sessions ({} cached locally)",
        sync.server_sessions.len(),
        sync.synced_sessions.len()
    );
    state.recovery_service.remember_sessions(&sync.server_sessions);
    let now = Utc::now();
    for session in &sync.server_sessions {
        println!("Active: {}", output::session_line(session, now));
    }
    Ok(())
}
