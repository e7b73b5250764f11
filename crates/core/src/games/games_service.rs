use log::{debug, info};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::games_model::{EntriesUpdate, Game, GameCompletion, GameStart, GameUpdate, NewGame};
use super::games_traits::GameApiTrait;
use crate::bankrolls::{AdjustmentSource, BankrollAdjustment};
use crate::errors::{Result, ValidationError};
use crate::events::{ClientEvent, ClientEventSink};
use crate::sessions::Session;

/// Game lifecycle inside a session.
///
/// Every money-moving call emits a narrow `BankrollAdjusted` event. Game
/// changes never emit session events, so session views stay as they are.
#[derive(Clone)]
pub struct GameService {
    api: Arc<dyn GameApiTrait>,
    event_sink: Arc<dyn ClientEventSink>,
}

impl GameService {
    pub fn new(api: Arc<dyn GameApiTrait>, event_sink: Arc<dyn ClientEventSink>) -> Self {
        Self { api, event_sink }
    }

    /// Bankroll change for moving a game from `old` to `new` entries.
    pub fn entries_adjustment(buy_in: Decimal, old_entries: u32, new_entries: u32) -> Decimal {
        let difference = Decimal::from(new_entries) - Decimal::from(old_entries);
        -(difference * buy_in)
    }

    /// Starts a game in an active session.
    pub async fn start_game(&self, session: &Session, mut new_game: NewGame) -> Result<GameStart> {
        if !session.is_active() {
            return Err(ValidationError::InvalidInput(
                "Start a session before tracking games".to_string(),
            )
            .into());
        }
        if new_game.session_id.trim().is_empty() {
            new_game.session_id = session.id.clone();
        }
        new_game.validate()?;
        let bankroll_id = session
            .owning_bankroll_id()
            .ok_or_else(|| ValidationError::MissingField("bankroll_id".to_string()))?
            .to_string();

        let created = self.api.create(&new_game).await?;
        info!(
            "Started game {} ({} x{}) in session {}",
            created.game.id, new_game.buy_in, new_game.entries, session.id
        );

        let adjustment = BankrollAdjustment {
            bankroll_id,
            amount: -new_game.total_investment(),
            source: AdjustmentSource::GameStart,
            game_id: Some(created.game.id.clone()),
        };
        self.event_sink
            .emit(ClientEvent::bankroll_adjusted(adjustment.clone()));

        Ok(GameStart {
            game: created.game,
            bankroll: created.bankroll,
            adjustment,
        })
    }

    /// Changes a game's entry count.
    ///
    /// `game` must carry the count before the change. The adjustment is
    /// `-(new - old) × buy_in` and is only emitted when it is non-zero.
    pub async fn update_entries(
        &self,
        game: &Game,
        bankroll_id: &str,
        new_entries: u32,
    ) -> Result<EntriesUpdate> {
        if new_entries < 1 {
            return Err(
                ValidationError::InvalidInput("Entries must be at least 1".to_string()).into(),
            );
        }
        let old_entries = game.effective_entries();
        let updated = self.api.update_entries(&game.id, new_entries).await?;

        let amount = Self::entries_adjustment(game.buy_in, old_entries, new_entries);
        debug!(
            "Game {} entries {} -> {}, bankroll change {}",
            game.id, old_entries, new_entries, amount
        );
        let adjustment = (!amount.is_zero()).then(|| BankrollAdjustment {
            bankroll_id: bankroll_id.to_string(),
            amount,
            source: AdjustmentSource::EntryUpdate,
            game_id: Some(game.id.clone()),
        });
        if let Some(adjustment) = &adjustment {
            self.event_sink
                .emit(ClientEvent::bankroll_adjusted(adjustment.clone()));
        }

        Ok(EntriesUpdate {
            game: updated.game,
            bankroll: updated.bankroll,
            adjustment,
        })
    }

    /// Completes a game with the given winnings.
    pub async fn complete_game(
        &self,
        game: &Game,
        bankroll_id: &str,
        winnings: Decimal,
    ) -> Result<GameCompletion> {
        if winnings < Decimal::ZERO {
            return Err(
                ValidationError::InvalidInput("Winnings cannot be negative".to_string()).into(),
            );
        }
        let completed = self.api.complete(&game.id, winnings).await?;
        let completion = GameCompletion {
            game: completed.game,
            bankroll: completed.bankroll,
            net_profit: winnings - game.total_investment(),
            bankroll_increase: winnings,
            adjustment: self.emit_completion(game, bankroll_id, winnings),
        };
        info!(
            "Completed game {} with winnings {} (net {})",
            game.id, winnings, completion.net_profit
        );
        Ok(completion)
    }

    /// Completes a game with nothing won.
    pub async fn bust_game(&self, game: &Game, bankroll_id: &str) -> Result<GameCompletion> {
        let busted = self.api.bust(&game.id).await?;
        info!("Game {} busted", game.id);
        Ok(GameCompletion {
            game: busted.game,
            bankroll: busted.bankroll,
            net_profit: -game.total_investment(),
            bankroll_increase: Decimal::ZERO,
            adjustment: self.emit_completion(game, bankroll_id, Decimal::ZERO),
        })
    }

    pub async fn list_for_session(&self, session_id: &str) -> Result<Vec<Game>> {
        self.api.list_for_session(session_id).await
    }

    pub async fn update(&self, game_id: &str, update: GameUpdate) -> Result<Game> {
        update.validate()?;
        self.api.update(game_id, &update).await
    }

    fn emit_completion(
        &self,
        game: &Game,
        bankroll_id: &str,
        winnings: Decimal,
    ) -> Option<BankrollAdjustment> {
        if winnings.is_zero() {
            return None;
        }
        let adjustment = BankrollAdjustment {
            bankroll_id: bankroll_id.to_string(),
            amount: winnings,
            source: AdjustmentSource::GameComplete,
            game_id: Some(game.id.clone()),
        };
        self.event_sink
            .emit(ClientEvent::bankroll_adjusted(adjustment.clone()));
        Some(adjustment)
    }
}
