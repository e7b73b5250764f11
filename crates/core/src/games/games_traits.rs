use async_trait::async_trait;
use rust_decimal::Decimal;

use super::games_model::{Game, GameUpdate, GameWithBankroll, NewGame};
use crate::errors::Result;

/// Trait defining the contract for game endpoints.
///
/// Endpoints that move money return the bankroll the server updated, when
/// the backend includes it.
#[async_trait]
pub trait GameApiTrait: Send + Sync {
    /// `POST /games`
    async fn create(&self, new_game: &NewGame) -> Result<GameWithBankroll>;

    /// `GET /games?session_id=`
    async fn list_for_session(&self, session_id: &str) -> Result<Vec<Game>>;

    /// `PUT /games/:id`
    async fn update(&self, game_id: &str, update: &GameUpdate) -> Result<Game>;

    /// `PATCH /games/:id/entries`
    async fn update_entries(&self, game_id: &str, entries: u32) -> Result<GameWithBankroll>;

    /// `POST /games/:id/complete`
    async fn complete(&self, game_id: &str, winnings: Decimal) -> Result<GameWithBankroll>;

    /// `POST /games/:id/bust`
    async fn bust(&self, game_id: &str) -> Result<GameWithBankroll>;
}
