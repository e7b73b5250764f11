//! Games module - models, API seam and the game lifecycle service.

mod games_model;
mod games_service;
mod games_traits;

#[cfg(test)]
mod games_service_tests;

pub use games_model::{
    EntriesUpdate, Game, GameCompletion, GameStart, GameStatus, GameType, GameUpdate,
    GameWithBankroll, NewGame,
};
pub use games_service::GameService;
pub use games_traits::GameApiTrait;
