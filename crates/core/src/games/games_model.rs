//! Game domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::bankrolls::{Bankroll, BankrollAdjustment};
use crate::errors::{Result, ValidationError};
use crate::utils::serde_lenient::{decimal_or_zero, lenient_u32, opt_string_id, string_id};

/// Format of a single game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    #[default]
    Tournament,
    Cashgame,
    Sitandgo,
    Mtt,
    #[serde(other)]
    Other,
}

impl GameType {
    pub fn display_name(&self) -> &'static str {
        match self {
            GameType::Tournament => "Tournament",
            GameType::Cashgame => "Cash Game",
            GameType::Sitandgo => "Sit & Go",
            GameType::Mtt => "MTT",
            GameType::Other => "Other",
        }
    }
}

impl std::str::FromStr for GameType {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(&['-', '_', ' '][..], "").as_str() {
            "tournament" => Ok(GameType::Tournament),
            "cashgame" | "cash" => Ok(GameType::Cashgame),
            "sitandgo" | "sng" => Ok(GameType::Sitandgo),
            "mtt" => Ok(GameType::Mtt),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown game type '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    #[serde(alias = "active")]
    Running,
    #[serde(alias = "busted")]
    Completed,
}

/// A single tournament or cash game inside a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    #[serde(deserialize_with = "string_id")]
    pub id: String,
    #[serde(default, deserialize_with = "opt_string_id")]
    pub session_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub game_type: GameType,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub buy_in: Decimal,
    #[serde(default = "one", deserialize_with = "lenient_u32")]
    pub entries: u32,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub winnings: Decimal,
    #[serde(default)]
    pub status: GameStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn one() -> u32 {
    1
}

impl Game {
    /// Entries as the backend counts them. A missing count means one entry.
    pub fn effective_entries(&self) -> u32 {
        self.entries.max(1)
    }

    /// `buy_in × entries`
    pub fn total_investment(&self) -> Decimal {
        self.buy_in * Decimal::from(self.effective_entries())
    }

    /// `winnings − total investment`
    pub fn net_result(&self) -> Decimal {
        self.winnings - self.total_investment()
    }

    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    /// True when the game finished with money.
    pub fn is_cashed(&self) -> bool {
        self.status == GameStatus::Completed && self.winnings > Decimal::ZERO
    }
}

/// Input model for starting a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGame {
    pub session_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub game_type: GameType,
    #[serde(with = "rust_decimal::serde::float")]
    pub buy_in: Decimal,
    pub entries: u32,
}

impl NewGame {
    pub fn new(
        session_id: impl Into<String>,
        name: impl Into<String>,
        game_type: GameType,
        buy_in: Decimal,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            name: name.into(),
            game_type,
            buy_in,
            entries: 1,
        }
    }

    pub fn total_investment(&self) -> Decimal {
        self.buy_in * Decimal::from(self.entries)
    }

    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if self.session_id.trim().is_empty() {
            errors.push("Game must belong to a session".to_string());
        }
        if self.name.trim().is_empty() {
            errors.push("Game name is required".to_string());
        }
        if self.game_type == GameType::Other {
            errors.push("Valid game type is required".to_string());
        }
        if self.buy_in <= Decimal::ZERO {
            errors.push("Buy-in must be greater than 0".to_string());
        }
        if self.entries < 1 {
            errors.push("Entries must be at least 1".to_string());
        }
        ValidationError::from_messages(errors)?;
        Ok(())
    }
}

/// Partial update for a game.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub game_type: Option<GameType>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub buy_in: Option<Decimal>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub winnings: Option<Decimal>,
}

impl GameUpdate {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            errors.push("Game name cannot be empty".to_string());
        }
        if matches!(self.buy_in, Some(b) if b <= Decimal::ZERO) {
            errors.push("Buy-in must be greater than 0".to_string());
        }
        if matches!(self.winnings, Some(w) if w < Decimal::ZERO) {
            errors.push("Winnings cannot be negative".to_string());
        }
        ValidationError::from_messages(errors)?;
        Ok(())
    }
}

/// A game together with the bankroll the server updated alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct GameWithBankroll {
    pub game: Game,
    pub bankroll: Option<Bankroll>,
}

/// Result of starting a game.
#[derive(Debug, Clone, PartialEq)]
pub struct GameStart {
    pub game: Game,
    /// Authoritative bankroll from the server, when it sent one.
    pub bankroll: Option<Bankroll>,
    /// Tentative local change, `-buy_in × entries`.
    pub adjustment: BankrollAdjustment,
}

/// Result of changing a game's entry count.
#[derive(Debug, Clone, PartialEq)]
pub struct EntriesUpdate {
    pub game: Game,
    pub bankroll: Option<Bankroll>,
    /// `None` when the count did not change.
    pub adjustment: Option<BankrollAdjustment>,
}

/// Result of completing (or busting) a game.
#[derive(Debug, Clone, PartialEq)]
pub struct GameCompletion {
    pub game: Game,
    pub bankroll: Option<Bankroll>,
    /// `winnings − buy_in × entries`
    pub net_profit: Decimal,
    /// The bankroll grows by the winnings. The buy-ins were taken at start.
    pub bankroll_increase: Decimal,
    /// Tentative local change, `None` when nothing was won.
    pub adjustment: Option<BankrollAdjustment>,
}
