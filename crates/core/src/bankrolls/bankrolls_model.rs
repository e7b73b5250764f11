//! Bankroll domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::bankrolls_constants::DEFAULT_CURRENCY;
use crate::errors::{Result, ValidationError};
use crate::sessions::SessionStatus;
use crate::utils::serde_lenient::{decimal_or_zero, lenient_u32, string_id};

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

/// Where a bankroll is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BankrollType {
    #[default]
    Online,
    Live,
    Tournament,
    Mixed,
    /// Anything the backend sends that this client does not know about.
    #[serde(other)]
    Other,
}

impl BankrollType {
    pub fn display_name(&self) -> &'static str {
        match self {
            BankrollType::Online => "Online",
            BankrollType::Live => "Live",
            BankrollType::Tournament => "Tournament",
            BankrollType::Mixed => "Mixed",
            BankrollType::Other => "Other",
        }
    }
}

impl std::str::FromStr for BankrollType {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "online" => Ok(BankrollType::Online),
            "live" => Ok(BankrollType::Live),
            "tournament" => Ok(BankrollType::Tournament),
            "mixed" => Ok(BankrollType::Mixed),
            other => Err(ValidationError::InvalidInput(format!(
                "Bankroll type must be one of online, live, tournament, mixed (got '{}')",
                other
            ))),
        }
    }
}

/// A named pool of poker funds, as reported by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bankroll {
    #[serde(deserialize_with = "string_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub bankroll_type: BankrollType,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub starting_amount: Decimal,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub current_amount: Decimal,
    #[serde(default)]
    pub goal_amount: Option<Decimal>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Bankroll {
    /// Current amount minus starting amount.
    pub fn net_profit(&self) -> Decimal {
        self.current_amount - self.starting_amount
    }

    /// Profit relative to the starting amount, in percent. Zero when the
    /// bankroll started empty.
    pub fn profit_percentage(&self) -> Decimal {
        if self.starting_amount.is_zero() {
            return Decimal::ZERO;
        }
        self.net_profit() / self.starting_amount * dec!(100)
    }

    /// Progress towards the goal in percent, clamped to `[0, 100]`.
    pub fn goal_progress(&self) -> Option<Decimal> {
        let goal = self.goal_amount.filter(|g| !g.is_zero())?;
        let progress = self.current_amount / goal * dec!(100);
        Some(progress.clamp(Decimal::ZERO, dec!(100)))
    }

    /// Returns a copy with a tentative local adjustment applied.
    ///
    /// The result is only a display value until the server reports the
    /// authoritative amount.
    pub fn with_adjustment(&self, adjustment: &BankrollAdjustment) -> Bankroll {
        let mut adjusted = self.clone();
        if adjustment.bankroll_id == self.id {
            adjusted.current_amount += adjustment.amount;
            adjusted.updated_at = Some(Utc::now());
        }
        adjusted
    }
}

/// Bankroll reference embedded in session payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankrollRef {
    #[serde(deserialize_with = "string_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Input model for creating a bankroll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBankroll {
    pub name: String,
    #[serde(rename = "type")]
    pub bankroll_type: BankrollType,
    pub currency: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub starting_amount: Decimal,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub goal_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

impl NewBankroll {
    /// Validates the new bankroll. All problems are reported together.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push("Bankroll name is required".to_string());
        }
        if self.bankroll_type == BankrollType::Other {
            errors.push("Valid bankroll type is required".to_string());
        }
        if self.starting_amount <= Decimal::ZERO {
            errors.push("Starting amount must be greater than 0".to_string());
        }
        if let Some(goal) = self.goal_amount {
            if goal <= self.starting_amount {
                errors.push("Goal amount must be greater than starting amount".to_string());
            }
        }
        if self.currency.trim().is_empty() {
            errors.push("Currency cannot be empty".to_string());
        }
        ValidationError::from_messages(errors)?;
        Ok(())
    }
}

/// Partial update for an existing bankroll. Only set fields are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BankrollUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub bankroll_type: Option<BankrollType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub current_amount: Option<Decimal>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub goal_amount: Option<Decimal>,
}

impl BankrollUpdate {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            errors.push("Bankroll name cannot be empty".to_string());
        }
        if matches!(self.current_amount, Some(amount) if amount < Decimal::ZERO) {
            errors.push("Current amount cannot be negative".to_string());
        }
        if matches!(self.goal_amount, Some(goal) if goal <= Decimal::ZERO) {
            errors.push("Goal amount must be greater than 0".to_string());
        }
        ValidationError::from_messages(errors)?;
        Ok(())
    }
}

/// Query options for `GET /bankrolls/:id/sessions`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BankrollSessionFilter {
    pub status: Option<SessionStatus>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl BankrollSessionFilter {
    /// Query pairs in the order the backend documents them. Zero values are
    /// omitted.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            query.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset.filter(|o| *o > 0) {
            query.push(("offset".to_string(), offset.to_string()));
        }
        if let Some(status) = self.status {
            query.push(("status".to_string(), status.as_str().to_string()));
        }
        query
    }
}

/// Aggregate figures across all of a user's bankrolls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankrollStats {
    #[serde(default, deserialize_with = "lenient_u32")]
    pub total_bankrolls: u32,
    #[serde(default)]
    pub total_starting_amount: Decimal,
    #[serde(default)]
    pub total_current_amount: Decimal,
    #[serde(default)]
    pub total_profit: Decimal,
}

/// What caused a monetary bankroll adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentSource {
    GameStart,
    EntryUpdate,
    GameComplete,
}

/// A narrowly scoped bankroll change.
///
/// It is distinct from a full session update, so views that show session
/// details are not reloaded when only money moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankrollAdjustment {
    pub bankroll_id: String,
    pub amount: Decimal,
    pub source: AdjustmentSource,
    pub game_id: Option<String>,
}
