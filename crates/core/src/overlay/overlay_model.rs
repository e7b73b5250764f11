//! Read-only broadcast overlay models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::bankrolls::Bankroll;
use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::errors::{Result, ValidationError};
use crate::sessions::Session;

/// Query parameter naming the bankroll an overlay follows.
pub const BANKROLL_PARAM: &str = "bankroll";

/// One overlay widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlayKind {
    Buyins,
    Cashes,
    Bankroll,
    CashCount,
}

impl OverlayKind {
    pub const ALL: [OverlayKind; 4] = [
        OverlayKind::Buyins,
        OverlayKind::Cashes,
        OverlayKind::Bankroll,
        OverlayKind::CashCount,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OverlayKind::Buyins => "buyins",
            OverlayKind::Cashes => "cashes",
            OverlayKind::Bankroll => "bankroll",
            OverlayKind::CashCount => "cash-count",
        }
    }

    /// One line of text for the snapshot.
    pub fn render(&self, snapshot: &OverlaySnapshot) -> String {
        let currency = &snapshot.currency;
        match self {
            OverlayKind::Buyins => {
                format!("Buy-Ins: {}", money(snapshot.total_buyins, currency))
            }
            OverlayKind::Cashes => {
                format!("Cashes: {}", money(snapshot.total_cashes, currency))
            }
            OverlayKind::Bankroll => {
                let profit = snapshot.bankroll_profit();
                let sign = if profit >= Decimal::ZERO { "+" } else { "" };
                format!(
                    "{}: {} ({}{})",
                    snapshot.bankroll_name,
                    money(snapshot.current_amount, currency),
                    sign,
                    money(profit, currency)
                )
            }
            OverlayKind::CashCount => format!("Cashes: {}", snapshot.cash_count),
        }
    }
}

fn money(amount: Decimal, currency: &str) -> String {
    format!(
        "{:.prec$} {}",
        amount.round_dp(DISPLAY_DECIMAL_PRECISION),
        currency,
        prec = DISPLAY_DECIMAL_PRECISION as usize
    )
}

impl fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverlayKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "buyins" | "buy-ins" => Ok(OverlayKind::Buyins),
            "cashes" => Ok(OverlayKind::Cashes),
            "bankroll" => Ok(OverlayKind::Bankroll),
            "cash-count" | "cashcount" => Ok(OverlayKind::CashCount),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown overlay '{}'",
                other
            ))),
        }
    }
}

/// What an overlay URL asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayQuery {
    pub bankroll_id: String,
    /// Taken from the last path segment (`/obs/cash-count`) when it names an overlay.
    pub kind: Option<OverlayKind>,
}

impl OverlayQuery {
    pub fn from_url(raw: &str) -> Result<Self> {
        let url = Url::parse(raw)
            .map_err(|e| ValidationError::InvalidInput(format!("Invalid overlay URL: {}", e)))?;

        let bankroll_id = url
            .query_pairs()
            .find(|(key, _)| key == BANKROLL_PARAM)
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ValidationError::MissingField(BANKROLL_PARAM.to_string()))?;

        let kind = url
            .path_segments()
            .and_then(|segments| segments.last())
            .and_then(|segment| segment.parse().ok());

        Ok(Self { bankroll_id, kind })
    }
}

/// Everything the overlays display, read in one poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlaySnapshot {
    pub bankroll_name: String,
    pub currency: String,
    pub starting_amount: Decimal,
    pub current_amount: Decimal,
    pub session_name: Option<String>,
    pub total_buyins: Decimal,
    pub total_cashes: Decimal,
    pub cash_count: u32,
}

impl OverlaySnapshot {
    pub fn new(bankroll: &Bankroll, session: Option<&Session>) -> Self {
        Self {
            bankroll_name: bankroll.name.clone(),
            currency: bankroll.currency.clone(),
            starting_amount: bankroll.starting_amount,
            current_amount: bankroll.current_amount,
            session_name: session.map(|s| s.display_name().to_string()),
            total_buyins: session.map(|s| s.total_buyins).unwrap_or_default(),
            total_cashes: session.map(|s| s.total_cashes).unwrap_or_default(),
            cash_count: session.map(|s| s.cash_count).unwrap_or_default(),
        }
    }

    pub fn has_active_session(&self) -> bool {
        self.session_name.is_some()
    }

    pub fn bankroll_profit(&self) -> Decimal {
        self.current_amount - self.starting_amount
    }
}
