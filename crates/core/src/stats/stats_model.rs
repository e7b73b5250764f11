use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Totals over the completed games of a session or bankroll.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub games_played: u32,
    pub games_cashed: u32,
    pub total_invested: Decimal,
    pub total_cashed: Decimal,
    pub net_profit: Decimal,
    /// `net / invested × 100`. `None` when nothing was invested.
    pub roi_percent: Option<Decimal>,
    /// Share of completed games that cashed, in percent.
    pub itm_percent: Option<Decimal>,
}

/// Distribution of per-session profit, in start order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub sessions: u32,
    pub winning_sessions: u32,
    pub total_profit: Decimal,
    pub average_profit: Decimal,
    pub win_rate_percent: Decimal,
    /// Population variance of session profit.
    pub variance: Decimal,
    pub std_dev: Decimal,
    /// Largest fall of cumulative profit below its running peak.
    pub max_drawdown: Decimal,
    pub kelly_fraction: Option<Decimal>,
}
