//! Pure statistics over games and session results.

use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::prelude::MathematicalOps;
use rust_decimal::Decimal;

use super::stats_model::{GameStats, SessionStats};
use crate::games::{Game, GameStatus};
use crate::sessions::{Session, SessionStatus};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

fn percent(part: Decimal, whole: Decimal) -> Option<Decimal> {
    part.checked_div(whole)?
        .checked_mul(HUNDRED)
        .map(|p| p.round_dp(2))
}

fn saturating_sum(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values
        .into_iter()
        .fold(Decimal::ZERO, |total, v| total.saturating_add(v))
}

/// Totals over completed games. Running games have not settled and are skipped.
pub fn game_stats(games: &[Game]) -> GameStats {
    let completed: Vec<&Game> = games
        .iter()
        .filter(|g| g.status == GameStatus::Completed)
        .collect();

    let total_invested = saturating_sum(completed.iter().map(|g| g.total_investment()));
    let total_cashed = saturating_sum(completed.iter().map(|g| g.winnings));
    let games_cashed = completed.iter().filter(|g| g.is_cashed()).count() as u32;
    let games_played = completed.len() as u32;
    let net_profit = total_cashed.saturating_sub(total_invested);

    GameStats {
        games_played,
        games_cashed,
        total_invested,
        total_cashed,
        net_profit,
        roi_percent: percent(net_profit, total_invested),
        itm_percent: percent(Decimal::from(games_cashed), Decimal::from(games_played)),
    }
}

/// Profits of completed sessions ordered by start time.
pub fn session_profits(sessions: &[Session]) -> Vec<Decimal> {
    let mut completed: Vec<&Session> = sessions
        .iter()
        .filter(|s| s.status == SessionStatus::Completed)
        .collect();
    completed.sort_by_key(|s| s.start_time);
    completed.iter().map(|s| s.profit()).collect()
}

pub fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let n = Decimal::from(values.len());
    values
        .iter()
        .try_fold(Decimal::ZERO, |total, v| total.checked_add(*v))
        .map(|total| total / n)
        // Past the representable range, average the shares instead.
        .unwrap_or_else(|| saturating_sum(values.iter().map(|v| *v / n)))
}

/// Population variance: squared deviations divided by `n`. Saturates at
/// `Decimal::MAX`.
pub fn variance(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let avg = mean(values);
    let squares = values.iter().fold(Decimal::ZERO, |total, v| {
        let d = v.saturating_sub(avg);
        total.saturating_add(d.saturating_mul(d))
    });
    squares / Decimal::from(values.len())
}

/// Largest drop of the running total below its peak. The peak starts at zero,
/// so losing from the first session counts.
pub fn max_drawdown(profits: &[Decimal]) -> Decimal {
    let mut cumulative = Decimal::ZERO;
    let mut peak = Decimal::ZERO;
    let mut worst = Decimal::ZERO;
    for profit in profits {
        cumulative = cumulative.saturating_add(*profit);
        peak = peak.max(cumulative);
        worst = worst.max(peak.saturating_sub(cumulative));
    }
    worst
}

/// `mean / variance`. `None` without variance or when the ratio overflows.
pub fn kelly_fraction(mean: Decimal, variance: Decimal) -> Option<Decimal> {
    mean.checked_div(variance)
}

/// Simplified risk of ruin in percent: `exp(-2 · mean · bankroll / variance) × 100`,
/// capped at 100.
pub fn risk_of_ruin(mean: Decimal, variance: Decimal, bankroll: Decimal) -> Option<Decimal> {
    if variance <= Decimal::ZERO {
        return None;
    }
    let exponent = Decimal::from(-2)
        .checked_mul(mean)?
        .checked_mul(bankroll)?
        .checked_div(variance)?
        .to_f64()?;
    let risk = (exponent.exp() * 100.0).min(100.0);
    Decimal::from_f64(risk).map(|r| r.round_dp(2))
}

pub fn session_stats(profits: &[Decimal]) -> SessionStats {
    if profits.is_empty() {
        return SessionStats::default();
    }
    let count = Decimal::from(profits.len());
    let winning_sessions = profits.iter().filter(|p| **p > Decimal::ZERO).count() as u32;
    let average_profit = mean(profits);
    let variance = variance(profits);
    let std_dev = variance.sqrt().unwrap_or_default();

    SessionStats {
        sessions: profits.len() as u32,
        winning_sessions,
        total_profit: saturating_sum(profits.iter().copied()),
        average_profit,
        win_rate_percent: (Decimal::from(winning_sessions) / count * HUNDRED).round_dp(2),
        variance,
        std_dev,
        max_drawdown: max_drawdown(profits),
        kelly_fraction: kelly_fraction(average_profit, variance),
    }
}
