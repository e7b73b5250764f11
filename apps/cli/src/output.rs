//! Plain-text rendering for command output.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use bankrollgod_core::bankrolls::{Bankroll, BankrollStats};
use bankrollgod_core::constants::DISPLAY_DECIMAL_PRECISION;
use bankrollgod_core::games::Game;
use bankrollgod_core::sessions::{Session, SessionConflict};
use bankrollgod_core::stats::{GameStats, SessionStats};
use bankrollgod_core::view::OptimisticValue;

pub fn money(amount: Decimal) -> String {
    format!(
        "{:.prec$}",
        amount.round_dp(DISPLAY_DECIMAL_PRECISION),
        prec = DISPLAY_DECIMAL_PRECISION as usize
    )
}

/// Money with an explicit sign, e.g. `+250.00` or `-60.00`.
pub fn signed(amount: Decimal) -> String {
    if amount.is_sign_negative() && !amount.is_zero() {
        money(amount)
    } else {
        format!("+{}", money(amount))
    }
}

fn percent(value: Option<Decimal>) -> String {
    value
        .map(|v| format!("{}%", money(v)))
        .unwrap_or_else(|| "n/a".to_string())
}

pub fn bankroll_line(bankroll: &Bankroll) -> String {
    let mut line = format!(
        "[{}] {} ({}) {} {}, profit {} {} ({}%)",
        bankroll.id,
        bankroll.name,
        bankroll.bankroll_type.display_name(),
        money(bankroll.current_amount),
        bankroll.currency,
        signed(bankroll.net_profit()),
        bankroll.currency,
        signed(bankroll.profit_percentage()),
    );
    if let Some(progress) = bankroll.goal_progress() {
        line.push_str(&format!(", goal {}%", money(progress)));
    }
    if bankroll.is_archived {
        line.push_str(" [archived]");
    }
    line
}

/// The bankroll after a game write, flagged while the server has not confirmed it.
pub fn optimistic_bankroll_line(bankroll: &OptimisticValue<Bankroll>) -> String {
    let line = format!("Bankroll now {}", bankroll_line(bankroll.current()));
    if bankroll.is_tentative() {
        format!("{} (unconfirmed)", line)
    } else {
        line
    }
}

pub fn session_line(session: &Session, now: DateTime<Utc>) -> String {
    let mut line = format!(
        "[{}] {} {}, buy-ins {}, cashes {} ({}), profit {}",
        session.id,
        session.display_name(),
        session.status,
        money(session.total_buyins),
        money(session.total_cashes),
        session.cash_count,
        signed(session.profit()),
    );
    if session.is_active() && session.start_time.is_some() {
        line.push_str(&format!(", {} min", session.current_duration_minutes(now)));
    }
    line
}

pub fn game_line(game: &Game) -> String {
    let state = if game.is_running() {
        "running".to_string()
    } else {
        format!("won {}, net {}", money(game.winnings), signed(game.net_result()))
    };
    format!(
        "[{}] {} ({}) {} x{}: {}",
        game.id,
        game.name,
        game.game_type.display_name(),
        money(game.buy_in),
        game.effective_entries(),
        state
    )
}

pub fn conflict_lines(conflict: &SessionConflict) -> Vec<String> {
    let mut lines = vec![match &conflict.active_session {
        Some(session) => format!(
            "Bankroll already has an active session: [{}] {} ({})",
            session.id,
            session.display_name(),
            session.status
        ),
        None => "Bankroll already has an active session".to_string(),
    }];
    for suggestion in &conflict.suggested_actions {
        lines.push(format!(
            "  --on-conflict {}  {}",
            suggestion.action.as_str(),
            suggestion.label
        ));
    }
    lines
}

pub fn bankroll_totals_lines(stats: &BankrollStats) -> Vec<String> {
    vec![
        format!("Bankrolls: {}", stats.total_bankrolls),
        format!("Starting:  {}", money(stats.total_starting_amount)),
        format!("Current:   {}", money(stats.total_current_amount)),
        format!("Profit:    {}", signed(stats.total_profit)),
    ]
}

pub fn game_stats_lines(stats: &GameStats) -> Vec<String> {
    vec![
        format!(
            "Games: {} completed, {} cashed (ITM {})",
            stats.games_played,
            stats.games_cashed,
            percent(stats.itm_percent)
        ),
        format!(
            "Invested {}, cashed {}, net {} (ROI {})",
            money(stats.total_invested),
            money(stats.total_cashed),
            signed(stats.net_profit),
            percent(stats.roi_percent)
        ),
    ]
}

pub fn session_stats_lines(stats: &SessionStats, risk_of_ruin: Option<Decimal>) -> Vec<String> {
    vec![
        format!(
            "Sessions: {} completed, {} winning ({}%)",
            stats.sessions,
            stats.winning_sessions,
            money(stats.win_rate_percent)
        ),
        format!(
            "Profit: total {}, average {}",
            signed(stats.total_profit),
            signed(stats.average_profit)
        ),
        format!(
            "Std dev {}, max drawdown {}",
            money(stats.std_dev),
            money(stats.max_drawdown)
        ),
        format!(
            "Kelly fraction {}, risk of ruin {}",
            stats
                .kelly_fraction
                .map(|k| k.round_dp(4).to_string())
                .unwrap_or_else(|| "n/a".to_string()),
            percent(risk_of_ruin)
        ),
    ]
}
