//! Bankroll statistics derived from games and sessions.

mod stats_calculator;
mod stats_model;

pub use stats_calculator::{
    game_stats, kelly_fraction, max_drawdown, mean, risk_of_ruin, session_profits,
    session_stats, variance,
};
pub use stats_model::{GameStats, SessionStats};
