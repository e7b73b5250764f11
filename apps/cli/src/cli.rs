use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use bankrollgod_core::bankrolls::BankrollType;
use bankrollgod_core::games::GameType;
use bankrollgod_core::overlay::OverlayKind;
use bankrollgod_core::sessions::{ConflictAction, SessionStatus};

/// Track poker bankrolls, sessions and games from the terminal.
#[derive(Debug, Parser)]
#[command(name = "bankrollgod", version, about)]
pub struct Cli {
    /// API root, overriding BRG_API_URL.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check whether the backend is reachable.
    Health,
    /// Sign in and store the token.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "BRG_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in.
    Register(RegisterArgs),
    /// Sign out and forget the stored token.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Permanently delete the signed-in account.
    DeleteAccount {
        /// Type DELETE to confirm.
        #[arg(long)]
        confirm: String,
    },
    /// Manage bankrolls.
    #[command(subcommand)]
    Bankrolls(BankrollCommand),
    /// Start, inspect and finish sessions.
    #[command(subcommand)]
    Sessions(SessionCommand),
    /// Track games inside a session.
    #[command(subcommand)]
    Games(GameCommand),
    /// Reconcile the local session cache with the server.
    Recover,
    /// Poll the active sessions until Ctrl-C.
    Watch,
    /// Render a broadcast overlay line until Ctrl-C.
    Overlay {
        /// Overlay URL carrying `?bankroll=<id>`, or a bare bankroll id.
        source: String,
        /// Overlay to render. Defaults to the URL path, or all of them.
        #[arg(long)]
        kind: Option<OverlayKind>,
        /// Render once and exit.
        #[arg(long)]
        once: bool,
    },
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, env = "BRG_PASSWORD", hide_env_values = true)]
    pub password: String,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum BankrollCommand {
    /// List bankrolls with their current amounts.
    List,
    /// Show one bankroll.
    Show { id: String },
    /// Create a bankroll.
    Create {
        #[arg(long)]
        name: String,
        /// online, live, tournament or mixed
        #[arg(long = "type", default_value = "online")]
        bankroll_type: BankrollType,
        #[arg(long, default_value = "EUR")]
        currency: String,
        #[arg(long)]
        starting_amount: Decimal,
        #[arg(long)]
        goal: Option<Decimal>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Archive a bankroll.
    Archive { id: String },
    /// Delete a bankroll and everything in it.
    Delete {
        id: String,
        /// Required: deletion cannot be undone.
        #[arg(long)]
        yes: bool,
    },
    /// List a bankroll's sessions.
    Sessions {
        id: String,
        #[arg(long)]
        status: Option<SessionStatus>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
    /// Totals across bankrolls, or session statistics for one bankroll.
    Stats { id: Option<String> },
}

#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// List the sessions the server considers active.
    Active,
    /// Start a session on a bankroll.
    Start {
        bankroll_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        location: Option<String>,
        /// What to do with an existing active session: fail, resume, pause or complete.
        #[arg(long, default_value = "fail")]
        on_conflict: ConflictAction,
    },
    /// Pause a session.
    Pause { id: String },
    /// Resume a paused session.
    Resume { id: String },
    /// Complete a session.
    Complete { id: String },
    /// List a session's games with totals.
    Games { id: String },
}

#[derive(Debug, Subcommand)]
pub enum GameCommand {
    /// Start a game in an active session.
    Start {
        #[arg(long)]
        session: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        buy_in: Decimal,
        #[arg(long, default_value_t = 1)]
        entries: u32,
        #[arg(long = "type", default_value = "tournament")]
        game_type: GameType,
    },
    /// Change a game's entry count.
    Entries {
        #[arg(long)]
        session: String,
        #[arg(long)]
        game: String,
        entries: u32,
    },
    /// Complete a game with its winnings.
    Complete {
        #[arg(long)]
        session: String,
        #[arg(long)]
        game: String,
        winnings: Decimal,
    },
    /// Complete a game with nothing won.
    Bust {
        #[arg(long)]
        session: String,
        #[arg(long)]
        game: String,
    },
}
