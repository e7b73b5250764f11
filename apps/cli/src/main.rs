mod cli;
mod commands;
mod config;
mod events;
mod main_lib;
mod output;
mod scheduler;

use clap::Parser;

use cli::{Cli, Command};
use config::Config;
use main_lib::{build_state, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url.trim_end_matches('/').to_string();
    }
    let state = build_state(config)?;

    match cli.command {
        Command::Health => commands::health(&state).await,
        Command::Login { email, password } => commands::login(&state, email, password).await,
        Command::Register(args) => commands::register(&state, args).await,
        Command::Logout => commands::logout(&state).await,
        Command::Whoami => commands::whoami(&state).await,
        Command::DeleteAccount { confirm } => commands::delete_account(&state, &confirm).await,
        Command::Bankrolls(command) => commands::bankrolls(&state, command).await,
        Command::Sessions(command) => commands::sessions(&state, command).await,
        Command::Games(command) => commands::games(&state, command).await,
        Command::Recover => commands::recover(&state).await,
        Command::Watch => scheduler::watch_sessions(&state).await,
        Command::Overlay { source, kind, once } => {
            scheduler::run_overlay(&state, &source, kind, once).await
        }
    }
}
