mod cli;
mod error;
mod export;
mod filters;
mod fmt;
mod gateway;
mod models;
mod repository;
mod session;
mod settings;
mod tour;
mod tui;
mod usage;

use clap::Parser;

use cli::{AccountsCommands, Cli, Commands};

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Login { email }) => cli::auth::login(email).await,
        Some(Commands::Signup) => cli::auth::signup().await,
        Some(Commands::Logout) => cli::auth::logout().await,
        Some(Commands::Dashboard) | None => cli::dashboard::run(false).await,
        Some(Commands::List { search, status, from_date, to_date }) => {
            cli::receipts::list(search, status, from_date, to_date).await
        }
        Some(Commands::Stats { search, status, from_date, to_date }) => {
            cli::receipts::stats(search, status, from_date, to_date).await
        }
        Some(Commands::Delete { id }) => cli::receipts::delete(&id).await,
        Some(Commands::Edit { id, notas }) => cli::receipts::edit_notes(&id, &notas).await,
        Some(Commands::Export { from_date, to_date, output }) => {
            cli::export::run(from_date, to_date, output).await
        }
        Some(Commands::Usage) => cli::usage::run().await,
        Some(Commands::Profile) => cli::profile::show().await,
        Some(Commands::Accounts { command }) => match command {
            AccountsCommands::Add { nombre, numero, titular } => {
                cli::profile::add_account(&nombre, &numero, &titular).await
            }
            AccountsCommands::List => cli::profile::list_accounts().await,
            AccountsCommands::Remove { id } => cli::profile::remove_account(&id).await,
        },
        Some(Commands::Tour) => cli::tour_cmd::run().await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
