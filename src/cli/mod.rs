pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "qb", about = "QuestBoard API companion CLI", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Mint a development bearer token")]
    Token(commands::token::TokenArgs),

    #[command(about = "Seed the rank reference table")]
    SeedRanks,

    #[command(about = "Check a running server's health endpoint")]
    Health {
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        url: String,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Token(args) => commands::token::handle(args),
        Commands::SeedRanks => commands::seed::handle().await,
        Commands::Health { url } => commands::health::handle(&url).await,
    }
}
