use clap::{Parser, Subcommand};
use colored::*;
use partwise_cli::{init_logging, run_server, Config};
use std::process;

mod cli;

use cli::episodes::{handle_episodes_command, EpisodesCommands};

#[derive(Parser)]
#[command(name = "partwise")]
#[command(about = "Partwise - episodes and their ordered parts over HTTP")]
#[command(version)]
struct Cli {
    /// SQLite database file (`:memory:` for a throwaway database)
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
    #[command(flatten)]
    Episodes(EpisodesCommands),
}

#[tokio::main]
async fn main() {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = handle_command(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(cli: Cli) -> anyhow::Result<()> {
    let (host, port) = match &cli.command {
        Commands::Serve { host, port } => (host.as_deref(), *port),
        Commands::Episodes(_) => (None, None),
    };

    let config = Config::from_env()?.with_overrides(host, port, cli.db.as_deref())?;
    init_logging(&config.log_level);

    match cli.command {
        Commands::Serve { .. } => run_server(config).await,
        Commands::Episodes(command) => handle_episodes_command(command, &config).await,
    }
}
