//! Note Keeper - Main Server
//!
//! Serves the note API and mints development tokens.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use note_keeper::{auth::jwt::encode_jwt, Config};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "note-keeper")]
#[command(about = "Personal note service")]
struct Cli {
    /// Path to the YAML config file (defaults to ./config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Port to listen on (overrides config.yaml and SERVER_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Mint a bearer token for a user, signed with the configured secret
    Token {
        /// User ID the token identifies
        #[arg(short, long)]
        user: Uuid,

        /// Token lifetime in seconds (defaults to auth.jwt_expiry_secs)
        #[arg(long)]
        expiry_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,note_keeper=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::from_yaml_and_env(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server_port = port;
            }
            note_keeper::start_server(config).await
        }
        Commands::Token { user, expiry_secs } => run_token(config, user, expiry_secs),
    }
}

fn run_token(config: Config, user: Uuid, expiry_secs: Option<u64>) -> Result<()> {
    let auth = config
        .auth_config
        .context("No auth configured: set JWT_SECRET or an auth section in config.yaml")?;

    let expiry = expiry_secs.unwrap_or(auth.jwt_expiry_secs);
    let token = encode_jwt(user, &auth.jwt_secret, expiry)?;

    tracing::debug!("Minted token for {} valid {}s", user, expiry);
    println!("{}", token);

    Ok(())
}
