use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use flame_client::{AppContextInner, ClientConfig};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "flame")]
#[command(about = "Flame - swipe, match and chat from the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Sign in with an existing account
    Login {
        #[arg(long)]
        email: String,
    },
    /// Forget the saved session
    Logout,
    /// Show who is signed in
    Whoami,
    /// View or edit your profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Step-by-step profile setup
    Onboard,
    /// Swipe through nearby profiles
    Feed,
    /// List your matches
    Matches,
    /// Open a conversation
    Chat {
        match_id: String,
    },
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Print the profile and what is still missing
    Show,
    /// Change one or more fields and save
    Set {
        #[arg(long)]
        age: Option<u32>,
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        institution: Option<String>,
        #[arg(long, requires = "lon")]
        lat: Option<f64>,
        #[arg(long, requires = "lat")]
        lon: Option<f64>,
    },
    /// Toggle interests on or off and save
    Interest {
        #[arg(required = true)]
        labels: Vec<String>,
    },
    /// Upload a photo
    Upload {
        path: PathBuf,
        /// Make it the primary photo
        #[arg(long)]
        primary: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flame=info,flame_client=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = ClientConfig::from_env()?;
    let ctx = AppContextInner::bootstrap(config)?;

    let result = match cli.command {
        None => commands::account::landing(&ctx),
        Some(Commands::Register { name, email }) => {
            commands::account::register(&ctx, name, email).await
        }
        Some(Commands::Login { email }) => commands::account::login(&ctx, email).await,
        Some(Commands::Logout) => commands::account::logout(&ctx),
        Some(Commands::Whoami) => commands::account::whoami(&ctx),
        Some(Commands::Profile { action }) => commands::profile::run(&ctx, action).await,
        Some(Commands::Onboard) => commands::profile::onboard(&ctx).await,
        Some(Commands::Feed) => commands::discover::feed(ctx.clone()).await,
        Some(Commands::Matches) => commands::discover::matches(&ctx).await,
        Some(Commands::Chat { match_id }) => commands::chat::run(&ctx, &match_id).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    Ok(())
}
