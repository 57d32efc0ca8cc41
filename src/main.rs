mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use queryquest::config::DEFAULT_CONFIG_FILE;

// ============================================================================
// CLI Types
// ============================================================================

/// QueryQuest - trivia practice from the terminal
#[derive(Parser, Debug)]
#[command(version = queryquest::build_info::VERSION, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    config: String,

    /// API base URL (overrides config file)
    #[arg(short, long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and store the session
    Login {
        /// Account name
        #[arg(short, long)]
        username: String,

        /// Account password
        #[arg(short, long, env = "QUERYQUEST_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami {
        /// Output template, e.g. "{username} ({uuid})"
        #[arg(long)]
        format: Option<String>,
    },

    /// Show xp, wins and losses
    Stats,

    /// Record the outcome of an answered question
    Answer {
        /// The answer was correct
        #[arg(long, conflicts_with = "incorrect", required_unless_present = "incorrect")]
        correct: bool,

        /// The answer was wrong
        #[arg(long)]
        incorrect: bool,
    },

    /// List questions
    Questions {
        /// Maximum number of questions to print
        #[arg(short, long)]
        limit: Option<usize>,

        /// Shuffle question order and answer options
        #[arg(long)]
        shuffle: bool,
    },
}

// ============================================================================
// Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> std::process::ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            std::process::ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    debug!(version = %queryquest::build_info::version_string(), "Starting");
    let client = commands::connect(&cli.config, cli.server.as_deref()).await?;

    match cli.command {
        Commands::Login { username, password } => {
            commands::login::run(&client, username, password).await
        }
        Commands::Logout => commands::logout::run(&client).await,
        Commands::Whoami { format } => commands::whoami::run(&client, format.as_deref()).await,
        Commands::Stats => commands::stats::run(&client).await,
        Commands::Answer { correct, .. } => commands::answer::run(&client, correct).await,
        Commands::Questions { limit, shuffle } => {
            commands::questions::run(&client, limit, shuffle).await
        }
    }
}

// ============================================================================
// Initialization
// ============================================================================

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
