use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

use hark::config::Config;

mod cli;

#[derive(Parser)]
#[command(name = "hark")]
#[command(about = "Resolve spoken commands to custom actions and built-in intents")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.hark/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve recognizer hypotheses, best first
    Resolve {
        /// Candidate transcriptions
        #[arg(required = true)]
        texts: Vec<String>,

        /// Confidence per hypothesis, comma separated (defaults to 1.0 each)
        #[arg(long, value_delimiter = ',')]
        confidence: Vec<f32>,

        /// Locale tag (defaults to the configured locale)
        #[arg(long)]
        locale: Option<String>,

        /// Print the resolution as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a custom command, replacing one with the same keyphrase
    #[command(group(ArgGroup::new("action").required(true)))]
    Add {
        /// Phrase that triggers the command
        keyphrase: String,

        /// matches, starts_with, ends_with, contains or custom
        #[arg(long, default_value = "matches")]
        policy: String,

        /// Speak this response
        #[arg(long, group = "action")]
        speak: Option<String>,

        /// Launch this application package
        #[arg(long, group = "action")]
        launch: Option<String>,

        /// Open this URL
        #[arg(long, group = "action")]
        url: Option<String>,

        /// Fire this platform intent action
        #[arg(long, group = "action")]
        intent: Option<String>,

        /// Locale tag (defaults to the configured locale)
        #[arg(long)]
        locale: Option<String>,
    },

    /// Remove a custom command by id
    Remove { id: i64 },

    /// List custom commands
    List {
        /// Only show commands for this locale's language
        #[arg(long)]
        locale: Option<String>,
    },

    /// Initialize a new ~/.hark/config.toml configuration file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    if let Commands::Init { force } = cli.command {
        return cli::init::init_command(cli.config, force).await;
    }

    let config = Config::load_from(cli.config.as_deref())?;

    match cli.command {
        Commands::Resolve {
            texts,
            confidence,
            locale,
            json,
        } => {
            cli::resolve::resolve_command(&config, texts, confidence, locale, json).await?;
        }
        Commands::Add {
            keyphrase,
            policy,
            speak,
            launch,
            url,
            intent,
            locale,
        } => {
            let action = cli::command::action_from_args(speak, launch, url, intent)?;
            cli::command::add_command(&config, keyphrase, &policy, action, locale).await?;
        }
        Commands::Remove { id } => {
            cli::command::remove_command(&config, id).await?;
        }
        Commands::List { locale } => {
            cli::command::list_command(&config, locale).await?;
        }
        Commands::Init { .. } => {}
    }

    Ok(())
}
