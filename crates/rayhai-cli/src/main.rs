use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod bootstrap;
mod commands;

#[derive(Parser)]
#[command(name = "rayhai")]
#[command(about = "RayhAI - chat with a portfolio persona from the terminal", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Engine configuration file (default: ~/.config/rayhai/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Persona document to load instead of the configured one (path or URL)
    #[arg(long, global = true, value_name = "PATH|URL")]
    pub persona: Option<String>,

    /// Seed for reply sampling
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive conversation (default)
    Chat {
        /// Do not read or write the saved transcript
        #[arg(long)]
        no_transcript: bool,
    },
    /// Ask a single question and print the reply
    Ask {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// Write a default config.toml (honours --config, --persona and --seed)
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Show the persona the assistant speaks about
    Persona {
        /// Print the full persona document as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    match cli.command.unwrap_or(Commands::Chat {
        no_transcript: false,
    }) {
        Commands::Chat { no_transcript } => commands::chat::run(&cli.global, !no_transcript).await?,
        Commands::Ask { message } => commands::ask::run(&cli.global, &message.join(" ")).await?,
        Commands::Init { force } => commands::init::run(&cli.global, force)?,
        Commands::Persona { json } => commands::persona::run(&cli.global, json).await?,
    }

    Ok(())
}
