use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxboard::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fxboard::AppCommand {
    fn from(cmd: Commands) -> fxboard::AppCommand {
        match cmd {
            Commands::Watch => fxboard::AppCommand::Watch,
            Commands::Rates => fxboard::AppCommand::Rates,
            Commands::Convert { amount, from, to } => {
                fxboard::AppCommand::Convert { amount, from, to }
            }
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Keep rates fresh and convert amounts interactively
    Watch,
    /// Fetch and display the latest rates
    Rates,
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Source currency code, e.g. USD
        from: Option<String>,
        /// Destination currency code, e.g. RUB
        to: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fxboard::cli::setup::setup(),
        Some(cmd) => fxboard::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
