use anyhow::Result;
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use coinprice::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for coinprice::AppCommand {
    fn from(cmd: Commands) -> coinprice::AppCommand {
        match cmd {
            Commands::Coins => coinprice::AppCommand::Coins,
            Commands::Price { from, to } => coinprice::AppCommand::Price { from, to },
            Commands::Watch => coinprice::AppCommand::Watch,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List supported coins and currencies
    Coins,
    /// Display the price of a coin
    Price {
        /// Coin to convert from, by id or symbol
        #[arg(short, long)]
        from: Option<String>,

        /// Currency to convert to; repeat for several
        #[arg(short, long)]
        to: Vec<String>,
    },
    /// Interactively switch between coins and currencies
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => coinprice::cli::setup::setup().map(|path| {
            println!("Created default configuration at {}", path.display());
        }),
        Some(cmd) => coinprice::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
