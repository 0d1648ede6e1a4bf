//! SafePath CLI - Command-line interface
//!
//! This binary provides a command-line interface to the SafePath library:
//! configuration management, route requests against Google Maps, and
//! offline advisory zone checks.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::route::RouteArgs;
use commands::track::TrackArgs;
use commands::zones::ZonesAction;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "safepath")]
#[command(version = safepath::VERSION)]
#[command(about = "Live location, advisory zones and safe routes", long_about = None)]
struct Cli {
    /// Mirror log output to stdout
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Enable debug-level logging (RUST_LOG still takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the default configuration file (~/.safepath/config.ini)
    Init,

    /// View and modify configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Find a route and show it on the map
    Route(RouteArgs),

    /// Advisory zone checks
    Zones {
        #[command(subcommand)]
        action: ZonesAction,
    },

    /// Follow "lat,lon" positions read from stdin and report the safety level
    Track(TrackArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        e.exit();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Init => commands::init::run(),
        Commands::Config { command } => commands::config::run(command),
        Commands::Route(args) => {
            let runner = CliRunner::new(cli.verbose, cli.debug)?;
            commands::route::run(&runner, args).await
        }
        Commands::Zones { action } => {
            let runner = CliRunner::new(cli.verbose, cli.debug)?;
            commands::zones::run(&runner, action)
        }
        Commands::Track(args) => {
            let runner = CliRunner::new(cli.verbose, cli.debug)?;
            commands::track::run(&runner, args).await
        }
    }
}
