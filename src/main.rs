//! Trade journal - main entry point
//!
//! This binary provides five subcommands:
//! - list: print the journal
//! - add: record a new trade
//! - edit: amend an existing trade by id
//! - delete: remove a trade by id
//! - export: write the journal to a CSV file

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

use commands::TradeFieldArgs;

#[derive(Parser, Debug)]
#[command(name = "trade-journal")]
#[command(about = "Personal trading journal with a pluggable document-store backend", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "journal.json")]
    config: String,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print every trade in the journal
    List,

    /// Record a new trade
    Add {
        /// Traded symbol, e.g. BTCUSDT
        symbol: String,

        #[command(flatten)]
        fields: TradeFieldArgs,
    },

    /// Amend an existing trade; only the supplied fields change
    Edit {
        /// Identifier of the trade to amend
        id: String,

        /// Traded symbol
        #[arg(long)]
        symbol: Option<String>,

        #[command(flatten)]
        fields: TradeFieldArgs,
    },

    /// Remove a trade
    Delete {
        /// Identifier of the trade to remove
        id: String,
    },

    /// Write the journal to a CSV file
    Export {
        /// Output file path
        #[arg(short, long, default_value = "journal.csv")]
        output: String,
    },
}

fn setup_logging(verbose: bool, command_name: &str) -> Result<()> {
    std::fs::create_dir_all("logs")?;

    let log_filename = format!(
        "{}_{}.log",
        command_name,
        chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
    );
    let log_path = PathBuf::from("logs").join(&log_filename);

    // Filter out noisy external crates
    let level = if verbose { "debug" } else { "info" };
    let filter_str = format!("{level},hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn,h2=warn");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let file_appender = tracing_appender::rolling::never("logs", &log_filename);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(true);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_appender)
        .with_target(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    info!("Log file: {}", log_path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let command_name = match &cli.command {
        Commands::List => "list",
        Commands::Add { .. } => "add",
        Commands::Edit { .. } => "edit",
        Commands::Delete { .. } => "delete",
        Commands::Export { .. } => "export",
    };

    setup_logging(cli.verbose, command_name)?;

    match cli.command {
        Commands::List => commands::list::run(&cli.config).await,
        Commands::Add { symbol, fields } => commands::add::run(&cli.config, symbol, fields).await,
        Commands::Edit { id, symbol, fields } => {
            commands::edit::run(&cli.config, id, symbol, fields).await
        }
        Commands::Delete { id } => commands::delete::run(&cli.config, id).await,
        Commands::Export { output } => commands::export::run(&cli.config, output).await,
    }
}
