use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use svcdeck::config::Config;
use svcdeck::logging::{self, LogTarget};
use svcdeck::model::Action;
use svcdeck::projection::SortKey;

mod cli_exec;

#[derive(Parser)]
#[command(name = "svcdeck")]
#[command(about = "Browse and control systemd services through a remote API", long_about = None)]
struct Cli {
    /// API base URL (overrides the config file)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Config file (defaults to $XDG_CONFIG_HOME/svcdeck/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to this file (the terminal UI never logs to the screen)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive service table (default)
    Tui,

    /// List services
    List {
        /// Filter by unit, description, active state or enabled state
        #[arg(long, short = 'q')]
        query: Option<String>,
        /// Sort column: unit, load, active, sub, enabled, description
        #[arg(long, default_value = "unit")]
        sort: SortKey,
        /// Sort descending
        #[arg(long)]
        desc: bool,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a control action on one unit
    Action {
        unit: String,
        /// start, stop, restart, enable or disable
        action: Action,
    },

    /// Reload the service manager configuration
    DaemonReload,

    /// Show a unit's status output
    Status { unit: String },

    /// Show a unit's recent logs
    Logs { unit: String },

    /// Print a unit's file
    Cat { unit: String },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    match run().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(1);
        }
    }
}

async fn run() -> Result<bool> {
    let cli = Cli::parse();

    let mut cfg = Config::resolve(cli.config.as_deref())?;
    if let Some(url) = cli.url {
        cfg.base_url = url;
    }

    let command = cli.command.unwrap_or(Commands::Tui);
    let log_target = match (&command, cli.log_file.as_deref()) {
        (_, Some(path)) => LogTarget::File(path),
        (Commands::Tui, None) => LogTarget::Discard,
        (_, None) => LogTarget::Stderr,
    };
    logging::init(log_target)?;

    match command {
        Commands::Tui => {
            svcdeck::tui::run(&cfg).await?;
            Ok(true)
        }
        other => cli_exec::run_command(&cfg, other).await,
    }
}
