//! Command-line interface.

pub mod check;
pub mod completions;
pub mod init;
pub mod output;
pub mod plan;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::core::config::Config;
use crate::core::constants;
use crate::error::Result;

/// repl-topology - Test topology for cross-cluster logical replication.
#[derive(Parser)]
#[command(
    name = "repl-topology",
    about = "Declare a two-cluster logical replication test topology",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the topology configuration file
    #[arg(long, global = true, default_value = constants::CONFIG_FILE)]
    pub config: PathBuf,

    /// Override the stack name from the config file
    #[arg(long, global = true, env = constants::STACK_ENV)]
    pub stack: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Write a default topology.toml
    Init {
        /// Project name
        #[arg(short, long, default_value = "iup-replication-experiment")]
        name: String,
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Validate the config and show which feature groups are enabled
    Check,

    /// Show every resource that would be registered, in dependency order
    Plan {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Print secret values instead of redacting them
        #[arg(long)]
        show_secrets: bool,
    },

    /// Show exported outputs
    Outputs {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Print secret values instead of redacting them
        #[arg(long)]
        show_secrets: bool,
    },

    /// Show a safe deletion order for the planned resources
    Teardown {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Load the config file and apply the stack override.
pub(crate) fn load_config(path: &Path, stack: Option<String>) -> Result<Config> {
    Ok(Config::load(path)?.with_stack(stack))
}

/// Execute a command.
pub fn execute(cli: Cli) -> Result<()> {
    use Command::*;

    let Cli {
        command,
        config,
        stack,
        ..
    } = cli;

    match command {
        Init { name, force } => init::execute(&config, &name, stack, force),
        Check => check::execute(&config, stack),
        Plan { json, show_secrets } => plan::plan(&config, stack, json, show_secrets),
        Outputs { json, show_secrets } => plan::outputs(&config, stack, json, show_secrets),
        Teardown { json } => plan::teardown(&config, stack, json),
        Completions { shell } => completions::execute(shell),
    }
}
