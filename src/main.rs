//! repl-topology - Test topology for cross-cluster logical replication.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use repl_topology::cli::output;
use repl_topology::cli::{execute, Cli};
use repl_topology::error::{ConfigError, Error};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("REPL_TOPOLOGY_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("repl_topology=debug")
        } else {
            EnvFilter::new("repl_topology=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false).without_time())
        .init();

    if let Err(e) = execute(cli) {
        let suggestion = match &e {
            Error::Config(ConfigError::NotFound(_)) => Some("run: repl-topology init"),
            Error::Config(ConfigError::AlreadyExists(_)) => Some("pass --force to overwrite"),
            Error::Config(ConfigError::MissingToggle(_)) => {
                Some("toggles must be set explicitly, e.g. [clusters] enabled = false")
            }
            Error::Engine(_) => Some("engine errors are not retried; fix the cause and re-run"),
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
