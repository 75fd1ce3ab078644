//! Init command - write a default topology config.

use std::path::Path;
use tracing::info;

use crate::cli::output;
use crate::core::config::Config;
use crate::error::Result;

const DEFAULT_STACK: &str = "dev";

/// Write `topology.toml` with the database topology enabled and the compute
/// client disabled.
pub fn execute(path: &Path, name: &str, stack: Option<String>, force: bool) -> Result<()> {
    let stack = stack.unwrap_or_else(|| DEFAULT_STACK.to_string());
    info!("Initializing project {} for stack {}", name, stack);

    let config = Config::new(name, stack);
    config.validate()?;
    config.save(path, force)?;

    output::success(&format!("wrote {}", path.display()));
    output::hint("set compute.enabled = true and compute.public_key to add a client machine");
    Ok(())
}
