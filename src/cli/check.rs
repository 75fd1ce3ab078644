//! Check command - validate config and show toggle state.

use std::path::Path;

use crate::cli::{load_config, output};
use crate::core::stack::Stack;
use crate::error::Result;

/// Validate the config and print which feature groups will be assembled.
pub fn execute(path: &Path, stack: Option<String>) -> Result<()> {
    let config = load_config(path, stack)?;
    // Fails on missing toggles or empty names, same as plan would
    Stack::from_config(&config)?;

    let clusters = config.clusters_toggle()?;
    let compute = config.compute_toggle()?;

    output::section("Topology");
    output::kv("project", &config.project.name);
    output::kv("stack", &config.project.stack);
    output::kv(clusters.key, output::toggle(clusters.enabled));
    output::kv(compute.key, output::toggle(compute.enabled));
    output::kv("engine", format!("{} {}", config.policy.engine, config.policy.engine_version));
    output::kv("parameters", config.parameter_pairs().len());

    output::success("config is valid");
    Ok(())
}
