//! Plan, outputs and teardown commands.
//!
//! All three assemble the stack against the in-process plan engine and
//! render a different view of the result.

use std::path::Path;
use tracing::info;

use crate::cli::{load_config, output};
use crate::core::engine::Plan;
use crate::core::stack::Stack;
use crate::error::Result;

fn build_plan(path: &Path, stack: Option<String>) -> Result<(String, Plan)> {
    let config = load_config(path, stack)?;
    let plan = Stack::from_config(&config)?.plan()?;
    let title = format!("{} / {}", config.project.name, config.project.stack);
    info!(resources = plan.resources.len(), outputs = plan.outputs.len(), "plan built");
    Ok((title, plan))
}

/// Print every resource in registration order.
pub fn plan(path: &Path, stack: Option<String>, json: bool, show_secrets: bool) -> Result<()> {
    let (title, plan) = build_plan(path, stack)?;

    if json {
        output::json(&plan.to_json(show_secrets));
        return Ok(());
    }

    output::section(&format!("Plan ({})", title));
    if plan.resources.is_empty() {
        output::dimmed("nothing to register: every feature group is disabled");
        return Ok(());
    }

    for resource in &plan.resources {
        output::list_item(&format!(
            "{:<17} {}",
            resource.kind.as_str(),
            output::name(&resource.name)
        ));
        if !resource.depends_on.is_empty() {
            output::dimmed(&format!("      after {}", resource.depends_on.join(", ")));
        }
    }

    println!();
    output::kv("resources", plan.resources.len());
    output::kv("outputs", plan.outputs.len());
    Ok(())
}

/// Print exported outputs.
pub fn outputs(path: &Path, stack: Option<String>, json: bool, show_secrets: bool) -> Result<()> {
    let (title, plan) = build_plan(path, stack)?;

    let rendered: serde_json::Map<String, serde_json::Value> = plan
        .outputs
        .iter()
        .map(|(k, v)| (k.clone(), v.render(show_secrets)))
        .collect();

    if json {
        output::json(&serde_json::Value::Object(rendered));
        return Ok(());
    }

    output::section(&format!("Outputs ({})", title));
    if rendered.is_empty() {
        output::dimmed("no outputs");
        return Ok(());
    }
    for (name, value) in &rendered {
        let text = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        output::kv(name, text);
    }
    Ok(())
}

/// Print the order in which resources can be deleted safely.
pub fn teardown(path: &Path, stack: Option<String>, json: bool) -> Result<()> {
    let (title, plan) = build_plan(path, stack)?;
    let order = plan.teardown_order();

    if json {
        let names: Vec<&str> = order.iter().map(|r| r.name.as_str()).collect();
        output::json(&serde_json::json!(names));
        return Ok(());
    }

    output::section(&format!("Teardown ({})", title));
    if order.is_empty() {
        output::dimmed("nothing to delete");
        return Ok(());
    }
    for (i, resource) in order.iter().enumerate() {
        println!(
            "  {:>2}. {:<17} {}",
            i + 1,
            resource.kind.as_str(),
            output::name(&resource.name)
        );
    }
    Ok(())
}
