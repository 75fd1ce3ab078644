//! Cluster parameter sets.
//!
//! Turns ordered `(name, value)` pairs into parameter entries and registers
//! the parameter group both clusters share.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::core::engine::{Engine, Registration, ResourceSpec};
use crate::core::handle::{ParameterGroupHandle, ResourceKind};
use crate::core::naming::Namer;
use crate::error::{Result, ValidationError};

/// When a parameter change takes effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplyMethod {
    Immediate,
    PendingReboot,
}

/// A single engine parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterEntry {
    pub name: String,
    pub value: String,
    pub apply_method: ApplyMethod,
}

/// Parameter group description sent to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterGroupSpec {
    pub identifier: String,
    pub family: String,
    pub description: String,
    pub entries: Vec<ParameterEntry>,
}

/// Build parameter entries in caller order.
///
/// Replication parameters are not hot-reloadable, so every entry is
/// `pending-reboot`.
///
/// # Errors
///
/// Returns `ValidationError` if a name is empty or repeated, or if a value
/// is not a single-line scalar.
pub fn build<K, V>(entries: &[(K, V)]) -> Result<Vec<ParameterEntry>>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut seen = HashSet::with_capacity(entries.len());
    let mut built = Vec::with_capacity(entries.len());

    for (name, value) in entries {
        let (name, value) = (name.as_ref(), value.as_ref());
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyParameterName.into());
        }
        validate_scalar(name, value)?;
        if !seen.insert(name) {
            return Err(ValidationError::DuplicateParameter(name.to_string()).into());
        }
        built.push(ParameterEntry {
            name: name.to_string(),
            value: value.to_string(),
            apply_method: ApplyMethod::PendingReboot,
        });
    }

    Ok(built)
}

fn validate_scalar(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ValidationError::InvalidParameterValue {
            name: name.to_string(),
            reason: "value cannot be empty".to_string(),
        }
        .into());
    }
    if let Some(ch) = value.chars().find(|c| c.is_control()) {
        return Err(ValidationError::InvalidParameterValue {
            name: name.to_string(),
            reason: format!("control character {:?} is not allowed", ch),
        }
        .into());
    }
    Ok(())
}

/// Describe the shared parameter group.
pub fn group_spec(
    namer: &Namer,
    logical_name: &str,
    family: &str,
    description: &str,
    entries: Vec<ParameterEntry>,
) -> ParameterGroupSpec {
    ParameterGroupSpec {
        identifier: namer.suffixed(logical_name, "parameter-group"),
        family: family.to_string(),
        description: description.to_string(),
        entries,
    }
}

/// Register a parameter group with the engine.
pub fn register_group(
    engine: &mut dyn Engine,
    spec: ParameterGroupSpec,
) -> Result<ParameterGroupHandle> {
    let name = spec.identifier.clone();
    let family = spec.family.clone();
    debug!(name = %name, entries = spec.entries.len(), "registering parameter group");

    let registered = engine.register(Registration {
        kind: ResourceKind::ParameterGroup,
        name,
        spec: ResourceSpec::ParameterGroup(spec),
        depends_on: Vec::new(),
    })?;

    Ok(ParameterGroupHandle {
        name: registered.name,
        family,
    })
}
