//! Resource name derivation.
//!
//! Every identifier in the topology is built here so the stack name is
//! always embedded and parallel stacks never collide.

use crate::core::constants::SAFE_REPLACEMENT;
use crate::error::{Result, ValidationError};

const SEPARATOR: char = '-';

/// Join a logical name, the stack, and an optional suffix.
///
/// `derive("db", "dev", Some("cluster"))` is `db-dev-cluster`.
pub fn derive(logical_name: &str, stack: &str, suffix: Option<&str>) -> String {
    let mut name = String::with_capacity(
        logical_name.len() + stack.len() + suffix.map_or(0, |s| s.len() + 1) + 1,
    );
    name.push_str(logical_name);
    name.push(SEPARATOR);
    name.push_str(stack);
    if let Some(suffix) = suffix {
        name.push(SEPARATOR);
        name.push_str(suffix);
    }
    name
}

/// Replace every character outside `[A-Za-z0-9_-]` with `-`.
///
/// Only used for resource types with strict naming rules (key pairs).
pub fn provider_safe(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                SAFE_REPLACEMENT
            }
        })
        .collect()
}

/// Deployment context every name is derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namer {
    project: String,
    stack: String,
}

impl Namer {
    /// Create a namer for a project and stack.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyIdentifier` if either part is blank.
    pub fn new(project: impl Into<String>, stack: impl Into<String>) -> Result<Self> {
        let project = project.into();
        let stack = stack.into();
        if project.trim().is_empty() {
            return Err(ValidationError::EmptyIdentifier("project").into());
        }
        if stack.trim().is_empty() {
            return Err(ValidationError::EmptyIdentifier("stack").into());
        }
        Ok(Self { project, stack })
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn stack(&self) -> &str {
        &self.stack
    }

    /// `{logical_name}-{stack}`
    pub fn name(&self, logical_name: &str) -> String {
        derive(logical_name, &self.stack, None)
    }

    /// `{logical_name}-{stack}-{suffix}`
    pub fn suffixed(&self, logical_name: &str, suffix: &str) -> String {
        derive(logical_name, &self.stack, Some(suffix))
    }

    /// `{project}-{stack}-{suffix}`, for resources owned by the whole project.
    pub fn project_scoped(&self, suffix: &str) -> String {
        derive(&self.project, &self.stack, Some(suffix))
    }

    /// Provider-safe form of [`Namer::suffixed`].
    pub fn safe(&self, logical_name: &str, suffix: &str) -> String {
        provider_safe(&self.suffixed(logical_name, suffix))
    }
}
