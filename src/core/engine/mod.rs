//! Provisioning engine interface.
//!
//! The engine owns diffing, planning and applying against the cloud API.
//! The topology only describes resources and their dependencies through the
//! `Engine` trait, in dependency order.
//!
//! ## Adding a New Engine Backend
//!
//! 1. Implement the `Engine` trait
//! 2. Add the implementation in a new file next to `plan.rs`
//! 3. Re-export from this module
//!
//! ## Example
//!
//! ```ignore
//! struct Remote { /* ... */ }
//!
//! impl Engine for Remote {
//!     fn register(&mut self, registration: Registration) -> Result<Registered> {
//!         // Send the resource description to the engine
//!     }
//!     fn resolve(&self, kind: ResourceKind, name: &str) -> bool {
//!         // Look up a previously registered resource
//!     }
//!     fn export(&mut self, name: &str, value: OutputValue) -> Result<()> {
//!         // Publish a stack output
//!     }
//! }
//! ```

use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::cluster::ClusterSpec;
use crate::core::compute::{ComputeInstanceSpec, KeyPairSpec};
use crate::core::handle::{Handle, OutputValue, ResourceKind};
use crate::core::instances::InstanceSpec;
use crate::core::params::ParameterGroupSpec;
use crate::core::secret::SecretSpec;
use crate::error::{ReferenceError, Result};

mod plan;

pub use plan::{Plan, PlanEngine, PlannedResource};

/// Output key under which the engine returns a resource's physical id.
pub const ID: &str = "id";

/// Output key under which the engine returns a generated secret.
pub const SECRET_RESULT: &str = "result";

/// Resource description, one variant per resource kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResourceSpec {
    ParameterGroup(ParameterGroupSpec),
    Secret(SecretSpec),
    Cluster(ClusterSpec),
    ClusterInstance(InstanceSpec),
    KeyPair(KeyPairSpec),
    ComputeInstance(ComputeInstanceSpec),
}

impl ResourceSpec {
    /// Physical identifier the provider will use.
    pub fn identifier(&self) -> &str {
        match self {
            ResourceSpec::ParameterGroup(s) => &s.identifier,
            ResourceSpec::Secret(s) => &s.identifier,
            ResourceSpec::Cluster(s) => &s.identifier,
            ResourceSpec::ClusterInstance(s) => &s.identifier,
            ResourceSpec::KeyPair(s) => &s.key_name,
            ResourceSpec::ComputeInstance(s) => &s.name,
        }
    }
}

/// A resource handed to the engine.
#[derive(Debug, Clone)]
pub struct Registration {
    pub kind: ResourceKind,
    /// Engine-level resource name, unique within the stack.
    pub name: String,
    pub spec: ResourceSpec,
    /// Names of resources that must exist before this one is created.
    pub depends_on: Vec<String>,
}

/// Engine response to a registration.
#[derive(Debug, Clone)]
pub struct Registered {
    pub name: String,
    /// Generated output fields, keyed by output name (`id`, `result`, ...).
    pub outputs: BTreeMap<String, String>,
}

/// Provisioning engine.
///
/// Implementations must refuse a registration whose dependencies have not
/// been registered yet.
pub trait Engine {
    /// Describe a resource to the engine.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` for anything the engine refuses. Callers do
    /// not retry.
    fn register(&mut self, registration: Registration) -> Result<Registered>;

    /// Whether a resource of `kind` has been registered under `name`.
    fn resolve(&self, kind: ResourceKind, name: &str) -> bool;

    /// Publish a named stack output.
    fn export(&mut self, name: &str, value: OutputValue) -> Result<()>;
}

/// Fail with `ReferenceError` unless the engine knows `handle`.
pub fn ensure_resolved<H: Handle>(engine: &dyn Engine, handle: &H) -> Result<()> {
    if handle.name().is_empty() || !engine.resolve(H::KIND, handle.name()) {
        return Err(ReferenceError::Unresolved {
            kind: H::KIND,
            name: handle.name().to_string(),
        }
        .into());
    }
    Ok(())
}
