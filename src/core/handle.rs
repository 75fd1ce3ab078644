//! Typed resource handles.
//!
//! A handle is what the engine hands back after a resource is registered.
//! Factories take handles rather than raw identifiers, so a cluster can only
//! be built against a parameter group and a secret, and an instance only
//! against a cluster.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroizing;

use crate::core::constants::REDACTED;

/// Kinds of resources the topology registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Cluster parameter group shared by both clusters
    ParameterGroup,
    /// Generated master password
    Secret,
    /// Database cluster
    Cluster,
    /// Instance attached to a database cluster
    ClusterInstance,
    /// Access credential for the compute client
    KeyPair,
    /// Externally reachable compute node
    ComputeInstance,
}

impl ResourceKind {
    /// Deletion priority (lower = delete first).
    ///
    /// Only used to break ties between resources with no dependency between
    /// them; the dependency graph always wins.
    pub fn teardown_priority(self) -> u8 {
        match self {
            ResourceKind::ClusterInstance => 0,
            ResourceKind::ComputeInstance => 0,
            ResourceKind::Cluster => 1,
            ResourceKind::KeyPair => 2,
            ResourceKind::ParameterGroup => 3,
            ResourceKind::Secret => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::ParameterGroup => "parameter_group",
            ResourceKind::Secret => "secret",
            ResourceKind::Cluster => "cluster",
            ResourceKind::ClusterInstance => "cluster_instance",
            ResourceKind::KeyPair => "key_pair",
            ResourceKind::ComputeInstance => "compute_instance",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common surface of every handle.
pub trait Handle {
    /// Kind of the resource behind the handle.
    const KIND: ResourceKind;

    /// Name the resource was registered under.
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterGroupHandle {
    pub name: String,
    pub family: String,
}

/// Generated secret. The value is wiped from memory on drop.
#[derive(Clone)]
pub struct SecretHandle {
    pub name: String,
    value: Zeroizing<String>,
}

impl SecretHandle {
    pub fn new(name: impl Into<String>, value: String) -> Self {
        Self {
            name: name.into(),
            value: Zeroizing::new(value),
        }
    }

    /// Plaintext secret value.
    pub fn expose(&self) -> &str {
        &self.value
    }
}

impl fmt::Debug for SecretHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretHandle")
            .field("name", &self.name)
            .field("value", &REDACTED)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterHandle {
    pub name: String,
    pub cluster_identifier: String,
    pub engine: String,
    pub engine_version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceHandle {
    pub name: String,
    pub identifier: String,
    pub cluster_identifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyPairHandle {
    pub name: String,
    pub key_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComputeInstanceHandle {
    pub name: String,
    pub key_name: String,
    pub public_ip: bool,
}

macro_rules! impl_handle {
    ($ty:ty, $kind:expr) => {
        impl Handle for $ty {
            const KIND: ResourceKind = $kind;

            fn name(&self) -> &str {
                &self.name
            }
        }
    };
}

impl_handle!(ParameterGroupHandle, ResourceKind::ParameterGroup);
impl_handle!(SecretHandle, ResourceKind::Secret);
impl_handle!(ClusterHandle, ResourceKind::Cluster);
impl_handle!(InstanceHandle, ResourceKind::ClusterInstance);
impl_handle!(KeyPairHandle, ResourceKind::KeyPair);
impl_handle!(ComputeInstanceHandle, ResourceKind::ComputeInstance);

/// Value attached to an exported output.
#[derive(Debug, Clone)]
pub enum OutputValue {
    ParameterGroup(ParameterGroupHandle),
    Secret(SecretHandle),
    Cluster(ClusterHandle),
    Instances(Vec<InstanceHandle>),
    KeyPair(KeyPairHandle),
    ComputeInstance(ComputeInstanceHandle),
}

impl OutputValue {
    /// JSON rendering. Secret values are redacted unless `reveal` is set.
    pub fn render(&self, reveal: bool) -> serde_json::Value {
        use serde_json::json;

        match self {
            OutputValue::ParameterGroup(h) => json!(h),
            OutputValue::Secret(h) if reveal => json!(h.expose()),
            OutputValue::Secret(_) => json!(REDACTED),
            OutputValue::Cluster(h) => json!(h),
            OutputValue::Instances(hs) => json!(hs),
            OutputValue::KeyPair(h) => json!(h),
            OutputValue::ComputeInstance(h) => json!(h),
        }
    }

    /// Whether the output carries at least one handle.
    pub fn is_populated(&self) -> bool {
        match self {
            OutputValue::Instances(hs) => !hs.is_empty(),
            OutputValue::Secret(h) => !h.expose().is_empty(),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instances_deleted_before_clusters() {
        assert!(
            ResourceKind::ClusterInstance.teardown_priority()
                < ResourceKind::Cluster.teardown_priority(),
            "Instances must be deleted before their cluster"
        );
    }

    #[test]
    fn test_clusters_deleted_before_shared_resources() {
        assert!(
            ResourceKind::Cluster.teardown_priority() < ResourceKind::Secret.teardown_priority()
        );
        assert!(
            ResourceKind::Cluster.teardown_priority()
                < ResourceKind::ParameterGroup.teardown_priority()
        );
        assert!(
            ResourceKind::ComputeInstance.teardown_priority()
                < ResourceKind::KeyPair.teardown_priority()
        );
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = SecretHandle::new("pw", "hunter2".to_string());
        let debug = format!("{:?}", secret);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains(REDACTED));
    }

    #[test]
    fn test_secret_output_render() {
        let output = OutputValue::Secret(SecretHandle::new("pw", "hunter2".to_string()));
        assert_eq!(output.render(false), serde_json::json!(REDACTED));
        assert_eq!(output.render(true), serde_json::json!("hunter2"));
    }

    #[test]
    fn test_empty_fleet_is_not_populated() {
        assert!(!OutputValue::Instances(Vec::new()).is_populated());
    }
}
