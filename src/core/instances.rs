//! Cluster instance fleets.

use serde::Serialize;
use tracing::debug;

use crate::core::engine::{ensure_resolved, Engine, Registration, ResourceSpec};
use crate::core::handle::{ClusterHandle, Handle, InstanceHandle, ResourceKind};
use crate::core::naming::Namer;
use crate::error::Result;

/// Instance description sent to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceSpec {
    pub identifier: String,
    pub cluster_ref: String,
    pub engine: String,
    pub engine_version: String,
    pub instance_class: String,
    pub performance_insights_enabled: bool,
    pub publicly_accessible: bool,
}

/// `{logical_name}-{stack}-instance-{index}`
pub fn instance_identifier(namer: &Namer, logical_name: &str, index: usize) -> String {
    namer.suffixed(logical_name, &format!("instance-{}", index))
}

/// Describe `count` instances attached to `cluster`.
///
/// Engine and version always follow the parent cluster. Performance
/// insights are on to measure replication impact, and instances are public
/// so the test client can reach them.
pub fn describe(
    namer: &Namer,
    logical_name: &str,
    cluster: &ClusterHandle,
    instance_class: &str,
    count: usize,
) -> Vec<InstanceSpec> {
    (0..count)
        .map(|i| InstanceSpec {
            identifier: instance_identifier(namer, logical_name, i),
            cluster_ref: cluster.cluster_identifier.clone(),
            engine: cluster.engine.clone(),
            engine_version: cluster.engine_version.clone(),
            instance_class: instance_class.to_string(),
            performance_insights_enabled: true,
            publicly_accessible: true,
        })
        .collect()
}

/// Register a fleet of `count` instances. `count == 0` registers nothing.
///
/// Instances are registered in index order. The first engine error stops
/// the fleet: later indices are never attempted, and siblings registered
/// before the failure stay registered with no rollback. The error is
/// returned as is and the partial handles are dropped.
///
/// # Errors
///
/// Returns `ReferenceError` if the cluster is unknown to the engine.
pub fn make_instances(
    engine: &mut dyn Engine,
    namer: &Namer,
    logical_name: &str,
    cluster: &ClusterHandle,
    instance_class: &str,
    count: usize,
) -> Result<Vec<InstanceHandle>> {
    ensure_resolved(engine, cluster)?;

    let specs = describe(namer, logical_name, cluster, instance_class, count);
    let mut handles = Vec::with_capacity(specs.len());

    for spec in specs {
        let identifier = spec.identifier.clone();
        debug!(name = %identifier, cluster = %cluster.name, "registering cluster instance");

        let registered = engine.register(Registration {
            kind: ResourceKind::ClusterInstance,
            name: identifier.clone(),
            spec: ResourceSpec::ClusterInstance(spec),
            depends_on: vec![cluster.name().to_string()],
        })?;

        handles.push(InstanceHandle {
            name: registered.name,
            identifier,
            cluster_identifier: cluster.cluster_identifier.clone(),
        });
    }

    Ok(handles)
}
