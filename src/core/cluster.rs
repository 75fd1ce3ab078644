//! Database cluster factory.

use serde::Serialize;
use tracing::debug;

use crate::core::config::Policy;
use crate::core::constants::ENGINE_MODE;
use crate::core::engine::{ensure_resolved, Engine, Registration, ResourceSpec};
use crate::core::handle::{
    ClusterHandle, Handle, ParameterGroupHandle, ResourceKind, SecretHandle,
};
use crate::core::naming::Namer;
use crate::error::{Result, ValidationError};

/// Cluster description sent to the engine.
///
/// `storage_encrypted`, `deletion_protection` and `skip_final_snapshot`
/// are test-environment policy: stored data is throwaway and the stack must
/// be destroyable at will.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterSpec {
    pub identifier: String,
    pub cluster_name: String,
    pub parameter_group_ref: String,
    pub engine: String,
    pub engine_mode: String,
    pub engine_version: String,
    pub master_username: String,
    pub master_password_ref: String,
    pub storage_encrypted: bool,
    pub deletion_protection: bool,
    pub skip_final_snapshot: bool,
}

/// Describe a cluster without registering it.
///
/// The same `logical_name` under the same stack always yields the same
/// identifiers, so a re-run is an update in place.
pub fn describe(
    namer: &Namer,
    policy: &Policy,
    logical_name: &str,
    parameter_group: &ParameterGroupHandle,
    secret: &SecretHandle,
) -> Result<ClusterSpec> {
    if logical_name.is_empty() {
        return Err(ValidationError::EmptyIdentifier("cluster").into());
    }

    let cluster_name = namer.name(logical_name);
    Ok(ClusterSpec {
        identifier: cluster_name.clone(),
        cluster_name,
        parameter_group_ref: parameter_group.name.clone(),
        engine: policy.engine.clone(),
        engine_mode: ENGINE_MODE.to_string(),
        engine_version: policy.engine_version.clone(),
        master_username: policy.master_username.clone(),
        master_password_ref: secret.name.clone(),
        storage_encrypted: false,
        deletion_protection: false,
        skip_final_snapshot: true,
    })
}

/// Register a cluster that uses the shared parameter group and secret.
///
/// # Errors
///
/// Returns `ReferenceError` if either handle is unknown to the engine.
pub fn make_cluster(
    engine: &mut dyn Engine,
    namer: &Namer,
    policy: &Policy,
    logical_name: &str,
    parameter_group: &ParameterGroupHandle,
    secret: &SecretHandle,
) -> Result<ClusterHandle> {
    ensure_resolved(engine, parameter_group)?;
    ensure_resolved(engine, secret)?;

    let spec = describe(namer, policy, logical_name, parameter_group, secret)?;
    let handle = ClusterHandle {
        name: namer.suffixed(logical_name, "cluster"),
        cluster_identifier: spec.identifier.clone(),
        engine: spec.engine.clone(),
        engine_version: spec.engine_version.clone(),
    };

    debug!(name = %handle.name, identifier = %handle.cluster_identifier, "registering cluster");

    let registered = engine.register(Registration {
        kind: ResourceKind::Cluster,
        name: handle.name.clone(),
        spec: ResourceSpec::Cluster(spec),
        depends_on: vec![parameter_group.name().to_string(), secret.name().to_string()],
    })?;

    Ok(ClusterHandle {
        name: registered.name,
        ..handle
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::PlanEngine;
    use crate::error::{Error, ReferenceError};

    fn fixtures() -> (Namer, Policy, ParameterGroupHandle, SecretHandle) {
        (
            Namer::new("proj", "dev").unwrap(),
            Policy::default(),
            ParameterGroupHandle {
                name: "repl-dev-parameter-group".to_string(),
                family: "aurora-postgresql12".to_string(),
            },
            SecretHandle::new("proj-dev-master-password", "x".repeat(32)),
        )
    }

    #[test]
    fn test_describe_fixed_policy() {
        let (namer, policy, pg, secret) = fixtures();
        let spec = describe(&namer, &policy, "db-one", &pg, &secret).unwrap();

        assert_eq!(spec.identifier, "db-one-dev");
        assert_eq!(spec.cluster_name, "db-one-dev");
        assert_eq!(spec.engine_mode, "provisioned");
        assert!(!spec.storage_encrypted);
        assert!(!spec.deletion_protection);
        assert!(spec.skip_final_snapshot);
        assert_eq!(spec.parameter_group_ref, pg.name);
        assert_eq!(spec.master_password_ref, secret.name);
    }

    #[test]
    fn test_describe_is_deterministic() {
        let (namer, policy, pg, secret) = fixtures();
        let a = describe(&namer, &policy, "db-one", &pg, &secret).unwrap();
        let b = describe(&namer, &policy, "db-one", &pg, &secret).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_describe_rejects_empty_name() {
        let (namer, policy, pg, secret) = fixtures();
        assert!(describe(&namer, &policy, "", &pg, &secret).is_err());
    }

    #[test]
    fn test_make_cluster_requires_registered_parameter_group() {
        let (namer, policy, pg, secret) = fixtures();
        let mut engine = PlanEngine::new();

        let result = make_cluster(&mut engine, &namer, &policy, "db-one", &pg, &secret);
        assert!(matches!(
            result,
            Err(Error::Reference(ReferenceError::Unresolved {
                kind: ResourceKind::ParameterGroup,
                ..
            }))
        ));
        assert!(engine.plan().resources.is_empty());
    }
}
