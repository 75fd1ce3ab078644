//! Database topology assembler.
//!
//! Two replication clusters sharing one parameter group and one master
//! password, each with its own instance fleet. Registration order is the
//! dependency order:
//!
//! ```text
//! parameter group ─┐
//!                  ├─> cluster one ─> instances one
//! master password ─┤
//!                  └─> cluster two ─> instances two
//! ```

use tracing::info;

use crate::core::cluster::make_cluster;
use crate::core::config::TopologySettings;
use crate::core::constants::{
    limits, outputs, CLUSTER_ONE, CLUSTER_TWO, PARAMETER_GROUP, PARAMETER_GROUP_DESCRIPTION,
};
use crate::core::engine::Engine;
use crate::core::handle::{
    ClusterHandle, InstanceHandle, OutputValue, ParameterGroupHandle, SecretHandle,
};
use crate::core::instances::make_instances;
use crate::core::naming::Namer;
use crate::core::params::{self, ParameterEntry};
use crate::core::secret;
use crate::error::{ConfigError, Result, ValidationError};

/// Handles produced by an enabled topology.
#[derive(Debug, Clone)]
pub struct Topology {
    pub parameter_group: ParameterGroupHandle,
    pub master_password: SecretHandle,
    pub cluster_one: ClusterHandle,
    pub cluster_two: ClusterHandle,
    pub instances_one: Vec<InstanceHandle>,
    pub instances_two: Vec<InstanceHandle>,
}

/// Builds the replication topology when `clusters.enabled` is set.
pub struct TopologyAssembler {
    settings: TopologySettings,
    namer: Namer,
}

impl TopologyAssembler {
    pub fn new(settings: TopologySettings, namer: Namer) -> Self {
        Self { settings, namer }
    }

    /// Check parameters and policy without touching an engine.
    ///
    /// A disabled topology has nothing to check.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a bad parameter, a blank policy name,
    /// or an unusable secret length, and `ConfigError::InvalidValue` for a
    /// replica count above the limit.
    pub fn validate(&self) -> Result<()> {
        if !self.settings.toggle.enabled {
            return Ok(());
        }
        self.checked_entries().map(|_| ())
    }

    fn checked_entries(&self) -> Result<Vec<ParameterEntry>> {
        let policy = &self.settings.policy;
        let entries = params::build(&self.settings.parameters)?;
        for (field, value) in [
            ("policy.family", &policy.family),
            ("policy.engine", &policy.engine),
            ("policy.engine_version", &policy.engine_version),
            ("policy.instance_class", &policy.instance_class),
            ("policy.master_username", &policy.master_username),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::EmptyIdentifier(field).into());
            }
        }
        if policy.secret_length == 0 || policy.secret_length > limits::MAX_SECRET_LENGTH {
            return Err(ValidationError::InvalidSecretLength {
                identifier: self.namer.project_scoped("master-password"),
                length: policy.secret_length,
            }
            .into());
        }
        if policy.replicas_per_cluster > limits::MAX_REPLICAS_PER_CLUSTER {
            return Err(ConfigError::InvalidValue {
                field: "policy.replicas_per_cluster",
                reason: format!(
                    "{} exceeds the limit of {}",
                    policy.replicas_per_cluster,
                    limits::MAX_REPLICAS_PER_CLUSTER
                ),
            }
            .into());
        }
        Ok(entries)
    }

    /// Register the whole topology and export its six outputs.
    ///
    /// Returns `None` without touching the engine when the toggle is off.
    ///
    /// # Errors
    ///
    /// Everything `validate` checks is checked again before the first
    /// registration. Engine errors are returned unchanged; resources
    /// registered before the failure stay registered.
    pub fn assemble(&self, engine: &mut dyn Engine) -> Result<Option<Topology>> {
        if !self.settings.toggle.enabled {
            info!(toggle = self.settings.toggle.key, "database topology disabled");
            return Ok(None);
        }

        let policy = &self.settings.policy;
        let entries = self.checked_entries()?;

        let parameter_group = params::register_group(
            engine,
            params::group_spec(
                &self.namer,
                PARAMETER_GROUP,
                &policy.family,
                PARAMETER_GROUP_DESCRIPTION,
                entries,
            ),
        )?;

        let master_password = secret::provision(
            engine,
            &self.namer.project_scoped("master-password"),
            policy.secret_length,
            policy.secret_special,
        )?;

        let cluster_one = make_cluster(
            engine,
            &self.namer,
            policy,
            CLUSTER_ONE,
            &parameter_group,
            &master_password,
        )?;
        let cluster_two = make_cluster(
            engine,
            &self.namer,
            policy,
            CLUSTER_TWO,
            &parameter_group,
            &master_password,
        )?;

        let instances_one = make_instances(
            engine,
            &self.namer,
            CLUSTER_ONE,
            &cluster_one,
            &policy.instance_class,
            policy.replicas_per_cluster,
        )?;
        let instances_two = make_instances(
            engine,
            &self.namer,
            CLUSTER_TWO,
            &cluster_two,
            &policy.instance_class,
            policy.replicas_per_cluster,
        )?;

        let topology = Topology {
            parameter_group,
            master_password,
            cluster_one,
            cluster_two,
            instances_one,
            instances_two,
        };
        topology.export(engine)?;

        info!(
            stack = %self.namer.stack(),
            instances = topology.instances_one.len() + topology.instances_two.len(),
            "database topology assembled"
        );
        Ok(Some(topology))
    }
}

impl Topology {
    fn export(&self, engine: &mut dyn Engine) -> Result<()> {
        engine.export(outputs::CLUSTER_ONE, OutputValue::Cluster(self.cluster_one.clone()))?;
        engine.export(outputs::CLUSTER_TWO, OutputValue::Cluster(self.cluster_two.clone()))?;
        engine.export(
            outputs::INSTANCES_ONE,
            OutputValue::Instances(self.instances_one.clone()),
        )?;
        engine.export(
            outputs::INSTANCES_TWO,
            OutputValue::Instances(self.instances_two.clone()),
        )?;
        engine.export(
            outputs::CLUSTER_PARAMETER_GROUP,
            OutputValue::ParameterGroup(self.parameter_group.clone()),
        )?;
        engine.export(
            outputs::MASTER_PASSWORD,
            OutputValue::Secret(self.master_password.clone()),
        )?;
        Ok(())
    }
}
