//! Compute client assembler.
//!
//! An externally reachable machine used to drive and observe replication.
//! Toggled independently of the database topology and shares nothing with
//! it.

use serde::Serialize;
use tracing::{debug, info};

use crate::core::config::ComputeSettings;
use crate::core::constants::{outputs, COMPUTE_CLIENT};
use crate::core::engine::{Engine, Registration, ResourceSpec};
use crate::core::handle::{
    ComputeInstanceHandle, Handle, KeyPairHandle, OutputValue, ResourceKind,
};
use crate::core::naming::Namer;
use crate::error::{Result, ValidationError};

/// Access credential description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyPairSpec {
    pub key_name: String,
    pub public_key: String,
}

/// Compute node description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComputeInstanceSpec {
    pub name: String,
    pub ami: String,
    pub instance_type: String,
    pub key_ref: String,
    pub public_ip: bool,
}

/// Key pair plus the instance that uses it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComputeClientSpec {
    pub key_pair: KeyPairSpec,
    pub instance: ComputeInstanceSpec,
}

/// Handles exported by an enabled compute client.
#[derive(Debug, Clone)]
pub struct ComputeClient {
    pub key_pair: KeyPairHandle,
    pub instance: ComputeInstanceHandle,
}

/// Describe the compute client without registering it.
pub fn describe(namer: &Namer, settings: &ComputeSettings) -> ComputeClientSpec {
    let key_name = namer.safe(COMPUTE_CLIENT, "key");
    ComputeClientSpec {
        key_pair: KeyPairSpec {
            key_name: key_name.clone(),
            public_key: settings.public_key.clone(),
        },
        instance: ComputeInstanceSpec {
            name: namer.suffixed(COMPUTE_CLIENT, "instance"),
            ami: settings.ami.clone(),
            instance_type: settings.instance_type.clone(),
            key_ref: key_name,
            public_ip: true,
        },
    }
}

/// Builds the compute client when `compute.enabled` is set.
pub struct ComputeClientAssembler {
    settings: ComputeSettings,
    namer: Namer,
}

impl ComputeClientAssembler {
    pub fn new(settings: ComputeSettings, namer: Namer) -> Self {
        Self { settings, namer }
    }

    /// Check the key and image settings without touching an engine.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyIdentifier` for a blank public key,
    /// AMI, or instance type while the toggle is on.
    pub fn validate(&self) -> Result<()> {
        if !self.settings.toggle.enabled {
            return Ok(());
        }
        for (field, value) in [
            ("compute.public_key", &self.settings.public_key),
            ("policy.ami", &self.settings.ami),
            ("policy.instance_type", &self.settings.instance_type),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::EmptyIdentifier(field).into());
            }
        }
        Ok(())
    }

    /// Register the key pair and instance, then export both.
    ///
    /// Returns `None` without touching the engine when the toggle is off.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` before any registration if `validate`
    /// fails. Engine errors are returned unchanged.
    pub fn assemble(&self, engine: &mut dyn Engine) -> Result<Option<ComputeClient>> {
        if !self.settings.toggle.enabled {
            info!(toggle = self.settings.toggle.key, "compute client disabled");
            return Ok(None);
        }
        self.validate()?;

        let spec = describe(&self.namer, &self.settings);

        debug!(name = %spec.key_pair.key_name, "registering key pair");
        let key_name = spec.key_pair.key_name.clone();
        let registered = engine.register(Registration {
            kind: ResourceKind::KeyPair,
            name: key_name.clone(),
            spec: ResourceSpec::KeyPair(spec.key_pair),
            depends_on: Vec::new(),
        })?;
        let key_pair = KeyPairHandle {
            name: registered.name,
            key_name,
        };

        debug!(name = %spec.instance.name, "registering compute instance");
        let public_ip = spec.instance.public_ip;
        let registered = engine.register(Registration {
            kind: ResourceKind::ComputeInstance,
            name: spec.instance.name.clone(),
            spec: ResourceSpec::ComputeInstance(spec.instance),
            depends_on: vec![key_pair.name().to_string()],
        })?;
        let instance = ComputeInstanceHandle {
            name: registered.name,
            key_name: key_pair.key_name.clone(),
            public_ip,
        };

        engine.export(outputs::COMPUTE_KEY_PAIR, OutputValue::KeyPair(key_pair.clone()))?;
        engine.export(
            outputs::COMPUTE_INSTANCE,
            OutputValue::ComputeInstance(instance.clone()),
        )?;

        info!(instance = %instance.name, "compute client assembled");
        Ok(Some(ComputeClient { key_pair, instance }))
    }
}
