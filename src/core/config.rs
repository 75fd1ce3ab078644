//! Configuration file management.
//!
//! Handles reading, writing, and validating `topology.toml`. Toggles are
//! read once here and handed to each assembler as explicit settings.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::core::constants::{self, defaults, limits};
use crate::core::naming::Namer;
use crate::error::{ConfigError, Result};

/// Topology configuration stored in `topology.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub project: ProjectConfig,
    #[serde(default)]
    pub clusters: ClustersConfig,
    #[serde(default)]
    pub compute: ComputeConfig,
    #[serde(default)]
    pub policy: Policy,
    /// Engine parameters for the shared parameter group, in apply order.
    ///
    /// Empty means the built-in replication parameter set.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterConfig>,
}

/// Project identity section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name, used for project-wide resources such as the secret
    pub name: String,
    /// Deployment stack (dev, staging, ...) embedded in every identifier
    pub stack: String,
}

/// `[clusters]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClustersConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// `[compute]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComputeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// OpenSSH public key registered as the client's access credential
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
}

/// One `[[parameters]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterConfig {
    pub name: String,
    pub value: String,
}

/// Fixed policy values. Every field falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    pub family: String,
    pub engine: String,
    pub engine_version: String,
    pub instance_class: String,
    pub master_username: String,
    pub replicas_per_cluster: usize,
    pub secret_length: usize,
    pub secret_special: bool,
    pub ami: String,
    pub instance_type: String,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            family: defaults::FAMILY.to_string(),
            engine: defaults::ENGINE.to_string(),
            engine_version: defaults::ENGINE_VERSION.to_string(),
            instance_class: defaults::INSTANCE_CLASS.to_string(),
            master_username: defaults::MASTER_USERNAME.to_string(),
            replicas_per_cluster: defaults::REPLICAS_PER_CLUSTER,
            secret_length: defaults::SECRET_LENGTH,
            secret_special: defaults::SECRET_SPECIAL,
            ami: defaults::AMI.to_string(),
            instance_type: defaults::INSTANCE_TYPE.to_string(),
        }
    }
}

impl Policy {
    /// Reject empty names and out-of-range counts.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` for a blank string value and
    /// `ConfigError::InvalidValue` for a count outside its limit.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("policy.family", &self.family),
            ("policy.engine", &self.engine),
            ("policy.engine_version", &self.engine_version),
            ("policy.instance_class", &self.instance_class),
            ("policy.master_username", &self.master_username),
            ("policy.ami", &self.ami),
            ("policy.instance_type", &self.instance_type),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField { field }.into());
            }
        }

        if self.replicas_per_cluster > limits::MAX_REPLICAS_PER_CLUSTER {
            return Err(ConfigError::InvalidValue {
                field: "policy.replicas_per_cluster",
                reason: format!(
                    "{} exceeds the limit of {}",
                    self.replicas_per_cluster,
                    limits::MAX_REPLICAS_PER_CLUSTER
                ),
            }
            .into());
        }

        if self.secret_length == 0 || self.secret_length > limits::MAX_SECRET_LENGTH {
            return Err(ConfigError::InvalidValue {
                field: "policy.secret_length",
                reason: format!(
                    "{} is outside 1..={}",
                    self.secret_length,
                    limits::MAX_SECRET_LENGTH
                ),
            }
            .into());
        }

        Ok(())
    }
}

/// A feature toggle after it has been read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureToggle {
    pub key: &'static str,
    pub enabled: bool,
}

impl FeatureToggle {
    pub fn new(key: &'static str, enabled: bool) -> Self {
        Self { key, enabled }
    }
}

/// Everything the database topology assembler needs.
#[derive(Debug, Clone)]
pub struct TopologySettings {
    pub toggle: FeatureToggle,
    pub policy: Policy,
    pub parameters: Vec<(String, String)>,
}

/// Everything the compute client assembler needs.
#[derive(Debug, Clone)]
pub struct ComputeSettings {
    pub toggle: FeatureToggle,
    pub public_key: String,
    pub ami: String,
    pub instance_type: String,
}

impl Config {
    /// Default configuration for a new project: clusters on, compute off.
    pub fn new(project: impl Into<String>, stack: impl Into<String>) -> Self {
        Self {
            project: ProjectConfig {
                name: project.into(),
                stack: stack.into(),
            },
            clusters: ClustersConfig {
                enabled: Some(true),
            },
            compute: ComputeConfig {
                enabled: Some(false),
                public_key: None,
            },
            policy: Policy::default(),
            parameters: defaults::REPLICATION_PARAMETERS
                .iter()
                .map(|(name, value)| ParameterConfig {
                    name: name.to_string(),
                    value: value.to_string(),
                })
                .collect(),
        }
    }

    /// Parse configuration from TOML text and validate it.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file doesn't exist,
    /// `ConfigError::Parse` if the TOML is malformed, or a validation error.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");

        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()).into());
        }
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config = Self::parse(&contents)?;

        debug!(
            project = %config.project.name,
            stack = %config.project.stack,
            parameters = config.parameters.len(),
            "config loaded"
        );

        Ok(config)
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::AlreadyExists` if the file exists and `force` is
    /// false, or an error if serialization or the write fails.
    pub fn save(&self, path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            return Err(ConfigError::AlreadyExists(path.display().to_string()).into());
        }
        debug!(path = %path.display(), "saving config");

        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Replace the stack, e.g. from `--stack`.
    pub fn with_stack(mut self, stack: Option<String>) -> Self {
        if let Some(stack) = stack {
            debug!(stack = %stack, "stack overridden");
            self.project.stack = stack;
        }
        self
    }

    /// Validate the configuration structure and contents
    ///
    /// Checks:
    /// - Project name and stack are non-empty
    /// - Both toggles are present (absence is an error, never `false`)
    /// - Compute has a public key when enabled
    /// - Policy names are non-empty and counts are within limits
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        debug!("validating config");

        if self.project.name.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "project.name",
            }
            .into());
        }
        if self.project.stack.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "project.stack",
            }
            .into());
        }

        self.clusters_toggle()?;
        let compute = self.compute_toggle()?;

        if compute.enabled {
            let key = self.compute.public_key.as_deref().unwrap_or_default();
            validate_public_key(key)?;
        }

        self.policy.validate()?;

        Ok(())
    }

    /// `clusters.enabled`
    pub fn clusters_toggle(&self) -> Result<FeatureToggle> {
        self.clusters
            .enabled
            .map(|enabled| FeatureToggle::new(constants::CLUSTERS_TOGGLE, enabled))
            .ok_or_else(|| ConfigError::MissingToggle(constants::CLUSTERS_TOGGLE).into())
    }

    /// `compute.enabled`
    pub fn compute_toggle(&self) -> Result<FeatureToggle> {
        self.compute
            .enabled
            .map(|enabled| FeatureToggle::new(constants::COMPUTE_TOGGLE, enabled))
            .ok_or_else(|| ConfigError::MissingToggle(constants::COMPUTE_TOGGLE).into())
    }

    /// Naming context for this project and stack.
    pub fn namer(&self) -> Result<Namer> {
        Namer::new(&self.project.name, &self.project.stack)
    }

    /// Parameter pairs in file order, or the built-in replication set.
    pub fn parameter_pairs(&self) -> Vec<(String, String)> {
        if self.parameters.is_empty() {
            defaults::REPLICATION_PARAMETERS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        } else {
            self.parameters
                .iter()
                .map(|p| (p.name.clone(), p.value.clone()))
                .collect()
        }
    }

    pub fn topology_settings(&self) -> Result<TopologySettings> {
        Ok(TopologySettings {
            toggle: self.clusters_toggle()?,
            policy: self.policy.clone(),
            parameters: self.parameter_pairs(),
        })
    }

    pub fn compute_settings(&self) -> Result<ComputeSettings> {
        Ok(ComputeSettings {
            toggle: self.compute_toggle()?,
            public_key: self.compute.public_key.clone().unwrap_or_default(),
            ami: self.policy.ami.clone(),
            instance_type: self.policy.instance_type.clone(),
        })
    }
}

/// Check that `key` looks like an OpenSSH public key (`<type> <base64> [comment]`).
pub fn validate_public_key(key: &str) -> Result<()> {
    let mut parts = key.split_whitespace();
    let (Some(kind), Some(body)) = (parts.next(), parts.next()) else {
        return Err(ConfigError::MissingField {
            field: "compute.public_key",
        }
        .into());
    };

    if !(kind.starts_with("ssh-") || kind.starts_with("ecdsa-")) || body.len() < 16 {
        return Err(ConfigError::InvalidValue {
            field: "compute.public_key",
            reason: format!("not an OpenSSH public key: {}", kind),
        }
        .into());
    }

    Ok(())
}
