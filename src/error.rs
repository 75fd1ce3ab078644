//! Error types.
//!
//! Configuration and validation problems are detected before the first
//! resource is registered. Engine errors are passed through untouched.

use thiserror::Error;

use crate::core::handle::ResourceKind;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Problems with the topology configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config not found: {0}")]
    NotFound(String),

    #[error("config already exists: {0} (use --force to overwrite)")]
    AlreadyExists(String),

    #[error("missing toggle: {0}")]
    MissingToggle(&'static str),

    #[error("missing field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Malformed identifiers or parameter entries.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("empty identifier: {0}")]
    EmptyIdentifier(&'static str),

    #[error("parameter name cannot be empty")]
    EmptyParameterName,

    #[error("duplicate parameter: {0}")]
    DuplicateParameter(String),

    #[error("invalid value for parameter {name}: {reason}")]
    InvalidParameterValue { name: String, reason: String },

    #[error("invalid length for {identifier}: {length}")]
    InvalidSecretLength { identifier: String, length: usize },
}

/// A handle that the engine does not know about.
#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("unresolved {kind} reference: {name}")]
    Unresolved { kind: ResourceKind, name: String },
}

/// Failures reported by the provisioning engine.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{kind} {name} depends on unknown resource {dependency}")]
    UnknownDependency {
        kind: ResourceKind,
        name: String,
        dependency: String,
    },

    #[error("{kind} name already registered: {name}")]
    Collision { kind: ResourceKind, name: String },

    #[error("output already exported: {0}")]
    DuplicateOutput(String),

    #[error("{kind} {name} rejected: {reason}")]
    Rejected {
        kind: ResourceKind,
        name: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
