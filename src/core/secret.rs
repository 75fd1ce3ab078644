//! Shared master password.
//!
//! The engine generates the value once. Both clusters reference the same
//! handle so they share one master credential.

use serde::Serialize;
use tracing::debug;

use crate::core::constants::limits;
use crate::core::engine::{Engine, Registration, ResourceSpec, SECRET_RESULT};
use crate::core::handle::{ResourceKind, SecretHandle};
use crate::error::{EngineError, Result, ValidationError};

/// Secret generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretSpec {
    pub identifier: String,
    pub length: usize,
    pub allow_special_chars: bool,
}

/// Ask the engine for a generated secret.
///
/// # Errors
///
/// Returns `ValidationError` for an empty identifier or a length outside
/// `1..=MAX_SECRET_LENGTH`.
/// Engine errors are returned unchanged.
pub fn provision(
    engine: &mut dyn Engine,
    identifier: &str,
    length: usize,
    allow_special: bool,
) -> Result<SecretHandle> {
    if identifier.is_empty() {
        return Err(ValidationError::EmptyIdentifier("secret").into());
    }
    if length == 0 || length > limits::MAX_SECRET_LENGTH {
        return Err(ValidationError::InvalidSecretLength {
            identifier: identifier.to_string(),
            length,
        }
        .into());
    }

    debug!(name = %identifier, length, allow_special, "provisioning secret");

    let registered = engine.register(Registration {
        kind: ResourceKind::Secret,
        name: identifier.to_string(),
        spec: ResourceSpec::Secret(SecretSpec {
            identifier: identifier.to_string(),
            length,
            allow_special_chars: allow_special,
        }),
        depends_on: Vec::new(),
    })?;

    let value = registered
        .outputs
        .get(SECRET_RESULT)
        .cloned()
        .ok_or_else(|| EngineError::Rejected {
            kind: ResourceKind::Secret,
            name: identifier.to_string(),
            reason: "engine returned no secret value".to_string(),
        })?;

    Ok(SecretHandle::new(registered.name, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::PlanEngine;

    #[test]
    fn test_provision_registers_once() {
        let mut engine = PlanEngine::new();
        let secret = provision(&mut engine, "proj-dev-master-password", 32, false).unwrap();

        assert_eq!(secret.name, "proj-dev-master-password");
        assert_eq!(secret.expose().len(), 32);
        assert!(secret.expose().chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(engine.plan().count(ResourceKind::Secret), 1);
    }

    #[test]
    fn test_provision_rejects_zero_length() {
        let mut engine = PlanEngine::new();
        assert!(provision(&mut engine, "pw", 0, false).is_err());
        assert!(engine.plan().resources.is_empty());
    }

    #[test]
    fn test_provision_surfaces_engine_error() {
        let mut engine = PlanEngine::new();
        provision(&mut engine, "pw", 16, false).unwrap();
        let result = provision(&mut engine, "pw", 16, false);
        assert!(matches!(
            result,
            Err(crate::error::Error::Engine(EngineError::Collision { .. }))
        ));
    }

    #[test]
    fn test_provision_rejects_oversized_length() {
        let mut engine = PlanEngine::new();
        let result = provision(&mut engine, "proj-dev-master-password", usize::MAX, false);

        assert!(matches!(
            result,
            Err(crate::error::Error::Validation(ValidationError::InvalidSecretLength { .. }))
        ));
        assert!(engine.plan().resources.is_empty());
    }
}
