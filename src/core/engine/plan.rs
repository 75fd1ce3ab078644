//! In-process plan engine.
//!
//! Records registrations in order and checks them the way a real engine
//! would: names are unique, dependencies must already be registered. The
//! result is a [`Plan`] that can be printed, diffed, or fed to an apply
//! step.

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use super::{Engine, Registered, Registration, ResourceSpec, ID, SECRET_RESULT};
use crate::core::handle::{OutputValue, ResourceKind};
use crate::error::{EngineError, Result};

const SPECIAL_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!#$%&*()-_=+[]{}<>:?";

/// A resource recorded in a plan.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedResource {
    pub kind: ResourceKind,
    pub name: String,
    pub spec: ResourceSpec,
    pub depends_on: Vec<String>,
}

/// Registered resources and exported outputs, in registration order.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub resources: Vec<PlannedResource>,
    pub outputs: BTreeMap<String, OutputValue>,
    index: HashMap<String, usize>,
}

impl Plan {
    /// Find a resource by name.
    pub fn get(&self, name: &str) -> Option<&PlannedResource> {
        self.index.get(name).map(|&i| &self.resources[i])
    }

    /// Number of resources of a kind.
    pub fn count(&self, kind: ResourceKind) -> usize {
        self.resources.iter().filter(|r| r.kind == kind).count()
    }

    /// Resources of a kind, in registration order.
    pub fn of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &PlannedResource> {
        self.resources.iter().filter(move |r| r.kind == kind)
    }

    /// Look up an exported output.
    pub fn output(&self, name: &str) -> Option<&OutputValue> {
        self.outputs.get(name)
    }

    /// Safe deletion order: a resource comes before everything it depends on.
    ///
    /// Among resources that are free to go, instances go first, then
    /// clusters, then the shared credentials and parameter group.
    pub fn teardown_order(&self) -> Vec<&PlannedResource> {
        let n = self.resources.len();
        let mut dependents = vec![0usize; n];
        for resource in &self.resources {
            for dep in &resource.depends_on {
                if let Some(&i) = self.index.get(dep) {
                    dependents[i] += 1;
                }
            }
        }

        let mut deleted = vec![false; n];
        let mut order = Vec::with_capacity(n);
        while order.len() < n {
            let next = (0..n)
                .filter(|&i| !deleted[i] && dependents[i] == 0)
                .min_by_key(|&i| (self.resources[i].kind.teardown_priority(), Reverse(i)));

            let Some(i) = next else {
                // Unreachable: dependencies always precede dependents
                warn!("dependency cycle in plan, teardown order is incomplete");
                break;
            };

            deleted[i] = true;
            for dep in &self.resources[i].depends_on {
                if let Some(&j) = self.index.get(dep) {
                    dependents[j] -= 1;
                }
            }
            order.push(&self.resources[i]);
        }

        order
    }

    /// JSON rendering of resources and outputs.
    pub fn to_json(&self, reveal_secrets: bool) -> serde_json::Value {
        let outputs: serde_json::Map<String, serde_json::Value> = self
            .outputs
            .iter()
            .map(|(k, v)| (k.clone(), v.render(reveal_secrets)))
            .collect();

        serde_json::json!({
            "resources": self.resources,
            "outputs": outputs,
        })
    }

    fn push(&mut self, resource: PlannedResource) {
        self.index.insert(resource.name.clone(), self.resources.len());
        self.resources.push(resource);
    }
}

/// Engine that records a plan instead of calling a cloud API.
#[derive(Debug, Default)]
pub struct PlanEngine {
    plan: Plan,
    rejected: HashMap<ResourceKind, String>,
}

impl PlanEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse every registration of `kind` with `reason`.
    ///
    /// Stands in for provider-side failures such as quota limits.
    pub fn reject(mut self, kind: ResourceKind, reason: impl Into<String>) -> Self {
        self.rejected.insert(kind, reason.into());
        self
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn into_plan(self) -> Plan {
        self.plan
    }
}

impl Engine for PlanEngine {
    fn register(&mut self, registration: Registration) -> Result<Registered> {
        let Registration {
            kind,
            name,
            spec,
            depends_on,
        } = registration;

        if let Some(reason) = self.rejected.get(&kind) {
            return Err(EngineError::Rejected {
                kind,
                name,
                reason: reason.clone(),
            }
            .into());
        }

        if self.plan.index.contains_key(&name) {
            return Err(EngineError::Collision { kind, name }.into());
        }

        if let Some(missing) = depends_on.iter().find(|d| !self.plan.index.contains_key(*d)) {
            return Err(EngineError::UnknownDependency {
                kind,
                name,
                dependency: missing.clone(),
            }
            .into());
        }

        let mut outputs = BTreeMap::new();
        outputs.insert(ID.to_string(), spec.identifier().to_string());
        if let ResourceSpec::Secret(secret) = &spec {
            outputs.insert(
                SECRET_RESULT.to_string(),
                generate_secret(secret.length, secret.allow_special_chars),
            );
        }

        debug!(kind = %kind, name = %name, deps = depends_on.len(), "planned");

        self.plan.push(PlannedResource {
            kind,
            name: name.clone(),
            spec,
            depends_on,
        });

        Ok(Registered { name, outputs })
    }

    fn resolve(&self, kind: ResourceKind, name: &str) -> bool {
        self.plan.get(name).is_some_and(|r| r.kind == kind)
    }

    fn export(&mut self, name: &str, value: OutputValue) -> Result<()> {
        if self.plan.outputs.contains_key(name) {
            return Err(EngineError::DuplicateOutput(name.to_string()).into());
        }
        debug!(output = %name, "exported");
        self.plan.outputs.insert(name.to_string(), value);
        Ok(())
    }
}

fn generate_secret(length: usize, allow_special: bool) -> String {
    let mut rng = rand::thread_rng();
    if allow_special {
        (0..length)
            .map(|_| SPECIAL_CHARSET[rng.gen_range(0..SPECIAL_CHARSET.len())] as char)
            .collect()
    } else {
        (0..length).map(|_| rng.sample(Alphanumeric) as char).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::handle::SecretHandle;
    use crate::core::secret::SecretSpec;
    use crate::error::Error;

    fn secret(name: &str) -> Registration {
        Registration {
            kind: ResourceKind::Secret,
            name: name.to_string(),
            spec: ResourceSpec::Secret(SecretSpec {
                identifier: name.to_string(),
                length: 24,
                allow_special_chars: true,
            }),
            depends_on: Vec::new(),
        }
    }

    #[test]
    fn test_register_generates_secret() {
        let mut engine = PlanEngine::new();
        let registered = engine.register(secret("pw")).unwrap();

        assert_eq!(registered.outputs[SECRET_RESULT].len(), 24);
        assert_eq!(registered.outputs[ID], "pw");
        assert!(engine.resolve(ResourceKind::Secret, "pw"));
        assert!(!engine.resolve(ResourceKind::Cluster, "pw"));
    }

    #[test]
    fn test_register_unknown_dependency() {
        let mut engine = PlanEngine::new();
        let mut registration = secret("pw");
        registration.depends_on.push("missing".to_string());

        let result = engine.register(registration);
        assert!(matches!(
            result,
            Err(Error::Engine(EngineError::UnknownDependency { .. }))
        ));
        assert!(engine.plan().resources.is_empty());
    }

    #[test]
    fn test_register_rejected_kind() {
        let mut engine = PlanEngine::new().reject(ResourceKind::Secret, "quota exceeded");
        let err = engine.register(secret("pw")).unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn test_export_twice_fails() {
        let mut engine = PlanEngine::new();
        let value = OutputValue::Secret(SecretHandle::new("pw", "x".to_string()));
        engine.export("master_password", value.clone()).unwrap();
        assert!(engine.export("master_password", value).is_err());
    }

    #[test]
    fn test_teardown_reverses_dependencies() {
        let mut engine = PlanEngine::new();
        engine.register(secret("a")).unwrap();
        let mut b = secret("b");
        b.depends_on.push("a".to_string());
        engine.register(b).unwrap();

        let order: Vec<&str> = engine
            .plan()
            .teardown_order()
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(order, vec!["b", "a"]);
    }

    #[test]
    fn test_generate_secret_alphanumeric() {
        let value = generate_secret(64, false);
        assert_eq!(value.len(), 64);
        assert!(value.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
