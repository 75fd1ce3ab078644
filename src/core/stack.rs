//! Whole-stack assembly.
//!
//! Reads both toggles up front, then runs each assembler against the same
//! engine. The assemblers share no state; either can be off.

use tracing::debug;

use crate::core::compute::{ComputeClient, ComputeClientAssembler};
use crate::core::config::Config;
use crate::core::engine::{Engine, Plan, PlanEngine};
use crate::core::topology::{Topology, TopologyAssembler};
use crate::error::Result;

/// Both feature assemblers, configured for one project and stack.
pub struct Stack {
    topology: TopologyAssembler,
    compute: ComputeClientAssembler,
}

/// What an assembly run produced.
#[derive(Debug, Clone, Default)]
pub struct Assembled {
    pub topology: Option<Topology>,
    pub compute: Option<ComputeClient>,
}

impl Stack {
    /// Build both assemblers from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingToggle` if either toggle is absent, or
    /// `ValidationError` for an empty project or stack name.
    pub fn from_config(config: &Config) -> Result<Self> {
        let namer = config.namer()?;
        let topology = config.topology_settings()?;
        let compute = config.compute_settings()?;

        debug!(
            clusters = topology.toggle.enabled,
            compute = compute.toggle.enabled,
            stack = %namer.stack(),
            "toggles read"
        );

        Ok(Self {
            topology: TopologyAssembler::new(topology, namer.clone()),
            compute: ComputeClientAssembler::new(compute, namer),
        })
    }

    /// Register every enabled feature group with `engine`.
    ///
    /// Both assemblers are validated before the first registration, so a
    /// bad compute setting never leaves a half-built topology behind.
    pub fn assemble(&self, engine: &mut dyn Engine) -> Result<Assembled> {
        self.topology.validate()?;
        self.compute.validate()?;

        let topology = self.topology.assemble(engine)?;
        let compute = self.compute.assemble(engine)?;
        Ok(Assembled { topology, compute })
    }

    /// Assemble against a fresh plan engine and return the plan.
    pub fn plan(&self) -> Result<Plan> {
        let mut engine = PlanEngine::new();
        self.assemble(&mut engine)?;
        Ok(engine.into_plan())
    }
}
