//! repl-topology - Test topology for cross-cluster logical replication.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── init          # Write a default topology.toml
//! │   ├── check         # Validate config and toggles
//! │   ├── plan          # Plan, outputs, teardown views
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── config        # topology.toml management
//!     ├── naming        # Stack-scoped resource names
//!     ├── params        # Parameter sets and the shared parameter group
//!     ├── secret        # Shared master password
//!     ├── cluster       # Cluster factory
//!     ├── instances     # Instance fleets
//!     ├── topology      # Database topology assembler
//!     ├── compute       # Compute client assembler
//!     ├── stack         # Runs both assemblers
//!     ├── handle        # Typed resource handles
//!     └── engine/       # Provisioning engine interface
//!         ├── mod       # Engine trait
//!         └── plan      # In-process plan engine
//! ```
//!
//! # Features
//!
//! - Two clusters sharing a pglogical-ready parameter group
//! - Deterministic, stack-scoped identifiers
//! - Independently toggled database topology and compute client
//! - Dependency-ordered registration and safe teardown order

pub mod cli;
pub mod core;
pub mod error;

pub use crate::core::config::Config;
pub use crate::core::engine::{Engine, Plan, PlanEngine};
pub use crate::core::stack::Stack;
pub use crate::error::{Error, Result};
