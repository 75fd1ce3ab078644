//! Core library components.
//!
//! Naming, resource factories, the two feature assemblers, configuration,
//! and the engine interface they register resources through.

pub mod cluster;
pub mod compute;
pub mod config;
pub mod constants;
pub mod engine;
pub mod handle;
pub mod instances;
pub mod naming;
pub mod params;
pub mod secret;
pub mod stack;
pub mod topology;
