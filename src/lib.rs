//! Komposer - compose projects to an intermediate service model
//!
//! Komposer takes a Docker Compose project that has already been loaded
//! and translates it into orchestrator-agnostic service records, ready
//! for a manifest generator. Translation covers:
//!
//! - Ports, `expose` entries and volume specs
//! - Deploy resources, replicas, restart and placement policies
//! - Liveness and readiness checks
//! - `kompose.*` label directives (service type, exposure, node ports)

pub mod compose;
pub mod error;
pub mod model;
pub mod translate;

pub use error::{KomposerError, Result};
