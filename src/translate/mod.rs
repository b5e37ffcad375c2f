//! Compose to intermediate model translation
//!
//! Each submodule handles one family of compose fields; [`mapper`] drives
//! them per service in a fixed order.

pub mod environment;
pub mod healthcheck;
pub mod labels;
pub mod mapper;
pub mod network;
pub mod placement;
pub mod ports;
pub mod resources;
pub mod unsupported;
pub mod volumes;

pub use environment::{EnvLookup, ProcessEnv};
pub use mapper::{translate_project, ComposeMapper};
pub use unsupported::unsupported_features;
