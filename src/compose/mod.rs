//! Loaded Docker Compose projects
//!
//! This module holds the input side of the translation: a compose project
//! as produced by an upstream loader, and decoding of such documents.

pub mod config;
pub mod parser;

pub use config::{Project, ServiceConfig};
pub use parser::ProjectParser;
