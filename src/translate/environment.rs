//! Environment collection

use crate::model::EnvVar;
use std::collections::HashMap;

/// Source of values for variables declared without one
pub trait EnvLookup {
    /// Value of `name`, if set
    fn lookup(&self, name: &str) -> Option<String>;
}

/// Reads the environment of the current process
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvLookup for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Resolve a service's environment bindings, sorted by name
///
/// A variable declared without a value takes its value from `env`, and is
/// left out entirely when `env` has none.
pub fn collect_environment(
    environment: &HashMap<String, Option<String>>,
    env: &dyn EnvLookup,
) -> Vec<EnvVar> {
    let mut vars: Vec<EnvVar> = environment
        .iter()
        .filter_map(|(name, value)| {
            let value = match value {
                Some(value) => value.clone(),
                None => env.lookup(name)?,
            };
            Some(EnvVar {
                name: name.clone(),
                value,
            })
        })
        .collect();

    vars.sort_by(|a, b| a.name.cmp(&b.name));
    vars
}
