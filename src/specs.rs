//! Named chart-spec registry.
//!
//! `%VEGA_LITE SET <name>` stores a parsed JSON spec here; `%VEGA_LITE
//! <name>` consults the registry before falling back to the filesystem.
//! Entries live for the interpreter's lifetime and the last write wins.

use std::collections::HashMap;

use serde_json::Value;

#[derive(Debug, Default)]
pub struct SpecStore {
    specs: HashMap<String, Value>,
}

impl SpecStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a spec under `name`, replacing any previous value.
    pub fn set(&mut self, name: &str, spec: Value) {
        self.specs.insert(name.to_string(), spec);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.specs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
