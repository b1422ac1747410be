use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::group::GeomGroup;

static EMPTY_LIBRARY: Library = Library {
    structures: BTreeMap::new(),
};

/// Named structures that `SRef` / `ARef` records point to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Library {
    structures: BTreeMap<String, GeomGroup>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// A shared library with no structures.
    pub fn empty() -> &'static Library {
        &EMPTY_LIBRARY
    }

    /// Insert or replace a structure, returning the previous definition.
    pub fn insert(&mut self, name: &str, group: GeomGroup) -> Option<GeomGroup> {
        self.structures.insert(name.to_string(), group)
    }

    pub fn get(&self, name: &str) -> Option<&GeomGroup> {
        self.structures.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.structures.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.structures.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    // ── Serialization ────────────────────────────────────────────────

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
