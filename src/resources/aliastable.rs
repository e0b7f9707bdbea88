//! Alternate frame names.
//!
//! The [`AliasTable`] maps an alias to a canonical frame name. It is only
//! consulted after a miss on the primary frame map, and resolution is a single
//! hop: an alias pointing at another alias resolves to nothing.

use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    map: FxHashMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `alias` to `target`, replacing any previous target.
    pub fn insert(&mut self, alias: impl Into<String>, target: impl Into<String>) {
        self.map.insert(alias.into(), target.into());
    }

    /// Canonical name `alias` points at, if any.
    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.map.get(alias).map(String::as_str)
    }

    pub fn remove(&mut self, alias: &str) -> Option<String> {
        self.map.remove(alias)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.map.contains_key(alias)
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
