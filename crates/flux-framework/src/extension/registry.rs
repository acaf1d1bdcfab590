//! Extension registry bookkeeping.
//!
//! Pure map from extension name to its loaded module handle; no I/O, no
//! locking. Invariant: a name is present iff its `setup` completed without
//! error and no unload (or failed-reload cleanup) has since removed it.
//! The [`ExtensionLoader`](super::loader::ExtensionLoader) is the only
//! writer.

use std::collections::HashMap;

use super::module::ModuleHandle;

/// One loaded extension.
#[derive(Debug, Clone)]
pub struct LoadedExtension {
    /// Canonical extension name.
    pub name: String,
    /// The executed module, exclusively owned by the registry.
    pub handle: ModuleHandle,
}

/// Mapping from extension name to loaded extension.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    entries: HashMap<String, LoadedExtension>,
}

impl ModuleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a loaded extension under its canonical name.
    pub fn insert(&mut self, handle: ModuleHandle) {
        let name = handle.name.clone();
        self.entries.insert(name.clone(), LoadedExtension { name, handle });
    }

    /// Removes and returns the named extension.
    pub fn remove(&mut self, name: &str) -> Option<LoadedExtension> {
        self.entries.remove(name)
    }

    /// Whether the named extension is loaded.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Looks up a loaded extension.
    pub fn get(&self, name: &str) -> Option<&LoadedExtension> {
        self.entries.get(name)
    }

    /// Names of all loaded extensions, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of loaded extensions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no extensions are loaded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
