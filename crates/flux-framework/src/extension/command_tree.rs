//! Command tree adapter.
//!
//! The command tree owns the commands extensions register. The loader only
//! needs one hook from it: dropping every command owned by a module when that
//! module goes away. Removal must be idempotent: the loader calls it even
//! for modules that registered nothing, including on the `setup`-failure
//! unwind path where registration may have been partial.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

/// Collaborator owning registered command definitions.
pub trait CommandTree: Send + Sync {
    /// Registers `command` as owned by `module`.
    fn register(&self, module: &str, command: &str);

    /// Removes every command owned by `module`.
    ///
    /// Idempotent; safe to call for a module that registered zero commands.
    fn remove_commands_owned_by(&self, module: &str);

    /// The commands currently owned by `module`.
    fn commands_of(&self, module: &str) -> Vec<String>;
}

/// A shared command tree handle.
pub type BoxedCommandTree = Arc<dyn CommandTree>;

/// In-memory [`CommandTree`] keyed by owning module name.
#[derive(Debug, Default)]
pub struct InMemoryCommandTree {
    commands: RwLock<HashMap<String, Vec<String>>>,
}

impl InMemoryCommandTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of registered commands across all modules.
    pub fn len(&self) -> usize {
        self.commands.read().values().map(Vec::len).sum()
    }

    /// Whether no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CommandTree for InMemoryCommandTree {
    fn register(&self, module: &str, command: &str) {
        self.commands
            .write()
            .entry(module.to_string())
            .or_default()
            .push(command.to_string());
    }

    fn remove_commands_owned_by(&self, module: &str) {
        self.commands.write().remove(module);
    }

    fn commands_of(&self, module: &str) -> Vec<String> {
        self.commands
            .read()
            .get(module)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removal_is_idempotent() {
        let tree = InMemoryCommandTree::new();
        tree.register("ext.a", "ping");
        tree.register("ext.a", "pong");
        tree.register("ext.b", "other");

        tree.remove_commands_owned_by("ext.a");
        assert!(tree.commands_of("ext.a").is_empty());
        assert_eq!(tree.commands_of("ext.b"), vec!["other".to_string()]);

        // Second removal, and removal of a module that never registered.
        tree.remove_commands_owned_by("ext.a");
        tree.remove_commands_owned_by("ext.never");
        assert_eq!(tree.len(), 1);
    }
}
