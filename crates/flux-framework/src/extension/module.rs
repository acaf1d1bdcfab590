//! Extension module contract.
//!
//! An extension is a dynamically loadable unit of application behaviour with
//! `setup`/`teardown` lifecycle hooks. Instead of probing a module object for
//! attributes at call time, the hooks are an explicit capability trait,
//! resolved once when the module is executed: a [`ModuleHandle`] either
//! carries an [`ExtensionLifecycle`] or it does not, and the loader turns the
//! latter into [`ExtensionError::NoEntryPoint`].
//!
//! [`ExtensionError::NoEntryPoint`]: flux_core::ExtensionError::NoEntryPoint

use std::sync::Arc;

use async_trait::async_trait;

use flux_core::BoxError;

use super::command_tree::BoxedCommandTree;

// ============================================================================
// HostApp
// ============================================================================

/// The slice of the host application handed to extensions during lifecycle
/// hooks.
///
/// Extensions register commands against [`commands`](Self::commands); the
/// loader uses the same handle to unwind partially registered commands when
/// a `setup` fails.
#[derive(Clone)]
pub struct HostApp {
    commands: BoxedCommandTree,
}

impl HostApp {
    /// Creates a host app around the given command tree.
    pub fn new(commands: BoxedCommandTree) -> Self {
        Self { commands }
    }

    /// The command tree extensions register into.
    pub fn commands(&self) -> &BoxedCommandTree {
        &self.commands
    }
}

// ============================================================================
// ExtensionLifecycle
// ============================================================================

/// Lifecycle hooks of an extension module.
///
/// `setup` is the required entry point, invoked once after the module body
/// executes successfully. `teardown` is optional: the default implementation
/// is a no-op and [`has_teardown`](Self::has_teardown) reports whether the
/// module provides a real one, so the loader can log accurately.
///
/// Both hooks may await network or database I/O.
#[async_trait]
pub trait ExtensionLifecycle: Send + Sync {
    /// Entry point. Register commands, listeners, and module state on `app`.
    ///
    /// # Errors
    ///
    /// An error here makes the load fail; the loader unwinds any partial
    /// registration before surfacing the failure.
    async fn setup(&self, app: &HostApp) -> Result<(), BoxError>;

    /// Inverse of `setup`. Release module state.
    ///
    /// # Errors
    ///
    /// During a caller-initiated unload an error propagates to the caller;
    /// during load-failure cleanup it is swallowed.
    async fn teardown(&self, _app: &HostApp) -> Result<(), BoxError> {
        Ok(())
    }

    /// Whether this module provides a real `teardown`.
    fn has_teardown(&self) -> bool {
        true
    }
}

/// A shared lifecycle handle.
pub type BoxedLifecycle = Arc<dyn ExtensionLifecycle>;

// ============================================================================
// ModuleHandle
// ============================================================================

/// An executed extension module.
///
/// Produced by [`ModuleResolver::execute`](super::resolver::ModuleResolver::execute)
/// after the module body ran. `lifecycle` is `None` when the module exposes
/// no `setup` entry point.
#[derive(Clone)]
pub struct ModuleHandle {
    /// Canonical (fully qualified) module name.
    pub name: String,
    /// The module's lifecycle hooks, if it exposes any.
    pub lifecycle: Option<BoxedLifecycle>,
}

impl ModuleHandle {
    /// Creates a handle with lifecycle hooks.
    pub fn new(name: impl Into<String>, lifecycle: BoxedLifecycle) -> Self {
        Self {
            name: name.into(),
            lifecycle: Some(lifecycle),
        }
    }

    /// Creates a handle for a module without a `setup` entry point.
    pub fn without_entry_point(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lifecycle: None,
        }
    }
}

impl std::fmt::Debug for ModuleHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleHandle")
            .field("name", &self.name)
            .field("has_lifecycle", &self.lifecycle.is_some())
            .finish()
    }
}
