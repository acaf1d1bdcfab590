//! Extension lifecycle management.
//!
//! This module implements the runtime extension (plugin) system:
//!
//! - [`ExtensionLifecycle`] / [`ModuleHandle`] - the contract an extension
//!   module fulfils
//! - [`ModuleResolver`] / [`MemoryResolver`] - name resolution, module
//!   execution, and the module cache
//! - [`ModuleRegistry`] - bookkeeping of loaded extensions
//! - [`CommandTree`] - the collaborator notified when an extension's
//!   commands must be dropped
//! - [`ExtensionLoader`] - load/unload/reload orchestration with
//!   rollback-on-failure
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use flux_framework::extension::*;
//!
//! let resolver = Arc::new(MemoryResolver::new());
//! resolver.register_lifecycle("bot.exts.admin", Arc::new(AdminExt::default()));
//!
//! let app = HostApp::new(Arc::new(InMemoryCommandTree::new()));
//! let mut loader = ExtensionLoader::new(resolver, app);
//! loader.load(".admin", Some("bot.exts")).await?;
//! loader.reload("bot.exts.admin", None).await?;
//! loader.unload("bot.exts.admin", None).await?;
//! ```

pub mod command_tree;
pub mod loader;
pub mod module;
pub mod registry;
pub mod resolver;

pub use command_tree::{BoxedCommandTree, CommandTree, InMemoryCommandTree};
pub use loader::ExtensionLoader;
pub use module::{BoxedLifecycle, ExtensionLifecycle, HostApp, ModuleHandle};
pub use registry::{LoadedExtension, ModuleRegistry};
pub use resolver::{
    BoxedResolver, MemoryResolver, ModuleFactory, ModuleResolver, ModuleSpec, resolve_relative,
};
