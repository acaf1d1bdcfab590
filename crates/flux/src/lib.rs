//! # Flux
//!
//! A helper library for chat bots, built around two subsystems:
//!
//! - **Extensions**: dynamically loadable units of bot behaviour with
//!   `setup`/`teardown` lifecycle hooks. The [`ExtensionLoader`]
//!   orchestrates load, unload, and reload, unwinding partial registration
//!   on failure and rolling a failed reload back to the previous version.
//! - **Pagination**: reaction-driven navigation over sliceable page
//!   sources. An [`InteractivePager`] renders one message and edits it in
//!   place as the invoking user presses reaction controls.
//!
//! The library talks to a chat backend only through the `flux-core`
//! contracts, so any backend that can send, edit, and react to messages
//! can host it.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use flux::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::new().load()?;
//!     flux_runtime::logging::init_from_config(&config.logging);
//!
//!     let resolver = Arc::new(MemoryResolver::new());
//!     let app = HostApp::new(Arc::new(InMemoryCommandTree::new()));
//!     let mut loader = ExtensionLoader::new(resolver, app);
//!     for name in &config.extensions {
//!         loader.load(name, None).await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! [`ExtensionLoader`]: flux_framework::ExtensionLoader
//! [`InteractivePager`]: flux_framework::InteractivePager

pub use flux_core as core;
pub use flux_framework as framework;
pub use flux_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use flux::prelude::*;
/// ```
pub mod prelude {
    // Extension system
    pub use flux_framework::extension::{
        ExtensionLifecycle, ExtensionLoader, HostApp, InMemoryCommandTree, MemoryResolver,
        ModuleHandle, ModuleResolver,
    };

    // Pagination
    pub use flux_framework::pager::{
        InteractivePager, ListSource, PageSource, PagerAction, PagerContext, PagerTimeouts,
    };

    // Core contracts and payloads
    pub use flux_core::{
        BoxedTransport, ChannelEventSource, ChannelId, Embed, EventSource, MessageContent,
        MessageId, MessageTransport, Permissions, UserId,
    };

    // Errors
    pub use flux_core::{ExtensionError, PaginationError, TransportError};
    pub use flux_runtime::{ConfigError, RuntimeError};

    // Bootstrap
    pub use flux_runtime::config::{ConfigLoader, FluxConfig};
    pub use flux_runtime::logging::LoggingBuilder;
}
