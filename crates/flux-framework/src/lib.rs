//! # Flux Framework
//!
//! High-level bot helper components built on `flux-core`:
//!
//! - Extension lifecycle management: load, unload, and reload dynamically
//!   resolved extension modules, with transactional rollback when a reload
//!   fails partway
//! - Interactive pagination: reaction-driven navigation sessions over
//!   sliceable page sources
//!
//! Both subsystems speak to the outside world only through the `flux-core`
//! contracts (`MessageTransport`, `EventSource`), so a host application wires
//! in its own chat backend and gateway feed.

pub mod extension;
pub mod pager;

pub use extension::{
    ExtensionLifecycle, ExtensionLoader, HostApp, InMemoryCommandTree, MemoryResolver,
    ModuleHandle, ModuleResolver,
};
pub use pager::{InteractivePager, ListSource, PageSource, PagerAction, PagerContext, PagerTimeouts};
