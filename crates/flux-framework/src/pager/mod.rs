//! Reaction-driven interactive pagination.
//!
//! - [`PageSource`] / [`ListSource`] - sliceable collections rendered one
//!   page at a time
//! - [`PagerAction`] - the navigation controls and their reaction glyphs
//! - [`InteractivePager`] - the session state machine: permission
//!   preconditions, in-place edits, jump prompt, help screen, idle timeout

pub mod action;
pub mod session;
pub mod source;

pub use action::PagerAction;
pub use session::{InteractivePager, PagerContext, PagerTimeouts};
pub use source::{ListSource, PageSource};
