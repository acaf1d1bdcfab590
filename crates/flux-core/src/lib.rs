//! # Flux Core
//!
//! Core abstractions of the flux bot helper library.
//!
//! This crate defines the leaf types and collaborator contracts that the
//! higher-level helpers build on:
//!
//! - **Error taxonomy**: typed errors for extension lifecycle, transport,
//!   pagination, and event waiting ([`ExtensionError`], [`TransportError`],
//!   [`PaginationError`], [`WaitError`])
//! - **Message model**: id newtypes, the [`Embed`] builder, and
//!   [`MessageContent`] payloads
//! - **Transport contract**: [`MessageTransport`], the delivery surface the
//!   host implements over its chat client
//! - **Event source contract**: [`EventSource`], the wait-for-event primitive
//!   the pager consumes, plus the channel-backed [`ChannelEventSource`]
//! - **Permissions**: the [`Permissions`] snapshot the pager validates
//!   against before opening a session
//!
//! Everything protocol-specific (gateway framing, rate limits, the actual
//! chat client) stays in the host application; flux only sees these traits.

pub mod error;
pub mod event;
pub mod message;
pub mod permission;
pub mod transport;

pub use error::{
    BoxError, ExtensionError, ExtensionResult, PaginationError, PagerResult, PermissionKind,
    TransportError, TransportResult, WaitError,
};
pub use event::{
    ChannelEventSource, EventSource, MessageEvent, MessagePredicate, ReactionEvent,
    ReactionPredicate,
};
pub use message::{ChannelId, Embed, EmbedField, MessageContent, MessageId, UserId};
pub use permission::Permissions;
pub use transport::{BoxedTransport, MessageTransport};
