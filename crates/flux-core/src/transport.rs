//! Message transport contract.
//!
//! The pager never talks to the chat service directly; it goes through
//! [`MessageTransport`], which the host application implements over its own
//! client. All methods are async because every one of them is a network
//! round-trip on a real backend.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TransportResult;
use crate::message::{ChannelId, MessageContent, MessageId, UserId};

/// Delivery surface for messages and reactions.
///
/// # Errors
///
/// Implementations report failures through [`TransportError`]; callers decide
/// which failures are fatal. The pager treats most of them as best-effort
/// (logged and swallowed) once a session is running.
///
/// [`TransportError`]: crate::error::TransportError
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Sends a new message to `channel`, returning its id.
    async fn send(&self, channel: ChannelId, content: MessageContent)
    -> TransportResult<MessageId>;

    /// Replaces the content of an existing message in place.
    async fn edit(&self, message: MessageId, content: MessageContent) -> TransportResult<()>;

    /// Deletes a single message.
    async fn delete(&self, message: MessageId) -> TransportResult<()>;

    /// Deletes a batch of messages in one call.
    async fn delete_messages(&self, messages: &[MessageId]) -> TransportResult<()>;

    /// Adds a reaction glyph to a message.
    async fn add_reaction(&self, message: MessageId, glyph: &str) -> TransportResult<()>;

    /// Removes one user's reaction glyph from a message.
    async fn remove_reaction(
        &self,
        message: MessageId,
        glyph: &str,
        user: UserId,
    ) -> TransportResult<()>;

    /// Removes every reaction from a message.
    async fn clear_reactions(&self, message: MessageId) -> TransportResult<()>;
}

/// A shared transport handle.
pub type BoxedTransport = Arc<dyn MessageTransport>;
