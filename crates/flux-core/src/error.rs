//! Unified error types for the flux core abstractions.
//!
//! This module provides standardized error types used across core components.
//! Framework-level errors (extension lifecycle, pagination) build on these.

use thiserror::Error;

/// A boxed error that can cross async trait boundaries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

// =============================================================================
// Extension Errors
// =============================================================================

/// Errors raised by the extension lifecycle manager.
#[derive(Debug, Error)]
pub enum ExtensionError {
    /// The name could not be resolved to a loadable module.
    #[error("extension '{name}' could not be found")]
    NotFound {
        /// The name that failed to resolve.
        name: String,
    },

    /// The extension is already present in the registry.
    #[error("extension '{name}' is already loaded")]
    AlreadyLoaded {
        /// The offending extension name.
        name: String,
    },

    /// The extension is not present in the registry.
    #[error("extension '{name}' is not loaded")]
    NotLoaded {
        /// The offending extension name.
        name: String,
    },

    /// The module body, `setup`, or `teardown` raised.
    ///
    /// The original error is preserved as the cause.
    #[error("extension '{name}' failed: {source}")]
    Failed {
        /// The extension whose code raised.
        name: String,
        /// The underlying error.
        #[source]
        source: BoxError,
    },

    /// The executed module exposes no `setup` entry point.
    #[error("extension '{name}' has no 'setup' entry point")]
    NoEntryPoint {
        /// The offending extension name.
        name: String,
    },
}

impl ExtensionError {
    /// Wraps an arbitrary error as an execution failure of `name`.
    pub fn failed(name: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Failed {
            name: name.into(),
            source: source.into(),
        }
    }
}

// =============================================================================
// Transport Errors
// =============================================================================

/// Errors that can occur in message transport operations.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Message send failed.
    #[error("failed to send message: {0}")]
    SendFailed(String),

    /// Message edit failed.
    #[error("failed to edit message: {0}")]
    EditFailed(String),

    /// Message deletion failed.
    #[error("failed to delete message: {0}")]
    DeleteFailed(String),

    /// Reaction add/remove/clear failed.
    #[error("reaction operation failed: {0}")]
    ReactionFailed(String),

    /// The referenced message no longer exists.
    #[error("message '{id}' not found")]
    MessageNotFound {
        /// The missing message id.
        id: u64,
    },
}

// =============================================================================
// Pagination Errors
// =============================================================================

/// The permission the pager found missing, in check priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionKind {
    /// Bot cannot send embeds in the target channel.
    EmbedLinks,
    /// Bot cannot send messages in the target channel.
    SendMessages,
    /// Bot cannot add reactions in the target channel.
    AddReactions,
    /// Bot cannot read message history in the target channel.
    ReadMessageHistory,
}

impl PermissionKind {
    /// Human-readable description used in the `CannotPaginate` message.
    pub fn describe(self) -> &'static str {
        match self {
            Self::EmbedLinks => "bot does not have embed links permission",
            Self::SendMessages => "bot cannot send messages",
            Self::AddReactions => "bot does not have add reactions permission",
            Self::ReadMessageHistory => "bot does not have read message history permission",
        }
    }
}

/// Errors raised when creating or running a pagination session.
#[derive(Debug, Error)]
pub enum PaginationError {
    /// A session precondition was not met.
    ///
    /// Raised at session creation time, before any message is sent, so the
    /// caller can inform the invoking user.
    #[error("cannot paginate: {}", .0.describe())]
    CannotPaginate(PermissionKind),

    /// Sending the initial page failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

// =============================================================================
// Event Wait Errors
// =============================================================================

/// Errors returned by the event source wait primitives.
#[derive(Debug, Clone, Error)]
pub enum WaitError {
    /// The timeout elapsed with no matching event.
    #[error("timed out waiting for event")]
    Timeout,

    /// The event source shut down while waiting.
    #[error("event source closed")]
    Closed,
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for extension lifecycle operations.
pub type ExtensionResult<T> = Result<T, ExtensionError>;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Result type for pagination operations.
pub type PagerResult<T> = Result<T, PaginationError>;
