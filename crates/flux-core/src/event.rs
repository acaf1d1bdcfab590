//! Chat event source contract and a channel-backed implementation.
//!
//! The pager consumes external events (reaction add/remove, replies) through
//! the [`EventSource`] trait: a single-consumer wait primitive with a
//! predicate and a timeout. The host application forwards its gateway events
//! into whatever implements this trait.
//!
//! [`ChannelEventSource`] is the in-process implementation: a tokio broadcast
//! channel that the host (or a test) pushes events into, with each `wait_for`
//! call holding its own subscription until a matching event arrives or the
//! timeout elapses.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::time::Instant;

use crate::error::WaitError;
use crate::message::{ChannelId, MessageId, UserId};

// ============================================================================
// Event payloads
// ============================================================================

/// A reaction added to or removed from a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionEvent {
    /// The message the reaction targets.
    pub message: MessageId,
    /// The user who reacted.
    pub user: UserId,
    /// The reaction glyph (unicode emoji).
    pub glyph: String,
}

/// A plain message observed in a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    /// The message id.
    pub id: MessageId,
    /// The channel the message was sent in.
    pub channel: ChannelId,
    /// The message author.
    pub author: UserId,
    /// Raw text content.
    pub content: String,
}

/// Predicate over reaction events.
pub type ReactionPredicate<'a> = &'a (dyn Fn(&ReactionEvent) -> bool + Send + Sync);

/// Predicate over message events.
pub type MessagePredicate<'a> = &'a (dyn Fn(&MessageEvent) -> bool + Send + Sync);

// ============================================================================
// EventSource trait
// ============================================================================

/// Wait-for-event primitive consumed by the pager.
///
/// Each call waits for the next event of the given kind that satisfies
/// `predicate`, up to `timeout`. Non-matching events are skipped, not
/// consumed destructively for other waiters.
///
/// # Errors
///
/// [`WaitError::Timeout`] when the timeout elapses with no match,
/// [`WaitError::Closed`] when the source shuts down.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Waits for a matching reaction-add event.
    async fn wait_for_reaction_add(
        &self,
        predicate: ReactionPredicate<'_>,
        timeout: Duration,
    ) -> Result<ReactionEvent, WaitError>;

    /// Waits for a matching reaction-remove event.
    async fn wait_for_reaction_remove(
        &self,
        predicate: ReactionPredicate<'_>,
        timeout: Duration,
    ) -> Result<ReactionEvent, WaitError>;

    /// Waits for a matching message event.
    async fn wait_for_message(
        &self,
        predicate: MessagePredicate<'_>,
        timeout: Duration,
    ) -> Result<MessageEvent, WaitError>;
}

// ============================================================================
// ChannelEventSource
// ============================================================================

/// Internal fan-out payload.
#[derive(Debug, Clone)]
enum GatewayEvent {
    ReactionAdd(ReactionEvent),
    ReactionRemove(ReactionEvent),
    Message(MessageEvent),
}

/// Broadcast-channel backed [`EventSource`].
///
/// The host pushes gateway events in via the `emit_*` methods; every pending
/// `wait_for_*` call sees every event through its own broadcast subscription,
/// so concurrent waiters never steal events from each other.
#[derive(Debug, Clone)]
pub struct ChannelEventSource {
    tx: broadcast::Sender<GatewayEvent>,
}

impl ChannelEventSource {
    /// Creates a source with the given broadcast buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publishes a reaction-add event. A send with no active waiters is a no-op.
    pub fn emit_reaction_add(&self, event: ReactionEvent) {
        let _ = self.tx.send(GatewayEvent::ReactionAdd(event));
    }

    /// Publishes a reaction-remove event.
    pub fn emit_reaction_remove(&self, event: ReactionEvent) {
        let _ = self.tx.send(GatewayEvent::ReactionRemove(event));
    }

    /// Publishes a message event.
    pub fn emit_message(&self, event: MessageEvent) {
        let _ = self.tx.send(GatewayEvent::Message(event));
    }

    /// Number of `wait_for_*` calls currently subscribed.
    ///
    /// Useful for tests that must not emit before a waiter is listening.
    pub fn waiter_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Shared wait loop: subscribe, skip non-matching events, honour deadline.
    async fn wait<T, F>(&self, timeout: Duration, mut select: F) -> Result<T, WaitError>
    where
        F: FnMut(GatewayEvent) -> Option<T> + Send,
        T: Send,
    {
        let mut rx = self.tx.subscribe();
        let deadline = Instant::now() + timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match tokio::time::timeout(remaining, rx.recv()).await {
                Err(_) => return Err(WaitError::Timeout),
                Ok(Err(broadcast::error::RecvError::Closed)) => return Err(WaitError::Closed),
                // A lagged waiter dropped events; keep waiting for newer ones.
                Ok(Err(broadcast::error::RecvError::Lagged(_))) => continue,
                Ok(Ok(event)) => {
                    if let Some(matched) = select(event) {
                        return Ok(matched);
                    }
                }
            }
        }
    }
}

impl Default for ChannelEventSource {
    fn default() -> Self {
        Self::new(64)
    }
}

#[async_trait]
impl EventSource for ChannelEventSource {
    async fn wait_for_reaction_add(
        &self,
        predicate: ReactionPredicate<'_>,
        timeout: Duration,
    ) -> Result<ReactionEvent, WaitError> {
        self.wait(timeout, |event| match event {
            GatewayEvent::ReactionAdd(e) if predicate(&e) => Some(e),
            _ => None,
        })
        .await
    }

    async fn wait_for_reaction_remove(
        &self,
        predicate: ReactionPredicate<'_>,
        timeout: Duration,
    ) -> Result<ReactionEvent, WaitError> {
        self.wait(timeout, |event| match event {
            GatewayEvent::ReactionRemove(e) if predicate(&e) => Some(e),
            _ => None,
        })
        .await
    }

    async fn wait_for_message(
        &self,
        predicate: MessagePredicate<'_>,
        timeout: Duration,
    ) -> Result<MessageEvent, WaitError> {
        self.wait(timeout, |event| match event {
            GatewayEvent::Message(e) if predicate(&e) => Some(e),
            _ => None,
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reaction(message: u64, user: u64, glyph: &str) -> ReactionEvent {
        ReactionEvent {
            message: MessageId(message),
            user: UserId(user),
            glyph: glyph.to_string(),
        }
    }

    #[tokio::test]
    async fn wait_matches_predicate() {
        let source = ChannelEventSource::default();

        let waiter = {
            let source = source.clone();
            tokio::spawn(async move {
                source
                    .wait_for_reaction_add(&|e| e.user == UserId(1), Duration::from_secs(5))
                    .await
            })
        };

        tokio::task::yield_now().await;
        // Wrong user first; must be skipped.
        source.emit_reaction_add(reaction(10, 2, "\u{25b6}"));
        source.emit_reaction_add(reaction(10, 1, "\u{25b6}"));

        let event = waiter.await.unwrap().unwrap();
        assert_eq!(event.user, UserId(1));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_times_out() {
        let source = ChannelEventSource::default();
        let result = source
            .wait_for_message(&|_| true, Duration::from_secs(30))
            .await;
        assert!(matches!(result, Err(WaitError::Timeout)));
    }

    #[tokio::test]
    async fn concurrent_waiters_both_observe() {
        let source = ChannelEventSource::default();

        let add = {
            let source = source.clone();
            tokio::spawn(async move {
                source
                    .wait_for_reaction_add(&|_| true, Duration::from_secs(5))
                    .await
            })
        };
        let remove = {
            let source = source.clone();
            tokio::spawn(async move {
                source
                    .wait_for_reaction_remove(&|_| true, Duration::from_secs(5))
                    .await
            })
        };

        tokio::task::yield_now().await;
        source.emit_reaction_remove(reaction(7, 1, "\u{23f9}"));
        source.emit_reaction_add(reaction(7, 1, "\u{23f9}"));

        assert!(add.await.unwrap().is_ok());
        assert!(remove.await.unwrap().is_ok());
    }
}
