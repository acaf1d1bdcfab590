//! Interactive pagination sessions.
//!
//! An [`InteractivePager`] drives a bounded navigation session over a
//! [`PageSource`]: it renders page 1, attaches one reaction control per
//! navigation action, then loops waiting for qualifying reaction events
//! until stopped, timed out, or exhausted. Every re-render edits the same
//! message in place.
//!
//! Within one session only one action executes at a time: the wait loop
//! awaits full completion of the previous action's handler before waiting
//! for the next event. The one exception is the help screen's reversion
//! timer, which runs as an independently scheduled task; any subsequent
//! action cancels it before proceeding.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use flux_core::{
    BoxedTransport, ChannelId, Embed, EventSource, MessageContent, MessageEvent, MessageId,
    PaginationError, PagerResult, PermissionKind, Permissions, ReactionEvent, UserId,
};

use super::action::PagerAction;
use super::source::PageSource;

// ============================================================================
// Session context and timeouts
// ============================================================================

/// Everything a session needs to know about the invoking context.
#[derive(Clone)]
pub struct PagerContext {
    /// The channel the session renders into.
    pub channel: ChannelId,
    /// The user whose reactions drive navigation.
    pub author: UserId,
    /// The bot's effective permissions in the channel.
    pub permissions: Permissions,
    /// Message delivery surface.
    pub transport: BoxedTransport,
    /// External event source for reactions and replies.
    pub events: Arc<dyn EventSource>,
}

/// Session timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerTimeouts {
    /// Session ends after this long without a qualifying event.
    pub idle: Duration,
    /// How long the jump prompt waits for a numeric reply.
    pub prompt: Duration,
    /// How long the help screen stays up before reverting.
    pub help_revert: Duration,
}

impl Default for PagerTimeouts {
    fn default() -> Self {
        Self {
            idle: Duration::from_secs(120),
            prompt: Duration::from_secs(30),
            help_revert: Duration::from_secs(60),
        }
    }
}

/// A qualifying navigation event.
struct NavEvent {
    action: PagerAction,
    event: ReactionEvent,
    from_add: bool,
}

// ============================================================================
// InteractivePager
// ============================================================================

/// One reaction-driven navigation session over a [`PageSource`].
pub struct InteractivePager {
    ctx: PagerContext,
    source: Arc<dyn PageSource>,
    timeouts: PagerTimeouts,
    /// Active controls; first/last are suppressed for 2-page sessions.
    controls: Vec<PagerAction>,
    /// 1-indexed; `None` before the first render.
    current_page: Option<usize>,
    paginating: bool,
    message: Option<MessageId>,
    /// Pending help-screen reversion, at most one outstanding.
    help_task: Option<JoinHandle<()>>,
}

impl InteractivePager {
    /// Creates a session, validating channel permissions.
    ///
    /// Embed-send and message-send are always required; a multi-page source
    /// additionally needs reaction-add and read-history. Checks run in a
    /// fixed priority order and the first failing one wins.
    ///
    /// # Errors
    ///
    /// [`PaginationError::CannotPaginate`] naming the missing permission.
    pub fn create(ctx: PagerContext, source: Arc<dyn PageSource>) -> PagerResult<Self> {
        let permissions = ctx.permissions;
        if !permissions.embed_links {
            return Err(PaginationError::CannotPaginate(PermissionKind::EmbedLinks));
        }
        if !permissions.send_messages {
            return Err(PaginationError::CannotPaginate(PermissionKind::SendMessages));
        }
        if source.paginated() {
            if !permissions.add_reactions {
                return Err(PaginationError::CannotPaginate(PermissionKind::AddReactions));
            }
            if !permissions.read_message_history {
                return Err(PaginationError::CannotPaginate(
                    PermissionKind::ReadMessageHistory,
                ));
            }
        }

        let controls = PagerAction::controls(source.max_pages());
        Ok(Self {
            ctx,
            source,
            timeouts: PagerTimeouts::default(),
            controls,
            current_page: None,
            paginating: false,
            message: None,
            help_task: None,
        })
    }

    /// Overrides the session timers.
    pub fn with_timeouts(mut self, timeouts: PagerTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Whether the session is currently accepting navigation input.
    pub fn paginating(&self) -> bool {
        self.paginating
    }

    /// The page currently on screen, 1-indexed; `None` before first render.
    pub fn current_page(&self) -> Option<usize> {
        self.current_page
    }

    /// The rendered message, while the session holds one.
    pub fn message(&self) -> Option<MessageId> {
        self.message
    }

    /// The active control set.
    pub fn controls(&self) -> &[PagerAction] {
        &self.controls
    }

    // ========================================================================
    // Main loop
    // ========================================================================
    /// Runs the session to completion.
    ///
    /// A non-paginated source is rendered once with no reaction controls and
    /// no event loop. Otherwise the session loops until the stop action, or
    /// until the idle timeout elapses (reactions are then cleared,
    /// best-effort).
    ///
    /// # Errors
    ///
    /// Only the initial send can fail the session; once the event loop is
    /// entered, per-action delivery errors are logged and swallowed.
    pub async fn paginate(&mut self) -> PagerResult<()> {
        let first = self.source.render_page(1).await;
        if !self.source.paginated() {
            self.ctx.transport.send(self.ctx.channel, first).await?;
            return Ok(());
        }

        let message = self.ctx.transport.send(self.ctx.channel, first).await?;
        self.message = Some(message);
        self.current_page = Some(1);
        self.paginating = true;
        debug!(channel = %self.ctx.channel, message = %message, "Pagination session started");

        for action in self.controls.clone() {
            if let Err(err) = self.ctx.transport.add_reaction(message, action.glyph()).await {
                warn!(
                    glyph = action.glyph(),
                    error = %err,
                    "Failed to attach reaction control, ignoring"
                );
            }
        }

        while self.paginating {
            match self.wait_for_action(message).await {
                Some(nav) => {
                    // A pending help reversion must never race the action.
                    self.cancel_help_revert();
                    self.run_action(nav).await;
                }
                None => {
                    self.paginating = false;
                    self.cancel_help_revert();
                    if let Err(err) = self.ctx.transport.clear_reactions(message).await {
                        debug!(error = %err, "Failed to clear reactions after timeout, ignoring");
                    }
                    debug!(message = %message, "Pagination session timed out");
                }
            }
        }
        Ok(())
    }

    /// Waits for the next qualifying reaction event, or `None` on timeout.
    ///
    /// Without message-management permission the navigator removes their own
    /// reaction to press a control twice, so reaction-remove events race the
    /// add events and whichever resolves first wins.
    async fn wait_for_action(&self, message: MessageId) -> Option<NavEvent> {
        let author = self.ctx.author;
        let controls = self.controls.clone();
        let matches = move |event: &ReactionEvent| {
            event.message == message
                && event.user == author
                && PagerAction::from_glyph(&event.glyph)
                    .is_some_and(|action| controls.contains(&action))
        };

        let events = &self.ctx.events;
        let idle = self.timeouts.idle;
        let result = if self.ctx.permissions.manage_messages {
            (events.wait_for_reaction_add(&matches, idle).await).map(|event| (event, true))
        } else {
            tokio::select! {
                added = events.wait_for_reaction_add(&matches, idle) => {
                    added.map(|event| (event, true))
                }
                removed = events.wait_for_reaction_remove(&matches, idle) => {
                    removed.map(|event| (event, false))
                }
            }
        };

        let (event, from_add) = result.ok()?;
        let action = PagerAction::from_glyph(&event.glyph)?;
        Some(NavEvent {
            action,
            event,
            from_add,
        })
    }

    /// Executes one matched action to completion.
    async fn run_action(&mut self, nav: NavEvent) {
        // Strip the navigator's reaction so the control stays pressable.
        if nav.from_add
            && self.ctx.permissions.manage_messages
            && let Some(message) = self.message
            && let Err(err) = self
                .ctx
                .transport
                .remove_reaction(message, &nav.event.glyph, nav.event.user)
                .await
        {
            debug!(error = %err, "Failed to remove navigator reaction, ignoring");
        }

        match nav.action {
            PagerAction::First => self.show_checked(1).await,
            PagerAction::Previous => {
                if let Some(page) = self.current_page {
                    self.show_checked(page.saturating_sub(1)).await;
                }
            }
            PagerAction::Next => {
                if let Some(page) = self.current_page {
                    self.show_checked(page + 1).await;
                }
            }
            PagerAction::Last => self.show_checked(self.source.max_pages()).await,
            PagerAction::Jump => self.prompt_jump().await,
            PagerAction::Stop => self.stop().await,
            PagerAction::Help => self.show_help().await,
        }
    }

    // ========================================================================
    // Actions
    // ========================================================================
    /// Re-renders `page` if it is in range; out-of-range requests are ignored.
    async fn show_checked(&mut self, page: usize) {
        if (1..=self.source.max_pages()).contains(&page) {
            self.show_page(page).await;
        }
    }

    async fn show_page(&mut self, page: usize) {
        self.current_page = Some(page);
        let content = self.source.render_page(page).await;
        if let Some(message) = self.message
            && let Err(err) = self.ctx.transport.edit(message, content).await
        {
            warn!(page, error = %err, "Failed to edit page, ignoring");
        }
    }

    /// Prompts for a page number and jumps to it.
    ///
    /// Waits for a numeric reply from the session author in the session
    /// channel, validates the range, and cleans up its own prompt, reply,
    /// and error messages afterwards (best-effort).
    async fn prompt_jump(&mut self) {
        let channel = self.ctx.channel;
        let author = self.ctx.author;
        let transport = Arc::clone(&self.ctx.transport);

        let prompt = match transport
            .send(channel, MessageContent::text("What page do you want to go to?"))
            .await
        {
            Ok(id) => id,
            Err(err) => {
                warn!(error = %err, "Failed to send jump prompt, ignoring");
                return;
            }
        };
        let mut to_delete = vec![prompt];

        let numeric_reply = move |event: &MessageEvent| {
            event.channel == channel
                && event.author == author
                && event.content.trim().parse::<usize>().is_ok()
        };
        match self
            .ctx
            .events
            .wait_for_message(&numeric_reply, self.timeouts.prompt)
            .await
        {
            Ok(reply) => {
                to_delete.push(reply.id);
                if let Ok(page) = reply.content.trim().parse::<usize>() {
                    let max_pages = self.source.max_pages();
                    if (1..=max_pages).contains(&page) {
                        self.show_page(page).await;
                    } else if let Ok(id) = transport
                        .send(
                            channel,
                            MessageContent::text(format!(
                                "Invalid page given. ({page}/{max_pages})"
                            )),
                        )
                        .await
                    {
                        to_delete.push(id);
                    }
                }
            }
            Err(_) => {
                if let Ok(id) = transport
                    .send(channel, MessageContent::text("Took too long."))
                    .await
                {
                    to_delete.push(id);
                }
            }
        }

        if let Err(err) = transport.delete_messages(&to_delete).await {
            debug!(error = %err, "Failed to clean up jump prompt messages, ignoring");
        }
    }

    /// Deletes the rendered message and ends the session.
    async fn stop(&mut self) {
        self.paginating = false;
        self.cancel_help_revert();
        if let Some(message) = self.message.take()
            && let Err(err) = self.ctx.transport.delete(message).await
        {
            debug!(error = %err, "Failed to delete paginated message, ignoring");
        }
    }

    /// Replaces the rendered content with a help screen and schedules the
    /// reversion back to the page that was on screen.
    async fn show_help(&mut self) {
        let Some(message) = self.message else {
            return;
        };

        let mut description = String::from(
            "Welcome to the interactive pager!\n\n\
             React to this message to navigate between pages:\n\n",
        );
        for action in &self.controls {
            description.push_str(action.glyph());
            description.push(' ');
            description.push_str(action.describe());
            description.push('\n');
        }
        let help = MessageContent::Embed(Embed::new().title("Paging help").description(description));
        if let Err(err) = self.ctx.transport.edit(message, help).await {
            warn!(error = %err, "Failed to show help screen, ignoring");
            return;
        }

        // Render the previous content now; the backing collection may change
        // while the help screen is up, and the pre-help view is what the
        // reversion restores.
        let page = self.current_page.unwrap_or(1);
        let content = self.source.render_page(page).await;
        let transport = Arc::clone(&self.ctx.transport);
        let delay = self.timeouts.help_revert;
        self.help_task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(err) = transport.edit(message, content).await {
                debug!(error = %err, "Failed to revert help screen, ignoring");
            }
        }));
    }

    fn cancel_help_revert(&mut self) {
        if let Some(task) = self.help_task.take() {
            task.abort();
        }
    }
}

impl Drop for InteractivePager {
    fn drop(&mut self) {
        self.cancel_help_revert();
    }
}
