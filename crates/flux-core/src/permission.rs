//! Channel permission snapshot used for pager preconditions.

use serde::{Deserialize, Serialize};

/// The effective permissions of the bot in one channel.
///
/// The host resolves these from its own permission model before creating a
/// pager session; the pager only reads them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    /// May send embeds.
    pub embed_links: bool,
    /// May send messages.
    pub send_messages: bool,
    /// May add reactions to messages.
    pub add_reactions: bool,
    /// May read the channel's message history.
    pub read_message_history: bool,
    /// May manage (delete, bulk-clear) other users' messages and reactions.
    ///
    /// When absent, the pager cannot strip a navigator's reaction after each
    /// press and must additionally listen for reaction-remove events.
    pub manage_messages: bool,
}

impl Permissions {
    /// Every permission granted.
    pub const ALL: Self = Self {
        embed_links: true,
        send_messages: true,
        add_reactions: true,
        read_message_history: true,
        manage_messages: true,
    };

    /// No permission granted.
    pub const NONE: Self = Self {
        embed_links: false,
        send_messages: false,
        add_reactions: false,
        read_message_history: false,
        manage_messages: false,
    };

    /// All permissions except message management.
    pub const NO_MANAGE: Self = Self {
        manage_messages: false,
        ..Self::ALL
    };
}
