//! Message and embed model shared by the pager and its transport.
//!
//! This module defines the small content model the helper library needs:
//! snowflake-style id newtypes, a builder-style [`Embed`], and the
//! [`MessageContent`] payload accepted by [`MessageTransport`].
//!
//! # Example
//!
//! ```rust,ignore
//! use flux_core::{Embed, MessageContent};
//!
//! let embed = Embed::new()
//!     .title("Results")
//!     .description("first page")
//!     .footer("Page 1/3 (25 entries)");
//! let content = MessageContent::Embed(embed);
//! ```
//!
//! [`MessageTransport`]: crate::transport::MessageTransport

use serde::{Deserialize, Serialize};

// ============================================================================
// Id newtypes
// ============================================================================

macro_rules! id_newtype {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    };
}

id_newtype! {
    /// Unique identifier of a message on the chat service.
    MessageId
}

id_newtype! {
    /// Unique identifier of a channel on the chat service.
    ChannelId
}

id_newtype! {
    /// Unique identifier of a user on the chat service.
    UserId
}

// ============================================================================
// Embed
// ============================================================================

/// A single name/value field inside an [`Embed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    /// Field heading.
    pub name: String,
    /// Field body.
    pub value: String,
    /// Render inline next to other inline fields.
    #[serde(default)]
    pub inline: bool,
}

/// A rich embed payload, built up with chained setters.
///
/// Only the subset of the chat service's embed surface that the helpers
/// actually use is modelled here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    /// Embed title line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Main body text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Accent colour as a 24-bit RGB value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colour: Option<u32>,

    /// Name/value fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,

    /// Footer line (e.g. page counter).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

impl Embed {
    /// Creates an empty embed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the accent colour.
    pub fn colour(mut self, colour: u32) -> Self {
        self.colour = Some(colour);
        self
    }

    /// Appends a field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    /// Sets the footer line.
    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    /// Clears the footer line.
    pub fn clear_footer(mut self) -> Self {
        self.footer = None;
        self
    }
}

// ============================================================================
// MessageContent
// ============================================================================

/// The payload accepted by `send` and `edit` transport calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text message.
    Text(String),
    /// Rich embed message.
    Embed(Embed),
}

impl MessageContent {
    /// Creates a plain text payload.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Returns the embed payload, if this is an embed.
    pub fn as_embed(&self) -> Option<&Embed> {
        match self {
            Self::Embed(embed) => Some(embed),
            Self::Text(_) => None,
        }
    }

    /// Returns the plain text payload, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Embed(_) => None,
        }
    }
}

impl From<Embed> for MessageContent {
    fn from(embed: Embed) -> Self {
        Self::Embed(embed)
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embed_builder_chains() {
        let embed = Embed::new()
            .title("t")
            .description("d")
            .colour(0x7289DA)
            .field("a", "b", true)
            .footer("Page 1/3");

        assert_eq!(embed.title.as_deref(), Some("t"));
        assert_eq!(embed.fields.len(), 1);
        assert!(embed.fields[0].inline);
        assert_eq!(embed.footer.as_deref(), Some("Page 1/3"));
    }

    #[test]
    fn content_accessors() {
        let text = MessageContent::text("hi");
        assert_eq!(text.as_text(), Some("hi"));
        assert!(text.as_embed().is_none());

        let embed: MessageContent = Embed::new().title("t").into();
        assert!(embed.as_embed().is_some());
    }
}
