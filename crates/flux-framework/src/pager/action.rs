//! Navigation actions and their reaction glyphs.

/// One navigation action of an interactive pager session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerAction {
    /// Jump to the first page.
    First,
    /// Go to the previous page.
    Previous,
    /// Go to the next page.
    Next,
    /// Jump to the last page.
    Last,
    /// Prompt for a page number and jump to it.
    Jump,
    /// Delete the rendered message and end the session.
    Stop,
    /// Show the help screen, reverting after a delay.
    Help,
}

impl PagerAction {
    /// Every action, in the order controls are attached.
    pub const ALL: [PagerAction; 7] = [
        Self::First,
        Self::Previous,
        Self::Next,
        Self::Last,
        Self::Jump,
        Self::Stop,
        Self::Help,
    ];

    /// The reaction glyph driving this action.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::First => "\u{23ee}",    // ⏮
            Self::Previous => "\u{25c0}", // ◀
            Self::Next => "\u{25b6}",     // ▶
            Self::Last => "\u{23ed}",     // ⏭
            Self::Jump => "\u{1f522}",    // 🔢
            Self::Stop => "\u{23f9}",     // ⏹
            Self::Help => "\u{2139}",     // ℹ
        }
    }

    /// Maps a reaction glyph back to its action.
    pub fn from_glyph(glyph: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.glyph() == glyph)
    }

    /// One-line description shown on the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::First => "takes you to the first page",
            Self::Previous => "takes you to the previous page",
            Self::Next => "takes you to the next page",
            Self::Last => "takes you to the last page",
            Self::Jump => "lets you type a page number to go to",
            Self::Stop => "stops the pagination session and deletes this message",
            Self::Help => "shows this message",
        }
    }

    /// The active control set for a session over `max_pages` pages.
    ///
    /// A 2-page session suppresses first/last, which would be redundant with
    /// previous/next.
    pub fn controls(max_pages: usize) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|action| {
                max_pages > 2 || !matches!(action, Self::First | Self::Last)
            })
            .collect()
    }
}
