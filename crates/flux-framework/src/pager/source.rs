//! Page sources.
//!
//! A [`PageSource`] abstracts a sliceable item collection that yields
//! rendered page content on demand. Page boundaries are derived from the
//! item count and page size; content is recomputed on every fetch so a
//! mutable backing collection is re-read rather than cached.

use async_trait::async_trait;

use flux_core::{Embed, MessageContent};

/// A paginated item collection.
///
/// `total` and `per_page` are fixed after construction; `max_pages` and
/// `paginated` derive from them. [`render_page`](Self::render_page) does not
/// clamp its argument; bounds checking is the caller's job.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Number of items in the collection.
    fn total(&self) -> usize;

    /// Items per page. Always positive.
    fn per_page(&self) -> usize;

    /// Number of pages, at least 1 even for an empty collection.
    fn max_pages(&self) -> usize {
        self.total().div_ceil(self.per_page()).max(1)
    }

    /// Whether the collection spans more than one page worth of items.
    fn paginated(&self) -> bool {
        self.total() > self.per_page()
    }

    /// Renders the content of the 1-indexed page `page`.
    ///
    /// Recomputed on every call; the backing collection may be re-read.
    async fn render_page(&self, page: usize) -> MessageContent;
}

/// A [`PageSource`] over a list of pre-formatted entry lines.
///
/// Pages render as an embed: numbered entries in the description, and a
/// `Page x/y (n entries)` footer when there is more than one page.
pub struct ListSource {
    entries: Vec<String>,
    per_page: usize,
    title: Option<String>,
    show_entry_count: bool,
}

impl ListSource {
    /// Creates a source over `entries` with `per_page` items per page.
    ///
    /// # Panics
    ///
    /// Panics if `per_page` is zero.
    pub fn new(entries: Vec<String>, per_page: usize) -> Self {
        assert!(per_page > 0, "per_page must be positive");
        Self {
            entries,
            per_page,
            title: None,
            show_entry_count: true,
        }
    }

    /// Sets the embed title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Controls whether the footer includes the total entry count.
    pub fn show_entry_count(mut self, show: bool) -> Self {
        self.show_entry_count = show;
        self
    }

    fn footer_for(&self, page: usize) -> Option<String> {
        let max_pages = self.max_pages();
        if max_pages < 2 {
            return None;
        }
        if self.show_entry_count {
            Some(format!(
                "Page {page}/{max_pages} ({} entries)",
                self.total()
            ))
        } else {
            Some(format!("Page {page}/{max_pages}"))
        }
    }
}

#[async_trait]
impl PageSource for ListSource {
    fn total(&self) -> usize {
        self.entries.len()
    }

    fn per_page(&self) -> usize {
        self.per_page
    }

    async fn render_page(&self, page: usize) -> MessageContent {
        let start = (page - 1) * self.per_page;
        let end = (start + self.per_page).min(self.entries.len());
        let body = self.entries[start.min(self.entries.len())..end]
            .iter()
            .enumerate()
            .map(|(i, entry)| format!("{}. {entry}", start + i + 1))
            .collect::<Vec<_>>()
            .join("\n");

        let mut embed = Embed::new().description(body);
        if let Some(title) = &self.title {
            embed = embed.title(title.clone());
        }
        if let Some(footer) = self.footer_for(page) {
            embed = embed.footer(footer);
        }
        MessageContent::Embed(embed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("entry {i}")).collect()
    }

    #[test]
    fn page_boundaries() {
        assert_eq!(ListSource::new(entries(10), 4).max_pages(), 3);
        assert_eq!(ListSource::new(entries(8), 4).max_pages(), 2);
        // Empty collection still has one (empty) page.
        assert_eq!(ListSource::new(entries(0), 4).max_pages(), 1);
    }

    #[test]
    fn paginated_requires_overflow() {
        assert!(!ListSource::new(entries(5), 10).paginated());
        assert!(!ListSource::new(entries(10), 10).paginated());
        assert!(ListSource::new(entries(11), 10).paginated());
    }

    #[tokio::test]
    async fn footer_omitted_on_single_page() {
        let source = ListSource::new(entries(3), 10);
        let content = source.render_page(1).await;
        assert!(content.as_embed().unwrap().footer.is_none());
    }

    #[tokio::test]
    async fn footer_counts_pages_and_entries() {
        let source = ListSource::new(entries(10), 4);
        let content = source.render_page(2).await;
        let embed = content.as_embed().unwrap();
        assert_eq!(embed.footer.as_deref(), Some("Page 2/3 (10 entries)"));
        // Last page holds the remainder.
        let content = source.render_page(3).await;
        let body = content.as_embed().unwrap().description.clone().unwrap();
        assert_eq!(body.lines().count(), 2);
        assert!(body.starts_with("9. entry 8"));
    }
}
