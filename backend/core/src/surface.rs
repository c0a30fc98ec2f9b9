//! Display surfaces: where rendered markup ends up.
//!
//! A surface interprets appended markup (a browser element's inner HTML, a
//! terminal that styles tags). Writers must only ever hand it whole tag
//! tokens or plain characters; the surface never sees half a tag.

/// The operations the reveal and loader need from a display target.
pub trait DisplaySurface: Send {
    /// Append markup that the surface interprets (tags are rendered, not shown).
    fn append_markup(&mut self, markup: &str);

    /// Replace the whole content with literal text.
    fn set_text(&mut self, text: &str);

    /// Remove all content.
    fn clear(&mut self);
}

/// In-memory surface that keeps the interpreted content as a markup string.
///
/// Every append is also recorded as a separate commit so callers can check
/// what each write contained.
#[derive(Debug, Default, Clone)]
pub struct MarkupBuffer {
    content: String,
    commits: Vec<String>,
}

impl MarkupBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything currently on the surface.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Each append since the last clear, in order.
    pub fn commits(&self) -> &[String] {
        &self.commits
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl DisplaySurface for MarkupBuffer {
    fn append_markup(&mut self, markup: &str) {
        self.content.push_str(markup);
        self.commits.push(markup.to_string());
    }

    fn set_text(&mut self, text: &str) {
        self.clear();
        self.content.push_str(text);
    }

    fn clear(&mut self) {
        self.content.clear();
        self.commits.clear();
    }
}
