//! "Thinking" indicator shown while a reply is pending.

/// The dot count wraps once it reaches this many.
const MAX_DOTS: usize = 4;

/// Cycles the loader text through `.`, `..`, `...`, `` (empty).
#[derive(Debug, Clone, Default)]
pub struct LoaderState {
    dots: usize,
}

impl LoaderState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances one frame and returns the text to show.
    pub fn next_frame(&mut self) -> String {
        self.dots = (self.dots + 1) % MAX_DOTS;
        ".".repeat(self.dots)
    }
}
