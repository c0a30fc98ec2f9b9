//! Tag-aware reveal state machine.
//!
//! One [`RevealState`] walks one rendered markup string, a character per
//! [`RevealState::step`]. Plain characters are committed immediately; a tag
//! token (`<` up to the next `>`) is held back in a scratch buffer and
//! committed in one piece, so a display surface never sees half a tag.

/// Where the scanner currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No character consumed yet.
    Idle,
    InPlainText,
    /// Between a `<` and its closing `>`.
    InTag,
    Done,
}

/// Outcome of a single step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// Append this to the surface: one plain character or a whole tag token.
    Commit(String),
    /// A character went into the tag scratch; nothing to write yet.
    Buffered,
    /// The markup is exhausted. Further steps keep returning `Done`.
    Done,
}

#[derive(Debug, Clone)]
pub struct RevealState {
    markup: String,
    /// Byte offset of the next character to consume.
    cursor: usize,
    committed: String,
    tag_scratch: String,
    phase: Phase,
}

impl RevealState {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
            cursor: 0,
            committed: String::new(),
            tag_scratch: String::new(),
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Everything committed so far.
    pub fn committed(&self) -> &str {
        &self.committed
    }

    /// The tag token currently being assembled.
    pub fn pending_tag(&self) -> &str {
        &self.tag_scratch
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Consumes one character and reports what, if anything, to write.
    pub fn step(&mut self) -> Tick {
        if self.phase == Phase::Done {
            return Tick::Done;
        }
        let Some(c) = self.markup[self.cursor..].chars().next() else {
            // An unterminated tag never reaches the surface.
            self.tag_scratch.clear();
            self.phase = Phase::Done;
            return Tick::Done;
        };
        self.cursor += c.len_utf8();

        match (self.phase, c) {
            (Phase::InTag, '>') => {
                self.tag_scratch.push(c);
                self.phase = Phase::InPlainText;
                let tag = std::mem::take(&mut self.tag_scratch);
                self.committed.push_str(&tag);
                Tick::Commit(tag)
            }
            (Phase::InTag, _) => {
                self.tag_scratch.push(c);
                Tick::Buffered
            }
            (_, '<') => {
                self.tag_scratch.push(c);
                self.phase = Phase::InTag;
                Tick::Buffered
            }
            _ => {
                self.phase = Phase::InPlainText;
                self.committed.push(c);
                Tick::Commit(c.to_string())
            }
        }
    }

    /// Steps until done, returning the commits in order.
    pub fn drain(&mut self) -> Vec<String> {
        let mut commits = Vec::new();
        loop {
            match self.step() {
                Tick::Commit(chunk) => commits.push(chunk),
                Tick::Buffered => {}
                Tick::Done => return commits,
            }
        }
    }
}
