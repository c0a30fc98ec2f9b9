//! Terminal output: ANSI helpers, notes, and a display surface that renders
//! widget markup as styled terminal text.

use std::io::Write;

use chatwidget_core::DisplaySurface;
use tracing::debug;

// ---------------------------------------------------------------------------
// ANSI Color/Style helpers
// ---------------------------------------------------------------------------

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const ITALIC: &str = "\x1b[3m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

const HEADER_STYLE: &str = "\x1b[1;36m";

/// Return to column 0 and erase the line.
const CLEAR_LINE: &str = "\r\x1b[2K";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM")
                .map(|t| t != "dumb")
                .unwrap_or(false))
}

/// Strip ANSI escape codes from a string.
#[cfg(test)]
pub fn strip_ansi(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // Skip to the final byte of the sequence
            for next in chars.by_ref() {
                if next.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}

// ---------------------------------------------------------------------------
// Formatted notes
// ---------------------------------------------------------------------------

pub fn note_info(msg: &str) {
    if supports_color() {
        println!("{CYAN}{BOLD}ℹ{RESET} {msg}");
    } else {
        println!("INFO: {msg}");
    }
}

pub fn note_error(msg: &str) {
    if supports_color() {
        eprintln!("{RED}{BOLD}✗{RESET} {msg}");
    } else {
        eprintln!("ERROR: {msg}");
    }
}

pub fn note_success(msg: &str) {
    if supports_color() {
        println!("{GREEN}{BOLD}✓{RESET} {msg}");
    } else {
        println!("OK: {msg}");
    }
}

/// Prompt marker printed before the user's input.
pub fn user_prompt_marker() -> String {
    if supports_color() {
        format!("{YELLOW}{BOLD}›{RESET} ")
    } else {
        "> ".to_string()
    }
}

/// Write a chunk and flush so it shows up immediately.
pub fn stream_write(writer: &mut impl Write, chunk: &str) -> std::io::Result<()> {
    writer.write_all(chunk.as_bytes())?;
    writer.flush()
}

// ---------------------------------------------------------------------------
// Terminal surface
// ---------------------------------------------------------------------------

/// Splits a tag token into (name, is_closing): `</h2>` → ("h2", true).
fn tag_name(token: &str) -> (&str, bool) {
    let inner = token.trim_start_matches('<').trim_end_matches('>');
    let (inner, closing) = match inner.strip_prefix('/') {
        Some(rest) => (rest, true),
        None => (inner, false),
    };
    let name = inner
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or_default();
    (name, closing)
}

/// Longest entity the surface decodes, `&amp;`.
const MAX_ENTITY_LEN: usize = 5;

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "&amp;" => Some('&'),
        "&lt;" => Some('<'),
        "&gt;" => Some('>'),
        _ => None,
    }
}

/// A display surface that interprets widget markup for a terminal.
///
/// Whole tag tokens map to ANSI styles (or to nothing when color is off).
/// Plain characters are written through, except that `&amp;`, `&lt;` and
/// `&gt;` arrive one character at a time and are held until they can be
/// decoded. Block boundaries come from the line breaks already in the
/// markup, so closing tags never add one.
pub struct TerminalSurface<W: Write + Send> {
    writer: W,
    color: bool,
    entity: String,
}

impl TerminalSurface<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout(), supports_color())
    }
}

impl<W: Write + Send> TerminalSurface<W> {
    pub fn new(writer: W, color: bool) -> Self {
        Self {
            writer,
            color,
            entity: String::new(),
        }
    }

    #[cfg(test)]
    pub fn into_inner(mut self) -> W {
        self.flush_entity();
        self.writer
    }

    /// Writes a held partial entity as literal text.
    fn flush_entity(&mut self) {
        if !self.entity.is_empty() {
            let pending = std::mem::take(&mut self.entity);
            self.write(&pending);
        }
    }

    fn write_plain(&mut self, text: &str) {
        for c in text.chars() {
            if self.entity.is_empty() {
                if c == '&' {
                    self.entity.push(c);
                } else {
                    self.write(c.encode_utf8(&mut [0; 4]));
                }
                continue;
            }

            if c == ';' {
                self.entity.push(c);
                let entity = std::mem::take(&mut self.entity);
                match decode_entity(&entity) {
                    Some(decoded) => self.write(decoded.encode_utf8(&mut [0; 4])),
                    None => self.write(&entity),
                }
            } else if c.is_ascii_alphabetic() && self.entity.len() < MAX_ENTITY_LEN - 1 {
                self.entity.push(c);
            } else {
                self.flush_entity();
                self.write_plain(c.encode_utf8(&mut [0; 4]));
            }
        }
    }

    fn write(&mut self, chunk: &str) {
        if let Err(e) = stream_write(&mut self.writer, chunk) {
            debug!(error = %e, "Terminal write failed");
        }
    }

    fn style_for(&self, token: &str) -> &'static str {
        let (name, closing) = tag_name(token);
        match (name, closing) {
            ("div", false) => "  • ",
            ("pre", false) => "\n",
            _ if !self.color => "",
            ("h1" | "h2" | "h3" | "h4" | "h5" | "h6", false) => HEADER_STYLE,
            ("strong", false) => BOLD,
            ("em", false) => ITALIC,
            ("code", false) => DIM,
            ("h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "strong" | "em" | "code", true) => RESET,
            _ => "",
        }
    }
}

impl<W: Write + Send> DisplaySurface for TerminalSurface<W> {
    fn append_markup(&mut self, markup: &str) {
        if markup.starts_with('<') && markup.ends_with('>') && markup.len() > 1 {
            self.flush_entity();
            let styled = self.style_for(markup);
            if !styled.is_empty() {
                self.write(styled);
            }
        } else {
            self.write_plain(markup);
        }
    }

    fn set_text(&mut self, text: &str) {
        self.entity.clear();
        self.write(&format!("{CLEAR_LINE}{text}"));
    }

    fn clear(&mut self) {
        self.entity.clear();
        self.write(CLEAR_LINE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_through(markup_commits: &[&str], color: bool) -> String {
        let mut surface = TerminalSurface::new(Vec::new(), color);
        for commit in markup_commits {
            surface.append_markup(commit);
        }
        String::from_utf8(surface.into_inner()).unwrap()
    }

    #[test]
    fn strips_ansi() {
        let colored = format!("{GREEN}hello{RESET}{CLEAR_LINE}");
        assert_eq!(strip_ansi(&colored), "hello\r");
    }

    #[test]
    fn parses_tag_names() {
        assert_eq!(tag_name("<h2>"), ("h2", false));
        assert_eq!(tag_name("</strong>"), ("strong", true));
        assert_eq!(tag_name("<div class='list-item'>"), ("div", false));
        assert_eq!(tag_name("<pre class=\"code-block js\">"), ("pre", false));
    }

    #[test]
    fn renders_styles_with_color() {
        let out = render_through(&["<strong>", "h", "i", "</strong>"], true);
        assert_eq!(out, format!("{BOLD}hi{RESET}"));
    }

    #[test]
    fn renders_plain_without_color() {
        let out = render_through(
            &["<div class='list-item'>", "a", "</div>", "\n", "<p>", "b", "</p>"],
            false,
        );
        assert_eq!(out, "  • a\nb");
    }

    #[test]
    fn stray_angle_bracket_is_text() {
        assert_eq!(render_through(&[">"], false), ">");
    }

    #[test]
    fn set_text_rewrites_the_line() {
        let mut surface = TerminalSurface::new(Vec::new(), false);
        surface.set_text("..");
        surface.clear();
        let out = String::from_utf8(surface.into_inner()).unwrap();
        assert_eq!(strip_ansi(&out), "\r..\r");
    }

    fn reveal_through(markup: &str) -> String {
        let commits = chatwidget_reveal::RevealState::new(markup).drain();
        let commits: Vec<&str> = commits.iter().map(String::as_str).collect();
        render_through(&commits, false)
    }

    #[test]
    fn escaped_reply_shows_literal_brackets() {
        let markup = chatwidget_markdown::render_with(
            "use <b> & <i> here",
            chatwidget_markdown::TransformOptions { escape_input: true },
        );
        assert_eq!(markup, "<p>use &lt;b&gt; &amp; &lt;i&gt; here</p>");
        assert_eq!(reveal_through(&markup), "use <b> & <i> here");
    }

    #[test]
    fn bare_ampersand_passes_through() {
        assert_eq!(reveal_through("<p>AT&T & co</p>"), "AT&T & co");
        assert_eq!(reveal_through("<p>a &&lt; b</p>"), "a &< b");
    }

    #[test]
    fn unknown_entity_is_written_verbatim() {
        assert_eq!(reveal_through("<p>&nbsp;x &quot;</p>"), "&nbsp;x &quot;");
    }

    #[test]
    fn partial_entity_is_flushed_by_next_tag() {
        assert_eq!(reveal_through("<p>tail &am</p>"), "tail &am");
    }

    #[test]
    fn block_breaks_come_from_markup_only() {
        let markup = chatwidget_markdown::render("# Title\n\nbody\n\n- a\n- b");
        assert_eq!(reveal_through(&markup), "Title\nbody\n  • a\n  • b");
    }
}
