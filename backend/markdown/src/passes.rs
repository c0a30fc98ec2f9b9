//! The individual rewrite passes of the markdown transform.
//!
//! Each pass is a pure `&str -> String` function. They are applied in the
//! order of [`PASSES`]; a later pass sees the markup produced by earlier ones,
//! so the order is part of the output contract.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mR)^(#{1,6})\s*(.+)$").unwrap());
static CODE_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```([A-Za-z0-9_]+)?\n((?s:.*?))```").unwrap());
static INLINE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());
static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*([^*\n]+)\*\*").unwrap());
static ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*([^*\n]+)\*").unwrap());
static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mR)^[•\-*]\s+(.+)$").unwrap());
static NUMBERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mR)^[0-9]+\.\s+(.+)$").unwrap());

/// Separator between paragraph blocks.
const BLOCK_SEPARATOR: &str = "\n\n";

/// A named, order-sensitive rewrite step.
#[derive(Clone, Copy)]
pub struct Pass {
    pub name: &'static str,
    pub apply: fn(&str) -> String,
}

/// The transform pipeline, in application order.
pub const PASSES: [Pass; 8] = [
    Pass { name: "headers", apply: headers },
    Pass { name: "code_blocks", apply: code_blocks },
    Pass { name: "inline_code", apply: inline_code },
    Pass { name: "bold", apply: bold },
    Pass { name: "italic", apply: italic },
    Pass { name: "bullet_lists", apply: bullet_lists },
    Pass { name: "numbered_lists", apply: numbered_lists },
    Pass { name: "paragraphs", apply: paragraphs },
];

/// `# Title` lines become `<h1>Title</h1>` followed by a line break.
pub fn headers(text: &str) -> String {
    HEADER_RE
        .replace_all(text, |caps: &Captures| {
            let level = caps[1].len();
            format!("<h{level}>{}</h{level}>\n", caps[2].trim())
        })
        .into_owned()
}

/// Triple-backtick fences become `<pre class="code-block LANG"><code>..</code></pre>`.
pub fn code_blocks(text: &str) -> String {
    CODE_FENCE_RE
        .replace_all(text, |caps: &Captures| {
            let language = caps.get(1).map_or("", |m| m.as_str());
            format!(
                "<pre class=\"code-block {language}\"><code>{}</code></pre>\n",
                caps[2].trim()
            )
        })
        .into_owned()
}

pub fn inline_code(text: &str) -> String {
    INLINE_CODE_RE
        .replace_all(text, "<code>${1}</code>")
        .into_owned()
}

pub fn bold(text: &str) -> String {
    BOLD_RE
        .replace_all(text, "<strong>${1}</strong>")
        .into_owned()
}

pub fn italic(text: &str) -> String {
    ITALIC_RE.replace_all(text, "<em>${1}</em>").into_owned()
}

/// `•`, `-` and `*` bullets become flat list-item divs without the marker.
pub fn bullet_lists(text: &str) -> String {
    BULLET_RE
        .replace_all(text, "<div class='list-item'>${1}</div>")
        .into_owned()
}

/// `1.` style items become the same list-item divs as bullets.
pub fn numbered_lists(text: &str) -> String {
    NUMBERED_RE
        .replace_all(text, "<div class='list-item'>${1}</div>")
        .into_owned()
}

/// Wraps every blank-line separated block that is not already an element
/// in `<p>`. Empty blocks still take a slot in the join.
pub fn paragraphs(text: &str) -> String {
    text.split(BLOCK_SEPARATOR)
        .map(|block| {
            let block = block.trim();
            if block.is_empty() {
                String::new()
            } else if block.starts_with('<') {
                block.to_string()
            } else {
                format!("<p>{block}</p>")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Entity-escapes the characters that would otherwise reach the surface as
/// live markup. Runs before the pipeline when input escaping is enabled.
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_levels_follow_hash_count() {
        assert_eq!(headers("# Title"), "<h1>Title</h1>\n");
        assert_eq!(headers("###   Deep  "), "<h3>Deep</h3>\n");
        assert_eq!(headers("###### Six"), "<h6>Six</h6>\n");
    }

    #[test]
    fn seven_hashes_keep_the_extra_one_in_content() {
        assert_eq!(headers("####### x"), "<h6># x</h6>\n");
    }

    #[test]
    fn header_matches_each_line_independently() {
        assert_eq!(
            headers("# One\ntext\n## Two"),
            "<h1>One</h1>\n\ntext\n<h2>Two</h2>\n"
        );
    }

    #[test]
    fn header_ignores_carriage_return() {
        assert_eq!(headers("# Title\r\nbody"), "<h1>Title</h1>\n\r\nbody");
    }

    #[test]
    fn lone_hash_heads_the_following_line() {
        assert_eq!(headers("#\nfoo"), "<h1>foo</h1>\n");
    }

    #[test]
    fn hash_mid_line_is_not_a_header() {
        assert_eq!(headers("issue #4"), "issue #4");
    }

    #[test]
    fn code_fence_with_language() {
        assert_eq!(
            code_blocks("```js\nlet x=1;\n```"),
            "<pre class=\"code-block js\"><code>let x=1;</code></pre>\n"
        );
    }

    #[test]
    fn code_fence_without_language_keeps_class_slot() {
        assert_eq!(
            code_blocks("```\n  a\n  b  \n```"),
            "<pre class=\"code-block \"><code>a\n  b</code></pre>\n"
        );
    }

    #[test]
    fn code_fence_ends_at_first_closing_fence() {
        let out = code_blocks("```\none\n``` mid ```\ntwo\n```");
        assert!(out.starts_with("<pre class=\"code-block \"><code>one</code></pre>\n mid "));
        assert!(out.ends_with("<pre class=\"code-block \"><code>two</code></pre>\n"));
    }

    #[test]
    fn code_fence_needs_line_break_after_label() {
        assert_eq!(code_blocks("```js let x```"), "```js let x```");
    }

    #[test]
    fn inline_code_is_verbatim() {
        assert_eq!(inline_code("run ` ls -la ` now"), "run <code> ls -la </code> now");
    }

    #[test]
    fn inline_code_may_span_lines() {
        assert_eq!(inline_code("a `b\nc` d"), "a <code>b\nc</code> d");
    }

    #[test]
    fn bold_and_italic_do_not_cross_lines() {
        assert_eq!(bold("**a\nb**"), "**a\nb**");
        assert_eq!(italic("*a\nb*"), "*a\nb*");
    }

    #[test]
    fn bold_runs_before_italic() {
        let out = italic(&bold("**bold** and *italic*"));
        assert_eq!(out, "<strong>bold</strong> and <em>italic</em>");
    }

    #[test]
    fn bullets_drop_marker() {
        assert_eq!(
            bullet_lists("- a\n* b\n• c"),
            "<div class='list-item'>a</div>\n<div class='list-item'>b</div>\n<div class='list-item'>c</div>"
        );
    }

    #[test]
    fn bullet_requires_whitespace_after_marker() {
        assert_eq!(bullet_lists("-a"), "-a");
    }

    #[test]
    fn numbered_items_drop_numeral() {
        assert_eq!(
            numbered_lists("1. first\n12. twelfth\n3 no"),
            "<div class='list-item'>first</div>\n<div class='list-item'>twelfth</div>\n3 no"
        );
    }

    #[test]
    fn paragraphs_skip_elements_and_keep_empty_slots() {
        assert_eq!(paragraphs("a\n\n<h1>x</h1>\n"), "<p>a</p>\n<h1>x</h1>");
        assert_eq!(paragraphs("a\n\n\n\nb"), "<p>a</p>\n\n<p>b</p>");
        assert_eq!(paragraphs("  \n\n"), "\n");
    }

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(escape_markup("a<b>&c"), "a&lt;b&gt;&amp;c");
    }

    #[test]
    fn pipeline_order_is_fixed() {
        let names: Vec<_> = PASSES.iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            [
                "headers",
                "code_blocks",
                "inline_code",
                "bold",
                "italic",
                "bullet_lists",
                "numbered_lists",
                "paragraphs"
            ]
        );
    }
}
