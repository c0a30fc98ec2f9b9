//! Raw bot text to rendered markup.

use tracing::trace;

use crate::passes::{escape_markup, PASSES};

/// Knobs for [`render_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformOptions {
    /// Entity-escape `&`, `<` and `>` in the raw text before any pass runs.
    /// Off by default: markup typed into a reply is rendered as-is.
    pub escape_input: bool,
}

/// Converts raw bot text to markup with default options.
///
/// Accepts `&str` or `Option<&str>`; empty and absent input both give `""`.
pub fn render<'a>(text: impl Into<Option<&'a str>>) -> String {
    render_with(text, TransformOptions::default())
}

/// Converts raw bot text to markup by running every pass in order.
pub fn render_with<'a>(text: impl Into<Option<&'a str>>, options: TransformOptions) -> String {
    let Some(text) = text.into().filter(|t| !t.is_empty()) else {
        return String::new();
    };

    let mut markup = if options.escape_input {
        escape_markup(text)
    } else {
        text.to_string()
    };
    for pass in PASSES {
        markup = (pass.apply)(&markup);
    }

    trace!(input_len = text.len(), output_len = markup.len(), "Rendered markdown");
    markup
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_absent_input_render_empty() {
        assert_eq!(render(""), "");
        assert_eq!(render(None::<&str>), "");
    }

    #[test]
    fn single_header_document() {
        // The paragraph pass trims the header's trailing line break.
        assert_eq!(render("# Title"), "<h1>Title</h1>");
    }

    #[test]
    fn header_then_text_splits_into_blocks() {
        assert_eq!(render("# Title\nHello"), "<h1>Title</h1>\n<p>Hello</p>");
    }

    #[test]
    fn bold_and_italic_do_not_interfere() {
        let out = render("**bold** and *italic*");
        assert_eq!(out.matches("<strong>bold</strong>").count(), 1);
        assert_eq!(out.matches("<em>italic</em>").count(), 1);
        assert_eq!(out.matches("<em>").count(), 1);
        assert_eq!(out, "<p><strong>bold</strong> and <em>italic</em></p>");
    }

    #[test]
    fn fenced_code_with_language() {
        assert_eq!(
            render("```js\nlet x=1;\n```"),
            "<pre class=\"code-block js\"><code>let x=1;</code></pre>"
        );
    }

    #[test]
    fn inline_code_pass_reaches_into_fence_bodies() {
        let out = render("```\na `b` c\n```");
        assert_eq!(
            out,
            "<pre class=\"code-block \"><code>a <code>b</code> c</code></pre>"
        );
    }

    #[test]
    fn list_flattening() {
        let out = render("- a\n- b");
        assert_eq!(
            out,
            "<div class='list-item'>a</div>\n<div class='list-item'>b</div>"
        );
        assert_eq!(out.matches("<div class='list-item'>").count(), 2);
        assert!(!out.contains("- "));
    }

    #[test]
    fn star_bullets_survive_italic_pass() {
        assert_eq!(
            render("* one\n* two"),
            "<div class='list-item'>one</div>\n<div class='list-item'>two</div>"
        );
    }

    #[test]
    fn numbered_list_with_bold() {
        assert_eq!(
            render("1. **Step** one\n2. two"),
            "<div class='list-item'><strong>Step</strong> one</div>\n<div class='list-item'>two</div>"
        );
    }

    #[test]
    fn paragraph_wrap_skip_rule() {
        let out = render("plain text\n\n`code` first\n\n## Head");
        let blocks: Vec<_> = out.split('\n').collect();
        assert_eq!(
            blocks,
            ["<p>plain text</p>", "<code>code</code> first", "<h2>Head</h2>"]
        );
    }

    #[test]
    fn mixed_reply() {
        let raw = "## Summary\n\nHere is **one** idea:\n\n- use `cargo`\n- read *docs*";
        assert_eq!(
            render(raw),
            "<h2>Summary</h2>\n<p>Here is <strong>one</strong> idea:</p>\n\
             <div class='list-item'>use <code>cargo</code></div>\n\
             <div class='list-item'>read <em>docs</em></div>"
        );
    }

    #[test]
    fn raw_markup_passes_through_by_default() {
        assert_eq!(render("<b>hi</b>"), "<b>hi</b>");
    }

    #[test]
    fn escaping_neutralises_raw_markup() {
        let opts = TransformOptions { escape_input: true };
        assert_eq!(render_with("<b>hi</b>", opts), "<p>&lt;b&gt;hi&lt;/b&gt;</p>");
        assert_eq!(render_with("# a < b", opts), "<h1>a &lt; b</h1>");
    }

    #[test]
    fn rendering_is_idempotent_per_input() {
        let raw = "# T\n\n**b** *i* `c`\n\n1. x";
        assert_eq!(render(raw), render(raw));
    }
}
