//! Lightweight markdown to HTML for chat replies.
//!
//! Handles headers, fenced code, inline code, bold, italic and flat
//! bullet/numbered lists through an ordered chain of regex passes. Anything
//! else in the text is left untouched.

pub mod passes;
pub mod transform;

pub use passes::{Pass, PASSES};
pub use transform::{render, render_with, TransformOptions};
