//! Description diff viewer.
//!
//! Compares the old and new technique description block by block and renders
//! word-level changes as `added` / `removed` spans.

mod render;
mod viewer;
mod words;

pub use render::{escape_html, render_spans};
pub use viewer::{
    count_changed_words, diff_blocks, extract_blocks, AnnotatedBlock, AnnotatedDescription, Block,
    DiffView, DiffViewer,
};
pub use words::{diff_words, tokenize, DiffSpan, SpanKind, MAX_LCS_CELLS};
