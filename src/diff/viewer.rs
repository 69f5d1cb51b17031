//! Two-state diff toggle over rendered description markup.

use scraper::{Html, Selector};
use tracing::debug;

use super::render::render_spans;
use super::words::{diff_words, SpanKind};

/// A paragraph or list item of a description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub tag: String,
    pub text: String,
}

/// A block whose content has been replaced by diff markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedBlock {
    pub tag: String,
    pub html: String,
}

impl AnnotatedBlock {
    fn to_html(&self) -> String {
        format!("<{tag}>{}</{tag}>", self.html, tag = self.tag)
    }
}

/// Annotated new description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotatedDescription {
    /// One entry per block of the new description.
    pub blocks: Vec<AnnotatedBlock>,
    /// Old blocks past the end of the new description, rendered as removed.
    pub removed_tail: Vec<AnnotatedBlock>,
}

impl AnnotatedDescription {
    pub fn to_html(&self) -> String {
        self.blocks
            .iter()
            .chain(self.removed_tail.iter())
            .map(AnnotatedBlock::to_html)
            .collect()
    }

    /// Whether any block carries an `added` or `removed` marker.
    pub fn has_markers(&self) -> bool {
        self.blocks
            .iter()
            .chain(self.removed_tail.iter())
            .any(|b| b.html.contains(r#"class="added""#) || b.html.contains(r#"class="removed""#))
    }
}

/// Collect the `p` and `li` blocks of a description fragment, in document order.
pub fn extract_blocks(html: &str) -> Vec<Block> {
    let selector = match Selector::parse("p, li") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };
    let fragment = Html::parse_fragment(html);

    fragment
        .select(&selector)
        .map(|element| Block {
            tag: element.value().name().to_string(),
            text: element.text().collect(),
        })
        .collect()
}

/// Diff new block `i` against old block `i` (or the empty string).
pub fn diff_blocks(old: &[Block], new: &[Block]) -> AnnotatedDescription {
    let blocks = new
        .iter()
        .enumerate()
        .map(|(idx, block)| {
            let old_text = old.get(idx).map(|b| b.text.as_str()).unwrap_or("");
            AnnotatedBlock {
                tag: block.tag.clone(),
                html: render_spans(&diff_words(old_text, &block.text)),
            }
        })
        .collect();

    let removed_tail = old
        .iter()
        .skip(new.len())
        .filter(|block| !block.text.is_empty())
        .map(|block| AnnotatedBlock {
            tag: block.tag.clone(),
            html: render_spans(&diff_words(&block.text, "")),
        })
        .collect();

    AnnotatedDescription {
        blocks,
        removed_tail,
    }
}

/// What the description area currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffView<'a> {
    Original {
        old_html: &'a str,
        new_html: &'a str,
    },
    Annotated {
        old_html: &'a str,
        diff: &'a AnnotatedDescription,
    },
}

/// Diff button state for one change.
#[derive(Debug, Clone)]
pub struct DiffViewer {
    old_html: String,
    new_html: String,
    annotated: Option<AnnotatedDescription>,
    showing_diff: bool,
}

impl DiffViewer {
    /// Capture the original markup before anything is annotated.
    pub fn new(old_html: impl Into<String>, new_html: impl Into<String>) -> Self {
        Self {
            old_html: old_html.into(),
            new_html: new_html.into(),
            annotated: None,
            showing_diff: false,
        }
    }

    pub fn is_unchanged(&self) -> bool {
        self.old_html == self.new_html
    }

    pub fn is_showing_diff(&self) -> bool {
        self.showing_diff
    }

    /// Flip between annotated and original markup. No-op when both sides are identical.
    pub fn toggle(&mut self) -> DiffView<'_> {
        if self.is_unchanged() {
            debug!("Descriptions are identical, nothing to diff");
            return self.view();
        }

        if self.showing_diff {
            self.showing_diff = false;
        } else {
            if self.annotated.is_none() {
                let old_blocks = extract_blocks(&self.old_html);
                let new_blocks = extract_blocks(&self.new_html);
                self.annotated = Some(diff_blocks(&old_blocks, &new_blocks));
            }
            self.showing_diff = true;
        }
        self.view()
    }

    pub fn view(&self) -> DiffView<'_> {
        match (&self.annotated, self.showing_diff) {
            (Some(diff), true) => DiffView::Annotated {
                old_html: &self.old_html,
                diff,
            },
            _ => DiffView::Original {
                old_html: &self.old_html,
                new_html: &self.new_html,
            },
        }
    }
}

/// Count of spans of a kind across a description, for summaries.
pub fn count_changed_words(old: &[Block], new: &[Block]) -> (usize, usize) {
    let mut added = 0;
    let mut removed = 0;
    for (idx, block) in new.iter().enumerate() {
        let old_text = old.get(idx).map(|b| b.text.as_str()).unwrap_or("");
        for span in diff_words(old_text, &block.text) {
            let words = span.value.split_whitespace().count();
            match span.kind {
                SpanKind::Added => added += words,
                SpanKind::Removed => removed += words,
                SpanKind::Equal => {}
            }
        }
    }
    (added, removed)
}
