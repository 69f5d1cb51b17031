//! Word-level edit script between two strings.
//!
//! Tokens are runs of word characters, runs of whitespace, and single
//! punctuation characters. Alignment is a longest-common-subsequence over
//! tokens after trimming the shared prefix and suffix.

/// Above this many DP cells the middle section is reported as one removal plus one insertion.
pub const MAX_LCS_CELLS: usize = 4_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Equal,
    Added,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffSpan {
    pub kind: SpanKind,
    pub value: String,
}

impl DiffSpan {
    fn new(kind: SpanKind, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[derive(PartialEq, Eq, Clone, Copy)]
enum CharClass {
    Word,
    Space,
    Punct,
}

fn classify(c: char) -> CharClass {
    if c.is_alphanumeric() || c == '_' {
        CharClass::Word
    } else if c.is_whitespace() {
        CharClass::Space
    } else {
        CharClass::Punct
    }
}

/// Split text into diff tokens; concatenating the tokens yields the input.
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut current: Option<CharClass> = None;

    for (idx, c) in text.char_indices() {
        let class = classify(c);
        match current {
            Some(prev) if prev == class && class != CharClass::Punct => {}
            Some(_) => {
                tokens.push(&text[start..idx]);
                start = idx;
            }
            None => {}
        }
        current = Some(class);
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

/// Compute the word-level diff of `old` against `new`.
pub fn diff_words(old: &str, new: &str) -> Vec<DiffSpan> {
    let old_tokens = tokenize(old);
    let new_tokens = tokenize(new);

    let prefix = old_tokens
        .iter()
        .zip(new_tokens.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old_tokens[prefix..]
        .iter()
        .rev()
        .zip(new_tokens[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let old_mid = &old_tokens[prefix..old_tokens.len() - suffix];
    let new_mid = &new_tokens[prefix..new_tokens.len() - suffix];

    let mut ops: Vec<(SpanKind, &str)> = Vec::with_capacity(old_tokens.len() + new_tokens.len());
    ops.extend(old_tokens[..prefix].iter().map(|t| (SpanKind::Equal, *t)));
    align_middle(old_mid, new_mid, &mut ops);
    ops.extend(
        old_tokens[old_tokens.len() - suffix..]
            .iter()
            .map(|t| (SpanKind::Equal, *t)),
    );

    coalesce(ops)
}

fn align_middle<'a>(old: &[&'a str], new: &[&'a str], ops: &mut Vec<(SpanKind, &'a str)>) {
    let m = old.len();
    let n = new.len();

    if m == 0 {
        ops.extend(new.iter().map(|t| (SpanKind::Added, *t)));
        return;
    }
    if n == 0 {
        ops.extend(old.iter().map(|t| (SpanKind::Removed, *t)));
        return;
    }
    if (m + 1).saturating_mul(n + 1) > MAX_LCS_CELLS {
        ops.extend(old.iter().map(|t| (SpanKind::Removed, *t)));
        ops.extend(new.iter().map(|t| (SpanKind::Added, *t)));
        return;
    }

    let mut dp = vec![vec![0u32; n + 1]; m + 1];
    for i in (0..m).rev() {
        for j in (0..n).rev() {
            if old[i] == new[j] {
                dp[i][j] = dp[i + 1][j + 1] + 1;
            } else {
                dp[i][j] = dp[i + 1][j].max(dp[i][j + 1]);
            }
        }
    }

    let mut i = 0usize;
    let mut j = 0usize;
    while i < m && j < n {
        if old[i] == new[j] {
            ops.push((SpanKind::Equal, old[i]));
            i += 1;
            j += 1;
        } else if dp[i + 1][j] >= dp[i][j + 1] {
            ops.push((SpanKind::Removed, old[i]));
            i += 1;
        } else {
            ops.push((SpanKind::Added, new[j]));
            j += 1;
        }
    }
    ops.extend(old[i..].iter().map(|t| (SpanKind::Removed, *t)));
    ops.extend(new[j..].iter().map(|t| (SpanKind::Added, *t)));
}

/// Merge runs of equal kind; within a changed run, removals come before additions.
fn coalesce(ops: Vec<(SpanKind, &str)>) -> Vec<DiffSpan> {
    let mut spans: Vec<DiffSpan> = Vec::new();
    let mut removed = String::new();
    let mut added = String::new();

    let flush = |spans: &mut Vec<DiffSpan>, removed: &mut String, added: &mut String| {
        if !removed.is_empty() {
            spans.push(DiffSpan::new(SpanKind::Removed, removed));
            removed.clear();
        }
        if !added.is_empty() {
            spans.push(DiffSpan::new(SpanKind::Added, added));
            added.clear();
        }
    };

    for (kind, token) in ops {
        match kind {
            SpanKind::Removed => removed.push_str(token),
            SpanKind::Added => added.push_str(token),
            SpanKind::Equal => {
                flush(&mut spans, &mut removed, &mut added);
                match spans.last_mut() {
                    Some(last) if last.kind == SpanKind::Equal => last.value.push_str(token),
                    _ => spans.push(DiffSpan::new(SpanKind::Equal, token)),
                }
            }
        }
    }
    flush(&mut spans, &mut removed, &mut added);
    spans
}
