//! HTML rendering of diff spans.

use super::words::{DiffSpan, SpanKind};

/// Escape text for use as HTML element content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Unchanged text stays plain, changes are wrapped in `added` / `removed` spans.
pub fn render_spans(spans: &[DiffSpan]) -> String {
    let mut html = String::new();
    for span in spans {
        let value = escape_html(&span.value);
        match span.kind {
            SpanKind::Equal => html.push_str(&value),
            SpanKind::Added => {
                html.push_str(r#"<span class="added">"#);
                html.push_str(&value);
                html.push_str("</span>");
            }
            SpanKind::Removed => {
                html.push_str(r#"<span class="removed">"#);
                html.push_str(&value);
                html.push_str("</span>");
            }
        }
    }
    html
}
