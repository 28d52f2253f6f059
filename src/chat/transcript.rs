//! Per-topic transcript in its two renderings.

use std::fmt::Write;

/// The accumulated messages of one topic, kept as HTML and as plain text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    html: String,
    plain: String,
}

impl Transcript {
    /// HTML rendering: one `<p>user: content</p>` per message.
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Plain rendering: one `user: content\r\n` line per message.
    pub fn plain(&self) -> &str {
        &self.plain
    }

    /// Append one message to both renderings. Empty content appends nothing.
    pub(crate) fn push(&mut self, user: &str, content: &str) -> bool {
        if content.is_empty() {
            return false;
        }
        let _ = write!(
            self.html,
            "<p>{}: {}</p>",
            escape_html(user),
            escape_html(content)
        );
        let _ = write!(self.plain, "{}: {}\r\n", user, content);
        true
    }
}

/// Escape text for inclusion in HTML element content or a quoted attribute.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_formats_both_renderings() {
        let mut t = Transcript::default();
        assert!(t.push("Alice", "Hello"));
        assert!(t.push("Bob", "Hi"));
        assert_eq!(t.html(), "<p>Alice: Hello</p><p>Bob: Hi</p>");
        assert_eq!(t.plain(), "Alice: Hello\r\nBob: Hi\r\n");
    }

    #[test]
    fn empty_content_is_ignored() {
        let mut t = Transcript::default();
        assert!(!t.push("Alice", ""));
        assert_eq!(t, Transcript::default());
    }

    #[test]
    fn html_is_escaped_plain_is_verbatim() {
        let mut t = Transcript::default();
        t.push("<b>", "<script>alert('x')</script> & co");
        assert_eq!(
            t.html(),
            "<p>&lt;b&gt;: &lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; co</p>"
        );
        assert_eq!(t.plain(), "<b>: <script>alert('x')</script> & co\r\n");
    }

    #[test]
    fn escape_handles_quotes() {
        assert_eq!(escape_html(r#"a"b"#), "a&quot;b");
        assert_eq!(escape_html("plain"), "plain");
    }
}
