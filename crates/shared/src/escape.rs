//! Escaping for untrusted text inserted into markup.

/// Escape `&`, `<` and `>` so broker payload text cannot inject markup.
///
/// Applied to every string that ends up inside the feed's HTML. This is a
/// security property of the feed, not cosmetics.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::escape_html;

    #[test]
    fn script_tags_cannot_survive() {
        let escaped = escape_html(r#"<script>alert("x")</script>"#);
        assert!(!escaped.contains('<'));
        assert!(!escaped.contains('>'));
        assert_eq!(escaped, r#"&lt;script&gt;alert("x")&lt;/script&gt;"#);
    }

    #[test]
    fn ampersand_is_escaped_first() {
        assert_eq!(escape_html("a & b &lt;"), "a &amp; b &amp;lt;");
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(escape_html("aula B3, 18:00"), "aula B3, 18:00");
    }
}
