//! Plain-text extraction from HTML and character-exact truncation.

use regex::Regex;
use std::sync::LazyLock;

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("script regex is valid")
});

static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("style regex is valid"));

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag regex is valid"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

/// Strip an HTML document down to its visible text.
///
/// Structural extraction only: drops `<script>`/`<style>` blocks, replaces
/// every remaining tag with a space, and collapses whitespace runs.
pub fn strip_html(html: &str) -> String {
    let text = SCRIPT_RE.replace_all(html, "");
    let text = STYLE_RE.replace_all(&text, "");
    let text = TAG_RE.replace_all(&text, " ");
    WHITESPACE_RE.replace_all(&text, " ").trim().to_string()
}

/// Truncate to at most `max` characters, appending `...` when content was cut.
///
/// Counts characters rather than bytes so multi-byte text never gets sliced
/// mid-codepoint.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max).collect();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_removes_scripts_and_styles() {
        let html = r#"<html><head><style>body { color: red; }</style></head>
            <body><script type="text/javascript">alert("hi");</script>
            <h1>Title</h1><p>Some <b>bold</b> text.</p></body></html>"#;

        let text = strip_html(html);
        assert_eq!(text, "Title Some bold text.");
        assert!(!text.contains("alert"));
        assert!(!text.contains("color"));
    }

    #[test]
    fn test_strip_handles_multiline_script() {
        let html = "<script>\nvar x = 1;\nvar y = 2;\n</script>visible";
        assert_eq!(strip_html(html), "visible");
    }

    #[test]
    fn test_strip_collapses_whitespace() {
        let html = "<div>  a\n\n   b\t c  </div>";
        assert_eq!(strip_html(html), "a b c");
    }

    #[test]
    fn test_truncate_exact_boundary() {
        let short = "a".repeat(600);
        assert_eq!(truncate_chars(&short, 600), short);

        let long = "a".repeat(601);
        let truncated = truncate_chars(&long, 600);
        assert_eq!(truncated.chars().count(), 603);
        assert!(truncated.ends_with("..."));
        assert_eq!(&truncated[..600], &long[..600]);
    }

    #[test]
    fn test_truncate_is_char_based() {
        let text = "é".repeat(10);
        let truncated = truncate_chars(&text, 5);
        assert_eq!(truncated, format!("{}...", "é".repeat(5)));
    }

    #[test]
    fn test_truncate_empty() {
        assert_eq!(truncate_chars("", 5000), "");
    }
}
