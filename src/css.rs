//! Custom stylesheet sanitization.
//!
//! Operator-supplied CSS is stored once and later emitted verbatim inside a
//! `<style>` block, so everything that could leave the style context or pull in
//! script and network resources is stripped before it reaches storage:
//!
//! 1. `<style ...> ... </style>` elements, then any stray `<style`/`</style` tag
//! 2. `@import url(`, `expression(` and `url(` (whitespace allowed before `(`)
//! 3. the `javascript:` scheme marker
//!
//! All matching is case-insensitive. The passes run once; if removing one match
//! spliced together a new one, the whole input is rejected and the result is
//! empty.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

fn style_element_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style>").expect("Invalid regex"))
}

fn style_tag_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(?i)</?style[^>]*>?").expect("Invalid regex"))
}

fn css_function_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?i)@import\s+url\s*\(|expression\s*\(|url\s*\(").expect("Invalid regex")
    })
}

fn javascript_scheme_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(?i)javascript:").expect("Invalid regex"))
}

fn sanitize_once(css: &str) -> String {
    let css = style_element_regex().replace_all(css, "");
    let css = style_tag_regex().replace_all(&css, "");
    let css = css_function_regex().replace_all(&css, "");
    javascript_scheme_regex().replace_all(&css, "").into_owned()
}

fn contains_blocked(css: &str) -> bool {
    style_tag_regex().is_match(css)
        || css_function_regex().is_match(css)
        || javascript_scheme_regex().is_match(css)
}

/// Strips blocked constructs from untrusted CSS. Never fails; the worst case
/// is an empty string. Runs in time linear in the input length.
pub fn sanitize(raw: &str) -> String {
    let css = sanitize_once(raw);
    if contains_blocked(&css) {
        tracing::debug!("Rejected custom CSS that reassembles a blocked token");
        return String::new();
    }
    css
}

/// CSS that has been through [`sanitize`].
///
/// The only public constructor runs the sanitizer, so a recipe can never be
/// written with unsanitized styling.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct SanitizedCss(String);

impl SanitizedCss {
    pub fn new(raw: &str) -> Self {
        Self(sanitize(raw))
    }

    /// Wraps text read back from storage, which was sanitized on write.
    pub(crate) fn from_stored(css: String) -> Self {
        Self(css)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for SanitizedCss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCKED: [&str; 5] = ["<style", "expression(", "url(", "@import url(", "javascript:"];

    fn assert_clean(output: &str) {
        let lower = output.to_lowercase();
        for token in BLOCKED {
            assert!(
                !lower.contains(token),
                "output {:?} still contains {:?}",
                output,
                token
            );
        }
    }

    #[test]
    fn test_plain_css_untouched() {
        let css = "h1 { color: #bf616a; font-weight: bold; }\nbody { margin: 0 }";
        assert_eq!(sanitize(css), css);
    }

    #[test]
    fn test_strips_style_element() {
        assert_eq!(
            sanitize("a{color:red}<STYLE type=\"text/css\">body{}</Style>p{margin:0}"),
            "a{color:red}p{margin:0}"
        );
    }

    #[test]
    fn test_style_element_body_is_non_greedy() {
        assert_eq!(sanitize("<style>x</style>keep<style>y</style>"), "keep");
    }

    #[test]
    fn test_strips_unclosed_style_tags() {
        assert_eq!(
            sanitize("p{}</style><script>alert(1)</script>"),
            "p{}<script>alert(1)</script>"
        );
        assert_eq!(sanitize("<style media=x"), "");
    }

    #[test]
    fn test_strips_functions() {
        assert_eq!(
            sanitize("div { width: EXPRESSION (alert(1)); }"),
            "div { width: alert(1)); }"
        );
        assert_eq!(
            sanitize("body { background: url ('x.png') }"),
            "body { background: 'x.png') }"
        );
        assert_eq!(sanitize("@import url(evil.css);"), "evil.css);");
        assert_eq!(sanitize("@IMPORT   URL(evil.css);"), "evil.css);");
    }

    #[test]
    fn test_strips_javascript_scheme() {
        assert_eq!(sanitize("a { b: JavaScript:alert(1) }"), "a { b: alert(1) }");
    }

    #[test]
    fn test_nested_tokens_do_not_reassemble() {
        assert_clean(&sanitize("uurl(rl(x)"));
        assert_clean(&sanitize("javajavascript:script:alert(1)"));
        assert_clean(&sanitize("expexpression(ression("));
        assert_clean(&sanitize("<sty<style>x</style>le>"));
        assert_clean(&sanitize("@import u@import url(rl(a)"));
    }

    #[test]
    fn test_reassembled_tokens_reject_whole_input() {
        assert_eq!(sanitize("a{color:red} uurl(rl(x)"), "");
        assert_eq!(sanitize("javajavascript:script:alert(1)"), "");
        assert_eq!(sanitize("u<style>x</style>rl("), "");
    }

    #[test]
    fn test_deeply_nested_input_is_fast() {
        let k = 100_000;
        let input = format!("{}url({}", "u".repeat(k), "rl(".repeat(k));

        let start = std::time::Instant::now();
        let output = sanitize(&input);

        assert!(start.elapsed() < std::time::Duration::from_secs(5));
        assert_clean(&output);
    }

    #[test]
    fn test_output_never_contains_blocked_tokens() {
        let inputs = [
            "",
            "   ",
            "<style>",
            "</style>",
            "<STYLE><STYLE></STYLE>",
            "url(url(url(",
            "URL\t\n(",
            "eXpReSsIoN  (",
            "@import url(a) @import url(b)",
            "jAvAsCrIpT:javascript:",
            "<style>a{}</style><style",
            "u<style>x</style>rl(",
            "ja<style></style>vascript:",
            "background: u r l(x)",
        ];
        for input in inputs {
            assert_clean(&sanitize(input));
        }
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let once = sanitize("a{background:url(x)}<style>b</style>javascript:");
        assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn test_sanitized_css_wrapper() {
        let css = SanitizedCss::new("p { background: url(x.png) }");
        assert_eq!(css.as_str(), "p { background: x.png) }");
        assert!(!css.is_empty());
        assert!(SanitizedCss::new("<style>p{}</style>").is_empty());
        assert_eq!(serde_json::to_string(&css).unwrap(), "\"p { background: x.png) }\"");
    }
}
