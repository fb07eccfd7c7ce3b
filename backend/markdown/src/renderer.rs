//! Markdown → HTML.

use pulldown_cmark::escape::escape_html;
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};

/// URL schemes a rendered link or image may point at. Scheme-less
/// destinations (relative paths, fragments) are always allowed.
const SAFE_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Replacement for a destination with any other scheme.
const BLOCKED_DESTINATION: &str = "#";

pub struct Renderer;

impl Renderer {
    /// Render Markdown to an HTML fragment.
    ///
    /// Raw HTML blocks and inline tags are emitted as escaped text, and link
    /// or image destinations outside [`SAFE_SCHEMES`] are replaced with `#`,
    /// so model output cannot inject markup or script into the page.
    pub fn to_html(markdown: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);

        let events = Parser::new_ext(markdown, options).map(|event| match event {
            Event::Html(raw) => Event::Text(raw),
            Event::Start(tag) => Event::Start(sanitize_tag(tag)),
            Event::End(tag) => Event::End(sanitize_tag(tag)),
            other => other,
        });

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, events);
        out
    }

    /// Escape text for use inside HTML element content or double-quoted attributes.
    pub fn escape(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        // Writing into a String cannot fail.
        let _ = escape_html(&mut out, text);
        out
    }
}

fn sanitize_tag(tag: Tag<'_>) -> Tag<'_> {
    match tag {
        Tag::Link(kind, dest, title) => Tag::Link(kind, safe_destination(dest), title),
        Tag::Image(kind, dest, title) => Tag::Image(kind, safe_destination(dest), title),
        other => other,
    }
}

/// Keep `dest` if it has no scheme or an allowed one.
///
/// Browsers drop ASCII whitespace and control characters inside a scheme
/// (`java\tscript:`), so those are removed before comparing.
fn safe_destination(dest: CowStr<'_>) -> CowStr<'_> {
    let Some(colon) = dest.find(':') else {
        return dest;
    };
    let prefix = &dest[..colon];
    if prefix.contains(['/', '?', '#']) {
        // The colon sits in a path, query or fragment: a relative URL.
        return dest;
    }

    let scheme: String = prefix
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .collect::<String>()
        .to_ascii_lowercase();
    if SAFE_SCHEMES.contains(&scheme.as_str()) {
        dest
    } else {
        CowStr::Borrowed(BLOCKED_DESTINATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_emphasis_and_code() {
        let html = Renderer::to_html("**Q:** what is `Vec`?");
        assert!(html.contains("<strong>Q:</strong>"));
        assert!(html.contains("<code>Vec</code>"));
    }

    #[test]
    fn raw_html_is_escaped() {
        let html = Renderer::to_html("<script>alert(1)</script>\n\nhi <b>there</b>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn escape_handles_attribute_chars() {
        assert_eq!(Renderer::escape(r#"a"b<c>&"#), "a&quot;b&lt;c&gt;&amp;");
    }

    #[test]
    fn script_links_are_defused() {
        let html = Renderer::to_html("**Bot:** [click me](javascript:alert(document.cookie))");
        assert!(!html.contains("javascript:"));
        assert!(html.contains("<a href=\"#\">click me</a>"));
    }

    #[test]
    fn other_schemes_are_defused() {
        for (markdown, attr) in [
            ("[x](JavaScript:alert(1))", "href"),
            ("<javascript:alert(1)>", "href"),
            ("[x](vbscript:msgbox)", "href"),
            ("![img](data:text/html;base64,PHNjcmlwdD4=)", "src"),
        ] {
            let html = Renderer::to_html(markdown);
            assert!(html.contains(&format!("{attr}=\"#\"")), "{markdown} -> {html}");
        }
    }

    #[test]
    fn whitespace_inside_scheme_is_ignored() {
        assert_eq!(&*safe_destination(CowStr::Borrowed("java\tscript:alert(1)")), "#");
        assert_eq!(&*safe_destination(CowStr::Borrowed(" HTTPS://x.dev")), " HTTPS://x.dev");
    }

    #[test]
    fn ordinary_links_are_kept() {
        let html = Renderer::to_html(
            "[docs](https://doc.rust-lang.org/std/) [mail](mailto:a@b.c) [rel](guide/intro.md#a:b)",
        );
        assert!(html.contains("href=\"https://doc.rust-lang.org/std/\""));
        assert!(html.contains("href=\"mailto:a@b.c\""));
        assert!(html.contains("href=\"guide/intro.md#a:b\""));
    }
}
