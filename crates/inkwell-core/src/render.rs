//! Content renderer.
//!
//! Plain-text documents are returned verbatim. Markdown documents are
//! converted to an HTML fragment with `pulldown-cmark`; the caller wraps the
//! fragment in a page layout.
//!
//! ATX headings are lenient: `#Title` is treated as `# Title`, so notes
//! written without the space after the hashes still get a heading. This
//! also applies after a block quote marker (`> #Quote`). Headings nested in
//! list items are left to the strict CommonMark rule.

use std::borrow::Cow;

use pulldown_cmark::{Options, Parser, html};

use crate::document::{Document, DocumentKind};
use crate::error::RenderError;

/// Output of rendering a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// Raw text, to be served as `text/plain`.
    PlainText(String),
    /// An HTML fragment, to be embedded in a page.
    Html(String),
}

/// Render a document according to its kind.
///
/// # Errors
///
/// Returns [`RenderError::UnsupportedKind`] if the document's extension is
/// neither `.txt` nor `.md`.
pub fn render(document: &Document) -> Result<Rendered, RenderError> {
    match document.kind() {
        Some(DocumentKind::PlainText) => Ok(Rendered::PlainText(document.text().into_owned())),
        Some(DocumentKind::Markdown) => Ok(Rendered::Html(markdown_to_html(&document.text()))),
        None => Err(RenderError::UnsupportedKind {
            name: document.name.clone(),
            extension: document.extension().map(str::to_owned),
        }),
    }
}

/// Convert Markdown source into an HTML fragment.
#[must_use]
pub fn markdown_to_html(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let source = lenient_headings(source);
    let parser = Parser::new_ext(&source, options);

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Insert the missing space in `#Heading` lines outside fenced code.
fn lenient_headings(source: &str) -> Cow<'_, str> {
    let mut out = String::new();
    let mut changed = false;
    let mut fence: Option<(char, usize)> = None;

    for line in source.split_inclusive('\n') {
        let indent = line.len() - line.trim_start_matches(' ').len();
        let body = &line[indent..];

        if indent <= 3 {
            if let Some(marker) = fence_marker(body) {
                fence = match fence {
                    None => Some(marker),
                    Some((ch, len)) if ch == marker.0 && marker.1 >= len => None,
                    open => open,
                };
            } else if fence.is_none() {
                let quote = quote_prefix_len(body);
                let rest = &body[quote..];
                let hashes = rest.len() - rest.trim_start_matches('#').len();
                let next = rest[hashes..].chars().next();
                if (1..=6).contains(&hashes) && next.is_some_and(|c| !c.is_whitespace()) {
                    out.push_str(&line[..indent + quote + hashes]);
                    out.push(' ');
                    out.push_str(&rest[hashes..]);
                    changed = true;
                    continue;
                }
            }
        }
        out.push_str(line);
    }

    if changed {
        Cow::Owned(out)
    } else {
        Cow::Borrowed(source)
    }
}

/// Length of a leading run of `>` block quote markers and their spaces.
fn quote_prefix_len(body: &str) -> usize {
    if !body.starts_with('>') {
        return 0;
    }
    body.len() - body.trim_start_matches(['>', ' ']).len()
}

/// Fence character and run length if the line opens or closes a code fence.
fn fence_marker(body: &str) -> Option<(char, usize)> {
    let ch = body.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = body.len() - body.trim_start_matches(ch).len();
    (len >= 3).then_some((ch, len))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn doc(name: &str, content: &str) -> Document {
        Document {
            name: name.to_owned(),
            content: content.as_bytes().to_vec(),
        }
    }

    #[test]
    fn plain_text_is_returned_verbatim() {
        let rendered = render(&doc("history.txt", "1993 - Ruby <created>")).unwrap();
        assert_eq!(
            rendered,
            Rendered::PlainText("1993 - Ruby <created>".to_owned())
        );
    }

    #[test]
    fn markdown_heading_without_space_renders() {
        match render(&doc("about.md", "#The About File")).unwrap() {
            Rendered::Html(html) => assert!(html.contains("<h1>The About File</h1>"), "{html}"),
            other => unreachable!("expected html, got {other:?}"),
        }
    }

    #[test]
    fn markdown_renders_emphasis_lists_and_links() {
        let html = markdown_to_html("## Links\n\n*one* and **two**\n\n- [site](https://example.com)\n");
        assert!(html.contains("<h2>Links</h2>"));
        assert!(html.contains("<em>one</em>"));
        assert!(html.contains("<strong>two</strong>"));
        assert!(html.contains("<li><a href=\"https://example.com\">site</a></li>"));
    }

    #[test]
    fn hashes_inside_code_fences_are_untouched() {
        let html = markdown_to_html("```sh\n#!/bin/sh\n#comment\n```\n#Title\n");
        assert!(html.contains("#!/bin/sh\n#comment"), "{html}");
        assert!(html.contains("<h1>Title</h1>"), "{html}");
    }

    #[test]
    fn heading_inside_block_quote_renders() {
        let html = markdown_to_html("> #Quote\n>> ##Nested\n");
        assert!(html.contains("<blockquote>"), "{html}");
        assert!(html.contains("<h1>Quote</h1>"), "{html}");
        assert!(html.contains("<h2>Nested</h2>"), "{html}");
    }

    #[test]
    fn seven_hashes_are_not_a_heading() {
        assert_eq!(lenient_headings("#######x"), "#######x");
    }

    #[test]
    fn well_formed_source_is_borrowed() {
        assert!(matches!(lenient_headings("# Title\ntext\n"), Cow::Borrowed(_)));
    }

    #[test]
    fn unknown_extension_is_a_render_error() {
        let err = render(&doc("archive.zip", "PK")).unwrap_err();
        assert!(matches!(
            err,
            RenderError::UnsupportedKind { ref extension, .. } if extension.as_deref() == Some("zip")
        ));
    }
}
