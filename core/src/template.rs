//! Local HTML templates: file loading and whitespace minification.
//!
//! # Design
//! The minifier is a single forward scan, not a parser. It never fails:
//! anything that does not look like markup is treated as text, and an
//! unterminated tag or comment simply runs to the end of the input.
//!
//! Rules:
//! - whitespace-only text containing a line break (indentation) is dropped
//!   when it touches a block-level tag, a doctype, or either end of the
//!   document; between inline or unknown elements it becomes one space;
//! - any other whitespace run in text collapses to one space;
//! - whitespace runs inside a tag collapse to one space, and a space right
//!   before `>` is dropped; quoted attribute values are left alone;
//! - comments and the contents of `script`, `style`, `pre` and `textarea`
//!   are copied verbatim;
//! - the result is trimmed of ASCII whitespace.
//!
//! Only ASCII whitespace counts, so `&nbsp;` written as U+00A0 survives.
//! Running the minifier on its own output returns the same string.

use std::fs;
use std::path::Path;

use crate::error::TakeoutError;

const RAW_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "pre", "textarea"];

/// Elements whose surrounding indentation does not render.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "br", "caption", "center", "col",
    "colgroup", "dd", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form",
    "h1", "h2", "h3", "h4", "h5", "h6", "head", "header", "hr", "html", "legend", "li", "link",
    "main", "meta", "nav", "noscript", "ol", "option", "p", "pre", "script", "section", "select",
    "style", "table", "tbody", "td", "tfoot", "th", "thead", "title", "tr", "ul",
];

/// Browser-style wasm has no filesystem to read templates from.
const FILESYSTEM_AVAILABLE: bool = !cfg!(all(target_arch = "wasm32", target_os = "unknown"));

/// Read an HTML file and return it minified.
pub fn read_local_template(path: &Path) -> Result<String, TakeoutError> {
    if !FILESYSTEM_AVAILABLE {
        return Err(TakeoutError::Environment(
            "getting contents from files is not supported in the browser",
        ));
    }
    let bytes = fs::read(path).map_err(|source| TakeoutError::FileSystem {
        path: path.to_path_buf(),
        source,
    })?;
    let html = String::from_utf8_lossy(&bytes);
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "minifying local template");
    Ok(minify_html(&html))
}

/// Collapse redundant whitespace in an HTML document.
pub fn minify_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    // The start of the document behaves like a block boundary.
    let mut after_block = true;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("<!--") {
            let end = after.find("-->").map_or(after.len(), |i| i + 3);
            out.push_str("<!--");
            out.push_str(&after[..end]);
            rest = &after[end..];
            after_block = false;
            continue;
        }

        if starts_tag(rest) {
            let end = tag_end(rest);
            let tag = &rest[..end];
            push_tag(&mut out, tag);
            rest = &rest[end..];
            after_block = is_block_tag(tag);

            if let Some(name) = raw_text_element(tag) {
                let close = rest
                    .to_ascii_lowercase()
                    .find(&format!("</{name}"))
                    .unwrap_or(rest.len());
                out.push_str(&rest[..close]);
                rest = &rest[close..];
            }
            continue;
        }

        let end = next_markup(rest);
        let (text, remaining) = rest.split_at(end);
        let before_block = remaining.is_empty()
            || (starts_tag(remaining) && is_block_tag(&remaining[..tag_end(remaining)]));
        push_text(&mut out, text, after_block || before_block);
        rest = remaining;
        after_block = false;
    }

    out.trim_matches(|c: char| c.is_ascii_whitespace()).to_string()
}

fn is_markup_start(s: &str) -> bool {
    s.starts_with("<!--") || starts_tag(s)
}

fn starts_tag(s: &str) -> bool {
    let mut chars = s.chars();
    if chars.next() != Some('<') {
        return false;
    }
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '!' || c == '?' => true,
        Some('/') => chars.next().is_some_and(|c| c.is_ascii_alphabetic()),
        _ => false,
    }
}

/// Byte offset of the first markup start after position 0, or `s.len()`.
fn next_markup(s: &str) -> usize {
    s.char_indices()
        .skip(1)
        .find(|&(i, c)| c == '<' && is_markup_start(&s[i..]))
        .map_or(s.len(), |(i, _)| i)
}

/// Byte offset just past the tag's closing `>`, honoring quoted values.
fn tag_end(s: &str) -> usize {
    let mut quote: Option<char> = None;
    let mut after_equals = false;
    for (i, c) in s.char_indices().skip(1) {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => {
                if (c == '"' || c == '\'') && after_equals {
                    quote = Some(c);
                } else if c == '>' {
                    return i + 1;
                }
                if !c.is_ascii_whitespace() {
                    after_equals = c == '=';
                }
            }
        }
    }
    s.len()
}

fn push_tag(out: &mut String, tag: &str) {
    let mut quote: Option<char> = None;
    let mut after_equals = false;
    let mut pending_space = false;
    for c in tag.chars() {
        if let Some(q) = quote {
            out.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }
        if c.is_ascii_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && c != '>' {
            out.push(' ');
        }
        pending_space = false;
        if (c == '"' || c == '\'') && after_equals {
            quote = Some(c);
        }
        after_equals = c == '=';
        out.push(c);
    }
}

/// `at_block_boundary` allows dropping indentation-only text entirely.
fn push_text(out: &mut String, text: &str, at_block_boundary: bool) {
    if text.chars().all(|c| c.is_ascii_whitespace()) {
        let indentation = text.contains(['\n', '\r']);
        if !(indentation && at_block_boundary) && !text.is_empty() {
            out.push(' ');
        }
        return;
    }
    let mut in_space = false;
    for c in text.chars() {
        if c.is_ascii_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
}

/// Lowercased element name of an opening or closing tag.
fn element_name(tag: &str) -> String {
    let inner = tag.strip_prefix('<').unwrap_or(tag);
    inner
        .strip_prefix('/')
        .unwrap_or(inner)
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Doctypes and processing instructions count as block boundaries too.
fn is_block_tag(tag: &str) -> bool {
    if tag.starts_with("<!") || tag.starts_with("<?") {
        return true;
    }
    let name = element_name(tag);
    BLOCK_ELEMENTS.contains(&name.as_str())
}

/// Name of the raw-text element opened by `tag`, unless it self-closes.
fn raw_text_element(tag: &str) -> Option<&'static str> {
    if tag.ends_with("/>") || tag.starts_with("</") {
        return None;
    }
    let name = element_name(tag);
    RAW_TEXT_ELEMENTS.into_iter().find(|raw| *raw == name)
}
