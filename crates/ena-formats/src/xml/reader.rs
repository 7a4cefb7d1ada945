//! Strict XML parsing into element trees.

use std::fmt::Display;

use roxmltree::{Document, Node, ParsingOptions};

use crate::error::{EnaError, Result};
use crate::model::XmlElement;

fn malformed(e: impl Display) -> EnaError {
    EnaError::Format(format!("Malformed XML: {}", e))
}

fn element_from_node(node: Node<'_, '_>) -> XmlElement {
    let mut element = XmlElement::new(node.tag_name().name());

    for attr in node.attributes() {
        element
            .attributes
            .push((attr.name().to_string(), attr.value().to_string()));
    }

    for child in node.children() {
        if child.is_element() {
            element.push_child(element_from_node(child));
        } else if child.is_text() {
            let text = child.text().unwrap_or_default();
            element.text.get_or_insert_with(String::new).push_str(text);
        }
    }

    element
}

/// Byte offset just past `needle` at or after `from`, or the end of input.
fn skip_past(bytes: &[u8], from: usize, needle: &[u8]) -> usize {
    bytes[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| from + p + needle.len())
        .unwrap_or(bytes.len())
}

/// Skip a tag or declaration starting at `from` (a `<`), honouring quoted
/// values and the bracketed internal subset of a DOCTYPE. In tags, a quoted
/// attribute value must be followed by whitespace, `/` or `>`.
fn skip_markup(bytes: &[u8], from: usize) -> Result<usize> {
    let is_tag = bytes.get(from + 1) != Some(&b'!');
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut value_closed = false;
    let mut i = from + 1;

    while i < bytes.len() {
        let b = bytes[i];
        if value_closed && !(b.is_ascii_whitespace() || b == b'/' || b == b'>') {
            return Err(malformed("attributes must be separated by whitespace"));
        }
        value_closed = false;

        match quote {
            Some(q) if b == q => {
                quote = None;
                value_closed = is_tag;
            }
            Some(_) => {}
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'[' => depth += 1,
                b']' => depth = depth.saturating_sub(1),
                b'>' if depth == 0 => return Ok(i + 1),
                _ => {}
            },
        }
        i += 1;
    }
    Ok(bytes.len())
}

/// Checks the parser leaves to us: no literal `]]>` in character data and
/// whitespace between attributes.
fn check_markup(text: &str) -> Result<()> {
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let rest = &bytes[i..];
        if rest.starts_with(b"<!--") {
            i = skip_past(bytes, i + 4, b"-->");
        } else if rest.starts_with(b"<![CDATA[") {
            i = skip_past(bytes, i + 9, b"]]>");
        } else if rest.starts_with(b"<?") {
            i = skip_past(bytes, i + 2, b"?>");
        } else if rest.starts_with(b"<") {
            i = skip_markup(bytes, i)?;
        } else if rest.starts_with(b"]]>") {
            return Err(malformed("']]>' is not allowed in character data"));
        } else {
            i += 1;
        }
    }
    Ok(())
}

/// Parse a complete document, rejecting anything that is not well-formed
/// XML 1.0. Internal DTD entities are expanded; external ones are refused.
pub fn parse_document(text: &str) -> Result<XmlElement> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let document = Document::parse_with_options(text, options).map_err(malformed)?;
    check_markup(text)?;

    Ok(element_from_node(document.root_element()))
}
