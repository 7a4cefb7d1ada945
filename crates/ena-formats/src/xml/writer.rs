//! Serializes element trees to UTF-8 XML bytes.

use std::fmt::Display;

use log::debug;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::{Deserialize, Serialize};

use crate::error::{EnaError, Result};
use crate::model::XmlElement;

/// Serializer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializerConfig {
    /// Emit `<?xml version="1.0" encoding="UTF-8"?>` first.
    pub xml_declaration: bool,
    /// Indent width in spaces (None = compact).
    pub indent: Option<usize>,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            xml_declaration: true,
            indent: None,
        }
    }
}

fn write_error(e: impl Display) -> EnaError {
    EnaError::Format(format!("Failed to write XML: {}", e))
}

/// Serialize with the default configuration.
pub fn to_bytes(root: &XmlElement) -> Result<Vec<u8>> {
    to_bytes_with_config(root, &SerializerConfig::default())
}

/// Serialize an element tree. Attribute and child order follow the tree,
/// so the same tree always yields the same bytes.
pub fn to_bytes_with_config(root: &XmlElement, config: &SerializerConfig) -> Result<Vec<u8>> {
    let mut writer = match config.indent {
        Some(width) => Writer::new_with_indent(Vec::new(), b' ', width),
        None => Writer::new(Vec::new()),
    };

    if config.xml_declaration {
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(write_error)?;
        if config.indent.is_none() {
            writer.get_mut().push(b'\n');
        }
    }

    write_element(&mut writer, root)?;

    let bytes = writer.into_inner();
    debug!("Serialized <{}> to {} bytes", root.name, bytes.len());
    Ok(bytes)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (name, value) in &element.attributes {
        start.push_attribute((name.as_str(), value.as_str()));
    }

    if element.text.is_none() && element.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(write_error);
    }

    writer.write_event(Event::Start(start)).map_err(write_error)?;
    if let Some(text) = &element.text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(write_error)?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(write_error)
}
