//! Reading and writing `.qgs` project documents.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::debug;
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::element::Element;
use crate::error::{ProjectError, Result};

/// Root element of every project document.
pub const PROJECT_ROOT_ELEMENT: &str = "qgis";

/// Element describing one map layer.
pub const MAP_LAYER_ELEMENT: &str = "maplayer";

const INDENT_WIDTH: usize = 2;

/// A parsed project document.
///
/// Layers are the `<maplayer>` elements anywhere under the root, in document
/// order. The XML declaration and `DOCTYPE` survive a read/write cycle;
/// comments and processing instructions do not. Text content is kept exactly
/// as written, including leading and trailing whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDocument {
    root: Element,
    has_declaration: bool,
    doctype: Option<String>,
}

impl ProjectDocument {
    /// Wraps an existing root element.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::NotAProject`] if the root is not `<qgis>`.
    pub fn from_root(root: Element) -> Result<Self> {
        if root.name != PROJECT_ROOT_ELEMENT {
            return Err(ProjectError::NotAProject { root: root.name });
        }
        Ok(Self {
            root,
            has_declaration: true,
            doctype: None,
        })
    }

    /// Reads and parses a project file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a project.
    pub fn read(path: &Path) -> Result<Self> {
        let xml = fs::read_to_string(path).map_err(|source| ProjectError::Io {
            action: "read",
            path: path.to_path_buf(),
            source,
        })?;
        let doc = xml.parse::<Self>()?;
        debug!(
            "Read project {} with {} layer(s)",
            path.display(),
            doc.layers().len()
        );
        Ok(doc)
    }

    /// Serializes the document and writes it to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write(&self, path: &Path) -> Result<()> {
        let xml = self.to_xml_string()?;
        fs::write(path, xml).map_err(|source| ProjectError::Io {
            action: "write",
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Wrote project {}", path.display());
        Ok(())
    }

    /// The root `<qgis>` element.
    #[must_use]
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// All `<maplayer>` elements in document order.
    #[must_use]
    pub fn layers(&self) -> Vec<&Element> {
        let mut layers = Vec::new();
        self.root.collect_named(MAP_LAYER_ELEMENT, &mut layers);
        layers
    }

    /// All `<maplayer>` elements in document order, mutably.
    pub fn layers_mut(&mut self) -> Vec<&mut Element> {
        let mut layers = Vec::new();
        self.root.collect_named_mut(MAP_LAYER_ELEMENT, &mut layers);
        layers
    }

    /// Serializes the document with two-space indentation.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::Write`] if the writer fails.
    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_WIDTH);

        if self.has_declaration {
            write_event(
                &mut writer,
                Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
            )?;
        }
        if let Some(doctype) = &self.doctype {
            write_event(
                &mut writer,
                Event::DocType(BytesText::from_escaped(doctype.as_str())),
            )?;
        }
        write_element(&mut writer, &self.root)?;

        let mut xml = String::from_utf8(writer.into_inner()).map_err(|e| ProjectError::Write {
            message: e.to_string(),
        })?;
        xml.push('\n');
        Ok(xml)
    }
}

impl FromStr for ProjectDocument {
    type Err = ProjectError;

    fn from_str(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;
        let mut has_declaration = false;
        let mut doctype = None;

        loop {
            let position = u64::try_from(reader.buffer_position()).ok();
            let event = reader
                .read_event()
                .map_err(|e| ProjectError::parse(e.to_string(), position))?;

            match event {
                Event::Decl(_) => has_declaration = true,
                Event::DocType(text) => {
                    let raw = String::from_utf8_lossy(&text.into_inner()).trim().to_string();
                    doctype = Some(raw);
                },
                Event::Start(start) => stack.push(element_from_start(&start, position)?),
                Event::Empty(start) => {
                    let element = element_from_start(&start, position)?;
                    attach(&mut stack, &mut root, element, position)?;
                },
                Event::End(_) => {
                    let mut element = stack
                        .pop()
                        .ok_or_else(|| ProjectError::parse("unexpected closing tag", position))?;
                    // Indentation between child elements is not content.
                    if !element.children.is_empty() && element.text.trim().is_empty() {
                        element.text.clear();
                    }
                    attach(&mut stack, &mut root, element, position)?;
                },
                Event::Text(text) => {
                    let content = text
                        .unescape()
                        .map_err(|e| ProjectError::parse(e.to_string(), position))?;
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&content);
                    }
                },
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        current
                            .text
                            .push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                },
                Event::Eof => break,
                _ => {},
            }
        }

        if let Some(open) = stack.last() {
            return Err(ProjectError::parse(
                format!("element <{}> is never closed", open.name),
                None,
            ));
        }

        let root = root.ok_or(ProjectError::Empty)?;
        let mut doc = Self::from_root(root)?;
        doc.has_declaration = has_declaration;
        doc.doctype = doctype;
        Ok(doc)
    }
}

fn element_from_start(start: &BytesStart<'_>, position: Option<u64>) -> Result<Element> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| ProjectError::parse(e.to_string(), position))?;
        let value = attribute
            .unescape_value()
            .map_err(|e| ProjectError::parse(e.to_string(), position))?;
        element.attributes.push((
            String::from_utf8_lossy(attribute.key.as_ref()).into_owned(),
            value.into_owned(),
        ));
    }
    Ok(element)
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
    position: Option<u64>,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(ProjectError::parse(
                "document has more than one root element",
                position,
            ));
        },
    }
    Ok(())
}

fn write_event<W: std::io::Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer.write_event(event).map_err(|e| ProjectError::Write {
        message: e.to_string(),
    })
}

fn write_element<W: std::io::Write>(writer: &mut Writer<W>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() && element.text.is_empty() {
        return write_event(writer, Event::Empty(start));
    }

    write_event(writer, Event::Start(start))?;
    if !element.text.is_empty() {
        write_event(writer, Event::Text(BytesText::new(&element.text)))?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    write_event(writer, Event::End(BytesEnd::new(element.name.as_str())))
}
