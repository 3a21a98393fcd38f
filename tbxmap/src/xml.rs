//! Owned XML element tree backing the in-memory TBX document.
//!
//! Reading is event based (`quick_xml::Reader`) and builds a strict tree with no
//! back references. Character data is kept as read; only indentation between
//! child elements is dropped. Writing re-indents element-only content with four
//! spaces and leaves mixed content inline.

use std::io::{BufRead, Write};

use quick_xml::{
    Reader, Writer,
    events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::{error::Error, traits::Parser};

/// A node inside an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Unescaped character data.
    Text(String),
    CData(String),
    /// Raw comment body, written back verbatim.
    Comment(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }
}

/// Markup that may appear around the root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Misc {
    Comment(String),
    DocType(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    /// Attributes in document order, values unescaped.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Appends a text child. Empty text adds nothing, so the element stays empty.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if !text.is_empty() {
            self.children.push(Node::Text(text));
        }
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replaces the value of `key`, or appends it when absent.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn find_child(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|e| e.name == name)
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn find_child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(e) if e.name == name => Some(e),
            _ => None,
        })
    }

    /// Character data preceding the first child element.
    ///
    /// Comments are skipped; nested markup ends the text run.
    pub fn leading_text(&self) -> String {
        let mut text = String::new();
        for node in &self.children {
            match node {
                Node::Text(t) | Node::CData(t) => text.push_str(t),
                Node::Comment(_) => {}
                Node::Element(_) => break,
            }
        }
        text
    }

    /// All elements below this one, in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }
}

/// Pre-order iterator over the elements of a subtree.
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if let Node::Element(element) = node {
                self.stack.extend(element.children.iter().rev());
                return Some(element);
            }
        }
        None
    }
}

/// A parsed XML file: the root element plus the markup around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlTree {
    pub prolog: Vec<Misc>,
    pub root: Element,
    pub epilog: Vec<Misc>,
}

impl XmlTree {
    pub fn new(root: Element) -> Self {
        XmlTree {
            prolog: Vec::new(),
            root,
            epilog: Vec::new(),
        }
    }
}

impl Parser for XmlTree {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);

        let mut buf = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;
        let mut prolog = Vec::new();
        let mut epilog = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => stack.push(element_from_start(e)?),
                Event::Empty(ref e) => {
                    let element = element_from_start(e)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(ref e) => {
                    let mut element = stack.pop().ok_or_else(|| {
                        Error::invalid_document(format!(
                            "unexpected closing tag `{}`",
                            String::from_utf8_lossy(e.name().as_ref())
                        ))
                    })?;
                    drop_indentation(&mut element);
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(ref e) => {
                    let text = e.unescape()?.into_owned();
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Node::Text(text));
                    } else if !is_xml_whitespace(&text) {
                        return Err(Error::invalid_document(
                            "character data outside the root element",
                        ));
                    }
                }
                Event::CData(ref e) => {
                    let text = decode_utf8(e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::CData(text)),
                        None => {
                            return Err(Error::invalid_document(
                                "CDATA section outside the root element",
                            ));
                        }
                    }
                }
                Event::Comment(ref e) => {
                    let comment = decode_utf8(e)?;
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Node::Comment(comment));
                    } else if root.is_none() {
                        prolog.push(Misc::Comment(comment));
                    } else {
                        epilog.push(Misc::Comment(comment));
                    }
                }
                Event::DocType(ref e) => prolog.push(Misc::DocType(decode_utf8(e)?)),
                Event::Eof => break,
                // XML declaration and processing instructions are regenerated or dropped.
                _ => {}
            }
            buf.clear();
        }

        if let Some(open) = stack.last() {
            return Err(Error::invalid_document(format!(
                "unclosed element `{}`",
                open.name
            )));
        }
        let root = root.ok_or_else(|| Error::invalid_document("missing root element"))?;

        Ok(XmlTree {
            prolog,
            root,
            epilog,
        })
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new_with_indent(&mut writer, b' ', 4);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        for misc in &self.prolog {
            write_misc(&mut xml_writer, misc)?;
        }
        write_element(&mut xml_writer, &self.root)?;
        for misc in &self.epilog {
            write_misc(&mut xml_writer, misc)?;
        }

        writer.write_all(b"\n")?;
        Ok(())
    }
}

fn element_from_start(e: &BytesStart) -> Result<Element, Error> {
    let mut element = Element::new(decode_utf8(e.name().as_ref())?);
    for attr in e.attributes() {
        let attr = attr?;
        let key = decode_utf8(attr.key.as_ref())?;
        let value = attr.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn is_xml_whitespace(text: &str) -> bool {
    text.chars().all(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
}

/// Removes whitespace-only text nodes unless the element carries real
/// character data, in which case every text node is content.
fn drop_indentation(element: &mut Element) {
    let has_content = element.children.iter().any(|node| match node {
        Node::Text(text) => !is_xml_whitespace(text),
        Node::CData(_) => true,
        _ => false,
    });
    if !has_content {
        element
            .children
            .retain(|node| !matches!(node, Node::Text(_)));
    }
}

fn is_mixed(element: &Element) -> bool {
    let has_text = element
        .children
        .iter()
        .any(|node| matches!(node, Node::Text(_) | Node::CData(_)));
    has_text && element.children.iter().any(|node| matches!(node, Node::Element(_)))
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), Error> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
    } else if root.is_none() {
        *root = Some(element);
    } else {
        return Err(Error::invalid_document(format!(
            "second root element `{}`",
            element.name
        )));
    }
    Ok(())
}

fn decode_utf8(bytes: &[u8]) -> Result<String, Error> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| Error::invalid_document(format!("invalid UTF-8: {e}")))
}

fn write_misc<W: Write>(xml_writer: &mut Writer<W>, misc: &Misc) -> Result<(), Error> {
    match misc {
        Misc::Comment(comment) => {
            xml_writer.write_event(Event::Comment(BytesText::from_escaped(comment.as_str())))?;
        }
        Misc::DocType(doctype) => {
            // The indenter does not break before a doctype on its own.
            xml_writer.write_event(Event::Text(BytesText::from_escaped("\n")))?;
            xml_writer.write_event(Event::DocType(BytesText::from_escaped(doctype.as_str())))?;
        }
    }
    Ok(())
}

fn write_element<W: Write>(xml_writer: &mut Writer<W>, element: &Element) -> Result<(), Error> {
    if is_mixed(element) {
        // Indenting between inline children would add text to the content.
        let mut inline = Writer::new(Vec::new());
        write_element_events(&mut inline, element)?;
        xml_writer.write_indent()?;
        xml_writer.get_mut().write_all(&inline.into_inner())?;
        return Ok(());
    }
    write_element_events(xml_writer, element)
}

fn write_element_events<W: Write>(
    xml_writer: &mut Writer<W>,
    element: &Element,
) -> Result<(), Error> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        xml_writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    xml_writer.write_event(Event::Start(start))?;
    for child in &element.children {
        match child {
            Node::Element(e) => write_element(xml_writer, e)?,
            Node::Text(text) => xml_writer.write_event(Event::Text(BytesText::new(text)))?,
            Node::CData(text) => {
                xml_writer.write_event(Event::CData(BytesCData::new(text.as_str())))?
            }
            Node::Comment(comment) => xml_writer
                .write_event(Event::Comment(BytesText::from_escaped(comment.as_str())))?,
        }
    }
    xml_writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}
