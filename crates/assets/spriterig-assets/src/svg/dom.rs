//! Minimal mutable element tree over `quick-xml` events.
//!
//! Only elements are modelled; everything else (declaration, comments, text,
//! CDATA, processing instructions) is kept as the original event and written
//! back verbatim. Attribute values stay in their escaped form.

use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::error::AssetError;

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Element(Element),
    Other(Event<'static>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
    self_closing: bool,
}

impl Element {
    fn from_start(start: &BytesStart<'_>, self_closing: bool) -> Result<Self, AssetError> {
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute?;
            attributes.push((
                String::from_utf8_lossy(attribute.key.as_ref()).into_owned(),
                String::from_utf8_lossy(&attribute.value).into_owned(),
            ));
        }
        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attributes,
            children: Vec::new(),
            self_closing,
        })
    }

    /// Name without a namespace prefix.
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    /// Replace the local part of the name, keeping any prefix.
    pub fn rename(&mut self, local: &str) {
        self.name = match self.name.rsplit_once(':') {
            Some((prefix, _)) => format!("{prefix}:{local}"),
            None => local.to_owned(),
        };
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Other(_) => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Other(_) => None,
        })
    }

    /// Descendant elements (not `self`) in document order.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        fn walk<'a>(el: &'a Element, out: &mut Vec<&'a Element>) {
            for child in el.elements() {
                out.push(child);
                walk(child, out);
            }
        }
        walk(self, &mut out);
        out
    }

    pub fn push_element(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    fn write<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), AssetError> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_bytes(), value.as_bytes()));
        }
        if self.children.is_empty() && self.self_closing {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }
        writer.write_event(Event::Start(start))?;
        for child in &self.children {
            child.write(writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }
}

impl Node {
    fn write<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), AssetError> {
        match self {
            Node::Element(el) => el.write(writer),
            Node::Other(event) => {
                writer.write_event(event.clone())?;
                Ok(())
            }
        }
    }
}

/// A parsed document: top-level nodes around one root element.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub nodes: Vec<Node>,
}

impl Document {
    pub fn parse(text: &str) -> Result<Self, AssetError> {
        let mut reader = Reader::from_str(text);
        let mut open: Vec<Element> = Vec::new();
        let mut nodes = Vec::new();

        fn attach(open: &mut [Element], nodes: &mut Vec<Node>, node: Node) {
            match open.last_mut() {
                Some(parent) => parent.children.push(node),
                None => nodes.push(node),
            }
        }

        loop {
            match reader.read_event()? {
                Event::Start(start) => open.push(Element::from_start(&start, false)?),
                Event::Empty(start) => {
                    let el = Element::from_start(&start, true)?;
                    attach(&mut open, &mut nodes, Node::Element(el));
                }
                Event::End(_) => {
                    let el = open
                        .pop()
                        .ok_or_else(|| AssetError::Svg("unexpected closing tag".into()))?;
                    attach(&mut open, &mut nodes, Node::Element(el));
                }
                Event::Eof => break,
                other => attach(&mut open, &mut nodes, Node::Other(other.into_owned())),
            }
        }
        if let Some(el) = open.last() {
            return Err(AssetError::Svg(format!("<{}> is never closed", el.name)));
        }
        Ok(Self { nodes })
    }

    pub fn root(&self) -> Option<&Element> {
        self.nodes.iter().find_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Other(_) => None,
        })
    }

    pub fn root_mut(&mut self) -> Option<&mut Element> {
        self.nodes.iter_mut().find_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Other(_) => None,
        })
    }

    pub fn write_to<W: Write>(&self, out: W) -> Result<(), AssetError> {
        let mut writer = Writer::new(out);
        for node in &self.nodes {
            node.write(&mut writer)?;
        }
        Ok(())
    }

    pub fn to_xml_string(&self) -> Result<String, AssetError> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        String::from_utf8(out).map_err(|err| AssetError::Svg(err.to_string()))
    }
}
