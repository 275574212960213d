//! Owned XML node tree.
//!
//! The binding engine renders instances into this tree and parses instances
//! out of it. Parsing resolves namespace prefixes against the in-scope
//! `xmlns` bindings so callers can match elements by namespace URI without
//! caring about prefixes.

use crate::error::XsdError;
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use std::collections::HashMap;

/// A single XML element with attributes, ordered children and optional text.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlNode {
    /// Tag name as written, possibly prefixed (`soap:Envelope`).
    pub name: String,
    /// Resolved namespace URI, if the element is in a namespace.
    pub namespace: Option<String>,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order.
    pub children: Vec<XmlNode>,
    /// Concatenated text content, if any.
    pub text: Option<String>,
}

impl XmlNode {
    /// Creates an empty element.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Creates an element holding only text.
    #[must_use]
    pub fn text_element(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut node = Self::new(name);
        node.text = Some(text.into());
        node
    }

    /// Returns the tag name with any namespace prefix stripped.
    #[must_use]
    pub fn local_name(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    /// Sets an attribute, replacing an existing one with the same name.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self.attributes.iter_mut().find(|(k, _)| *k == name) {
            existing.1 = value;
        } else {
            self.attributes.push((name, value));
        }
    }

    /// Looks up an attribute value by exact name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Appends a child element.
    pub fn append_child(&mut self, child: XmlNode) {
        self.children.push(child);
    }

    /// Returns the first child whose local name matches.
    #[must_use]
    pub fn child(&self, local_name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.local_name() == local_name)
    }

    /// Returns all children whose local name matches, in document order.
    pub fn children_named<'a>(&'a self, local_name: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children
            .iter()
            .filter(move |c| c.local_name() == local_name)
    }

    /// Returns the text content, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Parses an XML document into a node tree.
    ///
    /// # Errors
    /// Returns `XsdError::Xml` on malformed XML and `XsdError::Validation`
    /// when the document has no root element.
    pub fn parse(xml: &str) -> Result<Self, XsdError> {
        let mut reader = Reader::from_reader(xml.as_bytes());
        reader.config_mut().trim_text(true);

        // Stack of in-scope prefix -> URI bindings, one entry per open element.
        let mut scopes: Vec<HashMap<String, String>> = vec![HashMap::new()];
        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let node = open_node(e, &mut scopes)?;
                    stack.push(node);
                }
                Ok(Event::Empty(ref e)) => {
                    let node = open_node(e, &mut scopes)?;
                    scopes.pop();
                    attach(&mut stack, &mut root, node);
                }
                Ok(Event::End(_)) => {
                    scopes.pop();
                    if let Some(node) = stack.pop() {
                        attach(&mut stack, &mut root, node);
                    }
                }
                Ok(Event::Text(ref t)) => {
                    let raw = std::str::from_utf8(t.as_ref())?;
                    let text = unescape_text(raw)?;
                    if !text.trim().is_empty() {
                        if let Some(top) = stack.last_mut() {
                            match &mut top.text {
                                Some(existing) => existing.push_str(&text),
                                None => top.text = Some(text),
                            }
                        }
                    }
                }
                Ok(Event::CData(ref t)) => {
                    let raw = std::str::from_utf8(t.as_ref())?.to_string();
                    if let Some(top) = stack.last_mut() {
                        match &mut top.text {
                            Some(existing) => existing.push_str(&raw),
                            None => top.text = Some(raw),
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XsdError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        root.ok_or_else(|| XsdError::validation("document has no root element"))
    }

    /// Serializes the node tree to an XML string.
    ///
    /// Elements without children or text are written self-closing.
    ///
    /// # Errors
    /// Returns `XsdError::Io` if the underlying writer fails.
    pub fn to_xml_string(&self) -> Result<String, XsdError> {
        let mut writer = Writer::new(Vec::new());
        write_node(self, &mut writer)?;
        let bytes = writer.into_inner();
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Applies `f` to this node and every descendant, depth first.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut XmlNode)) {
        f(self);
        for child in &mut self.children {
            child.walk_mut(f);
        }
    }
}

fn unescape_text(raw: &str) -> Result<String, XsdError> {
    quick_xml::escape::unescape(raw)
        .map(|cow| cow.into_owned())
        .map_err(|e| XsdError::validation(format!("invalid XML escape: {e}")))
}

/// Builds a node from a start tag, pushing its namespace scope.
fn open_node(
    e: &BytesStart<'_>,
    scopes: &mut Vec<HashMap<String, String>>,
) -> Result<XmlNode, XsdError> {
    let name = std::str::from_utf8(e.name().as_ref())?.to_string();
    let mut scope = scopes.last().cloned().unwrap_or_default();
    let mut attributes = Vec::new();

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
        let raw = std::str::from_utf8(&attr.value)?;
        let value = unescape_text(raw)?;
        if key == "xmlns" {
            scope.insert(String::new(), value.clone());
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            scope.insert(prefix.to_string(), value.clone());
        }
        attributes.push((key, value));
    }

    let prefix = match name.split_once(':') {
        Some((p, _)) => p,
        None => "",
    };
    let namespace = scope.get(prefix).cloned();
    scopes.push(scope);

    Ok(XmlNode {
        name,
        namespace,
        attributes,
        children: Vec::new(),
        text: None,
    })
}

fn attach(stack: &mut Vec<XmlNode>, root: &mut Option<XmlNode>, node: XmlNode) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    } else if root.is_none() {
        *root = Some(node);
    }
}

fn write_node(node: &XmlNode, writer: &mut Writer<Vec<u8>>) -> Result<(), XsdError> {
    let mut start = BytesStart::new(node.name.as_str());
    for (k, v) in &node.attributes {
        start.push_attribute((k.as_str(), v.as_str()));
    }

    if node.children.is_empty() && node.text.is_none() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if let Some(text) = &node.text {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }
    for child in &node.children {
        write_node(child, writer)?;
    }
    writer.write_event(Event::End(BytesEnd::new(node.name.as_str())))?;
    Ok(())
}
