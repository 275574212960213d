//! Document wrapper binding one root element to a full XML document.

use crate::complex::ComplexType;
use crate::error::XsdError;
use crate::instance::Instance;
use crate::xml::XmlNode;
use std::sync::Arc;

/// Binds exactly one top-level element name to a complex type and owns the
/// document-level render and parse entry points.
#[derive(Debug, Clone)]
pub struct Document {
    root_name: String,
    ty: Arc<ComplexType>,
}

impl Document {
    /// Creates a document binding for the given root element.
    #[must_use]
    pub fn new(root_name: impl Into<String>, ty: &Arc<ComplexType>) -> Self {
        Self {
            root_name: root_name.into(),
            ty: Arc::clone(ty),
        }
    }

    /// Returns the root element name.
    #[must_use]
    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// Returns the bound root type.
    #[must_use]
    pub fn ty(&self) -> &Arc<ComplexType> {
        &self.ty
    }

    /// Renders an instance as a full XML document.
    ///
    /// # Errors
    /// Propagates marshal errors from the type's fields.
    pub fn render(&self, instance: &Instance) -> Result<String, XsdError> {
        self.ty
            .render_instance(instance, &self.root_name)?
            .to_xml_string()
    }

    /// Parses a full XML document into an instance.
    ///
    /// # Errors
    /// Returns `XsdError::UnknownElement` when the document's root tag does
    /// not match the bound element, and propagates parse errors otherwise.
    pub fn parse(&self, xml: &str) -> Result<Instance, XsdError> {
        let node = XmlNode::parse(xml)?;
        if node.local_name() != self.root_name {
            return Err(XsdError::unknown_element(node.local_name()));
        }
        self.ty.parse_node(&node)
    }
}
