//! Input validation hooks.
//!
//! Header children are validated per child: addressing-namespace elements
//! go through the addressing validator, everything else through the schema
//! validator. The dispatcher decides whether a schema failure is fatal.

use ironsoap_xsd::{XmlNode, XsdError};

/// The WS-Addressing namespace.
pub const WSA_NAMESPACE: &str = "http://www.w3.org/2005/08/addressing";

/// Validates an element against a schema.
pub trait SchemaValidator: Send + Sync {
    /// Checks the element.
    ///
    /// # Errors
    /// Returns a validation error describing the first violation.
    fn validate(&self, node: &XmlNode) -> Result<(), XsdError>;
}

/// A validator that accepts every element.
#[derive(Debug, Default)]
pub struct AcceptAll;

impl SchemaValidator for AcceptAll {
    fn validate(&self, _node: &XmlNode) -> Result<(), XsdError> {
        Ok(())
    }
}

/// Structural check for WS-Addressing header elements: the element must be
/// one the addressing schema declares.
#[derive(Debug, Default)]
pub struct WsAddressingValidator;

const WSA_ELEMENTS: &[&str] = &[
    "To",
    "From",
    "ReplyTo",
    "FaultTo",
    "Action",
    "MessageID",
    "RelatesTo",
    "ReferenceParameters",
    "Metadata",
];

impl SchemaValidator for WsAddressingValidator {
    fn validate(&self, node: &XmlNode) -> Result<(), XsdError> {
        if WSA_ELEMENTS.contains(&node.local_name()) {
            Ok(())
        } else {
            Err(XsdError::validation(format!(
                "unknown addressing header element '{}'",
                node.local_name()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_all() {
        let node = XmlNode::new("anything");
        assert!(AcceptAll.validate(&node).is_ok());
    }

    #[test]
    fn test_addressing_known_element() {
        let node = XmlNode::text_element("wsa:Action", "urn:op");
        assert!(WsAddressingValidator.validate(&node).is_ok());
    }

    #[test]
    fn test_addressing_unknown_element() {
        let node = XmlNode::new("wsa:Bogus");
        assert!(WsAddressingValidator.validate(&node).is_err());
    }
}
