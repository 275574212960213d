//! Envelope codec: parsing incoming envelopes and rendering success and
//! fault envelopes.
//!
//! Parsing matches `Envelope`, `Header` and `Body` by local name, so any
//! prefix (or none) is accepted; rendering always uses the `senv` prefix
//! bound to the version's namespace.

use crate::fault::SoapFault;
use crate::version::SoapVersion;
use ironsoap_xsd::{XmlNode, XsdError};

/// A parsed SOAP envelope: optional header node and the body node.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// The `Header` element, if the envelope carried one.
    pub header: Option<XmlNode>,
    /// The `Body` element.
    pub body: XmlNode,
}

impl Envelope {
    /// Returns the body's payload element, the single child carrying the
    /// operation input.
    ///
    /// # Errors
    /// Returns a client fault when the body is empty.
    pub fn body_payload(&self) -> Result<&XmlNode, SoapFault> {
        self.body
            .children
            .first()
            .ok_or_else(|| SoapFault::client("Missing SOAP body"))
    }
}

impl SoapVersion {
    /// Parses an incoming envelope.
    ///
    /// # Errors
    /// Returns a client fault for malformed XML or an envelope without a
    /// `Body` element.
    pub fn parse_envelope(self, xml: &str) -> Result<Envelope, SoapFault> {
        let root = XmlNode::parse(xml)
            .map_err(|err| SoapFault::client(format!("XML syntax error: {err}")))?;
        let body = root
            .child("Body")
            .cloned()
            .ok_or_else(|| SoapFault::client("Missing SOAP body"))?;
        let header = root.child("Header").cloned();
        Ok(Envelope { header, body })
    }

    /// Renders a success envelope around the given payload element.
    ///
    /// # Errors
    /// Propagates serialization errors.
    pub fn success_envelope(
        self,
        payload: &XmlNode,
        header: Option<&XmlNode>,
    ) -> Result<String, XsdError> {
        let mut body = XmlNode::new("senv:Body");
        body.append_child(payload.clone());
        self.wrap(body, header)
    }

    /// Renders a fault envelope.
    ///
    /// # Errors
    /// Propagates serialization errors.
    pub fn fault_envelope(
        self,
        fault: &SoapFault,
        header: Option<&XmlNode>,
    ) -> Result<String, XsdError> {
        let code = format!("senv:{}", self.fault_code(fault.code));
        let mut fault_node = XmlNode::new("senv:Fault");
        match self {
            SoapVersion::Soap11 => {
                fault_node.append_child(XmlNode::text_element("faultcode", code));
                fault_node.append_child(XmlNode::text_element("faultstring", &fault.message));
            }
            SoapVersion::Soap12 => {
                let mut code_node = XmlNode::new("senv:Code");
                code_node.append_child(XmlNode::text_element("senv:Value", code));
                let mut reason = XmlNode::new("senv:Reason");
                reason.append_child(XmlNode::text_element("senv:Text", &fault.message));
                fault_node.append_child(code_node);
                fault_node.append_child(reason);
            }
        }
        let mut body = XmlNode::new("senv:Body");
        body.append_child(fault_node);
        self.wrap(body, header)
    }

    fn wrap(self, body: XmlNode, header: Option<&XmlNode>) -> Result<String, XsdError> {
        let mut envelope = XmlNode::new("senv:Envelope");
        envelope.set_attribute("xmlns:senv", self.envelope_namespace());
        if let Some(header) = header {
            let mut header_node = XmlNode::new("senv:Header");
            header_node.append_child(header.clone());
            envelope.append_child(header_node);
        }
        envelope.append_child(body);
        envelope.to_xml_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_envelope_with_prefix() {
        let envelope = SoapVersion::Soap11
            .parse_envelope(
                r#"<senv:Envelope xmlns:senv="http://schemas.xmlsoap.org/soap/envelope/">
                     <senv:Body><echoRequest><value>ok</value></echoRequest></senv:Body>
                   </senv:Envelope>"#,
            )
            .unwrap();
        assert!(envelope.header.is_none());
        let payload = envelope.body_payload().unwrap();
        assert_eq!(payload.local_name(), "echoRequest");
    }

    #[test]
    fn test_parse_envelope_header() {
        let envelope = SoapVersion::Soap12
            .parse_envelope(
                "<Envelope><Header><session><id>42</id></session></Header>\
                 <Body><ping/></Body></Envelope>",
            )
            .unwrap();
        let header = envelope.header.unwrap();
        assert_eq!(header.children[0].local_name(), "session");
    }

    #[test]
    fn test_parse_envelope_missing_body() {
        let err = SoapVersion::Soap11
            .parse_envelope("<Envelope><Header/></Envelope>")
            .unwrap_err();
        assert_eq!(err.message, "Missing SOAP body");
    }

    #[test]
    fn test_parse_envelope_malformed() {
        let err = SoapVersion::Soap11
            .parse_envelope("<Envelope><Body>")
            .unwrap_err();
        assert!(err.message.starts_with("XML syntax error"));
    }

    #[test]
    fn test_empty_body_payload_faults() {
        let envelope = SoapVersion::Soap11
            .parse_envelope("<Envelope><Body/></Envelope>")
            .unwrap();
        assert!(envelope.body_payload().is_err());
    }

    #[test]
    fn test_success_envelope_round_trip() {
        let payload = XmlNode::text_element("pingResponse", "ok");
        let xml = SoapVersion::Soap11.success_envelope(&payload, None).unwrap();
        assert!(xml.contains("xmlns:senv=\"http://schemas.xmlsoap.org/soap/envelope/\""));
        let parsed = SoapVersion::Soap11.parse_envelope(&xml).unwrap();
        assert_eq!(parsed.body_payload().unwrap().local_name(), "pingResponse");
        assert_eq!(parsed.body_payload().unwrap().text(), Some("ok"));
    }

    #[test]
    fn test_fault_envelope_soap11() {
        let fault = SoapFault::client("Invalid soap action 'a3'");
        let xml = SoapVersion::Soap11.fault_envelope(&fault, None).unwrap();
        assert!(xml.contains("<faultcode>senv:Client</faultcode>"));
        let parsed = SoapVersion::Soap11.parse_envelope(&xml).unwrap();
        let fault_node = parsed.body_payload().unwrap();
        assert_eq!(
            fault_node.child("faultstring").unwrap().text(),
            Some("Invalid soap action 'a3'")
        );
    }

    #[test]
    fn test_fault_envelope_soap12() {
        let fault = SoapFault::server("boom");
        let xml = SoapVersion::Soap12.fault_envelope(&fault, None).unwrap();
        assert!(xml.contains("<senv:Value>senv:Receiver</senv:Value>"));
        assert!(xml.contains("<senv:Text>boom</senv:Text>"));
    }

    #[test]
    fn test_fault_envelope_with_header() {
        let fault = SoapFault::server("session expired");
        let header = XmlNode::text_element("session", "42");
        let xml = SoapVersion::Soap11
            .fault_envelope(&fault, Some(&header))
            .unwrap();
        let parsed = SoapVersion::Soap11.parse_envelope(&xml).unwrap();
        let header = parsed.header.as_ref().unwrap();
        assert_eq!(header.children[0].text(), Some("42"));
        assert_eq!(parsed.body_payload().unwrap().local_name(), "Fault");
    }

    #[test]
    fn test_success_envelope_with_header() {
        let payload = XmlNode::text_element("pingResponse", "ok");
        let header = XmlNode::text_element("session", "42");
        let xml = SoapVersion::Soap12
            .success_envelope(&payload, Some(&header))
            .unwrap();
        let parsed = SoapVersion::Soap12.parse_envelope(&xml).unwrap();
        let header = parsed.header.unwrap();
        assert_eq!(header.children[0].text(), Some("42"));
    }
}
