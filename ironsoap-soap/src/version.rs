//! SOAP protocol versions.
//!
//! The two wire dialects differ in envelope namespace, content type, how the
//! action is conveyed and how faults are encoded. Everything else in the
//! pipeline is version-independent.

use crate::transport::SoapRequest;
use crate::fault::FaultCode;

/// A SOAP protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoapVersion {
    /// SOAP 1.1: `text/xml`, action in the `SOAPAction` header.
    Soap11,
    /// SOAP 1.2: `application/soap+xml`, action in the `Content-Type`
    /// `action` parameter.
    Soap12,
}

impl SoapVersion {
    /// Returns the envelope namespace URI for this version.
    #[must_use]
    pub fn envelope_namespace(self) -> &'static str {
        match self {
            SoapVersion::Soap11 => "http://schemas.xmlsoap.org/soap/envelope/",
            SoapVersion::Soap12 => "http://www.w3.org/2003/05/soap-envelope",
        }
    }

    /// Returns the content type used for all SOAP responses in this version.
    #[must_use]
    pub fn content_type(self) -> &'static str {
        match self {
            SoapVersion::Soap11 => "text/xml;charset=UTF-8",
            SoapVersion::Soap12 => "application/soap+xml;charset=UTF-8",
        }
    }

    /// Maps a fault code to this version's wire token.
    #[must_use]
    pub fn fault_code(self, code: FaultCode) -> &'static str {
        match (self, code) {
            (SoapVersion::Soap11, FaultCode::Client) => "Client",
            (SoapVersion::Soap11, FaultCode::Server) => "Server",
            (SoapVersion::Soap12, FaultCode::Client) => "Sender",
            (SoapVersion::Soap12, FaultCode::Server) => "Receiver",
        }
    }

    /// Extracts the requested action from a transport request.
    ///
    /// SOAP 1.1 carries it in the `SOAPAction` header, optionally quoted;
    /// SOAP 1.2 carries it in the `action` parameter of the `Content-Type`
    /// header. An absent or empty action yields `None`.
    #[must_use]
    pub fn determine_action(self, request: &SoapRequest) -> Option<String> {
        let action = match self {
            SoapVersion::Soap11 => request
                .header("SOAPAction")
                .map(|raw| raw.trim().trim_matches('"').to_string()),
            SoapVersion::Soap12 => request.header("Content-Type").and_then(|content_type| {
                content_type.split(';').find_map(|part| {
                    let part = part.trim();
                    part.strip_prefix("action=")
                        .map(|value| value.trim_matches('"').to_string())
                })
            }),
        };
        action.filter(|a| !a.is_empty())
    }
}
