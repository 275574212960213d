//! SOAP fault representation.

use ironsoap_xsd::Instance;
use thiserror::Error;

/// The party responsible for a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultCode {
    /// The request was malformed or unroutable.
    Client,
    /// The service failed while handling a well-formed request.
    Server,
}

/// A SOAP fault carried back to the caller in a fault envelope.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct SoapFault {
    /// Which party the fault is attributed to.
    pub code: FaultCode,
    /// Human-readable fault string.
    pub message: String,
    /// Optional header instance carried alongside the fault.
    pub header: Option<Instance>,
}

impl SoapFault {
    /// Creates a fault attributed to the caller.
    #[must_use]
    pub fn client(message: impl Into<String>) -> Self {
        Self {
            code: FaultCode::Client,
            message: message.into(),
            header: None,
        }
    }

    /// Creates a fault attributed to the service.
    #[must_use]
    pub fn server(message: impl Into<String>) -> Self {
        Self {
            code: FaultCode::Server,
            message: message.into(),
            header: None,
        }
    }

    /// Attaches a header to carry into the fault envelope.
    #[must_use]
    pub fn with_header(mut self, header: Instance) -> Self {
        self.header = Some(header);
        self
    }
}
