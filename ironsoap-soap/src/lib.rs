//! # IronSOAP SOAP
//!
//! Protocol-level building blocks: transport-neutral request/response
//! types, the two SOAP dialects, envelope codecs and faults.

pub mod envelope;
pub mod fault;
pub mod transport;
pub mod version;

pub use transport::{SoapRequest, SoapResponse};
pub use envelope::Envelope;
pub use fault::{FaultCode, SoapFault};
pub use version::SoapVersion;
