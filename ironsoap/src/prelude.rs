//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits.
//!
//! ```ignore
//! use ironsoap::prelude::*;
//! ```

// Binding types
pub use ironsoap_xsd::{
    ComplexType, ComplexTypeBuilder, Document, FieldDescriptor, FieldKind, Instance, ScalarKind,
    ScalarType, Schema, TypeRef, Use, Value, XmlNode, XsdError,
};

// Protocol types
pub use ironsoap_soap::{Envelope, FaultCode, SoapFault, SoapRequest, SoapResponse, SoapVersion};

// Server types
pub use ironsoap_server::{
    AcceptAll, DescriptionGenerator, DispatchRequest, DispatcherBuilder, HandlerFn, Method,
    MethodInput, MethodResponse, Middleware, NextFn, SchemaValidator, Service, SoapDispatcher,
    WsAddressingValidator, WsdlGenerator,
};
