//! # IronSOAP
//!
//! A SOAP server toolkit for Rust built on a declarative XML binding
//! engine.
//!
//! ## Features
//!
//! - **Schema-driven binding** - Declare complex types once, render and
//!   parse instances against them
//! - **SOAP 1.1 and 1.2** - Envelope codecs, faults and action routing for
//!   both dialects
//! - **Middleware pipeline** - Wrap operation handlers with composable
//!   middleware
//! - **Self-describing services** - WSDL and XSD documents generated and
//!   served from the same endpoint
//!
//! ## Quick Start
//!
//! ```
//! use ironsoap::prelude::*;
//! use std::sync::Arc;
//!
//! let request_ty = ComplexType::builder("EchoRequest")
//!     .element("value", TypeRef::scalar(ScalarType::new(ScalarKind::String)))
//!     .build();
//! let mut schema = Schema::new("http://example.org/echo", "echo.xsd");
//! schema.add_element("echoRequest", &request_ty);
//!
//! let response_ty = ComplexType::builder("EchoResponse")
//!     .element("value", TypeRef::scalar(ScalarType::new(ScalarKind::String)))
//!     .build();
//! let handler_ty = Arc::clone(&response_ty);
//!
//! let service = Service::new("EchoService", SoapVersion::Soap11, Arc::new(schema))
//!     .location("{scheme}://{host}/echo")
//!     .method(Method::new(
//!         "echo",
//!         MethodInput::Name("echoRequest".to_string()),
//!         move |_, input| {
//!             let mut body = Instance::new(&handler_ty);
//!             body.set("value", input.get_str("value").unwrap_or_default())
//!                 .map_err(|e| SoapFault::server(e.to_string()))?;
//!             Ok(MethodResponse::new(body))
//!         },
//!     ));
//!
//! let dispatcher = SoapDispatcher::builder(Arc::new(service))
//!     .generator(Arc::new(WsdlGenerator))
//!     .build()
//!     .unwrap();
//!
//! let request = SoapRequest::new("GET", "wsdl");
//! let response = dispatcher.dispatch(&request);
//! assert_eq!(response.status, 200);
//! ```
//!
//! ## Crate Organization
//!
//! - [`xsd`] - Declarative XML/object binding: scalars, fields, complex
//!   types, instances, documents, schemas
//! - [`soap`] - Envelope codecs, faults and transport types
//! - [`server`] - Service tables, middleware, validation and the dispatcher

pub mod prelude;

/// Declarative XML/object binding engine.
pub mod xsd {
    pub use ironsoap_xsd::*;
}

/// Envelope codecs, faults and transport types.
pub mod soap {
    pub use ironsoap_soap::*;
}

/// Service tables, middleware and the dispatcher.
pub mod server {
    pub use ironsoap_server::*;
}

// Re-export commonly used items at the crate root
pub use ironsoap_xsd::{
    ComplexType, ComplexTypeBuilder, Document, FieldDescriptor, Instance, ScalarKind, ScalarType,
    Schema, TypeRef, Value, XmlNode, XsdError,
};

pub use ironsoap_soap::{SoapFault, SoapRequest, SoapResponse, SoapVersion};

pub use ironsoap_server::{
    DispatcherBuilder, Method, MethodInput, MethodResponse, Service, SoapDispatcher, WsdlGenerator,
};
