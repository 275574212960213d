//! # IronSOAP Server
//!
//! Service tables, middleware chain, validation hooks, self-description
//! generation and the request dispatcher.

pub mod describe;
pub mod dispatcher;
pub mod middleware;
pub mod service;
pub mod validate;

pub use describe::{DescriptionGenerator, WsdlGenerator};
pub use dispatcher::{DispatcherBuilder, SoapDispatcher};
pub use middleware::{DispatchRequest, Middleware, NextFn};
pub use service::{HandlerFn, Method, MethodInput, MethodResponse, Service};
pub use validate::{AcceptAll, SchemaValidator, WsAddressingValidator};
