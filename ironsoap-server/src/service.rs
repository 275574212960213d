//! Service and method tables.
//!
//! A service is an immutable registry of operations sharing one schema and
//! one protocol version. It is built once at startup and shared read-only
//! across requests.

use crate::middleware::DispatchRequest;
use ironsoap_soap::{SoapFault, SoapVersion};
use ironsoap_xsd::{ComplexType, Instance, Schema};
use std::fmt;
use std::sync::Arc;

/// Handler signature: the dispatch context and the parsed operation input.
pub type HandlerFn =
    Arc<dyn Fn(&DispatchRequest, &Instance) -> Result<MethodResponse, SoapFault> + Send + Sync>;

/// The operation input declaration: either a bound type or the name of a
/// root element registered in the service schema.
#[derive(Debug, Clone)]
pub enum MethodInput {
    /// The input type, bound directly.
    Type(Arc<ComplexType>),
    /// The name of a root element to resolve against the schema.
    Name(String),
}

impl MethodInput {
    /// Returns the name this input is matched against when routing falls
    /// back to the body's root tag.
    #[must_use]
    pub fn input_name(&self) -> &str {
        match self {
            MethodInput::Type(ty) => ty.name(),
            MethodInput::Name(name) => name,
        }
    }
}

/// The body and optional header of a handler result.
#[derive(Debug, Clone)]
pub struct MethodResponse {
    /// The response body instance.
    pub body: Instance,
    /// An optional response header instance.
    pub header: Option<Instance>,
}

impl MethodResponse {
    /// Creates a response with a body and no header.
    #[must_use]
    pub fn new(body: Instance) -> Self {
        Self { body, header: None }
    }

    /// Attaches a response header.
    #[must_use]
    pub fn with_header(mut self, header: Instance) -> Self {
        self.header = Some(header);
        self
    }
}

impl From<Instance> for MethodResponse {
    fn from(body: Instance) -> Self {
        Self::new(body)
    }
}

/// A single exposed operation.
pub struct Method {
    name: String,
    input: MethodInput,
    soap_action: String,
    output_name: Option<String>,
    input_header: Option<Arc<ComplexType>>,
    function: HandlerFn,
}

impl Method {
    /// Creates a method. The soap action defaults to the method name.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        input: MethodInput,
        function: impl Fn(&DispatchRequest, &Instance) -> Result<MethodResponse, SoapFault>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        let name = name.into();
        Self {
            soap_action: name.clone(),
            name,
            input,
            output_name: None,
            input_header: None,
            function: Arc::new(function),
        }
    }

    /// Overrides the soap action this method is routed by.
    #[must_use]
    pub fn soap_action(mut self, action: impl Into<String>) -> Self {
        self.soap_action = action.into();
        self
    }

    /// Sets an explicit response tag, overriding the one derived from the
    /// response body's type name.
    #[must_use]
    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    /// Sets the header type this method expects, overriding the service
    /// default.
    #[must_use]
    pub fn input_header(mut self, ty: &Arc<ComplexType>) -> Self {
        self.input_header = Some(Arc::clone(ty));
        self
    }

    /// Returns the operation name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the input declaration.
    #[must_use]
    pub fn input(&self) -> &MethodInput {
        &self.input
    }

    /// Returns the soap action this method is routed by.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.soap_action
    }

    /// Returns the explicit response tag, if one is configured.
    #[must_use]
    pub fn output(&self) -> Option<&str> {
        self.output_name.as_deref()
    }

    /// Returns the method-specific header type, if one is configured.
    #[must_use]
    pub fn header_type(&self) -> Option<&Arc<ComplexType>> {
        self.input_header.as_ref()
    }

    /// Returns the handler.
    #[must_use]
    pub fn function(&self) -> &HandlerFn {
        &self.function
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("soap_action", &self.soap_action)
            .field("output_name", &self.output_name)
            .finish_non_exhaustive()
    }
}

/// An immutable service: version, schema, operations and default header.
#[derive(Debug)]
pub struct Service {
    name: String,
    version: SoapVersion,
    schema: Arc<Schema>,
    methods: Vec<Arc<Method>>,
    input_header: Option<Arc<ComplexType>>,
    location: String,
}

impl Service {
    /// Creates an empty service.
    #[must_use]
    pub fn new(name: impl Into<String>, version: SoapVersion, schema: Arc<Schema>) -> Self {
        Self {
            name: name.into(),
            version,
            schema,
            methods: Vec::new(),
            input_header: None,
            location: String::new(),
        }
    }

    /// Registers a method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.methods.push(Arc::new(method));
        self
    }

    /// Sets the default header type applied to methods without their own.
    #[must_use]
    pub fn input_header(mut self, ty: &Arc<ComplexType>) -> Self {
        self.input_header = Some(Arc::clone(ty));
        self
    }

    /// Sets the service endpoint location. May contain `{scheme}` and
    /// `{host}` placeholders substituted when the WSDL is served.
    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Returns the service name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the protocol version.
    #[must_use]
    pub fn version(&self) -> SoapVersion {
        self.version
    }

    /// Returns the service schema.
    #[must_use]
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Returns the registered methods in declaration order.
    #[must_use]
    pub fn methods(&self) -> &[Arc<Method>] {
        &self.methods
    }

    /// Returns the default header type, if one is configured.
    #[must_use]
    pub fn default_header_type(&self) -> Option<&Arc<ComplexType>> {
        self.input_header.as_ref()
    }

    /// Returns the endpoint location template.
    #[must_use]
    pub fn endpoint_location(&self) -> &str {
        &self.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironsoap_xsd::{ScalarKind, ScalarType, TypeRef};

    fn echo_type() -> Arc<ComplexType> {
        ComplexType::builder("EchoRequest")
            .element("value", TypeRef::scalar(ScalarType::new(ScalarKind::String)))
            .build()
    }

    #[test]
    fn test_method_defaults() {
        let ty = echo_type();
        let method = Method::new("echo", MethodInput::Type(Arc::clone(&ty)), |_, input| {
            Ok(MethodResponse::new(input.clone()))
        });
        assert_eq!(method.action(), "echo");
        assert_eq!(method.output(), None);
        assert_eq!(method.input().input_name(), "EchoRequest");
    }

    #[test]
    fn test_method_overrides() {
        let method = Method::new(
            "echo",
            MethodInput::Name("echoRequest".to_string()),
            |_, input| Ok(MethodResponse::new(input.clone())),
        )
        .soap_action("urn:echo")
        .output_name("echoResponse");
        assert_eq!(method.action(), "urn:echo");
        assert_eq!(method.output(), Some("echoResponse"));
        assert_eq!(method.input().input_name(), "echoRequest");
    }

    #[test]
    fn test_service_registration() {
        let ty = echo_type();
        let mut schema = Schema::new("http://example.org/echo", "echo.xsd");
        schema.add_element("echoRequest", &ty);
        let service = Service::new("EchoService", SoapVersion::Soap11, Arc::new(schema))
            .location("{scheme}://{host}/echo")
            .method(Method::new(
                "echo",
                MethodInput::Name("echoRequest".to_string()),
                |_, input| Ok(MethodResponse::new(input.clone())),
            ));
        assert_eq!(service.methods().len(), 1);
        assert_eq!(service.endpoint_location(), "{scheme}://{host}/echo");
    }
}
