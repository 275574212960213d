//! Request dispatcher.
//!
//! One dispatcher per service. Construction composes the middleware chain
//! and generates the self-description documents; after that the dispatcher
//! is immutable and can be shared across threads.

use crate::describe::{DescriptionGenerator, generate_xsds, rewrite_locations};
use crate::middleware::{DispatchRequest, Middleware, NextFn, compose};
use crate::service::{Method, MethodInput, MethodResponse, Service};
use crate::validate::{AcceptAll, SchemaValidator, WSA_NAMESPACE, WsAddressingValidator};
use ironsoap_soap::{Envelope, SoapFault, SoapRequest, SoapResponse};
use ironsoap_xsd::{ComplexType, Instance, XmlNode, XsdError};
use std::collections::HashMap;
use std::sync::Arc;

/// Builder for configuring and creating a dispatcher.
pub struct DispatcherBuilder {
    service: Arc<Service>,
    middlewares: Vec<Middleware>,
    wsdl: Option<Vec<u8>>,
    xsds: Option<HashMap<String, Vec<u8>>>,
    strict_header_validation: bool,
    schema_validator: Arc<dyn SchemaValidator>,
    addressing_validator: Arc<dyn SchemaValidator>,
    generator: Option<Arc<dyn DescriptionGenerator>>,
}

impl DispatcherBuilder {
    /// Creates a builder for the given service with default settings.
    #[must_use]
    pub fn new(service: Arc<Service>) -> Self {
        Self {
            service,
            middlewares: Vec::new(),
            wsdl: None,
            xsds: None,
            strict_header_validation: true,
            schema_validator: Arc::new(AcceptAll),
            addressing_validator: Arc::new(WsAddressingValidator),
            generator: None,
        }
    }

    /// Appends a middleware; earlier registrations run outermost.
    #[must_use]
    pub fn middleware(mut self, middleware: Middleware) -> Self {
        self.middlewares.push(middleware);
        self
    }

    /// Overrides the generated WSDL with a prepared document.
    #[must_use]
    pub fn wsdl(mut self, wsdl: impl Into<Vec<u8>>) -> Self {
        self.wsdl = Some(wsdl.into());
        self
    }

    /// Overrides the generated XSD map with prepared documents keyed by
    /// location.
    #[must_use]
    pub fn xsds(mut self, xsds: HashMap<String, Vec<u8>>) -> Self {
        self.xsds = Some(xsds);
        self
    }

    /// Controls whether a header part outside the schema faults the request
    /// (true, the default) or is logged and ignored.
    #[must_use]
    pub fn strict_header_validation(mut self, strict: bool) -> Self {
        self.strict_header_validation = strict;
        self
    }

    /// Sets the schema validator applied to body and non-addressing header
    /// parts.
    #[must_use]
    pub fn schema_validator(mut self, validator: Arc<dyn SchemaValidator>) -> Self {
        self.schema_validator = validator;
        self
    }

    /// Sets the validator applied to WS-Addressing header parts.
    #[must_use]
    pub fn addressing_validator(mut self, validator: Arc<dyn SchemaValidator>) -> Self {
        self.addressing_validator = validator;
        self
    }

    /// Sets the description generator used when no WSDL or XSD override is
    /// given.
    #[must_use]
    pub fn generator(mut self, generator: Arc<dyn DescriptionGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Builds the dispatcher, generating the missing description documents.
    ///
    /// # Errors
    /// Propagates serialization errors from description generation.
    ///
    /// # Panics
    /// Panics if WSDL or XSD generation is needed and no generator was set.
    pub fn build(self) -> Result<SoapDispatcher, XsdError> {
        let chain = compose(&self.middlewares);

        let needs_generator = self.wsdl.is_none() || self.xsds.is_none();
        let generator = match (&self.generator, needs_generator) {
            (Some(generator), _) => Some(Arc::clone(generator)),
            (None, false) => None,
            (None, true) => panic!("Description generator required"),
        };

        let wsdl = match self.wsdl {
            Some(wsdl) => wsdl,
            None => {
                let generator = generator.as_deref().expect("Description generator required");
                let mut node = generator.wsdl(&self.service);
                rewrite_locations(&mut node);
                node.to_xml_string()?.into_bytes()
            }
        };

        let xsds = match self.xsds {
            Some(xsds) => xsds,
            None => {
                let generator = generator.as_deref().expect("Description generator required");
                let mut xsds = HashMap::new();
                generate_xsds(generator, self.service.schema(), &mut xsds)?;
                xsds
            }
        };

        Ok(SoapDispatcher {
            service: self.service,
            chain,
            wsdl,
            xsds,
            strict_header_validation: self.strict_header_validation,
            schema_validator: self.schema_validator,
            addressing_validator: self.addressing_validator,
        })
    }
}

/// Routes transport requests through the protocol pipeline and serves the
/// service's self-description documents.
pub struct SoapDispatcher {
    service: Arc<Service>,
    chain: NextFn,
    wsdl: Vec<u8>,
    xsds: HashMap<String, Vec<u8>>,
    strict_header_validation: bool,
    schema_validator: Arc<dyn SchemaValidator>,
    addressing_validator: Arc<dyn SchemaValidator>,
}

impl SoapDispatcher {
    /// Creates a builder for the given service.
    #[must_use]
    pub fn builder(service: Arc<Service>) -> DispatcherBuilder {
        DispatcherBuilder::new(service)
    }

    /// Returns the service this dispatcher exposes.
    #[must_use]
    pub fn service(&self) -> &Arc<Service> {
        &self.service
    }

    /// Handles one transport request.
    pub fn dispatch(&self, request: &SoapRequest) -> SoapResponse {
        match request.method.as_str() {
            "GET" if request.query.contains("wsdl") => self.handle_wsdl_request(request),
            "GET" if request.query.contains("xsd=") => self.handle_xsd_request(request),
            "POST" => self.handle_soap_request(request),
            _ => SoapResponse::new(400, "text/plain", "bad request"),
        }
    }

    /// Runs the protocol pipeline and marshals the outcome.
    fn handle_soap_request(&self, request: &SoapRequest) -> SoapResponse {
        let version = self.service.version();
        match self.run_pipeline(request) {
            Ok((method, response)) => {
                let tag = response_tag(&method, &response.body);
                let rendered = render_header(response.header.as_ref()).and_then(|header| {
                    let payload = response.body.ty().render_instance(&response.body, &tag)?;
                    version.success_envelope(&payload, header.as_ref())
                });
                match rendered {
                    Ok(xml) => SoapResponse::new(200, version.content_type(), xml),
                    Err(err) => {
                        tracing::error!("Response marshalling failed: {}", err);
                        self.fault_response(&SoapFault::server(err.to_string()))
                    }
                }
            }
            Err(fault) => self.fault_response(&fault),
        }
    }

    fn fault_response(&self, fault: &SoapFault) -> SoapResponse {
        let version = self.service.version();
        let rendered = render_header(fault.header.as_ref())
            .and_then(|header| version.fault_envelope(fault, header.as_ref()));
        match rendered {
            Ok(xml) => SoapResponse::new(500, version.content_type(), xml),
            Err(err) => SoapResponse::new(500, "text/plain", err.to_string()),
        }
    }

    fn run_pipeline(
        &self,
        request: &SoapRequest,
    ) -> Result<(Arc<Method>, MethodResponse), SoapFault> {
        let version = self.service.version();
        let envelope = version.parse_envelope(&request.content_str())?;
        let payload = envelope.body_payload()?;

        self.validate_input(&envelope, payload)?;

        let soap_action = version.determine_action(request);
        let method = self.find_method(soap_action.as_deref(), payload)?;
        let soap_header = self.parse_header(&method, envelope.header.as_ref())?;
        let soap_body = self.parse_body(&method, payload)?;

        let dispatch_request = DispatchRequest {
            method: Arc::clone(&method),
            soap_action,
            soap_header,
            soap_body,
        };
        let response = (self.chain)(&dispatch_request)?;
        Ok((method, response))
    }

    /// Validates each header part, then the body, before routing.
    fn validate_input(&self, envelope: &Envelope, payload: &XmlNode) -> Result<(), SoapFault> {
        if let Some(header) = &envelope.header {
            for part in &header.children {
                if part.namespace.as_deref() == Some(WSA_NAMESPACE) {
                    self.addressing_validator
                        .validate(part)
                        .map_err(|err| SoapFault::client(err.to_string()))?;
                } else if let Err(err) = self.schema_validator.validate(part) {
                    if self.strict_header_validation {
                        return Err(SoapFault::client(err.to_string()));
                    }
                    tracing::warn!("Ignoring invalid header part '{}': {}", part.name, err);
                }
            }
        }

        self.schema_validator
            .validate(payload)
            .map_err(|err| SoapFault::client(err.to_string()))
    }

    /// Routes by soap action when one is present, otherwise by the body's
    /// root tag against each method's input name.
    fn find_method(
        &self,
        soap_action: Option<&str>,
        payload: &XmlNode,
    ) -> Result<Arc<Method>, SoapFault> {
        let root_tag = payload.local_name();
        match soap_action {
            Some(action) => tracing::debug!("Soap action found in http headers: {}", action),
            None => tracing::debug!(
                "Soap action not found in http headers, use root tag \"{}\".",
                root_tag
            ),
        }
        for method in self.service.methods() {
            match soap_action {
                Some(action) => {
                    if action == method.action() {
                        return Ok(Arc::clone(method));
                    }
                }
                None => {
                    if root_tag == method.input().input_name() {
                        return Ok(Arc::clone(method));
                    }
                }
            }
        }
        Err(match soap_action {
            Some(action) => SoapFault::client(format!("Invalid soap action '{action}'")),
            None => SoapFault::client(format!(
                "Missing soap action and invalid root tag '{root_tag}'"
            )),
        })
    }

    /// Parses the header with the method's header type, falling back to the
    /// service default; no configured type means no parsed header.
    fn parse_header(
        &self,
        method: &Method,
        header: Option<&XmlNode>,
    ) -> Result<Option<Instance>, SoapFault> {
        let Some(header) = header else {
            return Ok(None);
        };
        let header_type = method
            .header_type()
            .or_else(|| self.service.default_header_type());
        match header_type {
            Some(ty) => ty
                .parse_node(header)
                .map(Some)
                .map_err(|err| SoapFault::client(err.to_string())),
            None => Ok(None),
        }
    }

    /// Resolves the method's input to a type and parses the payload.
    fn parse_body(&self, method: &Method, payload: &XmlNode) -> Result<Instance, SoapFault> {
        let ty: Arc<ComplexType> = match method.input() {
            MethodInput::Type(ty) => Arc::clone(ty),
            MethodInput::Name(name) => self
                .service
                .schema()
                .get_type_by_element_name(name)
                .map(Arc::clone)
                .map_err(|err| SoapFault::client(err.to_string()))?,
        };
        ty.parse_node(payload)
            .map_err(|err| SoapFault::client(err.to_string()))
    }

    /// Serves the WSDL, substituting `{scheme}` and `{host}` from the
    /// request's forwarding headers.
    fn handle_wsdl_request(&self, request: &SoapRequest) -> SoapResponse {
        let scheme = request.header("X-Forwarded-Proto").unwrap_or("http");
        let mut wsdl = String::from_utf8_lossy(&self.wsdl).into_owned();
        if let Some(host) = request.header("Host") {
            wsdl = wsdl.replace("{scheme}", scheme).replace("{host}", host);
        }
        SoapResponse::new(200, "text/xml", wsdl)
    }

    /// Serves one generated sub-schema looked up by the `xsd` query
    /// parameter.
    fn handle_xsd_request(&self, request: &SoapRequest) -> SoapResponse {
        let location = request
            .query
            .split('&')
            .find_map(|pair| pair.strip_prefix("xsd="));
        match location.and_then(|location| self.xsds.get(location)) {
            Some(xsd) => SoapResponse::new(200, "text/xml", xsd.clone()),
            None => SoapResponse::new(400, "text/plain", "bad request"),
        }
    }
}

/// The response tag: the method's configured output name, otherwise the
/// body's type name with a lowercase initial.
fn response_tag(method: &Method, body: &Instance) -> String {
    match method.output() {
        Some(name) => name.to_string(),
        None => uncapitalize(body.type_name()),
    }
}

fn render_header(header: Option<&Instance>) -> Result<Option<XmlNode>, XsdError> {
    match header {
        Some(instance) => {
            let tag = uncapitalize(instance.type_name());
            instance
                .ty()
                .render_instance(instance, &tag)
                .map(Some)
        }
        None => Ok(None),
    }
}

fn uncapitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
