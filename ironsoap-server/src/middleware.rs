//! Middleware chain.
//!
//! Middlewares wrap the method invocation. The chain is composed once at
//! dispatcher construction into a single callable; each middleware receives
//! the dispatch context and the next link, and may short-circuit by
//! returning a response or a fault without calling onward.

use crate::service::{Method, MethodResponse};
use ironsoap_soap::SoapFault;
use ironsoap_xsd::Instance;
use std::sync::Arc;

/// Context passed through the middleware chain to the handler.
#[derive(Debug)]
pub struct DispatchRequest {
    /// The routed method.
    pub method: Arc<Method>,
    /// The soap action carried by the request, if any.
    pub soap_action: Option<String>,
    /// The parsed request header, if the envelope carried one and a header
    /// type is configured.
    pub soap_header: Option<Instance>,
    /// The parsed operation input.
    pub soap_body: Instance,
}

/// The next link in the chain.
pub type NextFn = Arc<dyn Fn(&DispatchRequest) -> Result<MethodResponse, SoapFault> + Send + Sync>;

/// A middleware: receives the request and the next link.
pub type Middleware =
    Arc<dyn Fn(&DispatchRequest, NextFn) -> Result<MethodResponse, SoapFault> + Send + Sync>;

/// The terminal link: invokes the routed method's handler.
///
/// # Errors
/// Propagates the handler's fault.
pub fn call_method(request: &DispatchRequest) -> Result<MethodResponse, SoapFault> {
    (request.method.function())(request, &request.soap_body)
}

/// Composes the middleware stack into a single callable ending at
/// [`call_method`]. The first middleware in the slice runs outermost.
#[must_use]
pub fn compose(middlewares: &[Middleware]) -> NextFn {
    let mut next: NextFn = Arc::new(call_method);
    for middleware in middlewares.iter().rev() {
        let middleware = Arc::clone(middleware);
        let inner = next;
        next = Arc::new(move |request| middleware(request, Arc::clone(&inner)));
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::MethodInput;
    use ironsoap_xsd::{ComplexType, ScalarKind, ScalarType, TypeRef};
    use std::sync::Mutex;

    fn echo_request() -> DispatchRequest {
        let ty = ComplexType::builder("EchoRequest")
            .element("value", TypeRef::scalar(ScalarType::new(ScalarKind::String)))
            .build();
        let mut body = Instance::new(&ty);
        body.set("value", "ok").unwrap();
        let method = Method::new("echo", MethodInput::Type(Arc::clone(&ty)), |_, input| {
            Ok(MethodResponse::new(input.clone()))
        });
        DispatchRequest {
            method: Arc::new(method),
            soap_action: Some("echo".to_string()),
            soap_header: None,
            soap_body: body,
        }
    }

    #[test]
    fn test_empty_chain_calls_method() {
        let chain = compose(&[]);
        let response = chain(&echo_request()).unwrap();
        assert_eq!(response.body.get_str("value"), Some("ok"));
    }

    #[test]
    fn test_chain_runs_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let first = {
            let order = Arc::clone(&order);
            Arc::new(
                move |request: &DispatchRequest, next: NextFn| -> Result<MethodResponse, SoapFault> {
                    order.lock().unwrap().push("first");
                    next(request)
                },
            ) as Middleware
        };
        let second = {
            let order = Arc::clone(&order);
            Arc::new(
                move |request: &DispatchRequest, next: NextFn| -> Result<MethodResponse, SoapFault> {
                    order.lock().unwrap().push("second");
                    next(request)
                },
            ) as Middleware
        };
        let chain = compose(&[first, second]);
        chain(&echo_request()).unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_middleware_short_circuit() {
        let blocker = Arc::new(
            |_: &DispatchRequest, _: NextFn| -> Result<MethodResponse, SoapFault> {
                Err(SoapFault::client("blocked"))
            },
        ) as Middleware;
        let chain = compose(&[blocker]);
        let err = chain(&echo_request()).unwrap_err();
        assert_eq!(err.message, "blocked");
    }
}
