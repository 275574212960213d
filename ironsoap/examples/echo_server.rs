//! Example SOAP echo service demonstrating basic request dispatch.
//!
//! Run with: `cargo run --example echo_server`
//!
//! Builds an echo service, dispatches a sample request through the
//! transport surface, and prints the WSDL and response envelopes. Set
//! `RUST_LOG=debug` to see the dispatcher's routing decisions.

use ironsoap::prelude::*;
use std::sync::Arc;

fn echo_service() -> Arc<Service> {
    let request_ty = ComplexType::builder("EchoRequest")
        .element("value", TypeRef::scalar(ScalarType::new(ScalarKind::String)))
        .build();
    let response_ty = ComplexType::builder("EchoResponse")
        .element("value", TypeRef::scalar(ScalarType::new(ScalarKind::String)))
        .build();

    let mut schema = Schema::new("http://example.org/echo", "echo.xsd");
    schema.add_element("echoRequest", &request_ty);

    let service = Service::new("EchoService", SoapVersion::Soap11, Arc::new(schema))
        .location("{scheme}://{host}/echo")
        .method(Method::new(
            "echo",
            MethodInput::Name("echoRequest".to_string()),
            move |_, input| {
                let mut body = Instance::new(&response_ty);
                body.set("value", input.get_str("value").unwrap_or_default())
                    .map_err(|err| SoapFault::server(err.to_string()))?;
                Ok(MethodResponse::new(body))
            },
        ));
    Arc::new(service)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let dispatcher = SoapDispatcher::builder(echo_service())
        .generator(Arc::new(WsdlGenerator))
        .build()?;

    let wsdl_request = SoapRequest::new("GET", "wsdl").with_header("Host", "localhost:8000");
    let wsdl = dispatcher.dispatch(&wsdl_request);
    println!("--- WSDL ({}) ---", wsdl.status);
    println!("{}", String::from_utf8_lossy(&wsdl.content));

    let envelope = "<senv:Envelope xmlns:senv=\"http://schemas.xmlsoap.org/soap/envelope/\">\
                      <senv:Body><echoRequest><value>hello</value></echoRequest></senv:Body>\
                    </senv:Envelope>";
    let request = SoapRequest::new("POST", "")
        .with_header("SOAPAction", "\"echo\"")
        .with_content(envelope);
    let response = dispatcher.dispatch(&request);
    println!("--- Response ({}) ---", response.status);
    println!("{}", String::from_utf8_lossy(&response.content));

    Ok(())
}
