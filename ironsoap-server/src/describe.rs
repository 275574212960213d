//! Self-description: WSDL and XSD generation.
//!
//! The dispatcher serves a WSDL for the service and one XSD per imported or
//! included sub-schema. Generation happens once at construction;
//! `schemaLocation` attributes are rewritten to `?xsd=<location>` so clients
//! fetch sub-schemas from the same endpoint.

use crate::service::Service;
use ironsoap_xsd::{ComplexType, FieldKind, Schema, TypeRef, Use, XmlNode, XsdError};
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";
const WSDL_NAMESPACE: &str = "http://schemas.xmlsoap.org/wsdl/";
const WSDL_SOAP_NAMESPACE: &str = "http://schemas.xmlsoap.org/wsdl/soap/";
const SOAP_HTTP_TRANSPORT: &str = "http://schemas.xmlsoap.org/soap/http";

/// Produces description documents for a service and its schemas.
pub trait DescriptionGenerator: Send + Sync {
    /// Generates the WSDL document element for a service.
    fn wsdl(&self, service: &Service) -> XmlNode;

    /// Generates the schema document element for one schema.
    fn xsd(&self, schema: &Schema) -> XmlNode;
}

/// The standard generator: document/literal WSDL 1.1 with an embedded
/// schema, plus standalone XSDs for sub-schemas.
#[derive(Debug, Default)]
pub struct WsdlGenerator;

impl DescriptionGenerator for WsdlGenerator {
    fn wsdl(&self, service: &Service) -> XmlNode {
        let tns = service.schema().target_namespace();
        let mut definitions = XmlNode::new("wsdl:definitions");
        definitions.set_attribute("xmlns:wsdl", WSDL_NAMESPACE);
        definitions.set_attribute("xmlns:soap", WSDL_SOAP_NAMESPACE);
        definitions.set_attribute("xmlns:xsd", XSD_NAMESPACE);
        definitions.set_attribute("xmlns:sns", tns);
        definitions.set_attribute("targetNamespace", tns);
        definitions.set_attribute("name", service.name());

        let mut types = XmlNode::new("wsdl:types");
        types.append_child(self.xsd(service.schema()));
        definitions.append_child(types);

        for method in service.methods() {
            let mut message = XmlNode::new("wsdl:message");
            message.set_attribute("name", format!("{}Input", method.name()));
            let mut part = XmlNode::new("wsdl:part");
            part.set_attribute("name", "body");
            part.set_attribute("element", format!("sns:{}", method.input().input_name()));
            message.append_child(part);
            definitions.append_child(message);
        }

        let port_type_name = format!("{}PortType", service.name());
        let mut port_type = XmlNode::new("wsdl:portType");
        port_type.set_attribute("name", &port_type_name);
        for method in service.methods() {
            let mut operation = XmlNode::new("wsdl:operation");
            operation.set_attribute("name", method.name());
            let mut input = XmlNode::new("wsdl:input");
            input.set_attribute("message", format!("sns:{}Input", method.name()));
            operation.append_child(input);
            port_type.append_child(operation);
        }
        definitions.append_child(port_type);

        let binding_name = format!("{}Binding", service.name());
        let mut binding = XmlNode::new("wsdl:binding");
        binding.set_attribute("name", &binding_name);
        binding.set_attribute("type", format!("sns:{port_type_name}"));
        let mut soap_binding = XmlNode::new("soap:binding");
        soap_binding.set_attribute("style", "document");
        soap_binding.set_attribute("transport", SOAP_HTTP_TRANSPORT);
        binding.append_child(soap_binding);
        for method in service.methods() {
            let mut operation = XmlNode::new("wsdl:operation");
            operation.set_attribute("name", method.name());
            let mut soap_operation = XmlNode::new("soap:operation");
            soap_operation.set_attribute("soapAction", method.action());
            operation.append_child(soap_operation);
            binding.append_child(operation);
        }
        definitions.append_child(binding);

        let mut service_node = XmlNode::new("wsdl:service");
        service_node.set_attribute("name", service.name());
        let mut port = XmlNode::new("wsdl:port");
        port.set_attribute("name", format!("{}Port", service.name()));
        port.set_attribute("binding", format!("sns:{binding_name}"));
        let mut address = XmlNode::new("soap:address");
        address.set_attribute("location", service.endpoint_location());
        port.append_child(address);
        service_node.append_child(port);
        definitions.append_child(service_node);

        definitions
    }

    fn xsd(&self, schema: &Schema) -> XmlNode {
        let mut root = XmlNode::new("xsd:schema");
        root.set_attribute("xmlns:xsd", XSD_NAMESPACE);
        root.set_attribute("xmlns:sns", schema.target_namespace());
        root.set_attribute("targetNamespace", schema.target_namespace());
        root.set_attribute("elementFormDefault", "qualified");

        for import in schema.imports() {
            let mut node = XmlNode::new("xsd:import");
            node.set_attribute("namespace", import.target_namespace());
            node.set_attribute("schemaLocation", import.location());
            root.append_child(node);
        }
        for include in schema.includes() {
            let mut node = XmlNode::new("xsd:include");
            node.set_attribute("schemaLocation", include.location());
            root.append_child(node);
        }

        let mut seen = HashSet::new();
        for (_, ty) in schema.elements() {
            collect_types(ty, &mut seen, &mut root);
        }

        for (name, ty) in schema.elements() {
            let mut element = XmlNode::new("xsd:element");
            element.set_attribute("name", name.as_str());
            element.set_attribute("type", format!("sns:{}", ty.name()));
            root.append_child(element);
        }

        root
    }
}

/// Emits a complexType declaration for `ty` and every complex type its
/// fields reference, depth first, each type once.
fn collect_types(ty: &Arc<ComplexType>, seen: &mut HashSet<String>, root: &mut XmlNode) {
    if !seen.insert(ty.name().to_string()) {
        return;
    }
    for field in ty.fields() {
        if let TypeRef::Complex(nested) = &field.type_ref {
            collect_types(nested, seen, root);
        }
    }
    root.append_child(complex_type_node(ty));
}

fn complex_type_node(ty: &Arc<ComplexType>) -> XmlNode {
    let mut node = XmlNode::new("xsd:complexType");
    node.set_attribute("name", ty.name());

    let mut sequence = XmlNode::new("xsd:sequence");
    let mut attributes = Vec::new();
    append_members(ty, &mut sequence, &mut attributes);
    if !sequence.children.is_empty() {
        node.append_child(sequence);
    }
    for attribute in attributes {
        node.append_child(attribute);
    }
    node
}

/// Flattens a type's fields into element and attribute declarations; group
/// members land on the owner, matching how they render.
fn append_members(ty: &Arc<ComplexType>, sequence: &mut XmlNode, attributes: &mut Vec<XmlNode>) {
    for field in ty.fields() {
        match field.kind {
            FieldKind::Element | FieldKind::Repeated => {
                let mut element = XmlNode::new("xsd:element");
                element.set_attribute("name", field.name.as_str());
                element.set_attribute("type", type_reference(&field.type_ref));
                if field.min_occurs() != 1 {
                    element.set_attribute("minOccurs", field.min_occurs().to_string());
                }
                if field.max_occurs() != 1 {
                    element.set_attribute("maxOccurs", field.max_occurs().to_string());
                }
                if field.nilable {
                    element.set_attribute("nillable", "true");
                }
                sequence.append_child(element);
            }
            FieldKind::Attribute => {
                let mut attribute = XmlNode::new("xsd:attribute");
                attribute.set_attribute("name", field.name.as_str());
                attribute.set_attribute("type", type_reference(&field.type_ref));
                let use_ = match field.use_ {
                    Use::Required => "required",
                    Use::Optional => "optional",
                    Use::Prohibited => "prohibited",
                };
                attribute.set_attribute("use", use_);
                attributes.push(attribute);
            }
            FieldKind::Group | FieldKind::AttributeGroup => {
                if let TypeRef::Complex(embedded) = &field.type_ref {
                    append_members(embedded, sequence, attributes);
                }
            }
        }
    }
}

fn type_reference(type_ref: &TypeRef) -> String {
    match type_ref {
        TypeRef::Scalar(scalar) => format!("xsd:{}", scalar.kind.xsd_name()),
        TypeRef::Complex(ty) => format!("sns:{}", ty.name()),
    }
}

/// Rewrites every import/include `schemaLocation` to `?xsd=<location>`.
pub fn rewrite_locations(node: &mut XmlNode) {
    node.walk_mut(&mut |element| {
        if matches!(element.local_name(), "import" | "include") {
            if let Some(location) = element.attribute("schemaLocation").map(str::to_string) {
                element.set_attribute("schemaLocation", format!("?xsd={location}"));
            }
        }
    });
}

/// Generates one XSD per sub-schema reachable through imports and includes,
/// keyed by location. A location is marked generated before its own
/// sub-schemas are visited, so shared and cyclic graphs produce each
/// document exactly once.
///
/// # Errors
/// Propagates serialization errors.
pub fn generate_xsds(
    generator: &dyn DescriptionGenerator,
    schema: &Schema,
    generated: &mut HashMap<String, Vec<u8>>,
) -> Result<(), XsdError> {
    for sub in schema.imports().iter().chain(schema.includes().iter()) {
        if generated.contains_key(sub.location()) {
            continue;
        }
        let mut node = generator.xsd(sub);
        rewrite_locations(&mut node);
        let xml = node.to_xml_string()?;
        generated.insert(sub.location().to_string(), xml.into_bytes());
        generate_xsds(generator, sub, generated)?;
    }
    Ok(())
}
