//! Complex type definitions and the marshal engine.
//!
//! A complex type is an ordered list of field descriptors with single
//! inheritance. The effective field list (parent's fields followed by the
//! subtype's own, append-only) is computed once when the type is built,
//! never re-derived per instantiation.

use crate::error::XsdError;
use crate::fields::{FieldDescriptor, TypeRef};
use crate::instance::Instance;
use crate::scalar::ScalarType;
use crate::xml::XmlNode;
use std::sync::Arc;

/// A complex type: named, ordered fields, optional parent type.
#[derive(Debug)]
pub struct ComplexType {
    name: String,
    parent: Option<Arc<ComplexType>>,
    own_fields: Vec<FieldDescriptor>,
    effective: Vec<FieldDescriptor>,
}

impl ComplexType {
    /// Starts building a complex type with the given name.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ComplexTypeBuilder {
        ComplexTypeBuilder {
            name: name.into(),
            parent: None,
            fields: Vec::new(),
        }
    }

    /// Returns the type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parent type, if this type extends one.
    #[must_use]
    pub fn parent(&self) -> Option<&Arc<ComplexType>> {
        self.parent.as_ref()
    }

    /// Returns the fields this type declares itself, excluding inherited
    /// ones.
    #[must_use]
    pub fn own_fields(&self) -> &[FieldDescriptor] {
        &self.own_fields
    }

    /// Returns the effective field list: inherited fields first, then own
    /// declarations, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.effective
    }

    /// Looks up an effective field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.effective.iter().find(|f| f.name == name)
    }

    /// Renders an instance into an element named `tag`.
    ///
    /// Attribute fields become XML attributes; element fields become child
    /// nodes in declaration order.
    ///
    /// # Errors
    /// Propagates cardinality, requiredness and codec errors from the
    /// fields.
    pub fn render_instance(&self, instance: &Instance, tag: &str) -> Result<XmlNode, XsdError> {
        let mut node = XmlNode::new(tag);
        for field in &self.effective {
            field.render(&mut node, instance.get(&field.name))?;
        }
        Ok(node)
    }

    /// Parses an element into an instance of this type.
    ///
    /// Unknown child elements and attributes are ignored.
    ///
    /// # Errors
    /// Propagates codec errors from the fields.
    pub fn parse_node(self: &Arc<Self>, node: &XmlNode) -> Result<Instance, XsdError> {
        let mut instance = Instance::new(self);
        for field in &self.effective {
            if let Some(value) = field.parse(node)? {
                instance.insert_raw(field.name.clone(), value);
            }
        }
        Ok(instance)
    }
}

/// Builder registering the ordered field list of a complex type.
pub struct ComplexTypeBuilder {
    name: String,
    parent: Option<Arc<ComplexType>>,
    fields: Vec<FieldDescriptor>,
}

impl ComplexTypeBuilder {
    /// Sets the parent type; its effective fields come first.
    #[must_use]
    pub fn extends(mut self, parent: &Arc<ComplexType>) -> Self {
        self.parent = Some(Arc::clone(parent));
        self
    }

    /// Registers a field.
    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Registers a required element field.
    #[must_use]
    pub fn element(self, name: impl Into<String>, type_ref: TypeRef) -> Self {
        self.field(FieldDescriptor::element(name, type_ref))
    }

    /// Registers an optional element field.
    #[must_use]
    pub fn optional_element(self, name: impl Into<String>, type_ref: TypeRef) -> Self {
        self.field(FieldDescriptor::optional_element(name, type_ref))
    }

    /// Registers a required attribute field.
    #[must_use]
    pub fn attribute(self, name: impl Into<String>, type_ref: TypeRef) -> Self {
        self.field(FieldDescriptor::attribute(name, type_ref))
    }

    /// Registers a scalar attribute field from a scalar type.
    #[must_use]
    pub fn scalar_attribute(self, name: impl Into<String>, ty: ScalarType) -> Self {
        self.field(FieldDescriptor::attribute(name, TypeRef::scalar(ty)))
    }

    /// Registers a repeated element field.
    #[must_use]
    pub fn repeated(
        self,
        name: impl Into<String>,
        type_ref: TypeRef,
        min_occurs: u32,
        max_occurs: u32,
    ) -> Self {
        self.field(FieldDescriptor::repeated(
            name, type_ref, min_occurs, max_occurs,
        ))
    }

    /// Registers an embedded element group.
    #[must_use]
    pub fn group(self, name: impl Into<String>, ty: &Arc<ComplexType>) -> Self {
        self.field(FieldDescriptor::group(name, ty))
    }

    /// Registers an embedded attribute group.
    #[must_use]
    pub fn attribute_group(self, name: impl Into<String>, ty: &Arc<ComplexType>) -> Self {
        self.field(FieldDescriptor::attribute_group(name, ty))
    }

    /// Finalizes the type, computing the effective field list once.
    #[must_use]
    pub fn build(self) -> Arc<ComplexType> {
        let mut effective = match &self.parent {
            Some(parent) => parent.fields().to_vec(),
            None => Vec::new(),
        };
        effective.extend(self.fields.iter().cloned());
        Arc::new(ComplexType {
            name: self.name,
            parent: self.parent,
            own_fields: self.fields,
            effective,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::ScalarKind;
    use crate::value::Value;
    use chrono::NaiveDate;

    fn string_ref() -> TypeRef {
        TypeRef::scalar(ScalarType::new(ScalarKind::String))
    }

    fn airport_type() -> Arc<ComplexType> {
        ComplexType::builder("Airport")
            .element("type", string_ref())
            .element("code", string_ref())
            .build()
    }

    fn flight_type() -> Arc<ComplexType> {
        let airport = airport_type();
        let pilot = TypeRef::scalar(ScalarType::with_enumeration(
            "pilot",
            &["CAPTAIN", "FIRST_OFFICER"],
        ));
        ComplexType::builder("Flight")
            .element("tail_number", string_ref())
            .optional_element(
                "takeoff_datetime",
                TypeRef::scalar(ScalarType::new(ScalarKind::DateTime)),
            )
            .element("takeoff_airport", TypeRef::complex(&airport))
            .element("landing_airport", TypeRef::complex(&airport))
            .optional_element("takeoff_pilot", pilot.clone())
            .optional_element("landing_pilot", pilot)
            .repeated("passanger", string_ref(), 0, 10)
            .build()
    }

    fn airport(instance_type: &Arc<ComplexType>, kind: &str, code: &str) -> Instance {
        let mut airport = Instance::new(instance_type);
        airport.set("type", kind).unwrap();
        airport.set("code", code).unwrap();
        airport
    }

    #[test]
    fn test_render_simple() {
        let ty = airport_type();
        let instance = airport(&ty, "IATA", "WAW");
        let node = ty.render_instance(&instance, "airport").unwrap();
        assert_eq!(
            node.to_xml_string().unwrap(),
            "<airport><type>IATA</type><code>WAW</code></airport>"
        );
    }

    #[test]
    fn test_render_multilayer() {
        let airport_ty = airport_type();
        let flight_ty = flight_type();
        let mut flight = Instance::new(&flight_ty);
        flight.set("tail_number", "LN-KKA").unwrap();
        flight
            .set("takeoff_airport", airport(&airport_ty, "IATA", "WAW"))
            .unwrap();
        flight
            .set("landing_airport", airport(&airport_ty, "ICAO", "EGLL"))
            .unwrap();
        flight.set("takeoff_pilot", "CAPTAIN").unwrap();

        let node = flight_ty.render_instance(&flight, "flight").unwrap();
        assert_eq!(
            node.to_xml_string().unwrap(),
            "<flight><tail_number>LN-KKA</tail_number>\
             <takeoff_airport><type>IATA</type><code>WAW</code></takeoff_airport>\
             <landing_airport><type>ICAO</type><code>EGLL</code></landing_airport>\
             <takeoff_pilot>CAPTAIN</takeoff_pilot></flight>"
        );
    }

    #[test]
    fn test_parse_out_of_declaration_order() {
        let flight_ty = flight_type();
        let node = XmlNode::parse(
            "<flight>\
               <landing_airport><code>EGLL</code><type>ICAO</type></landing_airport>\
               <tail_number>LN-KKA</tail_number>\
               <takeoff_datetime>2001-10-26T21:32:52</takeoff_datetime>\
               <takeoff_airport><code>WAW</code><type>IATA</type></takeoff_airport>\
             </flight>",
        )
        .unwrap();
        let flight = flight_ty.parse_node(&node).unwrap();
        assert_eq!(flight.get_str("tail_number"), Some("LN-KKA"));
        let takeoff = flight.get_struct("takeoff_airport").unwrap();
        assert_eq!(takeoff.get_str("code"), Some("WAW"));
        assert_eq!(takeoff.get_str("type"), Some("IATA"));
        let landing = flight.get_struct("landing_airport").unwrap();
        assert_eq!(landing.get_str("code"), Some("EGLL"));
        let expected = NaiveDate::from_ymd_opt(2001, 10, 26)
            .unwrap()
            .and_hms_opt(21, 32, 52)
            .unwrap();
        assert_eq!(flight.get_datetime("takeoff_datetime"), Some(expected));
    }

    #[test]
    fn test_parse_repeated_interleaved() {
        let flight_ty = flight_type();
        let node = XmlNode::parse(
            "<flight>\
               <landing_airport><code>EGLL</code><type>ICAO</type></landing_airport>\
               <passanger>abc</passanger>\
               <passanger>123</passanger>\
               <tail_number>LN-KKA</tail_number>\
               <takeoff_airport><code>WAW</code><type>IATA</type></takeoff_airport>\
             </flight>",
        )
        .unwrap();
        let flight = flight_ty.parse_node(&node).unwrap();
        let passengers = flight.get_list("passanger").unwrap();
        assert_eq!(
            passengers,
            &[Value::Str("abc".to_string()), Value::Str("123".to_string())]
        );
    }

    #[test]
    fn test_round_trip_law() {
        let airport_ty = airport_type();
        let flight_ty = flight_type();
        let mut flight = Instance::new(&flight_ty);
        flight.set("tail_number", "LN-KKA").unwrap();
        flight
            .set(
                "takeoff_datetime",
                NaiveDate::from_ymd_opt(2001, 10, 26)
                    .unwrap()
                    .and_hms_opt(21, 32, 52)
                    .unwrap(),
            )
            .unwrap();
        flight
            .set("takeoff_airport", airport(&airport_ty, "IATA", "WAW"))
            .unwrap();
        flight
            .set("landing_airport", airport(&airport_ty, "ICAO", "EGLL"))
            .unwrap();
        flight.push("passanger", "abc").unwrap();
        flight.push("passanger", "123").unwrap();

        let node = flight_ty.render_instance(&flight, "flight").unwrap();
        let parsed = flight_ty.parse_node(&node).unwrap();
        assert_eq!(parsed, flight);
    }

    #[test]
    fn test_inheritance_renders_parent_attributes_first() {
        let a = ComplexType::builder("A").attribute("name", string_ref()).build();
        let b = ComplexType::builder("B")
            .extends(&a)
            .attribute("type", string_ref())
            .build();
        let mut instance = Instance::new(&b);
        instance.set("name", "b").unwrap();
        instance.set("type", "B").unwrap();
        let node = b.render_instance(&instance, "inheritance").unwrap();
        assert_eq!(
            node.to_xml_string().unwrap(),
            r#"<inheritance name="b" type="B"/>"#
        );
    }

    #[test]
    fn test_inheritance_parses_both_levels() {
        let a = ComplexType::builder("A").attribute("name", string_ref()).build();
        let b = ComplexType::builder("B")
            .extends(&a)
            .element("type", string_ref())
            .build();
        let node = XmlNode::parse(r#"<inheritance name="b"><type>B</type></inheritance>"#).unwrap();
        let instance = b.parse_node(&node).unwrap();
        assert_eq!(instance.get_str("name"), Some("b"));
        assert_eq!(instance.get_str("type"), Some("B"));
    }

    #[test]
    fn test_empty_group_renders_nothing() {
        let group = ComplexType::builder("RequestResponseOperation")
            .optional_element("input", string_ref())
            .optional_element("output", string_ref())
            .build();
        let operation = ComplexType::builder("Operation")
            .element("name", string_ref())
            .group("requestResponseOperation", &group)
            .build();
        let mut instance = Instance::new(&operation);
        instance.set("name", "TEST-Operation").unwrap();
        let node = operation.render_instance(&instance, "operation").unwrap();
        assert_eq!(
            node.to_xml_string().unwrap(),
            "<operation><name>TEST-Operation</name></operation>"
        );
    }

    #[test]
    fn test_group_round_trip() {
        let group = ComplexType::builder("RequestResponseOperation")
            .optional_element("input", string_ref())
            .optional_element("output", string_ref())
            .build();
        let operation = ComplexType::builder("Operation")
            .element("name", string_ref())
            .group("requestResponseOperation", &group)
            .build();
        let mut instance = Instance::new(&operation);
        instance.set("name", "TEST-Operation").unwrap();
        {
            let members = instance.get_struct_mut("requestResponseOperation").unwrap();
            members.set("input", "IN").unwrap();
            members.set("output", "OUT").unwrap();
        }
        let node = operation.render_instance(&instance, "operation").unwrap();
        assert_eq!(
            node.to_xml_string().unwrap(),
            "<operation><name>TEST-Operation</name>\
             <input>IN</input><output>OUT</output></operation>"
        );

        let parsed = operation.parse_node(&node).unwrap();
        let members = parsed.get_struct("requestResponseOperation").unwrap();
        assert_eq!(members.get_str("input"), Some("IN"));
        assert_eq!(members.get_str("output"), Some("OUT"));
    }

    #[test]
    fn test_attribute_group_merges_onto_owner() {
        let attrs = ComplexType::builder("TBodyAttributes")
            .field(
                FieldDescriptor::attribute("encodingStyle", string_ref())
                    .with_use(crate::fields::Use::Optional),
            )
            .attribute("use", string_ref())
            .attribute("namespace", string_ref())
            .build();
        let body = ComplexType::builder("TBody")
            .attribute("parts", string_ref())
            .attribute_group("tBodyAttributes", &attrs)
            .build();
        let mut instance = Instance::new(&body);
        instance.set("parts", "Parts").unwrap();
        {
            let members = instance.get_struct_mut("tBodyAttributes").unwrap();
            members.set("use", "required").unwrap();
            members.set("namespace", "xs").unwrap();
        }
        let node = body.render_instance(&instance, "body").unwrap();
        assert_eq!(
            node.to_xml_string().unwrap(),
            r#"<body parts="Parts" use="required" namespace="xs"/>"#
        );

        let parsed = body.parse_node(&node).unwrap();
        assert_eq!(parsed.get_str("parts"), Some("Parts"));
        let members = parsed.get_struct("tBodyAttributes").unwrap();
        assert_eq!(members.get_str("use"), Some("required"));
        assert_eq!(members.get_str("namespace"), Some("xs"));
        assert_eq!(members.get_str("encodingStyle"), None);
    }

    #[test]
    fn test_unknown_children_ignored() {
        let ty = airport_type();
        let node = XmlNode::parse(
            "<airport><type>IATA</type><code>WAW</code><elevation>110</elevation></airport>",
        )
        .unwrap();
        let instance = ty.parse_node(&node).unwrap();
        assert_eq!(instance.get_str("type"), Some("IATA"));
        assert_eq!(instance.get("elevation"), None);
    }

    #[test]
    fn test_effective_fields_computed_once() {
        let a = ComplexType::builder("A").element("name", string_ref()).build();
        let b = ComplexType::builder("B")
            .extends(&a)
            .element("type", string_ref())
            .build();
        assert_eq!(b.fields().len(), 2);
        assert_eq!(b.fields()[0].name, "name");
        assert_eq!(b.fields()[1].name, "type");
        assert_eq!(b.own_fields().len(), 1);
    }
}
