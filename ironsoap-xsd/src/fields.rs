//! Field descriptors.
//!
//! A field descriptor declares one member of a complex type: its name, the
//! scalar or complex type it references, its placement (element, attribute,
//! repeated element, or a flattened group), and its cardinality rules. Field
//! descriptors own the per-field render and parse logic; the complex type
//! engine drives them in declaration order.

use crate::complex::ComplexType;
use crate::error::XsdError;
use crate::scalar::ScalarType;
use crate::value::Value;
use crate::xml::XmlNode;
use std::sync::Arc;

/// Attribute requiredness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Use {
    /// Attribute must have a value at render time.
    #[default]
    Required,
    /// Attribute may be absent.
    Optional,
    /// Attribute must not carry a value.
    Prohibited,
}

impl Use {
    /// Parses requiredness from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "required" => Some(Self::Required),
            "optional" => Some(Self::Optional),
            "prohibited" => Some(Self::Prohibited),
            _ => None,
        }
    }
}

/// Field placement variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Single child element.
    Element,
    /// XML attribute on the owning element.
    Attribute,
    /// Zero or more child elements sharing one tag name.
    Repeated,
    /// Embedded element group, flattened onto the owner (no wrapper tag).
    Group,
    /// Embedded attribute group, flattened onto the owner.
    AttributeGroup,
}

/// Reference to the scalar or complex type a field carries.
#[derive(Debug, Clone)]
pub enum TypeRef {
    /// Scalar codec.
    Scalar(Arc<ScalarType>),
    /// Nested complex type.
    Complex(Arc<ComplexType>),
}

impl TypeRef {
    /// Creates a scalar reference.
    #[must_use]
    pub fn scalar(ty: ScalarType) -> Self {
        Self::Scalar(Arc::new(ty))
    }

    /// Creates a complex reference.
    #[must_use]
    pub fn complex(ty: &Arc<ComplexType>) -> Self {
        Self::Complex(Arc::clone(ty))
    }

    /// Returns the name of the referenced type.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar(ty) => &ty.name,
            Self::Complex(ty) => ty.name(),
        }
    }
}

/// One declared member of a complex type.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Instance key; also the tag/attribute name for Element, Attribute and
    /// Repeated fields. Group fields use it only as the instance key.
    pub name: String,
    /// Referenced type.
    pub type_ref: TypeRef,
    /// Placement.
    pub kind: FieldKind,
    // Occurrence bounds are private so that `max_occurs > 1` stays
    // constructible only through `repeated`.
    min_occurs: u32,
    max_occurs: u32,
    /// Whether an absent attribute value renders as the literal `nil`.
    pub nilable: bool,
    /// Attribute requiredness.
    pub use_: Use,
}

impl FieldDescriptor {
    /// Creates a required single element field.
    #[must_use]
    pub fn element(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            kind: FieldKind::Element,
            min_occurs: 1,
            max_occurs: 1,
            nilable: false,
            use_: Use::Required,
        }
    }

    /// Creates an optional single element field (`minOccurs = 0`).
    #[must_use]
    pub fn optional_element(name: impl Into<String>, type_ref: TypeRef) -> Self {
        let mut field = Self::element(name, type_ref);
        field.min_occurs = 0;
        field
    }

    /// Creates a required attribute field.
    #[must_use]
    pub fn attribute(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            kind: FieldKind::Attribute,
            min_occurs: 0,
            max_occurs: 1,
            nilable: false,
            use_: Use::Required,
        }
    }

    /// Creates a repeated element field with the given occurrence bounds.
    ///
    /// # Panics
    /// Panics if `min_occurs > max_occurs`; cardinality bounds are fixed at
    /// registration time.
    #[must_use]
    pub fn repeated(
        name: impl Into<String>,
        type_ref: TypeRef,
        min_occurs: u32,
        max_occurs: u32,
    ) -> Self {
        assert!(
            min_occurs <= max_occurs,
            "minOccurs must not exceed maxOccurs"
        );
        Self {
            name: name.into(),
            type_ref,
            kind: FieldKind::Repeated,
            min_occurs,
            max_occurs,
            nilable: false,
            use_: Use::Required,
        }
    }

    /// Creates an embedded element group field.
    #[must_use]
    pub fn group(name: impl Into<String>, ty: &Arc<ComplexType>) -> Self {
        Self {
            name: name.into(),
            type_ref: TypeRef::complex(ty),
            kind: FieldKind::Group,
            min_occurs: 0,
            max_occurs: 1,
            nilable: false,
            use_: Use::Optional,
        }
    }

    /// Creates an embedded attribute group field.
    #[must_use]
    pub fn attribute_group(name: impl Into<String>, ty: &Arc<ComplexType>) -> Self {
        let mut field = Self::group(name, ty);
        field.kind = FieldKind::AttributeGroup;
        field
    }

    /// Marks the field nilable: an absent attribute value renders as the
    /// literal string `nil` instead of being omitted.
    #[must_use]
    pub fn nilable(mut self) -> Self {
        self.nilable = true;
        self
    }

    /// Sets attribute requiredness.
    #[must_use]
    pub fn with_use(mut self, use_: Use) -> Self {
        self.use_ = use_;
        self
    }

    /// Minimum occurrence count.
    #[must_use]
    pub fn min_occurs(&self) -> u32 {
        self.min_occurs
    }

    /// Maximum occurrence count. Greater than one only for Repeated fields.
    #[must_use]
    pub fn max_occurs(&self) -> u32 {
        self.max_occurs
    }

    /// Renders this field's value onto the parent node.
    ///
    /// # Errors
    /// Returns cardinality, requiredness or codec errors per the field's
    /// declaration.
    pub fn render(&self, parent: &mut XmlNode, value: Option<&Value>) -> Result<(), XsdError> {
        match self.kind {
            FieldKind::Attribute => self.render_attribute(parent, value),
            FieldKind::Element => self.render_element(parent, value),
            FieldKind::Repeated => self.render_repeated(parent, value),
            FieldKind::Group | FieldKind::AttributeGroup => self.render_group(parent, value),
        }
    }

    /// Parses this field's value from the node, returning `None` when the
    /// matching attribute or child is absent.
    ///
    /// # Errors
    /// Returns codec errors for text that does not decode as the declared
    /// type.
    pub fn parse(&self, node: &XmlNode) -> Result<Option<Value>, XsdError> {
        match self.kind {
            FieldKind::Attribute => self.parse_attribute(node),
            FieldKind::Element => self.parse_element(node),
            FieldKind::Repeated => self.parse_repeated(node),
            FieldKind::Group | FieldKind::AttributeGroup => self.parse_group(node),
        }
    }

    fn scalar(&self) -> Result<&ScalarType, XsdError> {
        match &self.type_ref {
            TypeRef::Scalar(ty) => Ok(ty),
            TypeRef::Complex(_) => Err(XsdError::type_mismatch(&self.name, "scalar")),
        }
    }

    fn render_attribute(
        &self,
        parent: &mut XmlNode,
        value: Option<&Value>,
    ) -> Result<(), XsdError> {
        match value {
            Some(value) => {
                if self.use_ == Use::Prohibited {
                    return Err(XsdError::ProhibitedAttribute {
                        field: self.name.clone(),
                    });
                }
                let text = self.scalar()?.encode(value)?;
                parent.set_attribute(&self.name, text);
                Ok(())
            }
            None if self.nilable => {
                parent.set_attribute(&self.name, "nil");
                Ok(())
            }
            None if self.use_ == Use::Required => Err(XsdError::RequiredAttribute {
                field: self.name.clone(),
            }),
            None => Ok(()),
        }
    }

    fn render_element(&self, parent: &mut XmlNode, value: Option<&Value>) -> Result<(), XsdError> {
        match value {
            Some(value) => {
                parent.append_child(self.render_item(value, &self.name)?);
                Ok(())
            }
            None if self.min_occurs == 0 => Ok(()),
            None => Err(XsdError::cardinality(
                &self.name,
                0,
                self.min_occurs,
                self.max_occurs,
            )),
        }
    }

    fn render_repeated(&self, parent: &mut XmlNode, value: Option<&Value>) -> Result<(), XsdError> {
        let empty: &[Value] = &[];
        let items = match value {
            Some(Value::List(items)) => items.as_slice(),
            Some(_) => return Err(XsdError::type_mismatch(&self.name, "list")),
            None => empty,
        };
        if items.len() < self.min_occurs as usize || items.len() > self.max_occurs as usize {
            return Err(XsdError::cardinality(
                &self.name,
                items.len(),
                self.min_occurs,
                self.max_occurs,
            ));
        }
        for item in items {
            parent.append_child(self.render_item(item, &self.name)?);
        }
        Ok(())
    }

    fn render_group(&self, parent: &mut XmlNode, value: Option<&Value>) -> Result<(), XsdError> {
        let Some(value) = value else { return Ok(()) };
        let instance = value
            .as_struct()
            .ok_or_else(|| XsdError::type_mismatch(&self.name, "struct"))?;
        let TypeRef::Complex(embedded) = &self.type_ref else {
            return Err(XsdError::type_mismatch(&self.name, "complex"));
        };
        // Flattened in place: the embedded fields render directly onto the
        // owner node, contributing no wrapper tag.
        for field in embedded.fields() {
            field.render(parent, instance.get(&field.name))?;
        }
        Ok(())
    }

    fn render_item(&self, value: &Value, tag: &str) -> Result<XmlNode, XsdError> {
        match &self.type_ref {
            TypeRef::Scalar(ty) => Ok(XmlNode::text_element(tag, ty.encode(value)?)),
            TypeRef::Complex(ty) => {
                let instance = value
                    .as_struct()
                    .ok_or_else(|| XsdError::type_mismatch(&self.name, "struct"))?;
                ty.render_instance(instance, tag)
            }
        }
    }

    fn parse_attribute(&self, node: &XmlNode) -> Result<Option<Value>, XsdError> {
        match node.attribute(&self.name) {
            None => Ok(None),
            Some("nil") if self.nilable => Ok(None),
            Some(text) => self.scalar()?.decode(text).map(Some),
        }
    }

    fn parse_element(&self, node: &XmlNode) -> Result<Option<Value>, XsdError> {
        match node.child(&self.name) {
            None => Ok(None),
            Some(child) => self.parse_item(child).map(Some),
        }
    }

    fn parse_repeated(&self, node: &XmlNode) -> Result<Option<Value>, XsdError> {
        let mut items = Vec::new();
        for child in node.children_named(&self.name) {
            items.push(self.parse_item(child)?);
        }
        Ok(Some(Value::List(items)))
    }

    fn parse_group(&self, node: &XmlNode) -> Result<Option<Value>, XsdError> {
        let TypeRef::Complex(embedded) = &self.type_ref else {
            return Err(XsdError::type_mismatch(&self.name, "complex"));
        };
        embedded.parse_node(node).map(|i| Some(Value::Struct(i)))
    }

    fn parse_item(&self, child: &XmlNode) -> Result<Value, XsdError> {
        match &self.type_ref {
            TypeRef::Scalar(ty) => ty.decode(child.text().unwrap_or("")),
            TypeRef::Complex(ty) => ty.parse_node(child).map(Value::Struct),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::ScalarKind;

    fn string_ref() -> TypeRef {
        TypeRef::scalar(ScalarType::new(ScalarKind::String))
    }

    #[test]
    fn test_string_element_render() {
        let field = FieldDescriptor::element("tail_number", string_ref());
        let mut parent = XmlNode::new("aircraft");
        field
            .render(&mut parent, Some(&Value::Str("LN-KKU".to_string())))
            .unwrap();
        assert_eq!(
            parent.to_xml_string().unwrap(),
            "<aircraft><tail_number>LN-KKU</tail_number></aircraft>"
        );
    }

    #[test]
    fn test_optional_element_absent_renders_nothing() {
        let field = FieldDescriptor::optional_element("takeoff_datetime", string_ref());
        let mut parent = XmlNode::new("flight");
        field.render(&mut parent, None).unwrap();
        assert_eq!(parent.to_xml_string().unwrap(), "<flight/>");
    }

    #[test]
    fn test_required_element_absent_fails() {
        let field = FieldDescriptor::element("tail_number", string_ref());
        let mut parent = XmlNode::new("aircraft");
        let err = field.render(&mut parent, None).unwrap_err();
        assert!(matches!(err, XsdError::Cardinality { .. }));
    }

    #[test]
    fn test_repeated_render() {
        let field = FieldDescriptor::repeated("passanger", string_ref(), 0, 10);
        let mut parent = XmlNode::new("flight");
        let items = Value::List(vec![
            Value::Str("abc".to_string()),
            Value::Str("123".to_string()),
        ]);
        field.render(&mut parent, Some(&items)).unwrap();
        assert_eq!(
            parent.to_xml_string().unwrap(),
            "<flight><passanger>abc</passanger><passanger>123</passanger></flight>"
        );
    }

    #[test]
    fn test_repeated_empty_renders_nothing() {
        let field = FieldDescriptor::repeated("passanger", string_ref(), 0, 10);
        let mut parent = XmlNode::new("flight");
        field
            .render(&mut parent, Some(&Value::List(Vec::new())))
            .unwrap();
        assert_eq!(parent.to_xml_string().unwrap(), "<flight/>");
    }

    #[test]
    fn test_repeated_over_max_fails() {
        let field = FieldDescriptor::repeated("passanger", string_ref(), 0, 10);
        let mut parent = XmlNode::new("flight");
        let items: Vec<Value> = (0..11).map(|i| Value::Str(i.to_string())).collect();
        let err = field
            .render(&mut parent, Some(&Value::List(items)))
            .unwrap_err();
        assert!(matches!(err, XsdError::Cardinality { count: 11, .. }));
    }

    #[test]
    fn test_repeated_under_min_fails() {
        let field = FieldDescriptor::repeated("passanger", string_ref(), 2, 10);
        let mut parent = XmlNode::new("flight");
        let err = field
            .render(&mut parent, Some(&Value::List(vec![Value::Str("a".into())])))
            .unwrap_err();
        assert!(matches!(err, XsdError::Cardinality { count: 1, .. }));
    }

    #[test]
    #[should_panic(expected = "minOccurs must not exceed maxOccurs")]
    fn test_repeated_invalid_bounds_panics() {
        let _ = FieldDescriptor::repeated("passanger", string_ref(), 5, 2);
    }

    #[test]
    fn test_boolean_attribute_render() {
        let field = FieldDescriptor::attribute(
            "mixed",
            TypeRef::scalar(ScalarType::new(ScalarKind::Boolean)),
        );
        let mut parent = XmlNode::new("complexType");
        field.render(&mut parent, Some(&Value::Bool(true))).unwrap();
        assert_eq!(
            parent.to_xml_string().unwrap(),
            r#"<complexType mixed="true"/>"#
        );
    }

    #[test]
    fn test_nilable_attribute_absent_renders_nil() {
        let field = FieldDescriptor::attribute(
            "mixed",
            TypeRef::scalar(ScalarType::new(ScalarKind::Boolean)),
        )
        .nilable()
        .with_use(Use::Optional);
        let mut parent = XmlNode::new("complexType");
        field.render(&mut parent, None).unwrap();
        assert_eq!(
            parent.to_xml_string().unwrap(),
            r#"<complexType mixed="nil"/>"#
        );
    }

    #[test]
    fn test_optional_attribute_absent_omitted() {
        let field = FieldDescriptor::attribute("encodingStyle", string_ref()).with_use(Use::Optional);
        let mut parent = XmlNode::new("body");
        field.render(&mut parent, None).unwrap();
        assert_eq!(parent.to_xml_string().unwrap(), "<body/>");
    }

    #[test]
    fn test_required_attribute_absent_fails() {
        let field = FieldDescriptor::attribute("tail_number", string_ref());
        let mut parent = XmlNode::new("aircraft");
        let err = field.render(&mut parent, None).unwrap_err();
        assert!(matches!(err, XsdError::RequiredAttribute { .. }));
    }

    #[test]
    fn test_prohibited_attribute_with_value_fails() {
        let field = FieldDescriptor::attribute("legacy", string_ref()).with_use(Use::Prohibited);
        let mut parent = XmlNode::new("body");
        let err = field
            .render(&mut parent, Some(&Value::Str("x".to_string())))
            .unwrap_err();
        assert!(matches!(err, XsdError::ProhibitedAttribute { .. }));
    }

    #[test]
    fn test_nilable_attribute_parses_as_absent() {
        let field = FieldDescriptor::attribute(
            "mixed",
            TypeRef::scalar(ScalarType::new(ScalarKind::Boolean)),
        )
        .nilable();
        let node = XmlNode::parse(r#"<complexType mixed="nil"/>"#).unwrap();
        assert_eq!(field.parse(&node).unwrap(), None);
    }

    #[test]
    fn test_repeated_parse_document_order() {
        let field = FieldDescriptor::repeated("passanger", string_ref(), 0, 10);
        let node =
            XmlNode::parse("<flight><passanger>abc</passanger><passanger>123</passanger></flight>")
                .unwrap();
        let value = field.parse(&node).unwrap().unwrap();
        assert_eq!(
            value,
            Value::List(vec![
                Value::Str("abc".to_string()),
                Value::Str("123".to_string())
            ])
        );
    }

    #[test]
    fn test_occurrence_bounds_per_constructor() {
        let element = FieldDescriptor::element("tail_number", string_ref());
        assert_eq!((element.min_occurs(), element.max_occurs()), (1, 1));
        let optional = FieldDescriptor::optional_element("takeoff_datetime", string_ref());
        assert_eq!((optional.min_occurs(), optional.max_occurs()), (0, 1));
        let repeated = FieldDescriptor::repeated("passanger", string_ref(), 2, 10);
        assert_eq!((repeated.min_occurs(), repeated.max_occurs()), (2, 10));
        assert_eq!(repeated.kind, FieldKind::Repeated);
    }

    #[test]
    fn test_use_parse() {
        assert_eq!(Use::parse("required"), Some(Use::Required));
        assert_eq!(Use::parse("OPTIONAL"), Some(Use::Optional));
        assert_eq!(Use::parse("prohibited"), Some(Use::Prohibited));
        assert_eq!(Use::parse("invalid"), None);
    }
}
