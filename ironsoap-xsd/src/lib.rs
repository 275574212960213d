//! # IronSOAP XSD
//!
//! Declarative object/XML binding engine.
//!
//! This crate provides:
//! - Scalar codecs with enumeration restriction
//! - Field descriptors (element, attribute, repeated, group, attribute group)
//! - Complex types with inheritance and a precomputed effective field list
//! - Runtime instances with validated assignment
//! - Document and schema registries
//! - An owned XML node tree over quick-xml

pub mod complex;
pub mod document;
pub mod error;
pub mod fields;
pub mod instance;
pub mod scalar;
pub mod schema;
pub mod value;
pub mod xml;

pub use complex::{ComplexType, ComplexTypeBuilder};
pub use document::Document;
pub use error::XsdError;
pub use fields::{FieldDescriptor, FieldKind, TypeRef, Use};
pub use instance::Instance;
pub use scalar::{DATETIME_FORMAT, ScalarKind, ScalarType};
pub use schema::Schema;
pub use value::Value;
pub use xml::XmlNode;
