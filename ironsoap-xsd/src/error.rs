//! Error types for the binding engine.

use thiserror::Error;

/// Error type for marshalling, parsing and schema operations.
#[derive(Debug, Error)]
pub enum XsdError {
    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// IO error (raised while serializing a node tree).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Generic validation failure.
    #[error("validation error: {message}")]
    Validation {
        /// Error message.
        message: String,
    },

    /// Value outside a declared enumeration.
    #[error("value '{value}' is not allowed for type '{type_name}'")]
    Enumeration {
        /// Type carrying the enumeration.
        type_name: String,
        /// Rejected value.
        value: String,
    },

    /// Occurrence count outside the declared bounds.
    #[error("field '{field}' has {count} occurrence(s), expected between {min} and {max}")]
    Cardinality {
        /// Field name.
        field: String,
        /// Actual occurrence count.
        count: usize,
        /// Declared minimum.
        min: u32,
        /// Declared maximum.
        max: u32,
    },

    /// Required attribute with no value at render time.
    #[error("required attribute '{field}' has no value")]
    RequiredAttribute {
        /// Attribute name.
        field: String,
    },

    /// Prohibited attribute carrying a value at render time.
    #[error("prohibited attribute '{field}' has a value")]
    ProhibitedAttribute {
        /// Attribute name.
        field: String,
    },

    /// Value of the wrong kind for a field.
    #[error("field '{field}' expects a {expected} value")]
    TypeMismatch {
        /// Field name.
        field: String,
        /// Expected value kind.
        expected: String,
    },

    /// Text that cannot be decoded as the declared scalar kind.
    #[error("cannot decode '{value}' as {expected}")]
    InvalidValue {
        /// Offending text.
        value: String,
        /// Expected scalar kind.
        expected: String,
    },

    /// Root element name with no registered type.
    #[error("unknown element '{name}'")]
    UnknownElement {
        /// Element name.
        name: String,
    },

    /// Assignment to a field the type does not declare.
    #[error("type '{type_name}' has no field '{field}'")]
    UnknownField {
        /// Owning type name.
        type_name: String,
        /// Field name.
        field: String,
    },
}

impl XsdError {
    /// Creates a generic validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates an enumeration violation error.
    pub fn enumeration(type_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Enumeration {
            type_name: type_name.into(),
            value: value.into(),
        }
    }

    /// Creates a cardinality violation error.
    pub fn cardinality(field: impl Into<String>, count: usize, min: u32, max: u32) -> Self {
        Self::Cardinality {
            field: field.into(),
            count,
            min,
            max,
        }
    }

    /// Creates a type mismatch error.
    pub fn type_mismatch(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected: expected.into(),
        }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(value: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::InvalidValue {
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Creates an unknown element error.
    pub fn unknown_element(name: impl Into<String>) -> Self {
        Self::UnknownElement { name: name.into() }
    }

    /// Creates an unknown field error.
    pub fn unknown_field(type_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            type_name: type_name.into(),
            field: field.into(),
        }
    }
}
