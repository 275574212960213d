//! Scalar codecs.
//!
//! A scalar type maps one primitive value to and from its textual XML
//! representation, optionally restricted to a fixed enumeration of legal
//! string values.

use crate::error::XsdError;
use crate::value::Value;
use chrono::NaiveDateTime;

/// Textual format for date-time values: ISO-8601 with second precision.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Primitive scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Character string.
    String,
    /// Boolean, encoded as `true`/`false`.
    Boolean,
    /// Signed integer.
    Integer,
    /// Date-time with second precision.
    DateTime,
}

impl ScalarKind {
    /// Returns the XSD name of the kind.
    #[must_use]
    pub const fn xsd_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::DateTime => "dateTime",
        }
    }

    /// Parses a kind from its XSD name.
    #[must_use]
    pub fn from_xsd_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "boolean" => Some(Self::Boolean),
            "integer" | "int" | "long" => Some(Self::Integer),
            "dateTime" => Some(Self::DateTime),
            _ => None,
        }
    }
}

/// A scalar type definition: a primitive kind plus an optional enumeration.
#[derive(Debug, Clone)]
pub struct ScalarType {
    /// Type name (the XSD name for unrestricted primitives).
    pub name: String,
    /// Primitive kind.
    pub kind: ScalarKind,
    /// Legal values, if restricted.
    pub enumeration: Option<Vec<String>>,
}

impl ScalarType {
    /// Creates an unrestricted scalar type named after its kind.
    #[must_use]
    pub fn new(kind: ScalarKind) -> Self {
        Self {
            name: kind.xsd_name().to_string(),
            kind,
            enumeration: None,
        }
    }

    /// Creates a named restricted string type with the given enumeration.
    #[must_use]
    pub fn with_enumeration(name: impl Into<String>, values: &[&str]) -> Self {
        Self {
            name: name.into(),
            kind: ScalarKind::String,
            enumeration: Some(values.iter().map(|v| (*v).to_string()).collect()),
        }
    }

    /// Checks a string value against the enumeration, if one is declared.
    ///
    /// # Errors
    /// Returns `XsdError::Enumeration` for a value outside the declared set.
    pub fn check_enumeration(&self, value: &str) -> Result<(), XsdError> {
        if let Some(allowed) = &self.enumeration {
            if !allowed.iter().any(|v| v == value) {
                return Err(XsdError::enumeration(&self.name, value));
            }
        }
        Ok(())
    }

    /// Validates that a runtime value matches this type's kind and
    /// enumeration. Used at assignment time.
    ///
    /// # Errors
    /// Returns `XsdError::TypeMismatch` for a wrong kind and
    /// `XsdError::Enumeration` for a value outside the declared set.
    pub fn validate(&self, value: &Value) -> Result<(), XsdError> {
        match (self.kind, value) {
            (ScalarKind::String, Value::Str(s)) => self.check_enumeration(s),
            (ScalarKind::Boolean, Value::Bool(_))
            | (ScalarKind::Integer, Value::Int(_))
            | (ScalarKind::DateTime, Value::DateTime(_)) => Ok(()),
            _ => Err(XsdError::type_mismatch(&self.name, self.kind.xsd_name())),
        }
    }

    /// Encodes a value to its textual representation.
    ///
    /// # Errors
    /// Returns an error for a value of the wrong kind or outside the
    /// enumeration.
    pub fn encode(&self, value: &Value) -> Result<String, XsdError> {
        self.validate(value)?;
        Ok(match value {
            Value::Str(s) => s.clone(),
            Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
            Value::Int(i) => i.to_string(),
            Value::DateTime(dt) => dt.format(DATETIME_FORMAT).to_string(),
            // validate() rejects lists and structs
            _ => unreachable!("non-scalar value passed validation"),
        })
    }

    /// Decodes a value from its textual representation.
    ///
    /// # Errors
    /// Returns an error for text that does not parse as the declared kind or
    /// is outside the enumeration.
    pub fn decode(&self, text: &str) -> Result<Value, XsdError> {
        match self.kind {
            ScalarKind::String => {
                self.check_enumeration(text)?;
                Ok(Value::Str(text.to_string()))
            }
            ScalarKind::Boolean => match text {
                "true" | "1" => Ok(Value::Bool(true)),
                "false" | "0" => Ok(Value::Bool(false)),
                _ => Err(XsdError::invalid_value(text, "boolean")),
            },
            ScalarKind::Integer => text
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| XsdError::invalid_value(text, "integer")),
            ScalarKind::DateTime => NaiveDateTime::parse_from_str(text, DATETIME_FORMAT)
                .map(Value::DateTime)
                .map_err(|_| XsdError::invalid_value(text, "dateTime")),
        }
    }
}
