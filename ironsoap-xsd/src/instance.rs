//! Runtime instances of complex types.

use crate::complex::ComplexType;
use crate::error::XsdError;
use crate::fields::{FieldKind, TypeRef};
use crate::value::Value;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A runtime value of a complex type: a name to value mapping.
///
/// Created empty with fresh containers for repeated and group fields; every
/// instance owns its own containers, nothing is shared between instances.
#[derive(Clone)]
pub struct Instance {
    ty: Arc<ComplexType>,
    values: HashMap<String, Value>,
}

impl Instance {
    /// Creates an empty instance of the given type.
    ///
    /// Repeated fields start as fresh empty lists; group and attribute-group
    /// fields start as fresh empty instances of the embedded type, so their
    /// members can be assigned without an explicit creation step.
    #[must_use]
    pub fn new(ty: &Arc<ComplexType>) -> Self {
        let mut values = HashMap::new();
        for field in ty.fields() {
            match field.kind {
                FieldKind::Repeated => {
                    values.insert(field.name.clone(), Value::List(Vec::new()));
                }
                FieldKind::Group | FieldKind::AttributeGroup => {
                    if let TypeRef::Complex(embedded) = &field.type_ref {
                        values.insert(field.name.clone(), Value::Struct(Instance::new(embedded)));
                    }
                }
                _ => {}
            }
        }
        Self {
            ty: Arc::clone(ty),
            values,
        }
    }

    /// Returns the name of the instance's type.
    #[must_use]
    pub fn type_name(&self) -> &str {
        self.ty.name()
    }

    /// Returns the instance's type.
    #[must_use]
    pub fn ty(&self) -> &Arc<ComplexType> {
        &self.ty
    }

    /// Assigns a field value, validating scalar kind and enumeration.
    ///
    /// # Errors
    /// Returns `XsdError::UnknownField` for an undeclared field and
    /// validation errors for values the field's type rejects.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), XsdError> {
        let value = value.into();
        let field = self
            .ty
            .field(name)
            .ok_or_else(|| XsdError::unknown_field(self.ty.name(), name))?;
        match (&field.type_ref, &value) {
            (TypeRef::Scalar(scalar), Value::List(items)) if field.kind == FieldKind::Repeated => {
                for item in items {
                    scalar.validate(item)?;
                }
            }
            (TypeRef::Scalar(scalar), _) => scalar.validate(&value)?,
            (TypeRef::Complex(_), Value::Struct(_)) => {}
            (TypeRef::Complex(_), Value::List(items)) if field.kind == FieldKind::Repeated => {
                for item in items {
                    if item.as_struct().is_none() {
                        return Err(XsdError::type_mismatch(name, "struct"));
                    }
                }
            }
            (TypeRef::Complex(_), _) => return Err(XsdError::type_mismatch(name, "struct")),
        }
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    /// Appends an item to a repeated field, validating it first.
    ///
    /// # Errors
    /// Returns `XsdError::UnknownField` for an undeclared field,
    /// `XsdError::TypeMismatch` for a non-repeated field, and validation
    /// errors for rejected items.
    pub fn push(&mut self, name: &str, value: impl Into<Value>) -> Result<(), XsdError> {
        let value = value.into();
        let field = self
            .ty
            .field(name)
            .ok_or_else(|| XsdError::unknown_field(self.ty.name(), name))?;
        if field.kind != FieldKind::Repeated {
            return Err(XsdError::type_mismatch(name, "list"));
        }
        if let TypeRef::Scalar(scalar) = &field.type_ref {
            scalar.validate(&value)?;
        }
        match self
            .values
            .entry(name.to_string())
            .or_insert_with(|| Value::List(Vec::new()))
        {
            Value::List(items) => {
                items.push(value);
                Ok(())
            }
            _ => Err(XsdError::type_mismatch(name, "list")),
        }
    }

    /// Returns a field value, if set.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns a string field, if set.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_str)
    }

    /// Returns a boolean field, if set.
    #[must_use]
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.values.get(name).and_then(Value::as_bool)
    }

    /// Returns an integer field, if set.
    #[must_use]
    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.values.get(name).and_then(Value::as_int)
    }

    /// Returns a date-time field, if set.
    #[must_use]
    pub fn get_datetime(&self, name: &str) -> Option<NaiveDateTime> {
        self.values.get(name).and_then(Value::as_datetime)
    }

    /// Returns the items of a repeated field, if set.
    #[must_use]
    pub fn get_list(&self, name: &str) -> Option<&[Value]> {
        self.values.get(name).and_then(Value::as_list)
    }

    /// Returns a nested instance, if set.
    #[must_use]
    pub fn get_struct(&self, name: &str) -> Option<&Instance> {
        self.values.get(name).and_then(Value::as_struct)
    }

    /// Returns a nested instance mutably, if set.
    pub fn get_struct_mut(&mut self, name: &str) -> Option<&mut Instance> {
        self.values.get_mut(name).and_then(Value::as_struct_mut)
    }

    /// Inserts a parsed value without assignment-time validation; the codecs
    /// validate during decode.
    pub(crate) fn insert_raw(&mut self, name: String, value: Value) {
        self.values.insert(name, value);
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.ty.name() == other.ty.name() && self.values == other.values
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.ty.name())
            .field("values", &self.values)
            .finish()
    }
}
