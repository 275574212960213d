//! Schema registry.
//!
//! A schema owns type definitions, a root-element registry, and references
//! to imported and included sub-schemas. The import/include graph may share
//! sub-schemas or contain cycles; consumers deduplicate by location.

use crate::complex::ComplexType;
use crate::error::XsdError;
use std::collections::HashMap;
use std::sync::Arc;

/// A registry of complex types, root elements and nested sub-schemas.
#[derive(Debug)]
pub struct Schema {
    target_namespace: String,
    location: String,
    elements: Vec<(String, Arc<ComplexType>)>,
    element_map: HashMap<String, usize>,
    imports: Vec<Arc<Schema>>,
    includes: Vec<Arc<Schema>>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new(target_namespace: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            target_namespace: target_namespace.into(),
            location: location.into(),
            elements: Vec::new(),
            element_map: HashMap::new(),
            imports: Vec::new(),
            includes: Vec::new(),
        }
    }

    /// Returns the target namespace.
    #[must_use]
    pub fn target_namespace(&self) -> &str {
        &self.target_namespace
    }

    /// Returns the location string identifying this schema in the
    /// import/include graph.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Registers a root element.
    pub fn add_element(&mut self, name: impl Into<String>, ty: &Arc<ComplexType>) {
        let name = name.into();
        let index = self.elements.len();
        self.elements.push((name.clone(), Arc::clone(ty)));
        self.element_map.insert(name, index);
    }

    /// Adds an imported sub-schema.
    pub fn add_import(&mut self, schema: Arc<Schema>) {
        self.imports.push(schema);
    }

    /// Adds an included sub-schema.
    pub fn add_include(&mut self, schema: Arc<Schema>) {
        self.includes.push(schema);
    }

    /// Returns the registered root elements in declaration order.
    #[must_use]
    pub fn elements(&self) -> &[(String, Arc<ComplexType>)] {
        &self.elements
    }

    /// Returns the imported sub-schemas.
    #[must_use]
    pub fn imports(&self) -> &[Arc<Schema>] {
        &self.imports
    }

    /// Returns the included sub-schemas.
    #[must_use]
    pub fn includes(&self) -> &[Arc<Schema>] {
        &self.includes
    }

    /// Returns true if a root element with the given name is registered
    /// directly on this schema.
    #[must_use]
    pub fn has_element(&self, name: &str) -> bool {
        self.element_map.contains_key(name)
    }

    /// Resolves a root element name to its type, searching this schema, then
    /// includes, then imports.
    ///
    /// # Errors
    /// Returns `XsdError::UnknownElement` if no schema in the graph declares
    /// the element.
    pub fn get_type_by_element_name(&self, name: &str) -> Result<&Arc<ComplexType>, XsdError> {
        if let Some(&index) = self.element_map.get(name) {
            return Ok(&self.elements[index].1);
        }
        for sub in self.includes.iter().chain(self.imports.iter()) {
            if let Ok(ty) = sub.get_type_by_element_name(name) {
                return Ok(ty);
            }
        }
        Err(XsdError::unknown_element(name))
    }
}
