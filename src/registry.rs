//! Run-scoped registries filled while source units are visited.
//!
//! A single [`Registry`] is created empty at the start of a run and threaded through every
//! collection step. All three tables are append/overwrite-only: a later declaration under an
//! existing key replaces the earlier one, nothing is ever removed.

use crate::type_descriptor::TypeDescriptor;
use indexmap::IndexMap;
use log::{debug, warn};
use std::fmt;
use std::path::PathBuf;

/// One field of a record, as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name as declared in source
    pub declared_name: String,
    /// Externally visible name (query parameter / JSON property)
    pub wire_name: String,
    /// Normalized field type
    pub type_descriptor: TypeDescriptor,
}

/// A resolved record declaration with its fields in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordShape {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
}

/// Everything known about one handler after binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDescriptor {
    /// Name of the handler function
    pub handler_name: String,
    /// HTTP method exactly as written in the `@method` directive (empty when missing)
    pub http_method: String,
    /// URL path from the `@endpoint` directive (empty when missing)
    pub path: String,
    /// Free documentation text that is not a directive
    pub description: String,
    /// Request record, when the second parameter resolved to one
    pub request: Option<RecordShape>,
    /// Response record, when the first result resolved to one
    pub response: Option<RecordShape>,
    /// Source unit the handler was declared in
    pub source: PathBuf,
}

/// Literal value of a named constant, as written.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Str(String),
    Int(String),
    Float(String),
    Bool(bool),
    Char(char),
}

impl ConstantValue {
    /// The string payload, if this is a string constant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConstantValue::Str(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::Str(value) => write!(f, "{:?}", value),
            ConstantValue::Int(raw) | ConstantValue::Float(raw) => f.write_str(raw),
            ConstantValue::Bool(value) => write!(f, "{}", value),
            ConstantValue::Char(value) => write!(f, "{:?}", value),
        }
    }
}

/// Named literal constants, last declaration wins.
#[derive(Debug, Default)]
pub struct ConstantTable {
    constants: IndexMap<String, ConstantValue>,
}

impl ConstantTable {
    pub fn insert(&mut self, name: String, value: ConstantValue) {
        debug!("Registering constant {} = {}", name, value);
        self.constants.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&ConstantValue> {
        self.constants.get(name)
    }

    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }
}

/// Record name → resolved shape.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    records: IndexMap<String, RecordShape>,
}

impl TypeRegistry {
    /// Registers a record, replacing any earlier record of the same name.
    pub fn register(&mut self, record: RecordShape) {
        if self.records.contains_key(&record.name) {
            warn!("Record {} declared again, replacing earlier declaration", record.name);
        } else {
            debug!("Registering record {} ({} fields)", record.name, record.fields.len());
        }
        self.records.insert(record.name.clone(), record);
    }

    /// Looks a record up by its canonical descriptor string.
    pub fn get(&self, name: &str) -> Option<&RecordShape> {
        self.records.get(name)
    }

    /// Looks up the record a descriptor names, if any.
    pub fn resolve(&self, descriptor: &TypeDescriptor) -> Option<&RecordShape> {
        self.get(&descriptor.to_string())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Handler name → endpoint.
///
/// Iteration follows the order of the *last* write for each handler, so that a handler
/// registered again is treated as the most recently processed one.
#[derive(Debug, Default)]
pub struct EndpointRegistry {
    endpoints: IndexMap<String, EndpointDescriptor>,
}

impl EndpointRegistry {
    pub fn register(&mut self, endpoint: EndpointDescriptor) {
        if self.endpoints.shift_remove(&endpoint.handler_name).is_some() {
            warn!(
                "Handler {} declared again, replacing earlier declaration",
                endpoint.handler_name
            );
        }
        debug!(
            "Registering endpoint {} -> {} {}",
            endpoint.handler_name, endpoint.http_method, endpoint.path
        );
        self.endpoints.insert(endpoint.handler_name.clone(), endpoint);
    }

    pub fn get(&self, handler_name: &str) -> Option<&EndpointDescriptor> {
        self.endpoints.get(handler_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EndpointDescriptor> {
        self.endpoints.values()
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

/// All state accumulated during one run.
#[derive(Debug, Default)]
pub struct Registry {
    pub constants: ConstantTable,
    pub types: TypeRegistry,
    pub endpoints: EndpointRegistry,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }
}
