use crate::registry::{FieldDescriptor, TypeRegistry};
use crate::type_descriptor::TypeDescriptor;
use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Swagger schema node (object, array or primitive)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// The type of the schema (string, integer, object, array, or a raw fallback name)
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Format for primitive types (e.g., "int64", "f32")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Properties for object types, in field declaration order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Schema>,
    /// Items schema for array types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
}

impl Schema {
    /// A schema carrying only a type and an optional format
    pub fn primitive(schema_type: impl Into<String>, format: Option<&str>) -> Self {
        Self {
            schema_type: schema_type.into(),
            format: format.map(str::to_string),
            properties: IndexMap::new(),
            items: None,
        }
    }

    pub fn object(properties: IndexMap<String, Schema>) -> Self {
        Self {
            properties,
            ..Self::primitive("object", None)
        }
    }

    pub fn array(items: Schema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::primitive("array", None)
        }
    }
}

/// Map a type name through the primitive table.
///
/// Names outside the table become a schema whose type is the name itself.
pub fn primitive_schema(type_name: &str) -> Schema {
    match type_name {
        "string" | "String" | "str" | "char" => Schema::primitive("string", None),
        "int" | "int32" | "int64" | "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8"
        | "u16" | "u32" | "u64" | "u128" | "usize" => Schema::primitive("integer", Some(type_name)),
        "float" | "float32" | "float64" | "f32" | "f64" => {
            Schema::primitive("number", Some(type_name))
        }
        "bool" => Schema::primitive("boolean", None),
        other => Schema::primitive(other, None),
    }
}

/// Schema projector - converts record fields to Swagger schemas
///
/// Only sequence-typed fields whose element names a registered record are expanded into
/// nested objects. A field typed directly as a record is mapped through the primitive table
/// like any other name and is not expanded.
pub struct SchemaProjector<'a> {
    /// Records registered during collection
    types: &'a TypeRegistry,
}

impl<'a> SchemaProjector<'a> {
    pub fn new(types: &'a TypeRegistry) -> Self {
        Self { types }
    }

    /// Project a single type descriptor
    pub fn project(&self, descriptor: &TypeDescriptor) -> Schema {
        self.project_with_stack(descriptor, &mut Vec::new())
    }

    /// Project every field into a property keyed by its wire name
    pub fn project_fields(&self, fields: &[FieldDescriptor]) -> IndexMap<String, Schema> {
        self.project_fields_with_stack(fields, &mut Vec::new())
    }

    fn project_fields_with_stack(
        &self,
        fields: &[FieldDescriptor],
        stack: &mut Vec<String>,
    ) -> IndexMap<String, Schema> {
        fields
            .iter()
            .map(|field| {
                let schema = self.project_with_stack(&field.type_descriptor, stack);
                (field.wire_name.clone(), schema)
            })
            .collect()
    }

    fn project_with_stack(&self, descriptor: &TypeDescriptor, stack: &mut Vec<String>) -> Schema {
        let Some(element) = descriptor.array_element() else {
            return primitive_schema(&descriptor.to_string());
        };

        let element_name = element.to_string();
        let Some(record) = self.types.get(&element_name) else {
            return Schema::array(primitive_schema(&element_name));
        };

        if stack.contains(&element_name) {
            warn!(
                "Circular reference to record {} while projecting, not expanding again",
                element_name
            );
            return Schema::array(Schema::object(IndexMap::new()));
        }

        debug!("Expanding array of record {}", element_name);
        stack.push(element_name);
        let properties = self.project_fields_with_stack(&record.fields, stack);
        stack.pop();

        Schema::array(Schema::object(properties))
    }

    /// Query parameter type and format of a request field.
    ///
    /// Fields whose type is not in the primitive table keep the raw descriptor string as
    /// their type.
    pub fn parameter_type(&self, field: &FieldDescriptor) -> (String, Option<String>) {
        let schema = primitive_schema(&field.type_descriptor.to_string());
        (schema.schema_type, schema.format)
    }
}
