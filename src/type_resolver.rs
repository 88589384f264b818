use crate::registry::{FieldDescriptor, RecordShape, TypeRegistry};
use crate::type_descriptor::TypeDescriptor;
use log::{debug, warn};
use syn::ext::IdentExt;

/// Record resolver - turns struct declarations into normalized record shapes
pub struct RecordResolver;

impl RecordResolver {
    /// Resolve a struct declaration and register it, replacing any earlier record of the
    /// same name
    pub fn register(item_struct: &syn::ItemStruct, types: &mut TypeRegistry) {
        let record = Self::resolve(item_struct);
        types.register(record);
    }

    /// Resolve a struct declaration into a record shape
    pub fn resolve(item_struct: &syn::ItemStruct) -> RecordShape {
        let name = item_struct.ident.to_string();
        debug!("Resolving record: {}", name);

        let fields = Self::resolve_fields(&name, &item_struct.fields);

        RecordShape { name, fields }
    }

    /// Resolve named fields in declaration order; positional fields carry no name and are
    /// left out
    fn resolve_fields(record_name: &str, fields: &syn::Fields) -> Vec<FieldDescriptor> {
        let syn::Fields::Named(named_fields) = fields else {
            debug!("Record {} has no named fields", record_name);
            return Vec::new();
        };

        named_fields
            .named
            .iter()
            .filter_map(|field| {
                let declared_name = field.ident.as_ref()?.unraw().to_string();
                let type_descriptor = TypeDescriptor::from_type(&field.ty);

                if type_descriptor.is_unrecognized() {
                    warn!(
                        "Unrecognized type for field {}.{}: {}",
                        record_name, declared_name, type_descriptor
                    );
                }

                Some(FieldDescriptor {
                    wire_name: wire_name(&declared_name),
                    declared_name,
                    type_descriptor,
                })
            })
            .collect()
    }
}

/// Derive the wire name of a field: every upper-case letter after the first character is
/// preceded by an underscore, and all upper-case letters are lower-cased.
///
/// `UserID` becomes `user_i_d`; names without upper-case letters are returned unchanged.
pub fn wire_name(declared_name: &str) -> String {
    let mut result = String::with_capacity(declared_name.len());

    for (index, ch) in declared_name.chars().enumerate() {
        if ch.is_uppercase() {
            if index > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }

    result
}
