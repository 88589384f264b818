use crate::binder::{EndpointBinder, HandlerDeclaration};
use crate::parser::ParsedFile;
use crate::registry::{ConstantTable, ConstantValue, EndpointRegistry, Registry, TypeRegistry};
use crate::type_resolver::RecordResolver;
use log::{debug, info};
use std::path::{Path, PathBuf};
use syn::visit::{self, Visit};
use syn::{Attribute, Expr, Lit};

/// Walks parsed source units and fills the run registry.
///
/// Each unit is visited in three passes: constants, then records, then handlers. Handlers can
/// therefore bind to records declared anywhere in the same unit or in any unit collected
/// earlier, but not to records of units collected later.
pub struct Collector;

/// What one unit contributed to the registry.
#[derive(Debug, Clone, Default)]
pub struct UnitSummary {
    /// Path of the unit
    pub path: PathBuf,
    /// Number of constants registered
    pub constants: usize,
    /// Number of records registered
    pub records: usize,
    /// Names of the handlers registered, in declaration order
    pub handlers: Vec<String>,
}

impl Collector {
    /// Collects a single unit into the registry.
    pub fn collect_unit(parsed_file: &ParsedFile, registry: &mut Registry) -> UnitSummary {
        debug!("Collecting declarations from {}", parsed_file.path.display());
        let tree = &parsed_file.syntax_tree;

        let mut constants = ConstantVisitor {
            constants: &mut registry.constants,
            count: 0,
        };
        constants.visit_file(tree);
        let constant_count = constants.count;

        let mut records = RecordVisitor {
            types: &mut registry.types,
            count: 0,
        };
        records.visit_file(tree);
        let record_count = records.count;

        let mut handlers = HandlerVisitor {
            types: &registry.types,
            endpoints: &mut registry.endpoints,
            source: &parsed_file.path,
            registered: Vec::new(),
        };
        handlers.visit_file(tree);

        let summary = UnitSummary {
            path: parsed_file.path.clone(),
            constants: constant_count,
            records: record_count,
            handlers: handlers.registered,
        };

        debug!(
            "{}: {} constants, {} records, {} handlers",
            summary.path.display(),
            summary.constants,
            summary.records,
            summary.handlers.len()
        );

        summary
    }

    /// Collects units in order.
    pub fn collect_all(parsed_files: &[ParsedFile], registry: &mut Registry) -> Vec<UnitSummary> {
        let summaries: Vec<UnitSummary> = parsed_files
            .iter()
            .map(|parsed_file| Self::collect_unit(parsed_file, registry))
            .collect();

        info!(
            "Collected {} constants, {} records, {} endpoints from {} units",
            registry.constants.len(),
            registry.types.len(),
            registry.endpoints.len(),
            summaries.len()
        );

        summaries
    }
}

/// Whether an item is gated behind `#[cfg(test)]`
fn is_test_only(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| {
        attr.path().is_ident("cfg")
            && attr
                .meta
                .require_list()
                .map(|list| list.tokens.to_string() == "test")
                .unwrap_or(false)
    })
}

/// Literal initializer of a constant, as written
fn literal_value(expr: &Expr) -> Option<ConstantValue> {
    let Expr::Lit(expr_lit) = expr else {
        return None;
    };
    match &expr_lit.lit {
        Lit::Str(lit) => Some(ConstantValue::Str(lit.value())),
        Lit::Int(lit) => Some(ConstantValue::Int(lit.to_string())),
        Lit::Float(lit) => Some(ConstantValue::Float(lit.to_string())),
        Lit::Bool(lit) => Some(ConstantValue::Bool(lit.value)),
        Lit::Char(lit) => Some(ConstantValue::Char(lit.value())),
        _ => None,
    }
}

struct ConstantVisitor<'r> {
    constants: &'r mut ConstantTable,
    count: usize,
}

impl ConstantVisitor<'_> {
    fn record(&mut self, ident: &syn::Ident, expr: &Expr) {
        if let Some(value) = literal_value(expr) {
            self.constants.insert(ident.to_string(), value);
            self.count += 1;
        }
    }
}

impl<'ast> Visit<'ast> for ConstantVisitor<'_> {
    fn visit_item_const(&mut self, node: &'ast syn::ItemConst) {
        self.record(&node.ident, &node.expr);
        visit::visit_item_const(self, node);
    }

    fn visit_item_static(&mut self, node: &'ast syn::ItemStatic) {
        self.record(&node.ident, &node.expr);
        visit::visit_item_static(self, node);
    }

    fn visit_item_mod(&mut self, node: &'ast syn::ItemMod) {
        if !is_test_only(&node.attrs) {
            visit::visit_item_mod(self, node);
        }
    }
}

struct RecordVisitor<'r> {
    types: &'r mut TypeRegistry,
    count: usize,
}

impl<'ast> Visit<'ast> for RecordVisitor<'_> {
    fn visit_item_struct(&mut self, node: &'ast syn::ItemStruct) {
        RecordResolver::register(node, self.types);
        self.count += 1;
        visit::visit_item_struct(self, node);
    }

    fn visit_item_mod(&mut self, node: &'ast syn::ItemMod) {
        if !is_test_only(&node.attrs) {
            visit::visit_item_mod(self, node);
        }
    }
}

struct HandlerVisitor<'r> {
    types: &'r TypeRegistry,
    endpoints: &'r mut EndpointRegistry,
    source: &'r Path,
    registered: Vec<String>,
}

impl HandlerVisitor<'_> {
    fn handle(&mut self, handler: HandlerDeclaration) {
        if EndpointBinder::register(&handler, self.types, self.endpoints, self.source) {
            self.registered.push(handler.name);
        }
    }
}

impl<'ast> Visit<'ast> for HandlerVisitor<'_> {
    // Function bodies are not descended into: nested functions are not handlers.
    fn visit_item_fn(&mut self, node: &'ast syn::ItemFn) {
        self.handle(HandlerDeclaration::from_signature(&node.sig, &node.attrs));
    }

    fn visit_impl_item_fn(&mut self, node: &'ast syn::ImplItemFn) {
        self.handle(HandlerDeclaration::from_signature(&node.sig, &node.attrs));
    }

    fn visit_item_mod(&mut self, node: &'ast syn::ItemMod) {
        if !is_test_only(&node.attrs) {
            visit::visit_item_mod(self, node);
        }
    }
}
