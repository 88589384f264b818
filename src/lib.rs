//! Swagger Glue Generator - Swagger documents and routing glue from annotated Rust handlers.
//!
//! Handlers are plain functions whose doc comments carry `@endpoint <path>` and
//! `@method <VERB>` directives. By convention the second parameter is the request record and
//! the first result the response record:
//!
//! ```ignore
//! pub struct ListUsersRequest {
//!     pub Page: i32,
//! }
//!
//! pub struct ListUsersResponse {
//!     pub Users: Vec<User>,
//! }
//!
//! /// Lists users page by page.
//! /// @endpoint /users
//! /// @method GET
//! pub fn list_users(ctx: &Service, req: ListUsersRequest) -> ListUsersResponse {
//!     // ...
//! }
//! ```
//!
//! # Architecture
//!
//! 1. [`scanner`] - Collects source units, skipping previously generated files
//! 2. [`parser`] - Parses units into syntax trees, failing the run on invalid syntax
//! 3. [`collector`] - Visits every unit: constants, then records, then handlers
//! 4. [`type_resolver`] and [`type_descriptor`] - Turn structs into wire-named record shapes
//! 5. [`directive`] and [`binder`] - Read directives and bind handlers to their records
//! 6. [`registry`] - Run-scoped constant, record and endpoint tables
//! 7. [`schema_generator`] and [`swagger_builder`] - Project endpoints into a Swagger 2.0 document
//! 8. [`serializer`] - Writes the document as JSON or YAML
//! 9. [`glue`] and [`assets`] - Router modules and the Swagger UI page
//!
//! # Example Usage
//!
//! ```no_run
//! use swagger_glue_gen::{
//!     collector::Collector,
//!     parser::AstParser,
//!     registry::Registry,
//!     scanner::FileScanner,
//!     schema_generator::SchemaProjector,
//!     serializer::serialize_json,
//!     swagger_builder::SwaggerBuilder,
//! };
//! use std::path::PathBuf;
//!
//! let scan_result = FileScanner::new(PathBuf::from("./src/api")).scan().unwrap();
//! let parsed_files = AstParser::parse_files(&scan_result.rust_files).unwrap();
//!
//! let mut registry = Registry::new();
//! Collector::collect_all(&parsed_files, &mut registry);
//!
//! let projector = SchemaProjector::new(&registry.types);
//! let mut builder = SwaggerBuilder::new();
//! builder.add_endpoints(&registry.endpoints, &projector);
//! let document = builder.build();
//!
//! println!("{}", serialize_json(&document).unwrap());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod assets;
pub mod binder;
pub mod cli;
pub mod collector;
pub mod config;
pub mod directive;
pub mod error;
pub mod glue;
pub mod parser;
pub mod registry;
pub mod scanner;
pub mod schema_generator;
pub mod serializer;
pub mod swagger_builder;
pub mod type_descriptor;
pub mod type_resolver;
