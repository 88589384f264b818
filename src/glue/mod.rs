//! Routing glue rendered from the registered endpoints.
//!
//! Endpoints are grouped by the directory of the unit that declared them. Every group becomes
//! one axum router module, rendered with `tera` from four embedded templates.

pub mod formatter;

use crate::error::Result;
use crate::registry::{ConstantTable, EndpointDescriptor, EndpointRegistry};
use indexmap::IndexMap;
use log::{debug, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};

const SERVER_TEMPLATE: &str = "server.rs";
const ROUTE_TEMPLATE: &str = "route.rs";
const GET_REQUEST_TEMPLATE: &str = "get_request.rs";
const POST_REQUEST_TEMPLATE: &str = "post_request.rs";

/// Constant whose string value names the module exporting `Service`
pub const MAIN_SERVICE_PACKAGE_PATH: &str = "MAIN_SERVICE_PACKAGE_PATH";

/// Used when no string constant names the service module
pub const DEFAULT_SERVICE_PACKAGE: &str = "crate";

const FALLBACK_PACKAGE: &str = "api";

/// axum routing functions a `@method` value can map onto
const ROUTING_FUNCTIONS: &[&str] = &[
    "get", "post", "put", "delete", "patch", "head", "options", "trace",
];

/// One rendered glue module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlueFile {
    /// Directory the module belongs to
    pub directory: PathBuf,
    /// Directory name the router is documented under
    pub package: String,
    pub content: String,
    /// Handler names routed by this module, in route order
    pub handlers: Vec<String>,
}

#[derive(Serialize)]
struct ServerContext<'a> {
    service_package: &'a str,
    package: &'a str,
    imports: String,
    endpoints: String,
}

#[derive(Serialize)]
struct RouteContext<'a> {
    /// Path as an escaped Rust string literal
    endpoint: String,
    method: &'a str,
    function: &'a str,
    request: String,
    request_arg: &'a str,
}

#[derive(Serialize)]
struct RequestContext<'a> {
    request_name: &'a str,
}

pub struct GlueRenderer<'a> {
    constants: &'a ConstantTable,
    templates: Tera,
}

impl<'a> GlueRenderer<'a> {
    pub fn new(constants: &'a ConstantTable) -> Result<Self> {
        let mut templates = Tera::default();
        templates.add_raw_templates(vec![
            (SERVER_TEMPLATE, include_str!("../../templates/server.rs.tmpl")),
            (ROUTE_TEMPLATE, include_str!("../../templates/route.rs.tmpl")),
            (GET_REQUEST_TEMPLATE, include_str!("../../templates/get_request.rs.tmpl")),
            (POST_REQUEST_TEMPLATE, include_str!("../../templates/post_request.rs.tmpl")),
        ])?;

        Ok(Self {
            constants,
            templates,
        })
    }

    /// Renders one module per directory that declared at least one routable endpoint.
    ///
    /// `units` are the scanned source units in scan order; every unit in a directory gets an
    /// import so request records declared next to the handlers are in scope.
    pub fn render_all(
        &self,
        endpoints: &EndpointRegistry,
        units: &[PathBuf],
    ) -> Result<Vec<GlueFile>> {
        let mut groups: IndexMap<PathBuf, Vec<&EndpointDescriptor>> = IndexMap::new();
        for endpoint in endpoints.iter() {
            if routing_function(&endpoint.http_method).is_none() {
                warn!(
                    "Handler {} has method {:?} with no axum routing function, not routed",
                    endpoint.handler_name, endpoint.http_method
                );
                continue;
            }
            groups
                .entry(unit_directory(&endpoint.source))
                .or_default()
                .push(endpoint);
        }

        let mut files = Vec::with_capacity(groups.len());
        for (directory, group) in groups {
            let package = package_name(&directory);
            let imports = imports_for(&directory, units);
            debug!("Rendering glue for {} ({} routes)", directory.display(), group.len());

            files.push(GlueFile {
                content: self.render_package(&package, &imports, &group)?,
                handlers: group.iter().map(|e| e.handler_name.clone()).collect(),
                directory,
                package,
            });
        }
        Ok(files)
    }

    /// Renders the server template for one package.
    pub fn render_package(
        &self,
        package: &str,
        imports: &[String],
        endpoints: &[&EndpointDescriptor],
    ) -> Result<String> {
        let routes = endpoints
            .iter()
            .map(|endpoint| self.render_route(endpoint))
            .collect::<Result<Vec<_>>>()?;

        let context = ServerContext {
            service_package: self.service_package(),
            package,
            imports: imports.join("\n"),
            endpoints: routes.concat(),
        };

        Ok(self
            .templates
            .render(SERVER_TEMPLATE, &Context::from_serialize(&context)?)?)
    }

    /// Renders the route template for one endpoint.
    ///
    /// `GET` routes take the request from the query string, every other method from a JSON
    /// body. Endpoints without a request record take no extractor.
    pub fn render_route(&self, endpoint: &EndpointDescriptor) -> Result<String> {
        let request = match &endpoint.request {
            Some(record) => {
                let template = if endpoint.http_method == "GET" {
                    GET_REQUEST_TEMPLATE
                } else {
                    POST_REQUEST_TEMPLATE
                };
                let context = RequestContext {
                    request_name: &record.name,
                };
                self.templates
                    .render(template, &Context::from_serialize(&context)?)?
                    .trim_end()
                    .to_string()
            }
            None => String::new(),
        };
        let method = endpoint.http_method.to_lowercase();

        let context = RouteContext {
            endpoint: format!("{:?}", endpoint.path),
            method: &method,
            function: &endpoint.handler_name,
            request_arg: if request.is_empty() { "" } else { ", request" },
            request,
        };

        Ok(self
            .templates
            .render(ROUTE_TEMPLATE, &Context::from_serialize(&context)?)?)
    }

    fn service_package(&self) -> &str {
        match self
            .constants
            .get(MAIN_SERVICE_PACKAGE_PATH)
            .and_then(|value| value.as_str())
        {
            Some(path) => path,
            None => {
                warn!(
                    "No string constant {} found, importing Service from {}",
                    MAIN_SERVICE_PACKAGE_PATH, DEFAULT_SERVICE_PACKAGE
                );
                DEFAULT_SERVICE_PACKAGE
            }
        }
    }
}

/// axum routing function for a `@method` value, if there is one
pub fn routing_function(http_method: &str) -> Option<&'static str> {
    let method = http_method.to_lowercase();
    ROUTING_FUNCTIONS
        .iter()
        .copied()
        .find(|candidate| *candidate == method)
}

fn unit_directory(source: &Path) -> PathBuf {
    source.parent().map(Path::to_path_buf).unwrap_or_default()
}

fn package_name(directory: &Path) -> String {
    directory
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| FALLBACK_PACKAGE.to_string())
}

/// `use` lines for every unit of a directory, in scan order.
fn imports_for(directory: &Path, units: &[PathBuf]) -> Vec<String> {
    let mut imports: Vec<String> = Vec::new();
    for unit in units.iter().filter(|unit| unit_directory(unit) == directory) {
        let Some(stem) = unit.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let line = match stem {
            "mod" | "lib" | "main" => "use super::*;".to_string(),
            module => format!("use super::{}::*;", module),
        };
        if !imports.contains(&line) {
            imports.push(line);
        }
    }
    imports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ConstantValue, RecordShape};
    use crate::scanner::GENERATED_MARKER;
    use pretty_assertions::assert_eq;

    fn endpoint(handler: &str, method: &str, path: &str, source: &str) -> EndpointDescriptor {
        EndpointDescriptor {
            handler_name: handler.to_string(),
            http_method: method.to_string(),
            path: path.to_string(),
            description: String::new(),
            request: None,
            response: None,
            source: PathBuf::from(source),
        }
    }

    fn with_request(mut endpoint: EndpointDescriptor, record: &str) -> EndpointDescriptor {
        endpoint.request = Some(RecordShape {
            name: record.to_string(),
            fields: Vec::new(),
        });
        endpoint
    }

    fn route(endpoint: &EndpointDescriptor) -> String {
        let constants = ConstantTable::default();
        GlueRenderer::new(&constants)
            .unwrap()
            .render_route(endpoint)
            .unwrap()
    }

    #[test]
    fn test_get_route_uses_query_extractor() {
        let route = route(&with_request(
            endpoint("list_users", "GET", "/users", "api/users.rs"),
            "ListUsersRequest",
        ));

        assert!(route.contains("\"/users\""));
        assert!(route.contains(
            "get(|State(service): State<Arc<Service>>, Query(request): Query<ListUsersRequest>|"
        ));
        assert!(route.contains("Json(list_users(&service, request))"));
    }

    #[test]
    fn test_other_methods_use_json_extractor() {
        let route = route(&with_request(
            endpoint("create_user", "POST", "/users", "api/users.rs"),
            "CreateUserRequest",
        ));

        assert!(route.contains(
            "post(|State(service): State<Arc<Service>>, Json(request): Json<CreateUserRequest>|"
        ));
    }

    #[test]
    fn test_route_without_request_takes_no_extractor() {
        let route = route(&endpoint("health", "GET", "/health", "api/health.rs"));

        assert!(route.contains("get(|State(service): State<Arc<Service>>|"));
        assert!(route.contains("Json(health(&service))"));
        assert!(!route.contains("{{"));
    }

    #[test]
    fn test_path_is_emitted_as_escaped_literal() {
        let route = route(&endpoint("say", "GET", r#"/say"hi\"#, "api/say.rs"));

        assert!(route.contains(r#""/say\"hi\\","#));
    }

    #[test]
    fn test_inserted_text_is_not_rendered_again() {
        let route = route(&endpoint("odd", "GET", "/{{ request }}", "api/odd.rs"));

        assert!(route.contains("\"/{{ request }}\""));
    }

    #[test]
    fn test_render_all_groups_by_directory() {
        let constants = ConstantTable::default();
        let mut endpoints = EndpointRegistry::default();
        endpoints.register(endpoint("list_users", "GET", "/users", "api/users/handlers.rs"));
        endpoints.register(endpoint("list_orders", "GET", "/orders", "api/orders/handlers.rs"));
        endpoints.register(endpoint("get_user", "GET", "/user", "api/users/handlers.rs"));
        let units = vec![
            PathBuf::from("api/orders/handlers.rs"),
            PathBuf::from("api/users/handlers.rs"),
            PathBuf::from("api/users/models.rs"),
        ];

        let files = GlueRenderer::new(&constants)
            .unwrap()
            .render_all(&endpoints, &units)
            .unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].package, "users");
        assert_eq!(files[0].directory, PathBuf::from("api/users"));
        assert_eq!(
            files[0].handlers,
            vec!["list_users".to_string(), "get_user".to_string()]
        );
        assert!(files[0]
            .content
            .contains("use super::handlers::*;\nuse super::models::*;"));
        assert_eq!(files[1].package, "orders");
        assert!(!files[1].content.contains("use super::models::*;"));
    }

    #[test]
    fn test_rendered_file_starts_with_marker() {
        let constants = ConstantTable::default();
        let mut endpoints = EndpointRegistry::default();
        endpoints.register(endpoint("ping", "GET", "/ping", "api/ping.rs"));

        let files = GlueRenderer::new(&constants)
            .unwrap()
            .render_all(&endpoints, &[])
            .unwrap();

        assert!(files[0].content.starts_with(GENERATED_MARKER));
        assert!(files[0]
            .content
            .contains("Routes served by the `api` handlers."));
    }

    #[test]
    fn test_package_path_constant_is_used() {
        let mut constants = ConstantTable::default();
        constants.insert(
            MAIN_SERVICE_PACKAGE_PATH.to_string(),
            ConstantValue::Str("crate::service".to_string()),
        );
        let renderer = GlueRenderer::new(&constants).unwrap();

        let content = renderer.render_package("api", &[], &[]).unwrap();

        assert!(content.contains("use crate::service::Service;"));
    }

    #[test]
    fn test_missing_package_path_constant_falls_back_to_crate() {
        let mut constants = ConstantTable::default();
        constants.insert(
            MAIN_SERVICE_PACKAGE_PATH.to_string(),
            ConstantValue::Int("3".to_string()),
        );
        let renderer = GlueRenderer::new(&constants).unwrap();

        let content = renderer.render_package("api", &[], &[]).unwrap();

        assert!(content.contains("use crate::Service;"));
        assert!(!content.contains("{{"));
    }

    #[test]
    fn test_unknown_method_is_not_routed() {
        let constants = ConstantTable::default();
        let mut endpoints = EndpointRegistry::default();
        endpoints.register(endpoint("ping", "GET, POST", "/ping", "api/ping.rs"));
        endpoints.register(endpoint("helper", "", "", "api/ping.rs"));
        endpoints.register(endpoint("status", "Get", "/status", "api/ping.rs"));

        let files = GlueRenderer::new(&constants)
            .unwrap()
            .render_all(&endpoints, &[])
            .unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].handlers, vec!["status".to_string()]);
        assert!(!files[0].content.contains("get, post"));
    }

    #[test]
    fn test_routing_function() {
        assert_eq!(routing_function("GET"), Some("get"));
        assert_eq!(routing_function("Delete"), Some("delete"));
        assert_eq!(routing_function("FETCH"), None);
        assert_eq!(routing_function(""), None);
    }

    #[test]
    fn test_no_endpoints_no_files() {
        let constants = ConstantTable::default();
        let endpoints = EndpointRegistry::default();

        let files = GlueRenderer::new(&constants)
            .unwrap()
            .render_all(&endpoints, &[PathBuf::from("api/models.rs")])
            .unwrap();

        assert!(files.is_empty());
    }

    #[test]
    fn test_mod_units_import_parent() {
        let imports = imports_for(
            Path::new("api"),
            &[PathBuf::from("api/mod.rs"), PathBuf::from("api/lib.rs")],
        );

        assert_eq!(imports, vec!["use super::*;".to_string()]);
    }
}
