//! Swagger 2.0 document assembly.
//!
//! Each handler becomes one operation under its path and lowercased method. The
//! `operationId` is the handler's function name. Earlier generators of this document
//! used the endpoint path instead, which gave a GET and a POST on the same path the same
//! id; consumers keyed on the old ids need to be updated.

use crate::registry::{EndpointDescriptor, EndpointRegistry};
use crate::schema_generator::{Schema, SchemaProjector};
use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

pub const SWAGGER_VERSION: &str = "2.0";
const JSON_MEDIA_TYPE: &str = "application/json";
const SUCCESS_STATUS: &str = "200";

/// Swagger document builder
pub struct SwaggerBuilder {
    /// Swagger info section
    info: Info,
    host: Option<String>,
    base_path: Option<String>,
    schemes: Vec<String>,
    consumes: Vec<String>,
    produces: Vec<String>,
    /// URL path -> lowercased method -> operation
    paths: IndexMap<String, IndexMap<String, Operation>>,
}

/// Swagger Info object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    /// API title
    pub title: String,
    /// API version
    pub version: String,
    /// API description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Swagger Operation object - represents a single API operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub description: String,
    /// Handler name
    #[serde(rename = "operationId")]
    pub operation_id: String,
    /// Query parameters, one per request field
    pub parameters: Vec<Parameter>,
    pub responses: IndexMap<String, Response>,
}

/// Swagger Parameter object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Wire name of the request field
    pub name: String,
    /// Parameter location, always "query"
    #[serde(rename = "in")]
    pub location: String,
    /// Declared name of the request field
    pub description: String,
    pub required: bool,
    #[serde(rename = "type")]
    pub param_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Swagger Response object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Response description
    pub description: String,
    pub schema: Schema,
}

/// Complete Swagger document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwaggerDocument {
    /// Swagger version
    pub swagger: String,
    /// API info
    pub info: Info,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(rename = "basePath", skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    pub schemes: Vec<String>,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
    /// API paths
    pub paths: IndexMap<String, IndexMap<String, Operation>>,
}

impl SwaggerBuilder {
    /// Create a new SwaggerBuilder with default info
    pub fn new() -> Self {
        debug!("Initializing SwaggerBuilder");
        Self {
            info: Info {
                title: "Generated API".to_string(),
                version: "1.0.0".to_string(),
                description: None,
            },
            host: None,
            base_path: None,
            schemes: vec!["https".to_string()],
            consumes: vec![JSON_MEDIA_TYPE.to_string()],
            produces: vec![JSON_MEDIA_TYPE.to_string()],
            paths: IndexMap::new(),
        }
    }

    /// Set custom info for the API
    pub fn with_info(
        mut self,
        title: String,
        version: String,
        description: Option<String>,
    ) -> Self {
        self.info = Info {
            title,
            version,
            description,
        };
        self
    }

    pub fn with_host(mut self, host: Option<String>) -> Self {
        self.host = host;
        self
    }

    pub fn with_base_path(mut self, base_path: Option<String>) -> Self {
        self.base_path = base_path;
        self
    }

    /// Add one endpoint to the document.
    ///
    /// An operation already present under the same path and method is replaced.
    pub fn add_endpoint(&mut self, endpoint: &EndpointDescriptor, projector: &SchemaProjector) {
        debug!(
            "Adding endpoint: {} {} ({})",
            endpoint.http_method, endpoint.path, endpoint.handler_name
        );

        if endpoint.path.is_empty() || endpoint.http_method.is_empty() {
            warn!(
                "Handler {} is missing @endpoint or @method, its entry will be malformed",
                endpoint.handler_name
            );
        }

        let parameters = endpoint
            .request
            .iter()
            .flat_map(|request| request.fields.iter())
            .map(|field| {
                let (param_type, format) = projector.parameter_type(field);
                Parameter {
                    name: field.wire_name.clone(),
                    location: "query".to_string(),
                    description: field.declared_name.clone(),
                    required: false,
                    param_type,
                    format,
                }
            })
            .collect();

        let properties = endpoint
            .response
            .as_ref()
            .map(|response| projector.project_fields(&response.fields))
            .unwrap_or_default();

        let mut responses = IndexMap::new();
        responses.insert(
            SUCCESS_STATUS.to_string(),
            Response {
                description: format!("Success response for {}", endpoint.path),
                schema: Schema::object(properties),
            },
        );

        let operation = Operation {
            description: endpoint.description.clone(),
            operation_id: endpoint.handler_name.clone(),
            parameters,
            responses,
        };

        let method = endpoint.http_method.to_lowercase();
        let path_item = self.paths.entry(endpoint.path.clone()).or_default();
        if let Some(previous) = path_item.insert(method, operation) {
            warn!(
                "{} {} already served by {}, replaced by {}",
                endpoint.http_method, endpoint.path, previous.operation_id, endpoint.handler_name
            );
        }
    }

    /// Add every registered endpoint, in registry order
    pub fn add_endpoints(&mut self, endpoints: &EndpointRegistry, projector: &SchemaProjector) {
        for endpoint in endpoints.iter() {
            self.add_endpoint(endpoint, projector);
        }
    }

    /// Build the final Swagger document
    pub fn build(self) -> SwaggerDocument {
        debug!("Building final Swagger document with {} paths", self.paths.len());

        SwaggerDocument {
            swagger: SWAGGER_VERSION.to_string(),
            info: self.info,
            host: self.host,
            base_path: self.base_path,
            schemes: self.schemes,
            consumes: self.consumes,
            produces: self.produces,
            paths: self.paths,
        }
    }
}

impl Default for SwaggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{FieldDescriptor, RecordShape, TypeRegistry};
    use crate::type_descriptor::TypeDescriptor;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::path::PathBuf;

    fn field(name: &str, ty: TypeDescriptor) -> FieldDescriptor {
        FieldDescriptor {
            declared_name: name.to_string(),
            wire_name: crate::type_resolver::wire_name(name),
            type_descriptor: ty,
        }
    }

    fn named(name: &str) -> TypeDescriptor {
        TypeDescriptor::Named(name.to_string())
    }

    fn endpoint(handler: &str, method: &str, path: &str) -> EndpointDescriptor {
        EndpointDescriptor {
            handler_name: handler.to_string(),
            http_method: method.to_string(),
            path: path.to_string(),
            description: String::new(),
            request: None,
            response: None,
            source: PathBuf::from("api.rs"),
        }
    }

    #[test]
    fn test_new_builder() {
        let document = SwaggerBuilder::new().build();

        assert_eq!(document.swagger, "2.0");
        assert_eq!(document.info.title, "Generated API");
        assert_eq!(document.info.version, "1.0.0");
        assert_eq!(document.schemes, vec!["https".to_string()]);
        assert_eq!(document.consumes, vec!["application/json".to_string()]);
        assert_eq!(document.produces, vec!["application/json".to_string()]);
        assert!(document.paths.is_empty());
    }

    #[test]
    fn test_with_info_host_and_base_path() {
        let document = SwaggerBuilder::new()
            .with_info(
                "Users API".to_string(),
                "2.0.0".to_string(),
                Some("User management".to_string()),
            )
            .with_host(Some("api.example.com".to_string()))
            .with_base_path(Some("/v1".to_string()))
            .build();

        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(value["info"]["title"], "Users API");
        assert_eq!(value["host"], "api.example.com");
        assert_eq!(value["basePath"], "/v1");
    }

    #[test]
    fn test_optional_sections_are_omitted() {
        let value = serde_json::to_value(SwaggerBuilder::new().build()).unwrap();

        assert!(value.get("host").is_none());
        assert!(value.get("basePath").is_none());
        assert!(value["info"].get("description").is_none());
    }

    #[test]
    fn test_add_endpoint_with_request_and_response() {
        let types = TypeRegistry::default();
        let projector = SchemaProjector::new(&types);
        let mut builder = SwaggerBuilder::new();

        let mut get_user = endpoint("get_user", "GET", "/users");
        get_user.description = "Fetch a user".to_string();
        get_user.request = Some(RecordShape {
            name: "UserRequest".to_string(),
            fields: vec![field("UserID", named("int64")), field("Filter", named("Query"))],
        });
        get_user.response = Some(RecordShape {
            name: "UserResponse".to_string(),
            fields: vec![field("Name", named("string"))],
        });

        builder.add_endpoint(&get_user, &projector);
        let value = serde_json::to_value(builder.build()).unwrap();

        assert_eq!(
            value["paths"]["/users"]["get"],
            json!({
                "description": "Fetch a user",
                "operationId": "get_user",
                "parameters": [
                    {
                        "name": "user_i_d",
                        "in": "query",
                        "description": "UserID",
                        "required": false,
                        "type": "integer",
                        "format": "int64"
                    },
                    {
                        "name": "filter",
                        "in": "query",
                        "description": "Filter",
                        "required": false,
                        "type": "Query"
                    }
                ],
                "responses": {
                    "200": {
                        "description": "Success response for /users",
                        "schema": {
                            "type": "object",
                            "properties": {"name": {"type": "string"}}
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn test_endpoint_without_records() {
        let types = TypeRegistry::default();
        let projector = SchemaProjector::new(&types);
        let mut builder = SwaggerBuilder::new();

        builder.add_endpoint(&endpoint("health", "GET", "/health"), &projector);
        let document = builder.build();

        let operation = &document.paths["/health"]["get"];
        assert!(operation.parameters.is_empty());
        let value = serde_json::to_value(operation).unwrap();
        assert_eq!(value["parameters"], json!([]));
        assert_eq!(value["responses"]["200"]["schema"], json!({"type": "object"}));
    }

    #[test]
    fn test_method_is_lowercased() {
        let types = TypeRegistry::default();
        let projector = SchemaProjector::new(&types);
        let mut builder = SwaggerBuilder::new();

        builder.add_endpoint(&endpoint("create", "POST", "/users"), &projector);
        builder.add_endpoint(&endpoint("list", "Get", "/users"), &projector);
        let document = builder.build();

        let methods: Vec<_> = document.paths["/users"].keys().cloned().collect();
        assert_eq!(methods, vec!["post".to_string(), "get".to_string()]);
    }

    #[test]
    fn test_same_path_and_method_later_wins() {
        let types = TypeRegistry::default();
        let projector = SchemaProjector::new(&types);
        let mut builder = SwaggerBuilder::new();

        builder.add_endpoint(&endpoint("ping_v1", "GET", "/ping"), &projector);
        builder.add_endpoint(&endpoint("ping_v2", "GET", "/ping"), &projector);
        let document = builder.build();

        assert_eq!(document.paths.len(), 1);
        assert_eq!(document.paths["/ping"].len(), 1);
        assert_eq!(document.paths["/ping"]["get"].operation_id, "ping_v2");
    }

    #[test]
    fn test_undocumented_endpoint_is_kept_under_blank_keys() {
        let types = TypeRegistry::default();
        let projector = SchemaProjector::new(&types);
        let mut builder = SwaggerBuilder::new();

        builder.add_endpoint(&endpoint("helper", "", ""), &projector);
        let document = builder.build();

        assert_eq!(document.paths[""][""].operation_id, "helper");
    }

    #[test]
    fn test_add_endpoints_follows_registry_order() {
        let types = TypeRegistry::default();
        let projector = SchemaProjector::new(&types);
        let mut endpoints = EndpointRegistry::default();
        endpoints.register(endpoint("b", "GET", "/b"));
        endpoints.register(endpoint("a", "GET", "/a"));

        let mut builder = SwaggerBuilder::new();
        builder.add_endpoints(&endpoints, &projector);
        let document = builder.build();

        let paths: Vec<_> = document.paths.keys().cloned().collect();
        assert_eq!(paths, vec!["/b".to_string(), "/a".to_string()]);
    }
}
