//! Binding of handler declarations to the records they take and return.
//!
//! Handlers follow a positional convention: the first parameter is a context-like value, the
//! second is the request record, and the first result is the response record. A
//! `Result<T, E>` return counts as the two results `T` and `E`, a tuple return as its
//! elements.

use crate::directive::DirectiveParser;
use crate::registry::{EndpointDescriptor, EndpointRegistry, TypeRegistry};
use crate::type_descriptor::TypeDescriptor;
use log::debug;
use std::path::Path;
use syn::{Attribute, FnArg, GenericArgument, PathArguments, ReturnType, Signature, Type};

/// Constructor-style functions never describe an endpoint.
pub const BOOTSTRAP_HANDLER: &str = "new";

const REQUEST_POSITION: usize = 1;
const RESPONSE_POSITION: usize = 0;

/// A function declaration reduced to what endpoint binding needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerDeclaration {
    pub name: String,
    pub doc: String,
    /// Typed parameters in order, receiver excluded
    pub params: Vec<TypeDescriptor>,
    pub results: Vec<TypeDescriptor>,
}

impl HandlerDeclaration {
    pub fn from_signature(sig: &Signature, attrs: &[Attribute]) -> Self {
        let params = sig
            .inputs
            .iter()
            .filter_map(|input| match input {
                FnArg::Typed(pat_type) => Some(TypeDescriptor::from_type(&pat_type.ty)),
                FnArg::Receiver(_) => None,
            })
            .collect();

        let results = match &sig.output {
            ReturnType::Default => Vec::new(),
            ReturnType::Type(_, ty) => result_types(ty)
                .into_iter()
                .map(TypeDescriptor::from_type)
                .collect(),
        };

        Self {
            name: sig.ident.to_string(),
            doc: DirectiveParser::doc_text(attrs),
            params,
            results,
        }
    }
}

/// Splits a return type into the result list.
fn result_types(ty: &Type) -> Vec<&Type> {
    match ty {
        Type::Tuple(tuple) => tuple.elems.iter().collect(),
        Type::Paren(paren) => result_types(&paren.elem),
        Type::Path(type_path) => {
            let result_args = type_path
                .path
                .segments
                .last()
                .filter(|segment| segment.ident == "Result")
                .and_then(|segment| match &segment.arguments {
                    PathArguments::AngleBracketed(args) => Some(args),
                    _ => None,
                });

            match result_args {
                Some(args) => args
                    .args
                    .iter()
                    .filter_map(|arg| match arg {
                        GenericArgument::Type(inner) => Some(inner),
                        _ => None,
                    })
                    .collect(),
                None => vec![ty],
            }
        }
        _ => vec![ty],
    }
}

pub struct EndpointBinder;

impl EndpointBinder {
    /// Builds the endpoint for a handler, or `None` for the bootstrap handler.
    ///
    /// Missing directives leave path and method empty. A handler with fewer than two
    /// parameters, no results, or types that do not name a registered record simply gets no
    /// request and/or response.
    pub fn bind(
        handler: &HandlerDeclaration,
        types: &TypeRegistry,
        source: &Path,
    ) -> Option<EndpointDescriptor> {
        if handler.name == BOOTSTRAP_HANDLER {
            debug!("Skipping bootstrap function {}", handler.name);
            return None;
        }

        let directives = DirectiveParser::parse(&handler.doc);

        let request = handler
            .params
            .get(REQUEST_POSITION)
            .and_then(|descriptor| types.resolve(descriptor))
            .cloned();
        let response = handler
            .results
            .get(RESPONSE_POSITION)
            .and_then(|descriptor| types.resolve(descriptor))
            .cloned();

        if request.is_none() {
            debug!("Handler {} has no request record", handler.name);
        }
        if response.is_none() {
            debug!("Handler {} has no response record", handler.name);
        }

        Some(EndpointDescriptor {
            handler_name: handler.name.clone(),
            http_method: directives.method,
            path: directives.path,
            description: directives.description,
            request,
            response,
            source: source.to_path_buf(),
        })
    }

    /// Binds a handler and registers the result. Returns whether an endpoint was registered.
    pub fn register(
        handler: &HandlerDeclaration,
        types: &TypeRegistry,
        endpoints: &mut EndpointRegistry,
        source: &Path,
    ) -> bool {
        match Self::bind(handler, types, source) {
            Some(endpoint) => {
                endpoints.register(endpoint);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{FieldDescriptor, RecordShape};
    use std::path::PathBuf;

    fn declaration(source: &str) -> HandlerDeclaration {
        let item: syn::ItemFn = syn::parse_str(source).unwrap();
        HandlerDeclaration::from_signature(&item.sig, &item.attrs)
    }

    fn record(name: &str) -> RecordShape {
        RecordShape {
            name: name.to_string(),
            fields: vec![FieldDescriptor {
                declared_name: "id".to_string(),
                wire_name: "id".to_string(),
                type_descriptor: TypeDescriptor::Named("i64".to_string()),
            }],
        }
    }

    fn user_types() -> TypeRegistry {
        let mut types = TypeRegistry::default();
        types.register(record("UserRequest"));
        types.register(record("UserResponse"));
        types
    }

    #[test]
    fn test_declaration_from_signature() {
        let handler = declaration(
            r#"
            /// @endpoint /users
            async fn get_user(ctx: Context, req: UserRequest) -> Result<UserResponse, ApiError> {
                todo!()
            }
            "#,
        );

        assert_eq!(handler.name, "get_user");
        assert_eq!(handler.doc, "@endpoint /users");
        let params: Vec<_> = handler.params.iter().map(ToString::to_string).collect();
        assert_eq!(params, vec!["Context", "UserRequest"]);
        let results: Vec<_> = handler.results.iter().map(ToString::to_string).collect();
        assert_eq!(results, vec!["UserResponse", "ApiError"]);
    }

    #[test]
    fn test_result_list_shapes() {
        assert!(declaration("fn a() {}").results.is_empty());
        assert!(declaration("fn a() -> () {}").results.is_empty());
        assert_eq!(declaration("fn a() -> (Out, Err) {}").results.len(), 2);
        assert_eq!(
            declaration("fn a() -> Vec<Out> {}").results[0].to_string(),
            "[]Out"
        );
        assert_eq!(
            declaration("fn a() -> anyhow::Result<Out> {}").results[0].to_string(),
            "Out"
        );
    }

    #[test]
    fn test_bind_full_handler() {
        let handler = declaration(
            r#"
            /// @endpoint /users
            /// @method GET
            async fn get_user(ctx: Context, req: UserRequest) -> Result<UserResponse, ApiError> {
                todo!()
            }
            "#,
        );

        let endpoint = EndpointBinder::bind(&handler, &user_types(), Path::new("api/users.rs"))
            .unwrap();

        assert_eq!(endpoint.path, "/users");
        assert_eq!(endpoint.http_method, "GET");
        assert_eq!(endpoint.request.unwrap().name, "UserRequest");
        assert_eq!(endpoint.response.unwrap().name, "UserResponse");
        assert_eq!(endpoint.source, PathBuf::from("api/users.rs"));
    }

    #[test]
    fn test_undocumented_handler_still_binds() {
        let handler =
            declaration("fn helper(ctx: Context, req: UserRequest) -> UserResponse { todo!() }");

        let endpoint = EndpointBinder::bind(&handler, &user_types(), Path::new("a.rs")).unwrap();

        assert!(endpoint.path.is_empty());
        assert!(endpoint.http_method.is_empty());
        assert!(endpoint.request.is_some());
        assert!(endpoint.response.is_some());
    }

    #[test]
    fn test_short_parameter_list_has_no_request() {
        let handler = declaration("fn ping(ctx: Context) -> UserResponse { todo!() }");

        let endpoint = EndpointBinder::bind(&handler, &user_types(), Path::new("a.rs")).unwrap();

        assert!(endpoint.request.is_none());
        assert!(endpoint.response.is_some());
    }

    #[test]
    fn test_no_results_has_no_response() {
        let handler = declaration("fn fire(ctx: Context, req: UserRequest) {}");

        let endpoint = EndpointBinder::bind(&handler, &user_types(), Path::new("a.rs")).unwrap();

        assert!(endpoint.request.is_some());
        assert!(endpoint.response.is_none());
    }

    #[test]
    fn test_no_parameters_and_no_results() {
        let handler = declaration("fn bare() {}");

        let endpoint = EndpointBinder::bind(&handler, &user_types(), Path::new("a.rs")).unwrap();

        assert!(endpoint.request.is_none());
        assert!(endpoint.response.is_none());
    }

    #[test]
    fn test_unregistered_types_are_absent() {
        let handler = declaration(
            "fn get(ctx: Context, req: &UserRequest) -> Json<UserResponse> { todo!() }",
        );

        let endpoint = EndpointBinder::bind(&handler, &user_types(), Path::new("a.rs")).unwrap();

        assert!(endpoint.request.is_none());
        assert!(endpoint.response.is_none());
    }

    #[test]
    fn test_receiver_is_not_a_parameter() {
        let method: syn::ImplItemFn = syn::parse_str(
            "pub async fn get(&self, ctx: Context, req: UserRequest) -> UserResponse { todo!() }",
        )
        .unwrap();
        let handler = HandlerDeclaration::from_signature(&method.sig, &method.attrs);

        assert_eq!(handler.params.len(), 2);
        let endpoint = EndpointBinder::bind(&handler, &user_types(), Path::new("a.rs")).unwrap();
        assert_eq!(endpoint.request.unwrap().name, "UserRequest");
    }

    #[test]
    fn test_bootstrap_handler_is_skipped() {
        let handler = declaration("fn new(db: Pool, cfg: UserRequest) -> UserResponse { todo!() }");
        let mut endpoints = EndpointRegistry::default();

        let registered =
            EndpointBinder::register(&handler, &user_types(), &mut endpoints, Path::new("a.rs"));

        assert!(!registered);
        assert!(endpoints.is_empty());
    }

    #[test]
    fn test_register_overwrites_by_handler_name() {
        let types = user_types();
        let mut endpoints = EndpointRegistry::default();
        let first = declaration("/// @endpoint /old\nfn get() {}");
        let second = declaration("/// @endpoint /new\nfn get() {}");

        EndpointBinder::register(&first, &types, &mut endpoints, Path::new("a.rs"));
        EndpointBinder::register(&second, &types, &mut endpoints, Path::new("b.rs"));

        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints.get("get").unwrap().path, "/new");
    }
}
