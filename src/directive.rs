//! Handler documentation directives.
//!
//! A handler is annotated through its doc comment:
//!
//! ```text
//! /// Lists users visible to the caller.
//! /// @endpoint /users
//! /// @method GET
//! pub async fn list_users(ctx: Context, req: ListUsersRequest) -> Result<ListUsersResponse> {
//!     ..
//! }
//! ```

use syn::{Attribute, Expr, Lit, Meta};

const ENDPOINT_DIRECTIVE: &str = "@endpoint";
const METHOD_DIRECTIVE: &str = "@method";

/// Values recovered from one handler's documentation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    /// Value of the last `@endpoint` line, empty when there is none
    pub path: String,
    /// Value of the last `@method` line, verbatim, empty when there is none
    pub method: String,
    /// Remaining prose lines joined with single spaces
    pub description: String,
}

pub struct DirectiveParser;

impl DirectiveParser {
    /// Parses the documentation text of a handler.
    ///
    /// Directives are matched case-sensitively at the start of a line; the value is the rest
    /// of the line, trimmed. A repeated directive overwrites the earlier one.
    pub fn parse(doc: &str) -> Directives {
        let mut directives = Directives::default();
        let mut prose: Vec<&str> = Vec::new();

        for line in doc.lines() {
            if let Some(value) = line.strip_prefix(ENDPOINT_DIRECTIVE) {
                directives.path = value.trim().to_string();
            } else if let Some(value) = line.strip_prefix(METHOD_DIRECTIVE) {
                directives.method = value.trim().to_string();
            } else {
                let text = line.trim();
                if !text.is_empty() && !text.starts_with('@') {
                    prose.push(text);
                }
            }
        }

        directives.description = prose.join(" ");
        directives
    }

    /// Collects the text of `#[doc = "..."]` attributes, one comment line per output line.
    ///
    /// The single space that follows `///` is dropped so directives start at column zero.
    pub fn doc_text(attrs: &[Attribute]) -> String {
        let mut lines = Vec::new();

        for attr in attrs {
            if !attr.path().is_ident("doc") {
                continue;
            }
            let Meta::NameValue(name_value) = &attr.meta else {
                continue;
            };
            if let Expr::Lit(expr_lit) = &name_value.value {
                if let Lit::Str(lit_str) = &expr_lit.lit {
                    for line in lit_str.value().lines() {
                        lines.push(line.strip_prefix(' ').unwrap_or(line).to_string());
                    }
                }
            }
        }

        lines.join("\n")
    }
}
