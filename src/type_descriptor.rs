use quote::ToTokens;
use std::fmt;
use syn::{GenericArgument, PathArguments, Type};

/// Normalized form of a field, parameter or result type.
///
/// The canonical string form (see the `Display` impl) is what registries are keyed by:
/// optional/pointer-like wrappers render as a leading `*`, sequences as a leading `[]`,
/// multi-segment paths as `Namespace.Name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    /// A bare identifier (`String`, `i64`, `UserRequest`)
    Named(String),
    /// A multi-segment path without generic arguments (`models::User`)
    Qualified(Vec<String>),
    /// `Option<T>`, `Box<T>`, `&T`, `*const T`
    Optional(Box<TypeDescriptor>),
    /// `Vec<T>`, `[T]`, `[T; N]`
    Array(Box<TypeDescriptor>),
    /// Any other type shape, kept as its token text
    Unrecognized(String),
}

impl TypeDescriptor {
    /// Builds a descriptor from a parsed type expression.
    pub fn from_type(ty: &Type) -> Self {
        match ty {
            Type::Path(type_path) if type_path.qself.is_none() => {
                Self::from_path(&type_path.path).unwrap_or_else(|| Self::unrecognized(ty))
            }
            Type::Reference(reference) => Self::optional(Self::from_type(&reference.elem)),
            Type::Ptr(pointer) => Self::optional(Self::from_type(&pointer.elem)),
            Type::Slice(slice) => Self::array(Self::from_type(&slice.elem)),
            Type::Array(array) => Self::array(Self::from_type(&array.elem)),
            Type::Paren(paren) => Self::from_type(&paren.elem),
            Type::Group(group) => Self::from_type(&group.elem),
            _ => Self::unrecognized(ty),
        }
    }

    fn from_path(path: &syn::Path) -> Option<Self> {
        let last = path.segments.last()?;

        if let Some(inner) = single_type_argument(&last.arguments) {
            return match last.ident.to_string().as_str() {
                "Option" | "Box" => Some(Self::optional(Self::from_type(inner))),
                "Vec" => Some(Self::array(Self::from_type(inner))),
                _ => None,
            };
        }

        if path
            .segments
            .iter()
            .any(|segment| !matches!(segment.arguments, PathArguments::None))
        {
            return None;
        }

        let mut names: Vec<String> = path
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();

        if names.len() == 1 {
            names.pop().map(Self::Named)
        } else {
            Some(Self::Qualified(names))
        }
    }

    fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    fn array(inner: Self) -> Self {
        Self::Array(Box::new(inner))
    }

    fn unrecognized(ty: &Type) -> Self {
        Self::Unrecognized(ty.to_token_stream().to_string())
    }

    /// Strips every leading sequence layer, returning the element descriptor.
    ///
    /// Returns `None` when the descriptor is not a sequence at all.
    pub fn array_element(&self) -> Option<&TypeDescriptor> {
        let Self::Array(first) = self else {
            return None;
        };
        let mut inner: &TypeDescriptor = first;
        while let Self::Array(next) = inner {
            inner = next.as_ref();
        }
        Some(inner)
    }

    /// Whether the innermost base type could not be recognized.
    pub fn is_unrecognized(&self) -> bool {
        match self {
            Self::Optional(inner) | Self::Array(inner) => inner.is_unrecognized(),
            Self::Unrecognized(_) => true,
            Self::Named(_) | Self::Qualified(_) => false,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Qualified(segments) => f.write_str(&segments.join(".")),
            Self::Optional(inner) => write!(f, "*{}", inner),
            Self::Array(inner) => write!(f, "[]{}", inner),
            Self::Unrecognized(text) => f.write_str(text),
        }
    }
}

/// Returns the only type argument of `Wrapper<T>`, if that is the shape.
fn single_type_argument(arguments: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(args) = arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    match args.args.first()? {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    }
}
