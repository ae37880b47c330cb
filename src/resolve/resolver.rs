// Wed Jan 21 2026 - Alex

use crate::model::{PrimitiveKind, TypeNode};
use crate::resolve::ResolveError;

/// Maps a primitive kind to its monitoring-dialect spelling.
pub fn primitive_name(kind: PrimitiveKind) -> Result<&'static str, ResolveError> {
    match kind {
        PrimitiveKind::Void => Ok("VOID"),
        PrimitiveKind::Bool => Ok("BOOL"),
        PrimitiveKind::WChar => Ok("wchar_t"),
        PrimitiveKind::Char => Ok("CHAR"),
        PrimitiveKind::UChar => Ok("UCHAR"),
        PrimitiveKind::Short => Ok("SHORT"),
        PrimitiveKind::UShort => Ok("USHORT"),
        PrimitiveKind::Int => Ok("INT"),
        PrimitiveKind::UInt => Ok("UINT"),
        PrimitiveKind::Long => Ok("LONG"),
        PrimitiveKind::ULong => Ok("ULONG"),
        PrimitiveKind::LongLong => Ok("LONGLONG"),
        PrimitiveKind::ULongLong => Ok("ULONGLONG"),
        PrimitiveKind::Float => Ok("float"),
        PrimitiveKind::Double => Ok("double"),
        PrimitiveKind::LongDouble => Ok("long double"),
        PrimitiveKind::Int128 | PrimitiveKind::UInt128 => {
            Err(ResolveError::UnsupportedPrimitive(kind))
        }
    }
}

/// Recursively converts a type-graph node into its flat textual name for
/// the monitoring dialects.
///
/// Pure and deterministic: no I/O, no state. Termination is guaranteed by
/// the model builder, which only produces acyclic typedef chains and
/// id-indirected aggregate references.
///
/// Rendering rules:
/// - pointers append `*` unless the pointee is a function type (the
///   parenthesized parameter list already implies a function pointer);
/// - arrays resolve to their element type, the `[size]` suffix is the
///   declaration expander's business;
/// - const/volatile qualifiers are dropped;
/// - typedefs resolve transitively, falling back to the typedef's own
///   name when the chain bottoms out in an anonymous aggregate;
/// - references, template parameters, and unexposed spellings abort the
///   enclosing declaration's rendering.
pub fn resolve(node: &TypeNode) -> Result<String, ResolveError> {
    match node {
        TypeNode::Primitive(kind) => primitive_name(*kind).map(str::to_string),
        TypeNode::Pointer(element) => {
            let mut result = resolve(element)?;
            if !element.is_function() {
                result.push('*');
            }
            Ok(result)
        }
        TypeNode::Array(element, _) => resolve(element),
        TypeNode::Qualified(element, _) => resolve(element),
        TypeNode::Function {
            return_type,
            parameters,
        } => {
            let mut result = format!("{} (", resolve(return_type)?);
            let mut remaining = parameters.len();
            for param in parameters {
                result.push_str(&resolve(&param.ty)?);
                result.push(' ');
                result.push_str(&param.name);
                if let Some(size) = param.ty.array_size() {
                    result.push_str(&format!("[{}]", size));
                }
                if remaining > 1 {
                    result.push(',');
                    remaining -= 1;
                }
            }
            result.push_str(");");
            Ok(result)
        }
        TypeNode::Typedef { name, element } => {
            let resolved = resolve(element)?;
            if resolved.is_empty() {
                Ok(name.clone())
            } else {
                Ok(resolved)
            }
        }
        TypeNode::Aggregate { name, .. } => Ok(name.clone()),
        TypeNode::Enum { name, .. } => Ok(name.clone()),
        TypeNode::Reference(_) => Err(ResolveError::UnsupportedTypeKind("reference")),
        TypeNode::TemplateParameter(_) => {
            Err(ResolveError::UnsupportedTypeKind("template parameter"))
        }
        TypeNode::Unexposed(_) => Err(ResolveError::UnsupportedTypeKind("unexposed")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AggregateId, AggregateKind, EnumId, Parameter};

    fn int() -> TypeNode {
        TypeNode::Primitive(PrimitiveKind::Int)
    }

    #[test]
    fn test_primitive_spellings() {
        assert_eq!(resolve(&TypeNode::Primitive(PrimitiveKind::Bool)).unwrap(), "BOOL");
        assert_eq!(
            resolve(&TypeNode::Primitive(PrimitiveKind::LongLong)).unwrap(),
            "LONGLONG"
        );
        assert_eq!(
            resolve(&TypeNode::Primitive(PrimitiveKind::WChar)).unwrap(),
            "wchar_t"
        );
        assert_eq!(
            resolve(&TypeNode::Primitive(PrimitiveKind::LongDouble)).unwrap(),
            "long double"
        );
    }

    #[test]
    fn test_unmapped_primitive_is_fatal() {
        let err = resolve(&TypeNode::Primitive(PrimitiveKind::Int128)).unwrap_err();
        assert_eq!(err, ResolveError::UnsupportedPrimitive(PrimitiveKind::Int128));
    }

    #[test]
    fn test_pointer_appends_star() {
        assert_eq!(resolve(&TypeNode::pointer_to(int())).unwrap(), "INT*");
        assert_eq!(
            resolve(&TypeNode::pointer_to(TypeNode::pointer_to(int()))).unwrap(),
            "INT**"
        );
    }

    #[test]
    fn test_pointer_to_function_has_no_star() {
        let func = TypeNode::Function {
            return_type: Box::new(int()),
            parameters: vec![Parameter::new("a", int()), Parameter::new("b", int())],
        };
        let resolved = resolve(&TypeNode::pointer_to(func)).unwrap();
        assert_eq!(resolved, "INT (INT a,INT b);");
        assert_eq!(resolved.matches('*').count(), 0);
    }

    #[test]
    fn test_array_drops_size() {
        let arr = TypeNode::array_of(TypeNode::Primitive(PrimitiveKind::Char), 32);
        assert_eq!(resolve(&arr).unwrap(), "CHAR");
    }

    #[test]
    fn test_qualifiers_are_dropped() {
        let qualified = TypeNode::qualified(
            TypeNode::pointer_to(TypeNode::Primitive(PrimitiveKind::WChar)),
            crate::model::Qualifiers::CONST,
        );
        assert_eq!(resolve(&qualified).unwrap(), "wchar_t*");
    }

    #[test]
    fn test_typedef_resolves_transitively() {
        let inner = TypeNode::Typedef {
            name: "DWORD".to_string(),
            element: Box::new(TypeNode::Primitive(PrimitiveKind::ULong)),
        };
        let outer = TypeNode::Typedef {
            name: "LPDWORD_BASE".to_string(),
            element: Box::new(inner),
        };
        assert_eq!(resolve(&outer).unwrap(), "ULONG");
    }

    #[test]
    fn test_typedef_of_anonymous_aggregate_falls_back_to_name() {
        let anon = TypeNode::Aggregate {
            kind: AggregateKind::Struct,
            name: String::new(),
            decl: AggregateId(0),
        };
        let typedef = TypeNode::Typedef {
            name: "HANDLE_DATA".to_string(),
            element: Box::new(anon),
        };
        assert_eq!(resolve(&typedef).unwrap(), "HANDLE_DATA");
    }

    #[test]
    fn test_aggregate_and_enum_resolve_to_bare_name() {
        let agg = TypeNode::Aggregate {
            kind: AggregateKind::Union,
            name: "LARGE_INTEGER".to_string(),
            decl: AggregateId(0),
        };
        assert_eq!(resolve(&agg).unwrap(), "LARGE_INTEGER");

        let en = TypeNode::Enum {
            name: "COLOR".to_string(),
            decl: EnumId(0),
        };
        assert_eq!(resolve(&en).unwrap(), "COLOR");
    }

    #[test]
    fn test_unsupported_kinds_abort() {
        assert!(resolve(&TypeNode::Reference(Box::new(int()))).is_err());
        assert!(resolve(&TypeNode::TemplateParameter("T".to_string())).is_err());
        assert!(resolve(&TypeNode::Unexposed("IUnknown".to_string())).is_err());
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let node = TypeNode::pointer_to(TypeNode::qualified(
            TypeNode::array_of(TypeNode::Primitive(PrimitiveKind::UShort), 8),
            crate::model::Qualifiers::CONST | crate::model::Qualifiers::VOLATILE,
        ));
        assert_eq!(resolve(&node).unwrap(), resolve(&node).unwrap());
    }
}
