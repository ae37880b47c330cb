// Wed Jan 21 2026 - Alex

use crate::diag::Diagnostics;
use crate::expand::ExpandError;
use crate::model::{
    AggregateDecl, CompilationModel, EnumDecl, FieldDecl, FunctionDecl, TypedefDecl, TypeNode,
};
use crate::resolve::resolve;

/// Renders a function prototype:
/// `<returnType> <name>(<p1Type> <p1Name>[<size>],<p2Type> <p2Name>)`.
///
/// The comma is appended after every parameter except the last, tracked
/// by decrementing a remaining-count. A parameter whose type is an array
/// at the top level gets its declared size appended after the name.
pub fn render_function(func: &FunctionDecl) -> Result<String, ExpandError> {
    let map = |e| ExpandError::unrenderable(&func.name, e);

    let mut out = format!("{} {}(", resolve(&func.return_type).map_err(map)?, func.name);
    let mut remaining = func.parameters.len();
    for param in &func.parameters {
        out.push_str(&resolve(&param.ty).map_err(map)?);
        out.push(' ');
        out.push_str(&param.name);
        if let Some(size) = param.ty.array_size() {
            out.push_str(&format!("[{}]", size));
        }
        if remaining > 1 {
            out.push(',');
            remaining -= 1;
        }
    }
    out.push(')');
    Ok(out)
}

/// Renders a struct/union/class body as a C-style brace block, or the
/// one-line self-referential alias form for field-less declarations
/// (the legacy convention for opaque handle types).
pub fn render_aggregate(
    aggregate: &AggregateDecl,
    diags: &mut Diagnostics,
) -> Result<String, ExpandError> {
    if aggregate.unprocessed_members > 0 {
        let file = aggregate.source_file.as_deref().unwrap_or("<unknown>");
        diags.warn(format!(
            "{} from {} has members that were not processed",
            aggregate.name, file
        ));
    }

    if aggregate.fields.is_empty() {
        return Ok(format!(
            "{} {} {}",
            aggregate.kind, aggregate.name, aggregate.name
        ));
    }

    let map = |e| ExpandError::unrenderable(&aggregate.name, e);

    let mut out = format!("{} {}{{\n", aggregate.kind, aggregate.name);
    for field in &aggregate.fields {
        out.push_str(&format!(
            "\t{} {};\n",
            resolve(&field.ty).map_err(map)?,
            field.name
        ));
    }
    out.push_str(&format!("}}{};", aggregate.name));
    Ok(out)
}

/// Renders an enum as a brace block of `<item>=<value>;` lines.
///
/// Assumes the caller already substituted a derived name for anonymous
/// enums where the output dialect needs one.
pub fn render_enum(decl: &EnumDecl) -> String {
    let mut out = format!("enum {}{{\n", decl.name);
    for item in &decl.items {
        out.push_str(&format!("\t{}={};\n", item.name, item.value));
    }
    out.push_str(&format!("}}{};", decl.name));
    out
}

/// Renders a typedef for the flat-text dialect.
///
/// Underlying aggregates and enums get their full body prefixed with
/// `typedef `. Pointer, primitive, and nested-typedef underlyings fall
/// back to resolving the full chain; a function-type rendering carries
/// its own `;` terminator, which is stripped before the alias name is
/// appended. Every other underlying kind is unsupported: nothing is
/// emitted and an advisory diagnostic is recorded.
pub fn render_typedef(
    typedef: &TypedefDecl,
    model: &CompilationModel,
    diags: &mut Diagnostics,
) -> Result<Option<String>, ExpandError> {
    match &typedef.element {
        TypeNode::Aggregate { decl, .. } => {
            let body = render_aggregate(model.aggregate(*decl), diags)?;
            Ok(Some(format!("typedef {}", body)))
        }
        TypeNode::Enum { decl, .. } => {
            Ok(Some(format!("typedef {}", render_enum(model.enumeration(*decl)))))
        }
        TypeNode::Pointer(_) | TypeNode::Primitive(_) | TypeNode::Typedef { .. } => {
            let resolved = resolve(&typedef.element)
                .map_err(|e| ExpandError::unrenderable(&typedef.name, e))?;
            let resolved = resolved.strip_suffix(';').unwrap_or(&resolved);
            Ok(Some(format!("typedef {} {};", resolved, typedef.name)))
        }
        other => {
            diags.warn(format!(
                "typedef {} ignored because the type is not implemented ({})",
                typedef.name,
                other.kind_name()
            ));
            Ok(None)
        }
    }
}

/// Renders a flat field declaration: `<type> <name>;`.
pub fn render_field(field: &FieldDecl) -> Result<String, ExpandError> {
    let resolved =
        resolve(&field.ty).map_err(|e| ExpandError::unrenderable(&field.name, e))?;
    Ok(format!("{} {};", resolved, field.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        AggregateId, AggregateKind, EnumId, EnumItem, FieldMember, Parameter, PrimitiveKind,
    };

    fn int() -> TypeNode {
        TypeNode::Primitive(PrimitiveKind::Int)
    }

    #[test]
    fn test_render_function_two_params() {
        let func = FunctionDecl::new("Add", int())
            .with_parameter(Parameter::new("x", int()))
            .with_parameter(Parameter::new("y", int()));
        assert_eq!(render_function(&func).unwrap(), "INT Add(INT x,INT y)");
    }

    #[test]
    fn test_render_function_no_params() {
        let func = FunctionDecl::new("GetTick", TypeNode::Primitive(PrimitiveKind::ULong));
        assert_eq!(render_function(&func).unwrap(), "ULONG GetTick()");
    }

    #[test]
    fn test_render_function_array_param_gets_size() {
        let buf = TypeNode::array_of(TypeNode::Primitive(PrimitiveKind::Char), 260);
        let func = FunctionDecl::new("GetModulePath", TypeNode::Primitive(PrimitiveKind::Bool))
            .with_parameter(Parameter::new("path", buf))
            .with_parameter(Parameter::new("flags", TypeNode::Primitive(PrimitiveKind::UInt)));
        assert_eq!(
            render_function(&func).unwrap(),
            "BOOL GetModulePath(CHAR path[260],UINT flags)"
        );
    }

    #[test]
    fn test_render_function_unexposed_param_is_unrenderable() {
        let func = FunctionDecl::new("Mystery", int())
            .with_parameter(Parameter::new("x", TypeNode::Unexposed("UNKNOWN_T".into())));
        assert!(render_function(&func).is_err());
    }

    #[test]
    fn test_render_aggregate_block() {
        let mut agg = AggregateDecl::new(AggregateKind::Struct, "POINT");
        agg.fields.push(FieldMember {
            name: "x".to_string(),
            ty: TypeNode::Primitive(PrimitiveKind::Long),
        });
        agg.fields.push(FieldMember {
            name: "y".to_string(),
            ty: TypeNode::Primitive(PrimitiveKind::Long),
        });
        let mut diags = Diagnostics::new();
        assert_eq!(
            render_aggregate(&agg, &mut diags).unwrap(),
            "struct POINT{\n\tLONG x;\n\tLONG y;\n}POINT;"
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn test_render_empty_aggregate_is_forward_alias() {
        let agg = AggregateDecl::new(AggregateKind::Struct, "HKL__");
        let mut diags = Diagnostics::new();
        assert_eq!(
            render_aggregate(&agg, &mut diags).unwrap(),
            "struct HKL__ HKL__"
        );
    }

    #[test]
    fn test_render_aggregate_warns_on_unprocessed_members() {
        let mut agg = AggregateDecl::new(AggregateKind::Struct, "Widget");
        agg.unprocessed_members = 2;
        agg.fields.push(FieldMember {
            name: "id".to_string(),
            ty: int(),
        });
        let mut diags = Diagnostics::new();
        let rendered = render_aggregate(&agg, &mut diags).unwrap();
        assert!(rendered.contains("INT id;"));
        assert_eq!(diags.warning_count(), 1);
        assert!(diags.iter().next().unwrap().message.contains("Widget"));
    }

    #[test]
    fn test_render_enum_block() {
        let mut decl = EnumDecl::new("RED");
        decl.items.push(EnumItem {
            name: "RED".to_string(),
            value: 0,
        });
        decl.items.push(EnumItem {
            name: "GREEN".to_string(),
            value: 1,
        });
        assert_eq!(
            render_enum(&decl),
            "enum RED{\n\tRED=0;\n\tGREEN=1;\n}RED;"
        );
    }

    #[test]
    fn test_render_typedef_of_aggregate_prefixes_body() {
        let mut model = CompilationModel::default();
        let mut agg = AggregateDecl::new(AggregateKind::Struct, "_GUID");
        agg.fields.push(FieldMember {
            name: "Data1".to_string(),
            ty: TypeNode::Primitive(PrimitiveKind::ULong),
        });
        model.classes.push(agg);

        let typedef = TypedefDecl {
            name: "GUID".to_string(),
            element: TypeNode::Aggregate {
                kind: AggregateKind::Struct,
                name: "_GUID".to_string(),
                decl: AggregateId(0),
            },
            source_file: None,
        };
        let mut diags = Diagnostics::new();
        let rendered = render_typedef(&typedef, &model, &mut diags).unwrap().unwrap();
        assert_eq!(rendered, "typedef struct _GUID{\n\tULONG Data1;\n}_GUID;");
    }

    #[test]
    fn test_render_typedef_of_pointer_resolves_chain() {
        let model = CompilationModel::default();
        let typedef = TypedefDecl {
            name: "LPDWORD".to_string(),
            element: TypeNode::pointer_to(TypeNode::Typedef {
                name: "DWORD".to_string(),
                element: Box::new(TypeNode::Primitive(PrimitiveKind::ULong)),
            }),
            source_file: None,
        };
        let mut diags = Diagnostics::new();
        let rendered = render_typedef(&typedef, &model, &mut diags).unwrap().unwrap();
        assert_eq!(rendered, "typedef ULONG* LPDWORD;");
    }

    #[test]
    fn test_render_typedef_of_function_pointer_strips_terminator() {
        let model = CompilationModel::default();
        let func = TypeNode::Function {
            return_type: Box::new(int()),
            parameters: vec![Parameter::new("a", int()), Parameter::new("b", int())],
        };
        let typedef = TypedefDecl {
            name: "BINOP".to_string(),
            element: TypeNode::pointer_to(func),
            source_file: None,
        };
        let mut diags = Diagnostics::new();
        let rendered = render_typedef(&typedef, &model, &mut diags).unwrap().unwrap();
        assert_eq!(rendered, "typedef INT (INT a,INT b) BINOP;");
    }

    #[test]
    fn test_render_typedef_of_unsupported_kind_is_skipped() {
        let model = CompilationModel::default();
        let typedef = TypedefDecl {
            name: "FIXED_BUF".to_string(),
            element: TypeNode::array_of(TypeNode::Primitive(PrimitiveKind::Char), 16),
            source_file: None,
        };
        let mut diags = Diagnostics::new();
        let rendered = render_typedef(&typedef, &model, &mut diags).unwrap();
        assert!(rendered.is_none());
        assert_eq!(diags.warning_count(), 1);
        assert!(diags
            .iter()
            .next()
            .unwrap()
            .message
            .contains("not implemented"));
    }

    #[test]
    fn test_render_field() {
        let field = FieldDecl {
            name: "g_version".to_string(),
            ty: TypeNode::Primitive(PrimitiveKind::UInt),
            source_file: None,
        };
        assert_eq!(render_field(&field).unwrap(), "UINT g_version;");
    }
}
