// Thu Jan 22 2026 - Alex

use std::collections::HashMap;
use tree_sitter::Node;

use crate::model::{Parameter, PrimitiveKind, TypeNode};
use crate::parser::builder::ModelBuilder;
use crate::parser::macros::parse_int_literal;

/// C declarator semantics: each declarator layer wraps the type inherited
/// from the outside and recursion continues toward the declared name.
/// `int *x[3]` therefore unwinds to an array of pointers, and
/// `int (*x)[3]` to a pointer to an array.
impl ModelBuilder {
    pub(crate) fn unwind_declarator(
        &mut self,
        node: Node,
        ty: TypeNode,
        source: &[u8],
        file: &str,
    ) -> (Option<String>, TypeNode) {
        match node.kind() {
            "identifier" | "field_identifier" | "type_identifier" => {
                (Some(Self::text(&node, source).to_string()), ty)
            }
            "pointer_declarator" | "abstract_pointer_declarator" => {
                let qualifiers = Self::collect_qualifiers(node, source);
                let mut pointed = TypeNode::pointer_to(ty);
                if !qualifiers.is_empty() {
                    pointed = TypeNode::qualified(pointed, qualifiers);
                }
                match node.child_by_field_name("declarator") {
                    Some(inner) => self.unwind_declarator(inner, pointed, source, file),
                    None => (None, pointed),
                }
            }
            "reference_declarator" | "abstract_reference_declarator" => {
                let referenced = TypeNode::Reference(Box::new(ty));
                match first_inner_declarator(node) {
                    Some(inner) => self.unwind_declarator(inner, referenced, source, file),
                    None => (None, referenced),
                }
            }
            "array_declarator" | "abstract_array_declarator" => {
                let size = node
                    .child_by_field_name("size")
                    .and_then(|s| self.eval_const_expr(s, source, &HashMap::new()))
                    .and_then(|v| usize::try_from(v).ok())
                    .unwrap_or(0);
                let array = TypeNode::array_of(ty, size);
                match node.child_by_field_name("declarator") {
                    Some(inner) => self.unwind_declarator(inner, array, source, file),
                    None => (None, array),
                }
            }
            "function_declarator" | "abstract_function_declarator" => {
                let parameters = node
                    .child_by_field_name("parameters")
                    .map(|p| self.build_parameters(p, source, file))
                    .unwrap_or_default();
                let function = TypeNode::Function {
                    return_type: Box::new(ty),
                    parameters,
                };
                match node.child_by_field_name("declarator") {
                    Some(inner) => self.unwind_declarator(inner, function, source, file),
                    None => (None, function),
                }
            }
            "parenthesized_declarator" => match first_inner_declarator(node) {
                Some(inner) => self.unwind_declarator(inner, ty, source, file),
                None => (None, ty),
            },
            "init_declarator" | "attributed_declarator" => {
                match node.child_by_field_name("declarator").or_else(|| first_inner_declarator(node))
                {
                    Some(inner) => self.unwind_declarator(inner, ty, source, file),
                    None => (None, ty),
                }
            }
            other => {
                log::debug!("unhandled declarator kind '{}' in {}", other, file);
                (None, ty)
            }
        }
    }

    pub(crate) fn build_parameters(
        &mut self,
        list: Node,
        source: &[u8],
        file: &str,
    ) -> Vec<Parameter> {
        let mut parameters = Vec::new();

        let mut cursor = list.walk();
        let children: Vec<Node> = list.named_children(&mut cursor).collect();
        for child in children {
            match child.kind() {
                "parameter_declaration" | "optional_parameter_declaration" => {
                    let Some(type_node) = child.child_by_field_name("type") else {
                        continue;
                    };
                    let base = self.build_type_specifier(type_node, source, file);
                    let base = Self::apply_qualifiers(child, source, base);
                    let (name, ty) = match child.child_by_field_name("declarator") {
                        Some(declarator) => {
                            self.unwind_declarator(declarator, base, source, file)
                        }
                        None => (None, base),
                    };
                    parameters.push(Parameter {
                        name: name.unwrap_or_default(),
                        ty,
                    });
                }
                // The ellipsis carries no type the dialects can render.
                "variadic_parameter" | "variadic_parameter_declaration" => {}
                "comment" => {}
                other => {
                    log::debug!("unhandled parameter kind '{}' in {}", other, file);
                }
            }
        }

        // `f(void)` declares zero parameters.
        if parameters.len() == 1
            && parameters[0].name.is_empty()
            && parameters[0].ty == TypeNode::Primitive(PrimitiveKind::Void)
        {
            parameters.clear();
        }

        parameters
    }

    /// Best-effort evaluation of constant expressions in enum values and
    /// array sizes. `local` carries earlier enumerators of the same enum.
    pub(crate) fn eval_const_expr(
        &self,
        node: Node,
        source: &[u8],
        local: &HashMap<String, i64>,
    ) -> Option<i64> {
        match node.kind() {
            "number_literal" => parse_int_literal(Self::text(&node, source)),
            "char_literal" => char_literal_value(Self::text(&node, source)),
            "identifier" => {
                let name = Self::text(&node, source);
                local.get(name).copied().or_else(|| self.defines.get(name))
            }
            "parenthesized_expression" => {
                let mut cursor = node.walk();
                let inner = node
                    .named_children(&mut cursor)
                    .find(|n| n.kind() != "comment")?;
                self.eval_const_expr(inner, source, local)
            }
            "unary_expression" => {
                let argument = node.child_by_field_name("argument")?;
                let value = self.eval_const_expr(argument, source, local)?;
                match node.child_by_field_name("operator").map(|o| o.kind()) {
                    Some("-") => Some(-value),
                    Some("+") => Some(value),
                    Some("~") => Some(!value),
                    Some("!") => Some((value == 0) as i64),
                    _ => None,
                }
            }
            "binary_expression" => {
                let left = self.eval_const_expr(node.child_by_field_name("left")?, source, local)?;
                let right =
                    self.eval_const_expr(node.child_by_field_name("right")?, source, local)?;
                match node.child_by_field_name("operator").map(|o| o.kind()) {
                    Some("+") => left.checked_add(right),
                    Some("-") => left.checked_sub(right),
                    Some("*") => left.checked_mul(right),
                    Some("/") => (right != 0).then(|| left / right),
                    Some("%") => (right != 0).then(|| left % right),
                    Some("|") => Some(left | right),
                    Some("&") => Some(left & right),
                    Some("^") => Some(left ^ right),
                    Some("<<") => u32::try_from(right).ok().and_then(|r| left.checked_shl(r)),
                    Some(">>") => u32::try_from(right).ok().and_then(|r| left.checked_shr(r)),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

fn first_inner_declarator(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .find(|n| !matches!(n.kind(), "comment" | "type_qualifier"));
    found
}

fn char_literal_value(text: &str) -> Option<i64> {
    let body = text.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut chars = body.chars();
    let value = match chars.next()? {
        '\\' => match chars.next()? {
            'n' => '\n' as i64,
            't' => '\t' as i64,
            'r' => '\r' as i64,
            '0' => 0,
            '\\' => '\\' as i64,
            '\'' => '\'' as i64,
            _ => return None,
        },
        c => c as i64,
    };
    chars.next().is_none().then_some(value)
}
