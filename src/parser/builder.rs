// Thu Jan 22 2026 - Alex

use itertools::Itertools;
use std::collections::HashMap;
use tree_sitter::Node;

use crate::diag::Diagnostic;
use crate::model::{
    AggregateDecl, AggregateId, AggregateKind, CompilationModel, EnumDecl, EnumId, EnumItem,
    FieldDecl, FieldMember, FunctionDecl, PrimitiveKind, TypeNode, TypedefDecl,
};
use crate::parser::macros::DefineTable;

/// Syntax errors reported per file before the list is truncated.
const MAX_SYNTAX_ERRORS: usize = 20;

/// Accumulates declarations across input files and seals them into an
/// immutable `CompilationModel`. Name registries give aggregate and enum
/// references a stable arena id, which keeps self-referential
/// declarations acyclic.
pub(crate) struct ModelBuilder {
    pub(crate) model: CompilationModel,
    pub(crate) typedef_registry: HashMap<String, TypeNode>,
    pub(crate) aggregate_registry: HashMap<String, AggregateId>,
    pub(crate) enum_registry: HashMap<String, EnumId>,
    pub(crate) defines: DefineTable,
}

impl ModelBuilder {
    pub(crate) fn new(defines: DefineTable) -> Self {
        Self {
            model: CompilationModel::default(),
            typedef_registry: HashMap::new(),
            aggregate_registry: HashMap::new(),
            enum_registry: HashMap::new(),
            defines,
        }
    }

    pub(crate) fn finish(self) -> CompilationModel {
        self.model
    }

    pub(crate) fn text<'a>(node: &Node, source: &'a [u8]) -> &'a str {
        node.utf8_text(source).unwrap_or("")
    }

    pub(crate) fn location(node: &Node, file: &str) -> String {
        format!("{}:{}", file, node.start_position().row + 1)
    }

    /// Dispatches every named child of a scope node (translation unit,
    /// `extern "C"` body, preprocessor conditional body).
    pub(crate) fn walk_scope(&mut self, scope: Node, source: &[u8], file: &str) {
        let mut cursor = scope.walk();
        let children: Vec<Node> = scope.named_children(&mut cursor).collect();
        for child in children {
            self.handle_item(child, source, file);
        }
    }

    fn handle_item(&mut self, node: Node, source: &[u8], file: &str) {
        match node.kind() {
            "declaration" => self.handle_declaration(node, source, file),
            "function_definition" => self.handle_function_definition(node, source, file),
            "type_definition" => self.handle_type_definition(node, source, file),
            "struct_specifier" => {
                self.build_aggregate(AggregateKind::Struct, node, source, file);
            }
            "union_specifier" => {
                self.build_aggregate(AggregateKind::Union, node, source, file);
            }
            "class_specifier" => {
                self.build_aggregate(AggregateKind::Class, node, source, file);
            }
            "enum_specifier" => {
                self.build_enum(node, source, file);
            }
            "linkage_specification" => {
                if let Some(body) = node.child_by_field_name("body") {
                    if body.kind() == "declaration_list" {
                        self.walk_scope(body, source, file);
                    } else {
                        self.handle_item(body, source, file);
                    }
                }
            }
            "preproc_ifdef" | "preproc_if" | "preproc_else" | "preproc_elif"
            | "declaration_list" => {
                self.walk_scope(node, source, file);
            }
            "template_declaration" => {
                self.model.diagnostics.push(
                    Diagnostic::warning("template declaration skipped")
                        .at(Self::location(&node, file)),
                );
            }
            "namespace_definition" => {
                // Flatten: C-style exports do not carry namespaces.
                if let Some(body) = node.child_by_field_name("body") {
                    self.walk_scope(body, source, file);
                }
            }
            // Defines are collected textually; includes are the caller's
            // input-file list.
            "preproc_def" | "preproc_function_def" | "preproc_include" | "preproc_call"
            | "comment" | "expression_statement" | "using_declaration" | "alias_declaration"
            | "attribute_declaration" => {}
            "ERROR" => {}
            other => {
                log::debug!("skipping top-level node kind '{}' in {}", other, file);
            }
        }
    }

    fn handle_declaration(&mut self, node: Node, source: &[u8], file: &str) {
        let Some(type_node) = node.child_by_field_name("type") else {
            return;
        };
        let base = self.build_type_specifier(type_node, source, file);
        let base = Self::apply_qualifiers(node, source, base);

        let mut cursor = node.walk();
        let declarators: Vec<Node> = node.children_by_field_name("declarator", &mut cursor).collect();
        for declarator in declarators {
            let (name, ty) = self.unwind_declarator(declarator, base.clone(), source, file);
            let Some(name) = name else { continue };
            match ty {
                TypeNode::Function {
                    return_type,
                    parameters,
                } => {
                    self.model.functions.push(FunctionDecl {
                        name,
                        return_type: *return_type,
                        parameters,
                        source_file: Some(file.to_string()),
                    });
                }
                other => {
                    self.model.fields.push(FieldDecl {
                        name,
                        ty: other,
                        source_file: Some(file.to_string()),
                    });
                }
            }
        }
    }

    fn handle_function_definition(&mut self, node: Node, source: &[u8], file: &str) {
        let Some(type_node) = node.child_by_field_name("type") else {
            return;
        };
        let base = self.build_type_specifier(type_node, source, file);
        let base = Self::apply_qualifiers(node, source, base);
        let Some(declarator) = node.child_by_field_name("declarator") else {
            return;
        };
        let (name, ty) = self.unwind_declarator(declarator, base, source, file);
        if let (
            Some(name),
            TypeNode::Function {
                return_type,
                parameters,
            },
        ) = (name, ty)
        {
            self.model.functions.push(FunctionDecl {
                name,
                return_type: *return_type,
                parameters,
                source_file: Some(file.to_string()),
            });
        }
    }

    fn handle_type_definition(&mut self, node: Node, source: &[u8], file: &str) {
        let Some(type_node) = node.child_by_field_name("type") else {
            return;
        };
        let base = self.build_type_specifier(type_node, source, file);
        let base = Self::apply_qualifiers(node, source, base);

        let mut cursor = node.walk();
        let declarators: Vec<Node> = node.children_by_field_name("declarator", &mut cursor).collect();
        for declarator in declarators {
            let (name, ty) = self.unwind_declarator(declarator, base.clone(), source, file);
            let Some(name) = name else { continue };
            self.typedef_registry.insert(name.clone(), ty.clone());
            self.model.typedefs.push(TypedefDecl {
                name,
                element: ty,
                source_file: Some(file.to_string()),
            });
        }
    }

    /// Builds the base type for a declaration from its type-specifier
    /// node, registering inline aggregate and enum bodies as it goes.
    pub(crate) fn build_type_specifier(
        &mut self,
        node: Node,
        source: &[u8],
        file: &str,
    ) -> TypeNode {
        match node.kind() {
            "primitive_type" | "sized_type_specifier" => {
                let spelling = Self::text(&node, source).split_whitespace().join(" ");
                match map_primitive(&spelling) {
                    Some(kind) => TypeNode::Primitive(kind),
                    None => TypeNode::Unexposed(spelling),
                }
            }
            "type_identifier" => {
                let name = Self::text(&node, source).to_string();
                if let Some(element) = self.typedef_registry.get(&name) {
                    TypeNode::Typedef {
                        element: Box::new(element.clone()),
                        name,
                    }
                } else if let Some(&id) = self.aggregate_registry.get(&name) {
                    TypeNode::Aggregate {
                        kind: self.model.classes[id.0].kind,
                        name,
                        decl: id,
                    }
                } else if let Some(&id) = self.enum_registry.get(&name) {
                    TypeNode::Enum { name, decl: id }
                } else {
                    TypeNode::Unexposed(name)
                }
            }
            "struct_specifier" => self.build_aggregate(AggregateKind::Struct, node, source, file),
            "union_specifier" => self.build_aggregate(AggregateKind::Union, node, source, file),
            "class_specifier" => self.build_aggregate(AggregateKind::Class, node, source, file),
            "enum_specifier" => self.build_enum(node, source, file),
            _ => TypeNode::Unexposed(Self::text(&node, source).to_string()),
        }
    }

    /// Registers (or re-uses) an aggregate declaration and returns a
    /// reference node for it. A body, when present, defines the fields.
    pub(crate) fn build_aggregate(
        &mut self,
        kind: AggregateKind,
        node: Node,
        source: &[u8],
        file: &str,
    ) -> TypeNode {
        let name = node
            .child_by_field_name("name")
            .map(|n| Self::text(&n, source).to_string())
            .unwrap_or_default();

        let id = if name.is_empty() {
            self.push_aggregate(AggregateDecl::new(kind, ""))
        } else if let Some(&existing) = self.aggregate_registry.get(&name) {
            existing
        } else {
            let id = self.push_aggregate(AggregateDecl::new(kind, &name));
            self.aggregate_registry.insert(name.clone(), id);
            id
        };

        if let Some(body) = node.child_by_field_name("body") {
            self.define_aggregate_body(id, body, source, file);
        }

        TypeNode::Aggregate { kind, name, decl: id }
    }

    fn push_aggregate(&mut self, decl: AggregateDecl) -> AggregateId {
        let id = AggregateId(self.model.classes.len());
        self.model.classes.push(decl);
        id
    }

    fn define_aggregate_body(&mut self, id: AggregateId, body: Node, source: &[u8], file: &str) {
        if !self.model.classes[id.0].fields.is_empty() {
            let name = self.model.classes[id.0].name.clone();
            self.model.diagnostics.push(
                Diagnostic::warning(format!(
                    "{} is defined more than once, keeping the first definition",
                    name
                ))
                .at(Self::location(&body, file)),
            );
            return;
        }

        let mut fields = Vec::new();
        let mut unprocessed = 0usize;

        let mut cursor = body.walk();
        let children: Vec<Node> = body.named_children(&mut cursor).collect();
        for child in children {
            match child.kind() {
                "field_declaration" => {
                    let Some(type_node) = child.child_by_field_name("type") else {
                        unprocessed += 1;
                        continue;
                    };
                    let base = self.build_type_specifier(type_node, source, file);
                    let base = Self::apply_qualifiers(child, source, base);

                    let mut dcursor = child.walk();
                    let declarators: Vec<Node> =
                        child.children_by_field_name("declarator", &mut dcursor).collect();
                    if declarators.is_empty() {
                        // Anonymous nested member (e.g. an unnamed union).
                        unprocessed += 1;
                        continue;
                    }
                    for declarator in declarators {
                        let (name, ty) =
                            self.unwind_declarator(declarator, base.clone(), source, file);
                        match (name, ty) {
                            // A bare function type here is a method
                            // prototype, which the flat dialects cannot
                            // carry.
                            (_, TypeNode::Function { .. }) => unprocessed += 1,
                            (Some(name), ty) => fields.push(FieldMember { name, ty }),
                            (None, _) => unprocessed += 1,
                        }
                    }
                }
                "function_definition" | "declaration" | "template_declaration"
                | "friend_declaration" | "using_declaration" | "alias_declaration"
                | "base_class_clause" => unprocessed += 1,
                "struct_specifier" | "union_specifier" | "class_specifier" | "enum_specifier" => {
                    unprocessed += 1;
                }
                "access_specifier" | "comment" => {}
                other if other.starts_with("preproc") => {}
                _ => unprocessed += 1,
            }
        }

        let decl = &mut self.model.classes[id.0];
        decl.fields = fields;
        decl.unprocessed_members += unprocessed;
        decl.source_file = Some(file.to_string());
    }

    /// Registers (or re-uses) an enum declaration and returns a reference
    /// node for it.
    pub(crate) fn build_enum(&mut self, node: Node, source: &[u8], file: &str) -> TypeNode {
        let name = node
            .child_by_field_name("name")
            .map(|n| Self::text(&n, source).to_string())
            .unwrap_or_default();

        let id = if name.is_empty() {
            self.push_enum(EnumDecl::new(""))
        } else if let Some(&existing) = self.enum_registry.get(&name) {
            existing
        } else {
            let id = self.push_enum(EnumDecl::new(&name));
            self.enum_registry.insert(name.clone(), id);
            id
        };

        if let Some(body) = node.child_by_field_name("body") {
            self.define_enum_body(id, body, source, file);
        }

        TypeNode::Enum { name, decl: id }
    }

    fn push_enum(&mut self, decl: EnumDecl) -> EnumId {
        let id = EnumId(self.model.enums.len());
        self.model.enums.push(decl);
        id
    }

    fn define_enum_body(&mut self, id: EnumId, body: Node, source: &[u8], file: &str) {
        let mut items: Vec<EnumItem> = Vec::new();
        let mut local: HashMap<String, i64> = HashMap::new();
        let mut next = 0i64;

        let mut cursor = body.walk();
        let children: Vec<Node> = body.named_children(&mut cursor).collect();
        for child in children {
            if child.kind() != "enumerator" {
                continue;
            }
            let Some(name_node) = child.child_by_field_name("name") else {
                continue;
            };
            let name = Self::text(&name_node, source).to_string();
            let value = match child.child_by_field_name("value") {
                Some(value_node) => {
                    match self.eval_const_expr(value_node, source, &local) {
                        Some(value) => value,
                        None => {
                            self.model.diagnostics.push(
                                Diagnostic::warning(format!(
                                    "could not evaluate value of enumerator {}, using {}",
                                    name, next
                                ))
                                .at(Self::location(&child, file)),
                            );
                            next
                        }
                    }
                }
                None => next,
            };
            local.insert(name.clone(), value);
            items.push(EnumItem { name, value });
            next = value.wrapping_add(1);
        }

        let decl = &mut self.model.enums[id.0];
        if decl.items.is_empty() {
            decl.items = items;
            decl.source_file = Some(file.to_string());
        }
    }

    /// Wraps the base type in a `Qualified` node when the declaration
    /// carries const/volatile/restrict qualifiers.
    pub(crate) fn apply_qualifiers(node: Node, source: &[u8], base: TypeNode) -> TypeNode {
        let qualifiers = Self::collect_qualifiers(node, source);
        if qualifiers.is_empty() {
            base
        } else {
            TypeNode::qualified(base, qualifiers)
        }
    }

    pub(crate) fn collect_qualifiers(node: Node, source: &[u8]) -> crate::model::Qualifiers {
        use crate::model::Qualifiers;
        let mut qualifiers = Qualifiers::empty();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == "type_qualifier" {
                match Self::text(&child, source) {
                    "const" | "constexpr" => qualifiers |= Qualifiers::CONST,
                    "volatile" => qualifiers |= Qualifiers::VOLATILE,
                    "restrict" | "__restrict" | "__restrict__" => {
                        qualifiers |= Qualifiers::RESTRICT
                    }
                    _ => {}
                }
            }
        }
        qualifiers
    }

    /// Records ERROR and MISSING nodes as Error-severity diagnostics;
    /// these abort the run once the parse phase finishes surfacing.
    pub(crate) fn collect_syntax_errors(&mut self, root: Node, source: &[u8], file: &str) {
        if !root.has_error() {
            return;
        }
        let mut reported = 0usize;
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node.is_error() || node.is_missing() {
                reported += 1;
                if reported <= MAX_SYNTAX_ERRORS {
                    let message = if node.is_missing() {
                        format!("missing {}", node.kind())
                    } else {
                        let snippet: String =
                            Self::text(&node, source).chars().take(40).collect();
                        format!("syntax error near '{}'", snippet.replace('\n', " "))
                    };
                    self.model
                        .diagnostics
                        .push(Diagnostic::error(message).at(Self::location(&node, file)));
                }
                continue;
            }
            if !node.has_error() {
                continue;
            }
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                stack.push(child);
            }
        }
        if reported > MAX_SYNTAX_ERRORS {
            self.model.diagnostics.push(Diagnostic::error(format!(
                "{}: {} further syntax errors not shown",
                file,
                reported - MAX_SYNTAX_ERRORS
            )));
        }
    }
}

fn map_primitive(spelling: &str) -> Option<PrimitiveKind> {
    let kind = match spelling {
        "void" => PrimitiveKind::Void,
        "bool" | "_Bool" => PrimitiveKind::Bool,
        "char" | "signed char" => PrimitiveKind::Char,
        "unsigned char" => PrimitiveKind::UChar,
        "wchar_t" => PrimitiveKind::WChar,
        "short" | "short int" | "signed short" | "signed short int" => PrimitiveKind::Short,
        "unsigned short" | "unsigned short int" => PrimitiveKind::UShort,
        "int" | "signed" | "signed int" => PrimitiveKind::Int,
        "unsigned" | "unsigned int" => PrimitiveKind::UInt,
        "long" | "long int" | "signed long" | "signed long int" => PrimitiveKind::Long,
        "unsigned long" | "unsigned long int" => PrimitiveKind::ULong,
        "long long" | "long long int" | "signed long long" | "signed long long int"
        | "__int64" => PrimitiveKind::LongLong,
        "unsigned long long" | "unsigned long long int" | "unsigned __int64" => {
            PrimitiveKind::ULongLong
        }
        "__int128" => PrimitiveKind::Int128,
        "unsigned __int128" => PrimitiveKind::UInt128,
        "float" => PrimitiveKind::Float,
        "double" => PrimitiveKind::Double,
        "long double" => PrimitiveKind::LongDouble,
        _ => return None,
    };
    Some(kind)
}
