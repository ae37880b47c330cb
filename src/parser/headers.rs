// Thu Jan 22 2026 - Alex

use memmap2::MmapOptions;
use std::fs::File;
use std::path::Path;

use crate::model::CompilationModel;
use crate::parser::builder::ModelBuilder;
use crate::parser::macros::DefineTable;
use crate::parser::{ParseError, ParserOptions};

/// The header-parser collaborator: turns C/C++ header files into a
/// `CompilationModel`. Parsing is syntactic (tree-sitter C++ grammar,
/// which covers C headers); semantic resolution is limited to the name
/// registries built in declaration order, which is sufficient for
/// well-formed headers where types are declared before use.
pub struct HeaderParser {
    options: ParserOptions,
    parser: tree_sitter::Parser,
    builder: ModelBuilder,
}

impl HeaderParser {
    pub fn new(options: ParserOptions) -> Result<Self, ParseError> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_cpp::LANGUAGE.into())
            .map_err(|e| ParseError::Grammar(e.to_string()))?;

        let mut defines = DefineTable::new();
        for spec in &options.defines {
            defines.insert_cli(spec);
        }

        Ok(Self {
            options,
            parser,
            builder: ModelBuilder::new(defines),
        })
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parses one header file into the accumulating model.
    pub fn parse_file(&mut self, path: &Path) -> Result<(), ParseError> {
        let io_err = |source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(io_err)?;
        let len = file.metadata().map_err(io_err)?.len();
        if len == 0 {
            return Ok(());
        }

        // SAFETY: the file handle outlives the mapping within this scope.
        let mmap = unsafe { MmapOptions::new().map(&file) }.map_err(io_err)?;
        self.parse_bytes(&mmap, &path.display().to_string())
    }

    /// Parses an in-memory source buffer. `file_name` is used for
    /// diagnostics and declaration provenance only.
    pub fn parse_bytes(&mut self, source: &[u8], file_name: &str) -> Result<(), ParseError> {
        if source.is_empty() {
            return Ok(());
        }
        if self.options.parse_macros {
            self.builder.defines.collect(source);
        }

        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| ParseError::NoTree(file_name.to_string()))?;

        let root = tree.root_node();
        self.builder.collect_syntax_errors(root, source, file_name);
        self.builder.walk_scope(root, source, file_name);
        log::debug!(
            "parsed {}: {} declarations so far",
            file_name,
            self.builder.model.declaration_count()
        );
        Ok(())
    }

    /// Seals the accumulated declarations into an immutable model.
    pub fn finish(self) -> CompilationModel {
        self.builder.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AggregateKind, PrimitiveKind, TypeNode};

    fn parse(source: &[u8]) -> CompilationModel {
        let mut parser = HeaderParser::new(ParserOptions::default()).unwrap();
        parser.parse_bytes(source, "test.h").unwrap();
        parser.finish()
    }

    #[test]
    fn test_function_prototype() {
        let model = parse(b"int Add(int x, int y);\n");
        assert_eq!(model.functions.len(), 1);
        let func = &model.functions[0];
        assert_eq!(func.name, "Add");
        assert_eq!(func.return_type, TypeNode::Primitive(PrimitiveKind::Int));
        assert_eq!(func.parameters.len(), 2);
        assert_eq!(func.parameters[0].name, "x");
        assert_eq!(func.parameters[1].name, "y");
    }

    #[test]
    fn test_pointer_and_unsigned_types() {
        let model = parse(b"unsigned long Hash(const char *data, unsigned int len);\n");
        let func = &model.functions[0];
        assert_eq!(func.return_type, TypeNode::Primitive(PrimitiveKind::ULong));
        match &func.parameters[0].ty {
            TypeNode::Pointer(inner) => match inner.as_ref() {
                TypeNode::Qualified(base, quals) => {
                    assert_eq!(**base, TypeNode::Primitive(PrimitiveKind::Char));
                    assert!(quals.contains(crate::model::Qualifiers::CONST));
                }
                other => panic!("expected qualified pointee, got {:?}", other),
            },
            other => panic!("expected pointer, got {:?}", other),
        }
    }

    #[test]
    fn test_void_parameter_list_is_empty() {
        let model = parse(b"void Reset(void);\n");
        assert_eq!(model.functions[0].parameters.len(), 0);
    }

    #[test]
    fn test_array_parameter_size() {
        let model = parse(b"void Fill(char buffer[260], int value);\n");
        let param = &model.functions[0].parameters[0];
        assert_eq!(param.ty.array_size(), Some(260));
    }

    #[test]
    fn test_array_size_from_define() {
        let model = parse(b"#define MAX_PATH 260\nvoid Fill(char buffer[MAX_PATH]);\n");
        let param = &model.functions[0].parameters[0];
        assert_eq!(param.ty.array_size(), Some(260));
    }

    #[test]
    fn test_struct_with_fields() {
        let model = parse(b"struct Point { long x; long y; };\n");
        assert_eq!(model.classes.len(), 1);
        let decl = &model.classes[0];
        assert_eq!(decl.name, "Point");
        assert_eq!(decl.kind, AggregateKind::Struct);
        assert_eq!(decl.fields.len(), 2);
        assert_eq!(decl.fields[0].name, "x");
    }

    #[test]
    fn test_self_referential_struct() {
        let model = parse(b"struct Node { int value; struct Node *next; };\n");
        let decl = &model.classes[0];
        assert_eq!(decl.fields.len(), 2);
        match &decl.fields[1].ty {
            TypeNode::Pointer(inner) => match inner.as_ref() {
                TypeNode::Aggregate { name, .. } => assert_eq!(name, "Node"),
                other => panic!("expected aggregate reference, got {:?}", other),
            },
            other => panic!("expected pointer, got {:?}", other),
        }
    }

    #[test]
    fn test_enum_values_and_auto_increment() {
        let model = parse(b"enum Color { RED, GREEN = 5, BLUE, MASK = 0x10 };\n");
        let decl = &model.enums[0];
        let values: Vec<(&str, i64)> = decl
            .items
            .iter()
            .map(|i| (i.name.as_str(), i.value))
            .collect();
        assert_eq!(
            values,
            vec![("RED", 0), ("GREEN", 5), ("BLUE", 6), ("MASK", 16)]
        );
    }

    #[test]
    fn test_enum_value_referencing_earlier_item() {
        let model = parse(b"enum Flags { A = 1, B = A + 2 };\n");
        assert_eq!(model.enums[0].items[1].value, 3);
    }

    #[test]
    fn test_typedef_of_primitive() {
        let model = parse(b"typedef unsigned long DWORD;\nDWORD GetVersion(void);\n");
        assert_eq!(model.typedefs.len(), 1);
        assert_eq!(model.typedefs[0].name, "DWORD");
        match &model.functions[0].return_type {
            TypeNode::Typedef { name, element } => {
                assert_eq!(name, "DWORD");
                assert_eq!(**element, TypeNode::Primitive(PrimitiveKind::ULong));
            }
            other => panic!("expected typedef reference, got {:?}", other),
        }
    }

    #[test]
    fn test_typedef_of_anonymous_struct() {
        let model = parse(b"typedef struct { unsigned long Data1; } GUID;\n");
        assert_eq!(model.typedefs.len(), 1);
        let typedef = &model.typedefs[0];
        assert_eq!(typedef.name, "GUID");
        match &typedef.element {
            TypeNode::Aggregate { name, decl, .. } => {
                assert!(name.is_empty());
                assert_eq!(model.aggregate(*decl).fields.len(), 1);
            }
            other => panic!("expected aggregate, got {:?}", other),
        }
    }

    #[test]
    fn test_typedef_of_function_pointer() {
        let model = parse(b"typedef int (*BinOp)(int a, int b);\n");
        let typedef = &model.typedefs[0];
        assert_eq!(typedef.name, "BinOp");
        match &typedef.element {
            TypeNode::Pointer(inner) => match inner.as_ref() {
                TypeNode::Function { parameters, .. } => assert_eq!(parameters.len(), 2),
                other => panic!("expected function pointee, got {:?}", other),
            },
            other => panic!("expected pointer, got {:?}", other),
        }
    }

    #[test]
    fn test_extern_c_block() {
        let model = parse(b"extern \"C\" {\nint Exported(void);\n}\n");
        assert_eq!(model.functions.len(), 1);
        assert_eq!(model.functions[0].name, "Exported");
    }

    #[test]
    fn test_flat_field_declaration() {
        let model = parse(b"extern unsigned int g_version;\n");
        assert_eq!(model.fields.len(), 1);
        assert_eq!(model.fields[0].name, "g_version");
    }

    #[test]
    fn test_unknown_type_is_unexposed() {
        let model = parse(b"MYSTERY_T Frob(void);\n");
        assert_eq!(
            model.functions[0].return_type,
            TypeNode::Unexposed("MYSTERY_T".to_string())
        );
    }

    #[test]
    fn test_methods_count_as_unprocessed_members() {
        let model = parse(b"struct Widget { int id; int area(); };\n");
        let decl = &model.classes[0];
        assert_eq!(decl.fields.len(), 1);
        assert!(decl.unprocessed_members > 0);
    }

    #[test]
    fn test_syntax_error_is_fatal_diagnostic() {
        let model = parse(b"int broken(\n");
        assert!(model.has_errors());
    }

    #[test]
    fn test_forward_declared_struct_reference() {
        let model = parse(b"struct Ctx;\nvoid Use(struct Ctx *ctx);\n");
        assert_eq!(model.classes.len(), 1);
        assert!(model.classes[0].fields.is_empty());
        assert_eq!(model.functions.len(), 1);
    }

    #[test]
    fn test_source_file_is_recorded() {
        let model = parse(b"int Probe(void);\n");
        assert_eq!(model.functions[0].source_file.as_deref(), Some("test.h"));
    }
}
