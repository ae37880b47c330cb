// Wed Jan 21 2026 - Alex

use bitflags::bitflags;
use std::fmt;

use crate::model::{AggregateId, EnumId};

/// Primitive kinds surfaced by the header parser. The resolver owns the
/// mapping to WinApiOverride spellings; `Int128`/`UInt128` have no such
/// spelling and fail resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Void,
    Bool,
    Char,
    UChar,
    WChar,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    LongLong,
    ULongLong,
    Int128,
    UInt128,
    Float,
    Double,
    LongDouble,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Qualifiers: u8 {
        const CONST = 1 << 0;
        const VOLATILE = 1 << 1;
        const RESTRICT = 1 << 2;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateKind {
    Struct,
    Union,
    Class,
}

impl AggregateKind {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Struct => "struct",
            Self::Union => "union",
            Self::Class => "class",
        }
    }
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A node in the parsed type graph. Aggregate and enum references carry an
/// arena id into the owning `CompilationModel` rather than an owned
/// subtree, so self-referential declarations stay acyclic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeNode {
    Primitive(PrimitiveKind),
    Pointer(Box<TypeNode>),
    Reference(Box<TypeNode>),
    /// Element type and declared element count; 0 when the size was
    /// unspecified or not a resolvable constant.
    Array(Box<TypeNode>, usize),
    Qualified(Box<TypeNode>, Qualifiers),
    Function {
        return_type: Box<TypeNode>,
        parameters: Vec<Parameter>,
    },
    Typedef {
        name: String,
        element: Box<TypeNode>,
    },
    Aggregate {
        kind: AggregateKind,
        name: String,
        decl: AggregateId,
    },
    Enum {
        name: String,
        decl: EnumId,
    },
    TemplateParameter(String),
    /// A spelling the parser could not resolve to any declared type.
    Unexposed(String),
}

impl TypeNode {
    pub fn pointer_to(element: TypeNode) -> Self {
        Self::Pointer(Box::new(element))
    }

    pub fn array_of(element: TypeNode, size: usize) -> Self {
        Self::Array(Box::new(element), size)
    }

    pub fn qualified(element: TypeNode, qualifiers: Qualifiers) -> Self {
        Self::Qualified(Box::new(element), qualifiers)
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Self::Function { .. })
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_, _))
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Self::Pointer(_))
    }

    /// Top-level array size, if this node is an array.
    pub fn array_size(&self) -> Option<usize> {
        match self {
            Self::Array(_, size) => Some(*size),
            _ => None,
        }
    }

    /// Short kind label for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Primitive(_) => "primitive",
            Self::Pointer(_) => "pointer",
            Self::Reference(_) => "reference",
            Self::Array(_, _) => "array",
            Self::Qualified(_, _) => "qualified",
            Self::Function { .. } => "function",
            Self::Typedef { .. } => "typedef",
            Self::Aggregate { .. } => "aggregate",
            Self::Enum { .. } => "enum",
            Self::TemplateParameter(_) => "template parameter",
            Self::Unexposed(_) => "unexposed",
        }
    }
}

/// A single function parameter. `name` is empty for unnamed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeNode,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: TypeNode) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    pub fn unnamed(ty: TypeNode) -> Self {
        Self {
            name: String::new(),
            ty,
        }
    }
}
