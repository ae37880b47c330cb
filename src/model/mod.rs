// Wed Jan 21 2026 - Alex

pub mod compilation;
pub mod decls;
pub mod types;

pub use compilation::{AggregateId, CompilationModel, EnumId};
pub use decls::{
    AggregateDecl, EnumDecl, EnumItem, FieldDecl, FieldMember, FunctionDecl, TypedefDecl,
};
pub use types::{AggregateKind, Parameter, PrimitiveKind, Qualifiers, TypeNode};
