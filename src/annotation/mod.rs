//! Binding annotations: the front-end boundary, the on-disk declaration
//! index and the rules that turn annotation arguments into entries.

pub mod index;
pub mod interpreter;
pub mod literal;
pub mod resolver;

pub use index::{IndexResolver, INDEX_FILE_NAME};
pub use interpreter::{interpret, interpret_declaration, Interpretation, SkipReason};
pub use literal::decode_c_literal;
pub use resolver::{Annotation, DeclKind, DeclarationResolver, ResolveRequest, ResolvedDecl};
