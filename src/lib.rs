//! Front end and runtime value model for the SN language: lexer, parser,
//! symbol table, type checker, and optimizer over an arena-backed AST
//! (spec §3-§4), plus the runtime's value types (arena, array, string,
//! byte codecs, SHA-1, UUID, date/time) and thin OS wrappers (spec
//! §4.6-§4.12, §5). Concrete code generation (AST -> C) is an external
//! collaborator; this crate only emits the fixed runtime symbol contract
//! such a generator's output depends on (spec §6).

pub mod arena;
pub mod ast;
pub mod codegen;
pub mod debug;
pub mod error;
pub mod lexer;
pub mod optimizer;
pub mod parser;
pub mod rt;
pub mod symbol;
pub mod token;
pub mod typeck;
pub mod types;

pub use arena::Arena;
pub use error::{Diagnostic, Error, RtError};
pub use lexer::Lexer;
pub use optimizer::Optimizer;
pub use parser::Parser;
pub use symbol::{ConcurrentSymbolTable, Symbol, SymbolTable};
pub use typeck::TypeChecker;
