//! Shared types for Slime.
//!
//! This crate defines the value system, the AST node types, source spans,
//! construction-time error types and the [`ProgramFactory`] construction
//! trait used across the checker and the interpreter.

mod error;
mod kind;
mod span;
mod value;
pub mod ast;
pub mod factory;

pub use ast::{
    Action, Attribute, BinOp, Command, Expr, ExprKind, ForEach, Predicate, SortOrder, Stmt,
    StmtKind, UnaryOp, VarDecl,
};
pub use error::{CheckError, CheckErrors, ErrorCategory, ErrorCode, Severity, MAX_ERRORS};
pub use factory::ProgramFactory;
pub use kind::{EntityKind, ObjectKind};
pub use span::Span;
pub use value::{Direction, EntityId, ObjectRef, Value, VarType};
