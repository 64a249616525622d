//! Runtime error types for the Slime interpreter.

use crate::config::ConfigError;
use slime_types::{CheckErrors, Direction, EntityId};
use thiserror::Error;

/// A fatal runtime error. Once a program hits one it never advances again.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// An object query applied to `null`.
    #[error("null object: {0}")]
    NullObject(String),
    /// An attribute read on an entity the world no longer has.
    #[error("unknown object: {0}")]
    UnknownObject(String),
    /// `searchobj` found nothing; the world is not bounded by solid terrain.
    #[error("no object found searching {0}")]
    NothingFound(Direction),
    /// Division by zero, sqrt of a negative, non-finite result.
    #[error("arithmetic trap: {0}")]
    ArithmeticTrap(String),
    /// A value of the wrong variant reached an operator, attribute or variable.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
    #[error("undefined variable: {0}")]
    UndefinedVariable(String),
    /// A `break` reached the program root without meeting a loop.
    #[error("break outside of any loop")]
    UncaughtBreak,
    /// `advance` was called before the program was attached to an entity.
    #[error("program is not attached to an entity")]
    Detached,
    #[error("program is already attached to {0}")]
    AlreadyAttached(EntityId),
}

/// Result alias for interpreter operations.
pub type EvalResult<T> = Result<T, EvalError>;

/// Why a program could not be built.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Check(#[from] CheckErrors),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
