//! Slime well-formedness checker.
//!
//! ```text
//! parser → ProgramFactory → check_program → Program
//! ```
//!
//! The only static analysis the language performs. A program that fails
//! here is never handed to the interpreter.

mod checker;

pub use checker::WellFormedChecker;

use slime_types::{CheckErrors, Stmt, VarDecl};

/// Check a program's declarations and statement tree, collecting every error.
pub fn check_program(main: &Stmt, variables: &[VarDecl]) -> CheckErrors {
    let mut errors = CheckErrors::empty();
    WellFormedChecker::new(&mut errors).check(main, variables);
    if errors.has_errors() {
        log::debug!("program rejected with {} error(s)", errors.total_errors);
    }
    errors
}

/// Shorthand for `!check_program(..).has_errors()`.
pub fn is_well_formed(main: &Stmt, variables: &[VarDecl]) -> bool {
    !check_program(main, variables).has_errors()
}
