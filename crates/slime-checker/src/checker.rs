//! Structural checks over a statement tree.
//!
//! Error codes emitted:
//! - E201: declared type does not match the initial value
//! - E500: variable declared twice
//! - E600: `break` outside any `while` or `foreach`
//! - E601: action statement inside a `foreach` body
//!
//! Warnings emitted:
//! - E602: `while true` whose body does no work

use std::collections::HashSet;

use slime_types::{
    CheckError, CheckErrors, ErrorCode, ExprKind, Span, Stmt, StmtKind, Value, VarDecl,
};

// ══════════════════════════════════════════════════════════════════════════════
// WellFormedChecker
// ══════════════════════════════════════════════════════════════════════════════

/// Walks a statement tree tracking how many loops enclose the current node.
pub struct WellFormedChecker<'a> {
    errors: &'a mut CheckErrors,
    /// Enclosing `while` and `foreach` loops.
    loop_depth: usize,
    /// Enclosing `foreach` loops only.
    foreach_depth: usize,
}

impl<'a> WellFormedChecker<'a> {
    pub fn new(errors: &'a mut CheckErrors) -> Self {
        Self {
            errors,
            loop_depth: 0,
            foreach_depth: 0,
        }
    }

    /// Check the declarations, then the statement tree.
    pub fn check(&mut self, main: &Stmt, variables: &[VarDecl]) {
        self.check_declarations(variables);
        self.check_stmt(main);
    }

    // ══════════════════════════════════════════════════════════════════════
    // Declarations
    // ══════════════════════════════════════════════════════════════════════

    fn check_declarations(&mut self, variables: &[VarDecl]) {
        let mut seen = HashSet::new();
        for decl in variables {
            if !seen.insert(decl.name.as_str()) {
                self.error(
                    ErrorCode::VARIABLE_ALREADY_DECLARED,
                    format!("variable '{}' is already declared", decl.name),
                    decl.span,
                );
            }
            if decl.initial.var_type() != decl.ty {
                self.error(
                    ErrorCode::TYPE_MISMATCH,
                    format!(
                        "variable '{}' declared as {} but initialised with {}",
                        decl.name,
                        decl.ty,
                        decl.initial.var_type()
                    ),
                    decl.span,
                );
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statements
    // ══════════════════════════════════════════════════════════════════════

    fn check_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Sequence(stmts) => {
                for s in stmts {
                    self.check_stmt(s);
                }
            }
            StmtKind::If {
                then_branch,
                else_branch,
                ..
            } => {
                self.check_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.check_stmt(else_branch);
                }
            }
            StmtKind::While { condition, body } => {
                let always = matches!(condition.kind, ExprKind::Constant(Value::Boolean(true)));
                if always && !does_work(body) {
                    self.errors.push_warning(
                        CheckError::warning(
                            ErrorCode::ENDLESS_EMPTY_LOOP,
                            "'while true' with an empty body re-checks its condition forever",
                            stmt.span,
                        )
                        .with_suggestion("add a 'wait' or a 'break' to the loop body"),
                    );
                }
                self.loop_depth += 1;
                self.check_stmt(body);
                self.loop_depth -= 1;
            }
            StmtKind::ForEach(for_each) => {
                self.loop_depth += 1;
                self.foreach_depth += 1;
                self.check_stmt(&for_each.body);
                self.foreach_depth -= 1;
                self.loop_depth -= 1;
            }
            StmtKind::Break => {
                if self.loop_depth == 0 {
                    self.errors.push_error(
                        CheckError::new(
                            ErrorCode::BREAK_OUTSIDE_LOOP,
                            "'break' is only allowed inside 'while' or 'foreach'",
                            stmt.span,
                        )
                        .with_suggestion("remove the 'break' or wrap it in a loop"),
                    );
                }
            }
            StmtKind::Action(action) => {
                if self.foreach_depth > 0 {
                    self.errors.push_error(
                        CheckError::new(
                            ErrorCode::ACTION_IN_FOREACH,
                            format!(
                                "action '{}' is not allowed inside a 'foreach' body",
                                action.command.as_str()
                            ),
                            stmt.span,
                        )
                        .with_suggestion(
                            "record the object in a variable and act on it after the loop",
                        ),
                    );
                }
            }
            StmtKind::Assign { .. } | StmtKind::Wait(_) | StmtKind::Print(_) => {}
        }
    }

    fn error(&mut self, code: ErrorCode, message: String, span: Span) {
        self.errors.push_error(CheckError::new(code, message, span));
    }
}

/// Whether running `stmt` takes at least one unit of work.
fn does_work(stmt: &Stmt) -> bool {
    match &stmt.kind {
        StmtKind::Sequence(stmts) => stmts.iter().any(does_work),
        _ => true,
    }
}
