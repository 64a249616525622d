//! The construction API a parser drives to build programs.
//!
//! A parser walks source text and calls one factory method per construct it
//! recognises, bottom-up. The factory decides what the resulting nodes are;
//! the parser never sees their representation. Every method receives the
//! source location of the construct.

use crate::{Direction, ObjectKind, SortOrder, Span, VarDecl};

/// Builds expressions, statements and finally a program.
pub trait ProgramFactory {
    type Expr;
    type Stmt;
    type Program;
    type Error;

    // ── Constants & names ─────────────────────────────────────────────────

    fn create_number(&self, value: f64, span: Span) -> Self::Expr;
    fn create_true(&self, span: Span) -> Self::Expr;
    fn create_false(&self, span: Span) -> Self::Expr;
    fn create_null(&self, span: Span) -> Self::Expr;
    fn create_direction(&self, direction: Direction, span: Span) -> Self::Expr;
    fn create_self(&self, span: Span) -> Self::Expr;
    fn create_variable(&self, name: &str, span: Span) -> Self::Expr;

    // ── Arithmetic ────────────────────────────────────────────────────────

    fn create_addition(&self, left: Self::Expr, right: Self::Expr, span: Span) -> Self::Expr;
    fn create_subtraction(&self, left: Self::Expr, right: Self::Expr, span: Span) -> Self::Expr;
    fn create_multiplication(&self, left: Self::Expr, right: Self::Expr, span: Span)
        -> Self::Expr;
    fn create_division(&self, left: Self::Expr, right: Self::Expr, span: Span) -> Self::Expr;
    fn create_negation(&self, operand: Self::Expr, span: Span) -> Self::Expr;
    fn create_sqrt(&self, operand: Self::Expr, span: Span) -> Self::Expr;
    fn create_random(&self, max: Self::Expr, span: Span) -> Self::Expr;

    // ── Logic ─────────────────────────────────────────────────────────────

    fn create_and(&self, left: Self::Expr, right: Self::Expr, span: Span) -> Self::Expr;
    fn create_or(&self, left: Self::Expr, right: Self::Expr, span: Span) -> Self::Expr;
    fn create_not(&self, operand: Self::Expr, span: Span) -> Self::Expr;

    // ── Comparison ────────────────────────────────────────────────────────

    fn create_less_than(&self, left: Self::Expr, right: Self::Expr, span: Span) -> Self::Expr;
    fn create_less_than_or_equal(&self, left: Self::Expr, right: Self::Expr, span: Span)
        -> Self::Expr;
    fn create_greater_than(&self, left: Self::Expr, right: Self::Expr, span: Span)
        -> Self::Expr;
    fn create_greater_than_or_equal(
        &self,
        left: Self::Expr,
        right: Self::Expr,
        span: Span,
    ) -> Self::Expr;
    fn create_equals(&self, left: Self::Expr, right: Self::Expr, span: Span) -> Self::Expr;
    fn create_not_equals(&self, left: Self::Expr, right: Self::Expr, span: Span) -> Self::Expr;

    // ── Object attributes ─────────────────────────────────────────────────

    fn create_get_x(&self, object: Self::Expr, span: Span) -> Self::Expr;
    fn create_get_y(&self, object: Self::Expr, span: Span) -> Self::Expr;
    fn create_get_width(&self, object: Self::Expr, span: Span) -> Self::Expr;
    fn create_get_height(&self, object: Self::Expr, span: Span) -> Self::Expr;
    fn create_get_hit_points(&self, object: Self::Expr, span: Span) -> Self::Expr;

    // ── World queries ─────────────────────────────────────────────────────

    fn create_get_tile(&self, x: Self::Expr, y: Self::Expr, span: Span) -> Self::Expr;
    fn create_search_object(&self, direction: Self::Expr, span: Span) -> Self::Expr;

    // ── Predicates ────────────────────────────────────────────────────────

    fn create_is_player(&self, object: Self::Expr, span: Span) -> Self::Expr;
    fn create_is_rival(&self, object: Self::Expr, span: Span) -> Self::Expr;
    fn create_is_shark(&self, object: Self::Expr, span: Span) -> Self::Expr;
    fn create_is_slime(&self, object: Self::Expr, span: Span) -> Self::Expr;
    fn create_is_plant(&self, object: Self::Expr, span: Span) -> Self::Expr;
    fn create_is_dead(&self, object: Self::Expr, span: Span) -> Self::Expr;
    fn create_is_terrain(&self, object: Self::Expr, span: Span) -> Self::Expr;
    fn create_is_passable(&self, object: Self::Expr, span: Span) -> Self::Expr;
    fn create_is_water(&self, object: Self::Expr, span: Span) -> Self::Expr;
    fn create_is_magma(&self, object: Self::Expr, span: Span) -> Self::Expr;
    fn create_is_air(&self, object: Self::Expr, span: Span) -> Self::Expr;
    fn create_is_moving(&self, object: Self::Expr, direction: Self::Expr, span: Span)
        -> Self::Expr;
    fn create_is_ducking(&self, object: Self::Expr, span: Span) -> Self::Expr;
    fn create_is_jumping(&self, object: Self::Expr, span: Span) -> Self::Expr;

    // ── Statements ────────────────────────────────────────────────────────

    fn create_assignment(&self, name: &str, value: Self::Expr, span: Span) -> Self::Stmt;
    fn create_while(&self, condition: Self::Expr, body: Self::Stmt, span: Span) -> Self::Stmt;
    #[allow(clippy::too_many_arguments)]
    fn create_for_each(
        &self,
        kind: ObjectKind,
        variable: &str,
        filter: Option<Self::Expr>,
        sort: Option<Self::Expr>,
        order: SortOrder,
        body: Self::Stmt,
        span: Span,
    ) -> Self::Stmt;
    fn create_break(&self, span: Span) -> Self::Stmt;
    fn create_if(
        &self,
        condition: Self::Expr,
        then_branch: Self::Stmt,
        else_branch: Option<Self::Stmt>,
        span: Span,
    ) -> Self::Stmt;
    fn create_print(&self, value: Self::Expr, span: Span) -> Self::Stmt;
    fn create_start_run(&self, direction: Self::Expr, span: Span) -> Self::Stmt;
    fn create_stop_run(&self, direction: Self::Expr, span: Span) -> Self::Stmt;
    fn create_start_jump(&self, span: Span) -> Self::Stmt;
    fn create_stop_jump(&self, span: Span) -> Self::Stmt;
    fn create_start_duck(&self, span: Span) -> Self::Stmt;
    fn create_stop_duck(&self, span: Span) -> Self::Stmt;
    fn create_wait(&self, duration: Self::Expr, span: Span) -> Self::Stmt;
    fn create_sequence(&self, statements: Vec<Self::Stmt>, span: Span) -> Self::Stmt;

    // ── Program ───────────────────────────────────────────────────────────

    /// Assemble a program. Fails when the statement tree is not well-formed.
    fn create_program(
        &self,
        main: Self::Stmt,
        variables: Vec<VarDecl>,
    ) -> Result<Self::Program, Self::Error>;
}
