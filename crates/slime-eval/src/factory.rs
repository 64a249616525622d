//! [`ProgramFactory`] producing interpreter programs.

use crate::config::{ConfigError, ProgramConfig};
use crate::program::Program;
use slime_types::{
    Action, Attribute, BinOp, CheckErrors, Command, Direction, Expr, ExprKind, ForEach,
    ObjectKind, Predicate, ProgramFactory, SortOrder, Span, Stmt, StmtKind, UnaryOp, Value,
    VarDecl,
};

/// Builds syntax trees and, once checked, runnable [`Program`]s.
#[derive(Debug, Clone, Default)]
pub struct AstFactory {
    config: ProgramConfig,
}

impl AstFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Programs created by this factory use `config`, once it validates.
    pub fn with_config(config: ProgramConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    fn binary(left: Expr, op: BinOp, right: Expr, span: Span) -> Expr {
        Expr::new(
            ExprKind::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            span,
        )
    }

    fn unary(op: UnaryOp, operand: Expr, span: Span) -> Expr {
        Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        )
    }

    fn attribute(attribute: Attribute, object: Expr, span: Span) -> Expr {
        Expr::new(
            ExprKind::Attribute {
                attribute,
                object: Box::new(object),
            },
            span,
        )
    }

    fn is(predicate: Predicate, object: Expr, span: Span) -> Expr {
        Expr::new(
            ExprKind::Is {
                predicate,
                object: Box::new(object),
            },
            span,
        )
    }

    /// Actions built here always target the program's own entity.
    fn action(command: Command, span: Span) -> Stmt {
        Stmt::new(
            StmtKind::Action(Action {
                command,
                target: Expr::new(ExprKind::SelfRef, span),
            }),
            span,
        )
    }
}

impl ProgramFactory for AstFactory {
    type Expr = Expr;
    type Stmt = Stmt;
    type Program = Program;
    type Error = CheckErrors;

    // ── Constants & names ──

    fn create_number(&self, value: f64, span: Span) -> Expr {
        Expr::new(ExprKind::Constant(Value::Number(value)), span)
    }

    fn create_true(&self, span: Span) -> Expr {
        Expr::new(ExprKind::Constant(Value::Boolean(true)), span)
    }

    fn create_false(&self, span: Span) -> Expr {
        Expr::new(ExprKind::Constant(Value::Boolean(false)), span)
    }

    fn create_null(&self, span: Span) -> Expr {
        Expr::new(ExprKind::Constant(Value::null()), span)
    }

    fn create_direction(&self, direction: Direction, span: Span) -> Expr {
        Expr::new(ExprKind::Constant(Value::Direction(direction)), span)
    }

    fn create_self(&self, span: Span) -> Expr {
        Expr::new(ExprKind::SelfRef, span)
    }

    fn create_variable(&self, name: &str, span: Span) -> Expr {
        Expr::new(ExprKind::Variable(name.to_string()), span)
    }

    // ── Arithmetic ──

    fn create_addition(&self, left: Expr, right: Expr, span: Span) -> Expr {
        Self::binary(left, BinOp::Add, right, span)
    }

    fn create_subtraction(&self, left: Expr, right: Expr, span: Span) -> Expr {
        Self::binary(left, BinOp::Sub, right, span)
    }

    fn create_multiplication(&self, left: Expr, right: Expr, span: Span) -> Expr {
        Self::binary(left, BinOp::Mul, right, span)
    }

    fn create_division(&self, left: Expr, right: Expr, span: Span) -> Expr {
        Self::binary(left, BinOp::Div, right, span)
    }

    fn create_negation(&self, operand: Expr, span: Span) -> Expr {
        Self::unary(UnaryOp::Neg, operand, span)
    }

    fn create_sqrt(&self, operand: Expr, span: Span) -> Expr {
        Self::unary(UnaryOp::Sqrt, operand, span)
    }

    fn create_random(&self, max: Expr, span: Span) -> Expr {
        Expr::new(ExprKind::Random(Box::new(max)), span)
    }

    // ── Logic ──

    fn create_and(&self, left: Expr, right: Expr, span: Span) -> Expr {
        Self::binary(left, BinOp::And, right, span)
    }

    fn create_or(&self, left: Expr, right: Expr, span: Span) -> Expr {
        Self::binary(left, BinOp::Or, right, span)
    }

    fn create_not(&self, operand: Expr, span: Span) -> Expr {
        Self::unary(UnaryOp::Not, operand, span)
    }

    // ── Comparison ──

    fn create_less_than(&self, left: Expr, right: Expr, span: Span) -> Expr {
        Self::binary(left, BinOp::Less, right, span)
    }

    fn create_less_than_or_equal(&self, left: Expr, right: Expr, span: Span) -> Expr {
        Self::binary(left, BinOp::LessEq, right, span)
    }

    fn create_greater_than(&self, left: Expr, right: Expr, span: Span) -> Expr {
        Self::binary(left, BinOp::Greater, right, span)
    }

    fn create_greater_than_or_equal(&self, left: Expr, right: Expr, span: Span) -> Expr {
        Self::binary(left, BinOp::GreaterEq, right, span)
    }

    fn create_equals(&self, left: Expr, right: Expr, span: Span) -> Expr {
        Self::binary(left, BinOp::Eq, right, span)
    }

    fn create_not_equals(&self, left: Expr, right: Expr, span: Span) -> Expr {
        Self::binary(left, BinOp::NotEq, right, span)
    }

    // ── Object attributes ──

    fn create_get_x(&self, object: Expr, span: Span) -> Expr {
        Self::attribute(Attribute::X, object, span)
    }

    fn create_get_y(&self, object: Expr, span: Span) -> Expr {
        Self::attribute(Attribute::Y, object, span)
    }

    fn create_get_width(&self, object: Expr, span: Span) -> Expr {
        Self::attribute(Attribute::Width, object, span)
    }

    fn create_get_height(&self, object: Expr, span: Span) -> Expr {
        Self::attribute(Attribute::Height, object, span)
    }

    fn create_get_hit_points(&self, object: Expr, span: Span) -> Expr {
        Self::attribute(Attribute::HitPoints, object, span)
    }

    // ── World queries ──

    fn create_get_tile(&self, x: Expr, y: Expr, span: Span) -> Expr {
        Expr::new(
            ExprKind::TileAt {
                x: Box::new(x),
                y: Box::new(y),
            },
            span,
        )
    }

    fn create_search_object(&self, direction: Expr, span: Span) -> Expr {
        Expr::new(ExprKind::SearchObject(Box::new(direction)), span)
    }

    // ── Predicates ──

    fn create_is_player(&self, object: Expr, span: Span) -> Expr {
        Self::is(Predicate::Player, object, span)
    }

    fn create_is_rival(&self, object: Expr, span: Span) -> Expr {
        Self::is(Predicate::Rival, object, span)
    }

    fn create_is_shark(&self, object: Expr, span: Span) -> Expr {
        Self::is(Predicate::Shark, object, span)
    }

    fn create_is_slime(&self, object: Expr, span: Span) -> Expr {
        Self::is(Predicate::Slime, object, span)
    }

    fn create_is_plant(&self, object: Expr, span: Span) -> Expr {
        Self::is(Predicate::Plant, object, span)
    }

    fn create_is_dead(&self, object: Expr, span: Span) -> Expr {
        Self::is(Predicate::Dead, object, span)
    }

    fn create_is_terrain(&self, object: Expr, span: Span) -> Expr {
        Self::is(Predicate::Terrain, object, span)
    }

    fn create_is_passable(&self, object: Expr, span: Span) -> Expr {
        Self::is(Predicate::Passable, object, span)
    }

    fn create_is_water(&self, object: Expr, span: Span) -> Expr {
        Self::is(Predicate::Water, object, span)
    }

    fn create_is_magma(&self, object: Expr, span: Span) -> Expr {
        Self::is(Predicate::Magma, object, span)
    }

    fn create_is_air(&self, object: Expr, span: Span) -> Expr {
        Self::is(Predicate::Air, object, span)
    }

    fn create_is_moving(&self, object: Expr, direction: Expr, span: Span) -> Expr {
        Expr::new(
            ExprKind::IsMoving {
                object: Box::new(object),
                direction: Box::new(direction),
            },
            span,
        )
    }

    fn create_is_ducking(&self, object: Expr, span: Span) -> Expr {
        Self::is(Predicate::Ducking, object, span)
    }

    fn create_is_jumping(&self, object: Expr, span: Span) -> Expr {
        Self::is(Predicate::Jumping, object, span)
    }

    // ── Statements ──

    fn create_assignment(&self, name: &str, value: Expr, span: Span) -> Stmt {
        Stmt::new(
            StmtKind::Assign {
                name: name.to_string(),
                value,
            },
            span,
        )
    }

    fn create_while(&self, condition: Expr, body: Stmt, span: Span) -> Stmt {
        Stmt::new(
            StmtKind::While {
                condition,
                body: Box::new(body),
            },
            span,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn create_for_each(
        &self,
        kind: ObjectKind,
        variable: &str,
        filter: Option<Expr>,
        sort: Option<Expr>,
        order: SortOrder,
        body: Stmt,
        span: Span,
    ) -> Stmt {
        Stmt::new(
            StmtKind::ForEach(Box::new(ForEach {
                variable: variable.to_string(),
                kind,
                filter,
                sort,
                order,
                body,
            })),
            span,
        )
    }

    fn create_break(&self, span: Span) -> Stmt {
        Stmt::new(StmtKind::Break, span)
    }

    fn create_if(
        &self,
        condition: Expr,
        then_branch: Stmt,
        else_branch: Option<Stmt>,
        span: Span,
    ) -> Stmt {
        Stmt::new(
            StmtKind::If {
                condition,
                then_branch: Box::new(then_branch),
                else_branch: else_branch.map(Box::new),
            },
            span,
        )
    }

    fn create_print(&self, value: Expr, span: Span) -> Stmt {
        Stmt::new(StmtKind::Print(value), span)
    }

    fn create_start_run(&self, direction: Expr, span: Span) -> Stmt {
        Self::action(Command::StartRun(direction), span)
    }

    fn create_stop_run(&self, direction: Expr, span: Span) -> Stmt {
        Self::action(Command::StopRun(direction), span)
    }

    fn create_start_jump(&self, span: Span) -> Stmt {
        Self::action(Command::StartJump, span)
    }

    fn create_stop_jump(&self, span: Span) -> Stmt {
        Self::action(Command::StopJump, span)
    }

    fn create_start_duck(&self, span: Span) -> Stmt {
        Self::action(Command::StartDuck, span)
    }

    fn create_stop_duck(&self, span: Span) -> Stmt {
        Self::action(Command::StopDuck, span)
    }

    fn create_wait(&self, duration: Expr, span: Span) -> Stmt {
        Stmt::new(StmtKind::Wait(duration), span)
    }

    fn create_sequence(&self, statements: Vec<Stmt>, span: Span) -> Stmt {
        Stmt::new(StmtKind::Sequence(statements), span)
    }

    // ── Program ──

    fn create_program(&self, main: Stmt, variables: Vec<VarDecl>) -> Result<Program, CheckErrors> {
        Program::checked(main, variables, self.config.clone())
    }
}
