//! AST node types for the Slime language.
//!
//! Every node carries a [`Span`] for error reporting.
//! Recursive variants are boxed to keep enum sizes reasonable.
//! The tree is plain data: it is serde (de)serializable so hosts can ship
//! programs as JSON, and it carries no execution state. The interpreter
//! lowers it into resumable nodes when a program is created.

use crate::{Direction, ObjectKind, Span, Value, VarType};
use serde::{Deserialize, Serialize};

// ══════════════════════════════════════════════════════════════════════════════
// Declarations
// ══════════════════════════════════════════════════════════════════════════════

/// A global variable declaration: `double a := 3;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: VarType,
    pub initial: Value,
    #[serde(default)]
    pub span: Span,
}

impl VarDecl {
    /// Declare `name` with the default initial value of `ty`.
    pub fn new(name: impl Into<String>, ty: VarType) -> Self {
        Self {
            name: name.into(),
            ty,
            initial: ty.default_value(),
            span: Span::unknown(),
        }
    }

    /// Declare `name` with an explicit initial value; the type follows the value.
    pub fn with_initial(name: impl Into<String>, initial: Value) -> Self {
        Self {
            name: name.into(),
            ty: initial.var_type(),
            initial,
            span: Span::unknown(),
        }
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

/// A statement node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    pub kind: StmtKind,
    #[serde(default)]
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StmtKind {
    /// `s1 s2 ... sn`
    Sequence(Vec<Stmt>),
    /// `name := expr;`
    Assign { name: String, value: Expr },
    /// `if cond then ... [else ...] fi`
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    /// `while cond do ... done`
    While { condition: Expr, body: Box<Stmt> },
    /// `foreach (kind, var) [where cond] [sort expr (ascending|descending)] do ... done`
    ForEach(Box<ForEach>),
    /// `wait seconds;`
    Wait(Expr),
    /// `break;`
    Break,
    /// `start_run dir;`, `stop_jump;`, ...
    Action(Action),
    /// `print expr;`
    Print(Expr),
}

/// The parts of a `foreach` loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForEach {
    pub variable: String,
    pub kind: ObjectKind,
    /// `where` filter, evaluated with `variable` bound to each candidate.
    pub filter: Option<Expr>,
    /// `sort` key, a number evaluated with `variable` bound.
    pub sort: Option<Expr>,
    #[serde(default)]
    pub order: SortOrder,
    pub body: Stmt,
}

/// Ordering of a sorted `foreach`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// A world-mutating command issued to an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub command: Command,
    /// The entity receiving the command, normally `self`.
    pub target: Expr,
}

/// Commands an action statement can issue. Each maps to one capability call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    StartRun(Expr),
    StopRun(Expr),
    StartJump,
    StopJump,
    StartDuck,
    StopDuck,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::StartRun(_) => "start_run",
            Command::StopRun(_) => "stop_run",
            Command::StartJump => "start_jump",
            Command::StopJump => "stop_jump",
            Command::StartDuck => "start_duck",
            Command::StopDuck => "stop_duck",
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// An expression node. Uses `Box` for recursive variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    #[serde(default)]
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// `self`, with no source location.
    pub fn this() -> Self {
        Self::new(ExprKind::SelfRef, Span::unknown())
    }
}

/// The kind of expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExprKind {
    // ── Literals & names ──
    /// `42`, `true`, `left`, `null`
    Constant(Value),
    /// `a`
    Variable(String),
    /// `self`
    SelfRef,

    // ── Operators ──
    /// `a + b`, `a < b`, `a && b`, `a == b`, ...
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    /// `-a`, `!a`, `sqrt(a)`
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// `random(max)`
    Random(Box<Expr>),

    // ── Object queries ──
    /// `getx obj`, `gethp obj`, ...
    Attribute { attribute: Attribute, object: Box<Expr> },
    /// `isshark obj`, `iswater obj`, ...
    Is { predicate: Predicate, object: Box<Expr> },
    /// `ismoving(obj, dir)`
    IsMoving {
        object: Box<Expr>,
        direction: Box<Expr>,
    },

    // ── World queries ──
    /// `gettile(x, y)` with pixel coordinates
    TileAt { x: Box<Expr>, y: Box<Expr> },
    /// `searchobj dir`
    SearchObject(Box<Expr>),
}

// ── Operators ─────────────────────────────────────────────────────────────────

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinOp {
    // Logical
    Or,
    And,
    // Equality (any operand types)
    Eq,
    NotEq,
    // Comparison
    Less,
    LessEq,
    Greater,
    GreaterEq,
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    /// Returns the operator symbol for error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Or => "||",
            BinOp::And => "&&",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Less => "<",
            BinOp::LessEq => "<=",
            BinOp::Greater => ">",
            BinOp::GreaterEq => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Neg,
    Not,
    Sqrt,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::Sqrt => "sqrt",
        }
    }
}

/// Numeric attributes readable from an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    X,
    Y,
    Width,
    Height,
    HitPoints,
}

impl Attribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::X => "getx",
            Attribute::Y => "gety",
            Attribute::Width => "getwidth",
            Attribute::Height => "getheight",
            Attribute::HitPoints => "gethp",
        }
    }
}

/// Boolean tests on a single object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    // Entity kinds
    Player,
    Rival,
    Shark,
    Slime,
    Plant,
    // Terrain classes
    Terrain,
    Passable,
    Water,
    Magma,
    Air,
    // Entity state
    Dead,
    Ducking,
    Jumping,
}

impl Predicate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Predicate::Player => "isplayer",
            Predicate::Rival => "isrival",
            Predicate::Shark => "isshark",
            Predicate::Slime => "isslime",
            Predicate::Plant => "isplant",
            Predicate::Terrain => "isterrain",
            Predicate::Passable => "ispassable",
            Predicate::Water => "iswater",
            Predicate::Magma => "ismagma",
            Predicate::Air => "isair",
            Predicate::Dead => "isdead",
            Predicate::Ducking => "isducking",
            Predicate::Jumping => "isjumping",
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Shorthand constructors
// ══════════════════════════════════════════════════════════════════════════════

impl Expr {
    pub fn number(n: f64) -> Self {
        Self::new(ExprKind::Constant(Value::Number(n)), Span::unknown())
    }

    pub fn boolean(b: bool) -> Self {
        Self::new(ExprKind::Constant(Value::Boolean(b)), Span::unknown())
    }

    pub fn direction(d: Direction) -> Self {
        Self::new(ExprKind::Constant(Value::Direction(d)), Span::unknown())
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::new(ExprKind::Variable(name.into()), Span::unknown())
    }

    pub fn binary(left: Expr, op: BinOp, right: Expr) -> Self {
        let span = left.span.min(right.span);
        Self::new(
            ExprKind::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            span,
        )
    }
}

impl Stmt {
    pub fn sequence(stmts: Vec<Stmt>) -> Self {
        let span = stmts.first().map(|s| s.span).unwrap_or_default();
        Self::new(StmtKind::Sequence(stmts), span)
    }

    pub fn assign(name: impl Into<String>, value: Expr) -> Self {
        let span = value.span;
        Self::new(
            StmtKind::Assign {
                name: name.into(),
                value,
            },
            span,
        )
    }

    pub fn while_do(condition: Expr, body: Stmt) -> Self {
        let span = condition.span;
        Self::new(
            StmtKind::While {
                condition,
                body: Box::new(body),
            },
            span,
        )
    }

    pub fn if_then(condition: Expr, then_branch: Stmt, else_branch: Option<Stmt>) -> Self {
        let span = condition.span;
        Self::new(
            StmtKind::If {
                condition,
                then_branch: Box::new(then_branch),
                else_branch: else_branch.map(Box::new),
            },
            span,
        )
    }

    pub fn brk() -> Self {
        Self::new(StmtKind::Break, Span::unknown())
    }

    /// An action aimed at the program's own entity.
    pub fn action(command: Command) -> Self {
        Self::new(
            StmtKind::Action(Action {
                command,
                target: Expr::this(),
            }),
            Span::unknown(),
        )
    }
}
