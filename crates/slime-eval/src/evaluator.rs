//! Expression evaluation.
//!
//! An [`Evaluator`] borrows everything one tick needs: the program's
//! environment, RNG, config and output buffer, plus the host world and the
//! id of the entity the program commands. Statement nodes receive it in
//! [`crate::Resumable::step_once`].

use crate::config::ProgramConfig;
use crate::env::Environment;
use crate::error::{EvalError, EvalResult};
use crate::search;
use rand::rngs::StdRng;
use rand::Rng;
use slime_types::ast::*;
use slime_types::{Direction, EntityId, EntityKind, ObjectRef, Value, VarType};
use slime_world::{TerrainKind, World, WorldEntity};

/// Per-tick evaluation context.
pub struct Evaluator<'a> {
    pub env: &'a mut Environment,
    pub world: &'a mut dyn World,
    /// The entity this program commands; `self` in scripts.
    pub this: EntityId,
    pub rng: &'a mut StdRng,
    pub config: &'a ProgramConfig,
    /// Captured `print` output.
    pub output: &'a mut Vec<String>,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        env: &'a mut Environment,
        world: &'a mut dyn World,
        this: EntityId,
        rng: &'a mut StdRng,
        config: &'a ProgramConfig,
        output: &'a mut Vec<String>,
    ) -> Self {
        Self {
            env,
            world,
            this,
            rng,
            config,
            output,
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expression evaluation
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate an expression to a Value.
    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        match &expr.kind {
            ExprKind::Constant(value) => Ok(value.clone()),
            ExprKind::Variable(name) => self
                .env
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::UndefinedVariable(name.clone())),
            ExprKind::SelfRef => Ok(Value::entity(self.this)),

            ExprKind::Binary { left, op, right } => self.eval_binary(left, *op, right),
            ExprKind::Unary { op, operand } => self.eval_unary(*op, operand),
            ExprKind::Random(max) => self.eval_random(max),

            ExprKind::Attribute { attribute, object } => self.eval_attribute(*attribute, object),
            ExprKind::Is { predicate, object } => self.eval_predicate(*predicate, object),
            ExprKind::IsMoving { object, direction } => self.eval_is_moving(object, direction),

            ExprKind::TileAt { x, y } => self.eval_tile_at(x, y),
            ExprKind::SearchObject(direction) => {
                let direction = self.eval_direction(direction)?;
                let found = search::search_object(&*self.world, self.this, direction)?;
                Ok(Value::from(found))
            }
        }
    }

    // ── Typed helpers ──

    pub fn eval_number(&mut self, expr: &Expr) -> EvalResult<f64> {
        let value = self.eval_expr(expr)?;
        value
            .as_number()
            .ok_or_else(|| mismatch(expr, VarType::Number, &value))
    }

    pub fn eval_bool(&mut self, expr: &Expr) -> EvalResult<bool> {
        let value = self.eval_expr(expr)?;
        value
            .as_bool()
            .ok_or_else(|| mismatch(expr, VarType::Boolean, &value))
    }

    pub fn eval_direction(&mut self, expr: &Expr) -> EvalResult<Direction> {
        let value = self.eval_expr(expr)?;
        value
            .as_direction()
            .ok_or_else(|| mismatch(expr, VarType::Direction, &value))
    }

    /// Evaluate an object operand. `null` is a [`EvalError::NullObject`].
    pub fn eval_object(&mut self, expr: &Expr) -> EvalResult<ObjectRef> {
        match self.eval_expr(expr)? {
            Value::Object(Some(object)) => Ok(object),
            Value::Object(None) => Err(EvalError::NullObject(format!(
                "{}: object operand is null",
                expr.span
            ))),
            other => Err(mismatch(expr, VarType::Object, &other)),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Operators
    // ══════════════════════════════════════════════════════════════════════

    fn eval_binary(&mut self, left: &Expr, op: BinOp, right: &Expr) -> EvalResult<Value> {
        match op {
            // Short-circuit
            BinOp::And => Ok(Value::Boolean(self.eval_bool(left)? && self.eval_bool(right)?)),
            BinOp::Or => Ok(Value::Boolean(self.eval_bool(left)? || self.eval_bool(right)?)),

            BinOp::Eq => Ok(Value::Boolean(self.eval_expr(left)? == self.eval_expr(right)?)),
            BinOp::NotEq => Ok(Value::Boolean(self.eval_expr(left)? != self.eval_expr(right)?)),

            BinOp::Less => self.eval_comparison(left, right, |a, b| a < b),
            BinOp::LessEq => self.eval_comparison(left, right, |a, b| a <= b),
            BinOp::Greater => self.eval_comparison(left, right, |a, b| a > b),
            BinOp::GreaterEq => self.eval_comparison(left, right, |a, b| a >= b),

            BinOp::Add => self.eval_arith(left, right, |a, b| a + b, op),
            BinOp::Sub => self.eval_arith(left, right, |a, b| a - b, op),
            BinOp::Mul => self.eval_arith(left, right, |a, b| a * b, op),
            BinOp::Div => {
                let a = self.eval_number(left)?;
                let b = self.eval_number(right)?;
                if b == 0.0 {
                    return Err(EvalError::ArithmeticTrap(format!(
                        "{}: division by zero",
                        right.span
                    )));
                }
                finite(a / b, op.as_str(), left)
            }
        }
    }

    fn eval_arith(
        &mut self,
        left: &Expr,
        right: &Expr,
        op: fn(f64, f64) -> f64,
        bin_op: BinOp,
    ) -> EvalResult<Value> {
        let a = self.eval_number(left)?;
        let b = self.eval_number(right)?;
        finite(op(a, b), bin_op.as_str(), left)
    }

    fn eval_comparison(
        &mut self,
        left: &Expr,
        right: &Expr,
        op: fn(f64, f64) -> bool,
    ) -> EvalResult<Value> {
        let a = self.eval_number(left)?;
        let b = self.eval_number(right)?;
        Ok(Value::Boolean(op(a, b)))
    }

    fn eval_unary(&mut self, op: UnaryOp, operand: &Expr) -> EvalResult<Value> {
        match op {
            UnaryOp::Not => Ok(Value::Boolean(!self.eval_bool(operand)?)),
            UnaryOp::Neg => Ok(Value::Number(-self.eval_number(operand)?)),
            UnaryOp::Sqrt => {
                let n = self.eval_number(operand)?;
                if n < 0.0 {
                    return Err(EvalError::ArithmeticTrap(format!(
                        "{}: sqrt of negative number {n}",
                        operand.span
                    )));
                }
                finite(n.sqrt(), op.as_str(), operand)
            }
        }
    }

    fn eval_random(&mut self, max: &Expr) -> EvalResult<Value> {
        let max_value = self.eval_number(max)?;
        if !(max_value.is_finite() && max_value > 0.0) {
            return Err(EvalError::ArithmeticTrap(format!(
                "{}: random needs a positive bound, got {max_value}",
                max.span
            )));
        }
        Ok(Value::Number(self.rng.gen_range(0.0..max_value)))
    }

    // ══════════════════════════════════════════════════════════════════════
    // Object queries
    // ══════════════════════════════════════════════════════════════════════

    fn eval_attribute(&mut self, attribute: Attribute, object: &Expr) -> EvalResult<Value> {
        let target = self.eval_object(object)?;
        let (rect, hit_points) = match target {
            ObjectRef::Entity(id) => {
                let entity = self.world.entity(id).ok_or_else(|| {
                    EvalError::UnknownObject(format!(
                        "{}: {} on {id}, which is no longer in the world",
                        object.span,
                        attribute.as_str()
                    ))
                })?;
                (entity.bounds(), Some(entity.hit_points()))
            }
            ObjectRef::Tile { x, y } => (self.world.tile_rect(x, y), None),
        };
        let n = match attribute {
            Attribute::X => rect.x,
            Attribute::Y => rect.y,
            Attribute::Width => rect.width,
            Attribute::Height => rect.height,
            Attribute::HitPoints => hit_points.ok_or_else(|| {
                EvalError::TypeMismatch(format!(
                    "{}: gethp needs an entity, found {target}",
                    object.span
                ))
            })?,
        };
        Ok(Value::Number(n))
    }

    fn eval_predicate(&mut self, predicate: Predicate, object: &Expr) -> EvalResult<Value> {
        let target = self.eval_object(object)?;
        let result = match target {
            ObjectRef::Entity(id) => match self.world.entity(id) {
                Some(entity) => entity_predicate(entity, predicate),
                // Vanished entities count as dead and as nothing else.
                None => predicate == Predicate::Dead,
            },
            ObjectRef::Tile { x, y } => tile_predicate(self.world.terrain_at(x, y), predicate),
        };
        Ok(Value::Boolean(result))
    }

    fn eval_is_moving(&mut self, object: &Expr, direction: &Expr) -> EvalResult<Value> {
        let target = self.eval_object(object)?;
        let direction = self.eval_direction(direction)?;
        let moving = match target {
            ObjectRef::Entity(id) => self
                .world
                .entity(id)
                .and_then(|e| e.movable())
                .is_some_and(|m| m.moving_direction() == Some(direction)),
            ObjectRef::Tile { .. } => false,
        };
        Ok(Value::Boolean(moving))
    }

    /// `gettile(x, y)`: the tile under a pixel position, or `null` outside
    /// the world.
    fn eval_tile_at(&mut self, x: &Expr, y: &Expr) -> EvalResult<Value> {
        let px = self.eval_number(x)?;
        let py = self.eval_number(y)?;
        let size = self.world.tile_size();
        let (tx, ty) = ((px / size).floor(), (py / size).floor());
        if !tx.is_finite() || !ty.is_finite() {
            return Ok(Value::null());
        }
        let (tx, ty) = (tx as i32, ty as i32);
        Ok(match self.world.terrain_at(tx, ty) {
            Some(_) => Value::tile(tx, ty),
            None => Value::null(),
        })
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

fn mismatch(expr: &Expr, expected: VarType, found: &Value) -> EvalError {
    EvalError::TypeMismatch(format!(
        "{}: expected {expected}, found {} ({found})",
        expr.span,
        found.var_type()
    ))
}

fn finite(result: f64, symbol: &str, at: &Expr) -> EvalResult<Value> {
    if result.is_finite() {
        Ok(Value::Number(result))
    } else {
        Err(EvalError::ArithmeticTrap(format!(
            "{}: '{symbol}' produced {result}",
            at.span
        )))
    }
}

fn entity_predicate(entity: &dyn WorldEntity, predicate: Predicate) -> bool {
    match predicate {
        Predicate::Player => entity.kind() == EntityKind::Player,
        Predicate::Rival => entity.kind() == EntityKind::Rival,
        Predicate::Shark => entity.kind() == EntityKind::Shark,
        Predicate::Slime => entity.kind() == EntityKind::Slime,
        Predicate::Plant => entity.kind() == EntityKind::Plant,
        Predicate::Dead => entity.is_dead(),
        Predicate::Ducking => entity.duckable().is_some_and(|d| d.is_ducking()),
        Predicate::Jumping => entity.jumpable().is_some_and(|j| j.is_jumping()),
        Predicate::Terrain
        | Predicate::Passable
        | Predicate::Water
        | Predicate::Magma
        | Predicate::Air => false,
    }
}

fn tile_predicate(terrain: Option<TerrainKind>, predicate: Predicate) -> bool {
    match predicate {
        Predicate::Terrain => true,
        Predicate::Passable => terrain.is_some_and(TerrainKind::is_passable),
        Predicate::Water => terrain == Some(TerrainKind::Water),
        Predicate::Magma => terrain == Some(TerrainKind::Magma),
        Predicate::Air => terrain == Some(TerrainKind::Air),
        Predicate::Player
        | Predicate::Rival
        | Predicate::Shark
        | Predicate::Slime
        | Predicate::Plant
        | Predicate::Dead
        | Predicate::Ducking
        | Predicate::Jumping => false,
    }
}
