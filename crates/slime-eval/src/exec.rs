//! Resumable statement execution.
//!
//! A program's statement tree is lowered once into [`Node`]s that carry
//! their own progress: a sequence its cursor, a conditional its committed
//! branch, a loop its phase, a wait its tick budget. Each
//! [`Resumable::step_once`] performs one indivisible unit of work and
//! returns, so a program can be suspended between any two units and picked
//! up on the next tick with nothing else remembered.
//!
//! `break` travels upward as [`Flow::Break`] until the nearest loop
//! swallows it. Nodes hold no references to their parents.

use crate::error::{EvalError, EvalResult};
use crate::evaluator::Evaluator;
use crate::loops::{ForEachLoop, WhileLoop};
use slime_types::{Command, Expr, ObjectRef, Span, Stmt, StmtKind};
use slime_world::CapabilityError;

/// Control signal returned by a unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Normal,
    /// A `break` executed; the nearest enclosing loop must stop.
    Break,
}

/// The protocol every executable node follows.
pub trait Resumable {
    /// Whether at least one unit of work remains in the current pass.
    fn has_pending_work(&self) -> bool;

    /// Perform exactly one unit of work. Only called while
    /// [`Resumable::has_pending_work`] is true.
    fn step_once(&mut self, ev: &mut Evaluator<'_>) -> EvalResult<Flow>;

    /// Forget all progress, recursively, so the next pass starts fresh.
    fn reset(&mut self);
}

// ══════════════════════════════════════════════════════════════════════════════
// Node
// ══════════════════════════════════════════════════════════════════════════════

/// An executable statement.
#[derive(Debug)]
pub enum Node {
    Sequence(Sequence),
    Assign(Assign),
    If(Conditional),
    While(WhileLoop),
    ForEach(ForEachLoop),
    Wait(Wait),
    Break(OneShot),
    Action(ActionNode),
    Print(PrintNode),
}

impl Node {
    /// Lower a statement tree into executable nodes.
    pub fn lower(stmt: Stmt) -> Node {
        let span = stmt.span;
        match stmt.kind {
            StmtKind::Sequence(stmts) => {
                Node::Sequence(Sequence::new(stmts.into_iter().map(Node::lower).collect()))
            }
            StmtKind::Assign { name, value } => Node::Assign(Assign {
                name,
                value,
                done: OneShot::default(),
            }),
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => Node::If(Conditional::new(
                condition,
                Node::lower(*then_branch),
                else_branch.map(|e| Node::lower(*e)),
            )),
            StmtKind::While { condition, body } => {
                Node::While(WhileLoop::new(condition, Node::lower(*body)))
            }
            StmtKind::ForEach(for_each) => {
                let for_each = *for_each;
                Node::ForEach(ForEachLoop::new(
                    for_each.variable,
                    for_each.kind,
                    for_each.filter,
                    for_each.sort,
                    for_each.order,
                    Node::lower(for_each.body),
                ))
            }
            StmtKind::Wait(duration) => Node::Wait(Wait::new(duration)),
            StmtKind::Break => Node::Break(OneShot::default()),
            StmtKind::Action(action) => Node::Action(ActionNode {
                command: action.command,
                target: action.target,
                span,
                done: OneShot::default(),
            }),
            StmtKind::Print(value) => Node::Print(PrintNode {
                value,
                done: OneShot::default(),
            }),
        }
    }
}

impl Resumable for Node {
    fn has_pending_work(&self) -> bool {
        match self {
            Node::Sequence(n) => n.has_pending_work(),
            Node::Assign(n) => n.has_pending_work(),
            Node::If(n) => n.has_pending_work(),
            Node::While(n) => n.has_pending_work(),
            Node::ForEach(n) => n.has_pending_work(),
            Node::Wait(n) => n.has_pending_work(),
            Node::Break(n) => n.has_pending_work(),
            Node::Action(n) => n.has_pending_work(),
            Node::Print(n) => n.has_pending_work(),
        }
    }

    fn step_once(&mut self, ev: &mut Evaluator<'_>) -> EvalResult<Flow> {
        match self {
            Node::Sequence(n) => n.step_once(ev),
            Node::Assign(n) => n.step_once(ev),
            Node::If(n) => n.step_once(ev),
            Node::While(n) => n.step_once(ev),
            Node::ForEach(n) => n.step_once(ev),
            Node::Wait(n) => n.step_once(ev),
            Node::Break(n) => {
                n.finish();
                log::trace!("break");
                Ok(Flow::Break)
            }
            Node::Action(n) => n.step_once(ev),
            Node::Print(n) => n.step_once(ev),
        }
    }

    fn reset(&mut self) {
        match self {
            Node::Sequence(n) => n.reset(),
            Node::Assign(n) => n.reset(),
            Node::If(n) => n.reset(),
            Node::While(n) => n.reset(),
            Node::ForEach(n) => n.reset(),
            Node::Wait(n) => n.reset(),
            Node::Break(n) => n.reset(),
            Node::Action(n) => n.reset(),
            Node::Print(n) => n.reset(),
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// One-shot statements
// ══════════════════════════════════════════════════════════════════════════════

/// Completion bit shared by statements that take a single unit of work.
#[derive(Debug, Default)]
pub struct OneShot {
    done: bool,
}

impl OneShot {
    fn finish(&mut self) {
        self.done = true;
    }

    fn has_pending_work(&self) -> bool {
        !self.done
    }

    fn reset(&mut self) {
        self.done = false;
    }
}

/// `name := value`
#[derive(Debug)]
pub struct Assign {
    name: String,
    value: Expr,
    done: OneShot,
}

impl Resumable for Assign {
    fn has_pending_work(&self) -> bool {
        self.done.has_pending_work()
    }

    fn step_once(&mut self, ev: &mut Evaluator<'_>) -> EvalResult<Flow> {
        self.done.finish();
        let value = ev.eval_expr(&self.value)?;
        log::trace!("{} := {}", self.name, value);
        ev.env.assign(&self.name, value)?;
        Ok(Flow::Normal)
    }

    fn reset(&mut self) {
        self.done.reset();
    }
}

/// An entity command: start/stop run, jump or duck.
#[derive(Debug)]
pub struct ActionNode {
    command: Command,
    target: Expr,
    span: Span,
    done: OneShot,
}

impl Resumable for ActionNode {
    fn has_pending_work(&self) -> bool {
        self.done.has_pending_work()
    }

    fn step_once(&mut self, ev: &mut Evaluator<'_>) -> EvalResult<Flow> {
        self.done.finish();
        let direction = match &self.command {
            Command::StartRun(d) | Command::StopRun(d) => Some(ev.eval_direction(d)?),
            _ => None,
        };
        let id = match ev.eval_object(&self.target)? {
            ObjectRef::Entity(id) => id,
            tile @ ObjectRef::Tile { .. } => {
                return Err(EvalError::TypeMismatch(format!(
                    "{}: '{}' needs an entity, found {tile}",
                    self.span,
                    self.command.as_str()
                )))
            }
        };
        let command = self.command.as_str();
        let Some(entity) = ev.world.entity_mut(id) else {
            log::debug!("{command} ignored: {id} is no longer in the world");
            return Ok(Flow::Normal);
        };

        let outcome: Option<Result<(), CapabilityError>> = match (&self.command, direction) {
            (Command::StartRun(_), Some(d)) => entity.movable_mut().map(|m| m.start_move(d)),
            (Command::StopRun(_), Some(d)) => entity.movable_mut().map(|m| m.end_move(d)),
            (Command::StartJump, _) => entity.jumpable_mut().map(|j| j.start_jump()),
            (Command::StopJump, _) => entity.jumpable_mut().map(|j| j.end_jump()),
            (Command::StartDuck, _) => entity.duckable_mut().map(|d| d.start_duck()),
            (Command::StopDuck, _) => entity.duckable_mut().map(|d| d.end_duck()),
            (Command::StartRun(_) | Command::StopRun(_), None) => None,
        };
        match outcome {
            Some(Ok(())) => log::trace!("{command} on {id}"),
            Some(Err(refusal)) => log::debug!("{command} refused by {id}: {refusal}"),
            None => log::debug!("{command} ignored: {id} lacks the capability"),
        }
        Ok(Flow::Normal)
    }

    fn reset(&mut self) {
        self.done.reset();
    }
}

/// `print expr`
#[derive(Debug)]
pub struct PrintNode {
    value: Expr,
    done: OneShot,
}

impl Resumable for PrintNode {
    fn has_pending_work(&self) -> bool {
        self.done.has_pending_work()
    }

    fn step_once(&mut self, ev: &mut Evaluator<'_>) -> EvalResult<Flow> {
        self.done.finish();
        let line = ev.eval_expr(&self.value)?.to_string();
        log::info!("{line}");
        ev.output.push(line);
        Ok(Flow::Normal)
    }

    fn reset(&mut self) {
        self.done.reset();
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Sequence & Conditional
// ══════════════════════════════════════════════════════════════════════════════

/// Statements run in order, one unit of work per step.
#[derive(Debug)]
pub struct Sequence {
    children: Vec<Node>,
    cursor: usize,
}

impl Sequence {
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            children,
            cursor: 0,
        }
    }
}

impl Resumable for Sequence {
    fn has_pending_work(&self) -> bool {
        self.children[self.cursor.min(self.children.len())..]
            .iter()
            .any(Resumable::has_pending_work)
    }

    fn step_once(&mut self, ev: &mut Evaluator<'_>) -> EvalResult<Flow> {
        while let Some(child) = self.children.get_mut(self.cursor) {
            if !child.has_pending_work() {
                self.cursor += 1;
                continue;
            }
            let flow = child.step_once(ev)?;
            if !child.has_pending_work() {
                self.cursor += 1;
            }
            return Ok(flow);
        }
        Ok(Flow::Normal)
    }

    fn reset(&mut self) {
        self.cursor = 0;
        for child in &mut self.children {
            child.reset();
        }
    }
}

/// `if c then a else b`. Deciding the branch is a unit of work; the
/// decision holds for the rest of the pass.
#[derive(Debug)]
pub struct Conditional {
    condition: Expr,
    then_branch: Box<Node>,
    else_branch: Option<Box<Node>>,
    decision: Option<bool>,
}

impl Conditional {
    pub fn new(condition: Expr, then_branch: Node, else_branch: Option<Node>) -> Self {
        Self {
            condition,
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
            decision: None,
        }
    }

    fn chosen(&self) -> Option<&Node> {
        if self.decision? {
            Some(&*self.then_branch)
        } else {
            self.else_branch.as_deref()
        }
    }

    fn chosen_mut(&mut self) -> Option<&mut Node> {
        if self.decision? {
            Some(&mut *self.then_branch)
        } else {
            self.else_branch.as_deref_mut()
        }
    }
}

impl Resumable for Conditional {
    fn has_pending_work(&self) -> bool {
        match self.decision {
            None => true,
            Some(_) => self.chosen().is_some_and(Resumable::has_pending_work),
        }
    }

    fn step_once(&mut self, ev: &mut Evaluator<'_>) -> EvalResult<Flow> {
        if self.decision.is_none() {
            let taken = ev.eval_bool(&self.condition)?;
            log::trace!("if {}: {taken}", self.condition.span);
            self.decision = Some(taken);
            return Ok(Flow::Normal);
        }
        match self.chosen_mut() {
            Some(branch) => branch.step_once(ev),
            None => Ok(Flow::Normal),
        }
    }

    fn reset(&mut self) {
        self.decision = None;
        self.then_branch.reset();
        if let Some(else_branch) = &mut self.else_branch {
            else_branch.reset();
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Wait
// ══════════════════════════════════════════════════════════════════════════════

/// `wait seconds`: idles for a number of ticks fixed on its first step.
#[derive(Debug)]
pub struct Wait {
    duration: Expr,
    budget: Option<u64>,
    consumed: u64,
}

impl Wait {
    pub fn new(duration: Expr) -> Self {
        Self {
            duration,
            budget: None,
            consumed: 0,
        }
    }
}

impl Resumable for Wait {
    fn has_pending_work(&self) -> bool {
        match self.budget {
            None => true,
            // A zero-length wait still occupies one tick.
            Some(budget) => self.consumed < budget.max(1),
        }
    }

    fn step_once(&mut self, ev: &mut Evaluator<'_>) -> EvalResult<Flow> {
        if self.budget.is_none() {
            let seconds = ev.eval_number(&self.duration)?;
            let budget = ev.config.ticks_for(seconds);
            log::trace!("wait {seconds}s = {budget} ticks");
            self.budget = Some(budget);
        }
        self.consumed += 1;
        Ok(Flow::Normal)
    }

    fn reset(&mut self) {
        self.budget = None;
        self.consumed = 0;
    }
}
