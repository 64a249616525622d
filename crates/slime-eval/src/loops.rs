//! `while` and `foreach` nodes.

use crate::error::EvalResult;
use crate::evaluator::Evaluator;
use crate::exec::{Flow, Node, Resumable};
use slime_types::{Expr, ObjectKind, ObjectRef, SortOrder, Value};
use std::cmp::Ordering;

// ══════════════════════════════════════════════════════════════════════════════
// WhileLoop
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Next step evaluates the condition.
    Check,
    /// Next step runs one unit of the body.
    Body,
    Done,
}

/// `while c do body done`
#[derive(Debug)]
pub struct WhileLoop {
    condition: Expr,
    body: Box<Node>,
    phase: Phase,
}

impl WhileLoop {
    pub fn new(condition: Expr, body: Node) -> Self {
        Self {
            condition,
            body: Box::new(body),
            phase: Phase::Check,
        }
    }
}

impl Resumable for WhileLoop {
    fn has_pending_work(&self) -> bool {
        self.phase != Phase::Done
    }

    fn step_once(&mut self, ev: &mut Evaluator<'_>) -> EvalResult<Flow> {
        match self.phase {
            Phase::Check => {
                let holds = ev.eval_bool(&self.condition)?;
                log::trace!("while {}: {holds}", self.condition.span);
                if !holds {
                    self.phase = Phase::Done;
                } else {
                    self.body.reset();
                    // An empty body leaves the loop re-checking every tick.
                    if self.body.has_pending_work() {
                        self.phase = Phase::Body;
                    }
                }
            }
            Phase::Body => {
                if self.body.step_once(ev)? == Flow::Break {
                    self.phase = Phase::Done;
                    self.body.reset();
                } else if !self.body.has_pending_work() {
                    self.phase = Phase::Check;
                }
            }
            Phase::Done => {}
        }
        Ok(Flow::Normal)
    }

    fn reset(&mut self) {
        self.phase = Phase::Check;
        self.body.reset();
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// ForEachLoop
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
enum Progress {
    /// Candidates not yet collected.
    Fresh,
    /// Running the body for `candidates[index]`.
    Running {
        candidates: Vec<ObjectRef>,
        index: usize,
    },
    Done,
}

/// `foreach kind var where filter sort key order do body done`
///
/// The first step snapshots the matching objects; later changes to the
/// world do not add or drop candidates for this pass.
#[derive(Debug)]
pub struct ForEachLoop {
    variable: String,
    kind: ObjectKind,
    filter: Option<Expr>,
    sort: Option<Expr>,
    order: SortOrder,
    body: Box<Node>,
    progress: Progress,
    /// Whether `variable` is currently pushed onto the environment.
    bound: bool,
}

impl ForEachLoop {
    pub fn new(
        variable: String,
        kind: ObjectKind,
        filter: Option<Expr>,
        sort: Option<Expr>,
        order: SortOrder,
        body: Node,
    ) -> Self {
        Self {
            variable,
            kind,
            filter,
            sort,
            order,
            body: Box::new(body),
            progress: Progress::Fresh,
            bound: false,
        }
    }

    /// Collect, filter and sort the candidates.
    fn materialize(&self, ev: &mut Evaluator<'_>) -> EvalResult<Vec<ObjectRef>> {
        let mut selected = Vec::new();
        for object in ev.world.objects_of_kind(self.kind) {
            if let Some(filter) = &self.filter {
                ev.env.push_binding(&self.variable, Value::from(object));
                let keep = ev.eval_bool(filter);
                ev.env.pop_binding();
                if !keep? {
                    continue;
                }
            }
            selected.push(object);
        }

        let Some(sort) = &self.sort else {
            return Ok(selected);
        };
        let mut keyed = Vec::with_capacity(selected.len());
        for object in selected {
            ev.env.push_binding(&self.variable, Value::from(object));
            let key = ev.eval_number(sort);
            ev.env.pop_binding();
            keyed.push((key?, object));
        }
        // Stable: equal (and NaN) keys keep enumeration order.
        let by_key = |a: &f64, b: &f64| a.partial_cmp(b).unwrap_or(Ordering::Equal);
        match self.order {
            SortOrder::Ascending => keyed.sort_by(|a, b| by_key(&a.0, &b.0)),
            SortOrder::Descending => keyed.sort_by(|a, b| by_key(&b.0, &a.0)),
        }
        Ok(keyed.into_iter().map(|(_, object)| object).collect())
    }

    /// Bind the first candidate from `index` on whose body has work, or
    /// finish the loop.
    fn enter(&mut self, ev: &mut Evaluator<'_>, candidates: Vec<ObjectRef>, mut index: usize) {
        while let Some(&object) = candidates.get(index) {
            self.unbind(ev);
            ev.env.push_binding(&self.variable, Value::from(object));
            self.bound = true;
            self.body.reset();
            if self.body.has_pending_work() {
                log::trace!("foreach {} = {object}", self.variable);
                self.progress = Progress::Running { candidates, index };
                return;
            }
            index += 1;
        }
        self.finish(ev);
    }

    fn finish(&mut self, ev: &mut Evaluator<'_>) {
        self.unbind(ev);
        self.progress = Progress::Done;
    }

    fn unbind(&mut self, ev: &mut Evaluator<'_>) {
        if self.bound {
            ev.env.pop_binding();
            self.bound = false;
        }
    }
}

impl Resumable for ForEachLoop {
    fn has_pending_work(&self) -> bool {
        !matches!(self.progress, Progress::Done)
    }

    fn step_once(&mut self, ev: &mut Evaluator<'_>) -> EvalResult<Flow> {
        let index = match self.progress {
            Progress::Fresh => {
                self.progress = Progress::Done;
                let candidates = self.materialize(ev)?;
                log::trace!("foreach {}: {} candidates", self.variable, candidates.len());
                self.enter(ev, candidates, 0);
                return Ok(Flow::Normal);
            }
            Progress::Running { index, .. } => index,
            Progress::Done => return Ok(Flow::Normal),
        };

        if self.body.step_once(ev)? == Flow::Break {
            self.body.reset();
            self.finish(ev);
        } else if !self.body.has_pending_work() {
            if let Progress::Running { candidates, .. } =
                std::mem::replace(&mut self.progress, Progress::Done)
            {
                self.enter(ev, candidates, index + 1);
            }
        }
        Ok(Flow::Normal)
    }

    fn reset(&mut self) {
        self.progress = Progress::Fresh;
        self.bound = false;
        self.body.reset();
    }
}
