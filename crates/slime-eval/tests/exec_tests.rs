//! Node-level tests of the resumable execution protocol.

use rand::rngs::StdRng;
use rand::SeedableRng;
use slime_eval::{Environment, EvalResult, Evaluator, Flow, Node, ProgramConfig, Resumable};
use slime_types::{BinOp, EntityId, EntityKind, Expr, Span, Stmt, StmtKind, Value, VarDecl};
use slime_world::{Rect, SandboxWorld};

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

struct Harness {
    world: SandboxWorld,
    env: Environment,
    rng: StdRng,
    config: ProgramConfig,
    output: Vec<String>,
    this: EntityId,
}

fn harness() -> Harness {
    let mut world = SandboxWorld::new(10.0, 8, 8).unwrap();
    let this = world.spawn(EntityKind::Player, Rect::new(10.0, 10.0, 10.0, 10.0), 3.0);
    Harness {
        world,
        env: Environment::from_declarations(&[VarDecl::with_initial("a", Value::Number(0.0))]),
        rng: StdRng::seed_from_u64(0),
        config: ProgramConfig::default(),
        output: Vec::new(),
        this,
    }
}

impl Harness {
    fn step(&mut self, node: &mut Node) -> EvalResult<Flow> {
        let mut ev = Evaluator::new(
            &mut self.env,
            &mut self.world,
            self.this,
            &mut self.rng,
            &self.config,
            &mut self.output,
        );
        node.step_once(&mut ev)
    }

    /// Step until the node reports no pending work; returns the step count.
    fn drain(&mut self, node: &mut Node) -> usize {
        let mut steps = 0;
        while node.has_pending_work() {
            self.step(node).unwrap();
            steps += 1;
            assert!(steps < 1000, "node never finished");
        }
        steps
    }
}

fn wait(seconds: f64) -> Node {
    Node::lower(Stmt::new(StmtKind::Wait(Expr::number(seconds)), Span::unknown()))
}

fn counting_loop(limit: f64) -> Node {
    Node::lower(Stmt::while_do(
        Expr::binary(Expr::variable("a"), BinOp::Less, Expr::number(limit)),
        Stmt::assign(
            "a",
            Expr::binary(Expr::variable("a"), BinOp::Add, Expr::number(1.0)),
        ),
    ))
}

// ══════════════════════════════════════════════════════════════════════════════
// Wait
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn wait_is_stepped_once_per_tick_of_budget() {
    let mut h = harness();
    let mut node = wait(0.003);
    let mut queries = vec![node.has_pending_work()];
    for _ in 0..3 {
        h.step(&mut node).unwrap();
        queries.push(node.has_pending_work());
    }
    assert_eq!(queries, vec![true, true, true, false]);
}

#[test]
fn wait_reset_restores_full_budget() {
    let mut h = harness();
    let mut node = wait(0.005);
    assert_eq!(h.drain(&mut node), 5);
    node.reset();
    assert!(node.has_pending_work());
    assert_eq!(h.drain(&mut node), 5);
}

#[test]
fn wait_follows_configured_tick_length() {
    let mut h = harness();
    h.config.seconds_per_tick = 0.25;
    let mut node = wait(1.0);
    assert_eq!(h.drain(&mut node), 4);
}

// ══════════════════════════════════════════════════════════════════════════════
// Reset
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn reset_then_pending_on_every_statement_kind() {
    let statements = vec![
        Stmt::assign("a", Expr::number(1.0)),
        Stmt::brk(),
        Stmt::if_then(Expr::boolean(true), Stmt::sequence(vec![]), None),
        Stmt::while_do(Expr::boolean(false), Stmt::sequence(vec![])),
        Stmt::new(StmtKind::Wait(Expr::number(0.0)), Span::unknown()),
        Stmt::new(StmtKind::Print(Expr::number(1.0)), Span::unknown()),
        Stmt::sequence(vec![Stmt::assign("a", Expr::number(1.0))]),
    ];
    let mut h = harness();
    for stmt in statements {
        let mut node = Node::lower(stmt);
        let _ = h.step(&mut node);
        node.reset();
        assert!(node.has_pending_work());
        node.reset();
        assert!(node.has_pending_work());
    }
}

#[test]
fn reset_mid_loop_restarts_from_condition() {
    let mut h = harness();
    let mut node = counting_loop(10.0);
    for _ in 0..5 {
        h.step(&mut node).unwrap();
    }
    node.reset();
    h.env.restore_initial();
    // condition, body, condition, body, ... then the final failing check
    assert_eq!(h.drain(&mut node), 21);
    assert_eq!(h.env.get("a"), Some(&Value::Number(10.0)));
}

#[test]
fn break_signals_the_caller() {
    let mut h = harness();
    let mut node = Node::lower(Stmt::brk());
    assert_eq!(h.step(&mut node).unwrap(), Flow::Break);
    assert!(!node.has_pending_work());
}

#[test]
fn loop_swallows_break() {
    let mut h = harness();
    let mut node = Node::lower(Stmt::while_do(Expr::boolean(true), Stmt::brk()));
    assert_eq!(h.step(&mut node).unwrap(), Flow::Normal);
    assert_eq!(h.step(&mut node).unwrap(), Flow::Normal);
    assert!(!node.has_pending_work());
}

#[test]
fn print_appends_to_output() {
    let mut h = harness();
    let mut node = Node::lower(Stmt::new(StmtKind::Print(Expr::this()), Span::unknown()));
    h.drain(&mut node);
    assert_eq!(h.output, vec!["entity#1".to_string()]);
}
