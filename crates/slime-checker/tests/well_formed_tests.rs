//! Well-formedness checker tests.
//!
//! Tests for:
//! - E600: break outside any loop
//! - E601: action inside a foreach body
//! - E500: duplicate declaration
//! - E201: declared type vs initial value
//! - E602: endless empty loop (warning)

use slime_types::{
    Command, Direction, ErrorCode, Expr, ForEach, ObjectKind, Severity, SortOrder, Span, Stmt,
    StmtKind, Value, VarDecl, VarType,
};

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

fn check(main: &Stmt, variables: &[VarDecl]) -> slime_types::CheckErrors {
    slime_checker::check_program(main, variables)
}

fn assert_ok(main: &Stmt, variables: &[VarDecl]) {
    let errors = check(main, variables);
    assert!(
        !errors.has_errors(),
        "expected no errors, got {}:\n{}",
        errors.total_errors,
        errors
            .errors
            .iter()
            .map(|e| format!("  [{}] {}", e.code, e.message))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

fn assert_error(main: &Stmt, variables: &[VarDecl], expected_code: ErrorCode) {
    let errors = check(main, variables);
    assert!(
        errors.has_errors(),
        "expected error {:?}, but got no errors",
        expected_code
    );
    assert!(
        errors.contains(expected_code),
        "expected error code {:?}, got codes: {:?}",
        expected_code,
        errors
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.code, e.message))
            .collect::<Vec<_>>()
    );
}

fn foreach(body: Stmt) -> Stmt {
    Stmt::new(
        StmtKind::ForEach(Box::new(ForEach {
            variable: "o".into(),
            kind: ObjectKind::Any,
            filter: None,
            sort: None,
            order: SortOrder::Ascending,
            body,
        })),
        Span::new(1, 1),
    )
}

fn start_run_left() -> Stmt {
    Stmt::action(Command::StartRun(Expr::direction(Direction::Left)))
}

fn lt(name: &str, n: f64) -> Expr {
    Expr::binary(Expr::variable(name), slime_types::BinOp::Less, Expr::number(n))
}

// ══════════════════════════════════════════════════════════════════════════════
// Break scope (E600)
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn break_at_top_level_rejected() {
    let main = Stmt::sequence(vec![Stmt::assign("a", Expr::number(1.0)), Stmt::brk()]);
    assert_error(&main, &[VarDecl::new("a", VarType::Number)], ErrorCode::BREAK_OUTSIDE_LOOP);
}

#[test]
fn break_inside_if_outside_loop_rejected() {
    let main = Stmt::if_then(Expr::boolean(true), Stmt::brk(), None);
    assert_error(&main, &[], ErrorCode::BREAK_OUTSIDE_LOOP);
}

#[test]
fn break_inside_while_accepted() {
    let main = Stmt::while_do(Expr::boolean(true), Stmt::brk());
    assert_ok(&main, &[]);
}

#[test]
fn break_nested_in_if_inside_while_accepted() {
    let main = Stmt::while_do(
        lt("a", 3.0),
        Stmt::sequence(vec![
            Stmt::if_then(Expr::boolean(true), Stmt::brk(), None),
            Stmt::assign("a", Expr::number(1.0)),
        ]),
    );
    assert_ok(&main, &[VarDecl::new("a", VarType::Number)]);
}

#[test]
fn break_inside_foreach_accepted() {
    assert_ok(&foreach(Stmt::brk()), &[]);
}

#[test]
fn break_after_loop_rejected() {
    let main = Stmt::sequence(vec![
        Stmt::while_do(Expr::boolean(false), Stmt::sequence(vec![])),
        Stmt::brk(),
    ]);
    assert_error(&main, &[], ErrorCode::BREAK_OUTSIDE_LOOP);
}

// ══════════════════════════════════════════════════════════════════════════════
// Actions inside foreach (E601)
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn action_directly_in_foreach_rejected() {
    assert_error(&foreach(start_run_left()), &[], ErrorCode::ACTION_IN_FOREACH);
}

#[test]
fn action_nested_in_while_inside_foreach_rejected() {
    let body = Stmt::while_do(
        Expr::boolean(true),
        Stmt::sequence(vec![Stmt::action(Command::StartJump), Stmt::brk()]),
    );
    assert_error(&foreach(body), &[], ErrorCode::ACTION_IN_FOREACH);
}

#[test]
fn action_in_while_outside_foreach_accepted() {
    let main = Stmt::while_do(Expr::boolean(true), start_run_left());
    assert_ok(&main, &[]);
}

#[test]
fn action_after_foreach_accepted() {
    let main = Stmt::sequence(vec![
        foreach(Stmt::assign("x", Expr::variable("o"))),
        Stmt::action(Command::StartDuck),
    ]);
    assert_ok(&main, &[VarDecl::new("x", VarType::Object)]);
}

// ══════════════════════════════════════════════════════════════════════════════
// Declarations
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn duplicate_declaration_rejected() {
    let vars = [
        VarDecl::new("a", VarType::Number),
        VarDecl::new("a", VarType::Boolean),
    ];
    assert_error(&Stmt::sequence(vec![]), &vars, ErrorCode::VARIABLE_ALREADY_DECLARED);
}

#[test]
fn initial_value_of_wrong_type_rejected() {
    let mut decl = VarDecl::new("a", VarType::Number);
    decl.initial = Value::Boolean(true);
    assert_error(&Stmt::sequence(vec![]), &[decl], ErrorCode::TYPE_MISMATCH);
}

// ══════════════════════════════════════════════════════════════════════════════
// Warnings (E602)
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn endless_empty_loop_warns_but_is_accepted() {
    let main = Stmt::new(
        StmtKind::While {
            condition: Expr::boolean(true),
            body: Box::new(Stmt::sequence(vec![Stmt::sequence(vec![])])),
        },
        Span::new(3, 1),
    );
    let errors = check(&main, &[]);
    assert!(!errors.has_errors());
    assert_eq!(errors.total_warnings, 1);
    assert_eq!(errors.warnings[0].code, ErrorCode::ENDLESS_EMPTY_LOOP);
    assert_eq!(errors.warnings[0].severity, Severity::Warning);
    assert_eq!(errors.warnings[0].span, Span::new(3, 1));
}

#[test]
fn loops_that_do_work_or_may_stop_do_not_warn() {
    let busy = Stmt::while_do(Expr::boolean(true), Stmt::brk());
    let guarded = Stmt::while_do(lt("a", 3.0), Stmt::sequence(vec![]));
    for main in [busy, guarded] {
        assert_eq!(check(&main, &[VarDecl::new("a", VarType::Number)]).total_warnings, 0);
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Reporting
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn all_errors_collected_not_fail_fast() {
    let main = Stmt::sequence(vec![Stmt::brk(), foreach(start_run_left()), Stmt::brk()]);
    let errors = check(&main, &[]);
    assert_eq!(errors.total_errors, 3);
}

#[test]
fn errors_carry_the_offending_span() {
    let brk = Stmt::new(StmtKind::Break, Span::new(7, 3));
    let errors = check(&brk, &[]);
    assert_eq!(errors.errors[0].span, Span::new(7, 3));
    assert!(errors.errors[0].suggestion.is_some());
}

#[test]
fn error_report_serializes_to_json() {
    let errors = check(&Stmt::brk(), &[]);
    let json = errors.to_json();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["total_errors"], 1);
    assert_eq!(parsed["errors"][0]["code"], 600);
}

#[test]
fn is_well_formed_shorthand() {
    assert!(slime_checker::is_well_formed(&Stmt::sequence(vec![]), &[]));
    assert!(!slime_checker::is_well_formed(&Stmt::brk(), &[]));
}
