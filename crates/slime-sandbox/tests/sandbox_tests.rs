//! End-to-end runs of JSON programs against JSON worlds.

use slime_eval::ProgramConfig;
use slime_sandbox::{resolve_entity, run, Outcome, ProgramFile, RunReport};
use slime_types::{Direction, EntityId, ErrorCode, Value};
use slime_world::SandboxWorld;

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

const DEMO_WORLD: &str = include_str!("../demos/world.json");
const DEMO_PROGRAM: &str = include_str!("../demos/patrol.json");
const DEMO_CONFIG: &str = include_str!("../demos/config.json");

fn demo_world() -> SandboxWorld {
    SandboxWorld::from_json(DEMO_WORLD).unwrap()
}

fn ran(outcome: Outcome) -> RunReport {
    match outcome {
        Outcome::Ran(report) => report,
        Outcome::Rejected(errors) => panic!("program rejected: {}", errors.to_json()),
    }
}

fn program(json: &str) -> ProgramFile {
    ProgramFile::from_json(json).unwrap()
}

// ══════════════════════════════════════════════════════════════════════════════
// Demo program
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn demo_runs_one_full_pass() {
    let mut world = demo_world();
    let entity = resolve_entity(&world, None).unwrap();
    assert_eq!(entity, EntityId(1));

    let config = ProgramConfig::from_json(DEMO_CONFIG).unwrap();
    let report = ran(run(&mut world, program(DEMO_PROGRAM), entity, 13, config).unwrap());

    assert_eq!(report.ticks, 13);
    assert_eq!(report.passes, 0);
    assert_eq!(report.error, None);
    assert_eq!(report.output, vec!["entity#2".to_string(), "3".to_string()]);
    assert_eq!(report.variables.get("steps"), Some(&Value::Number(3.0)));
    assert_eq!(
        report.variables.get("target"),
        Some(&Value::entity(EntityId(2)))
    );
    assert_eq!(world.get(entity).unwrap().moving, Some(Direction::Right));
}

#[test]
fn demo_restarts_after_last_statement() {
    let mut world = demo_world();
    let report = ran(run(
        &mut world,
        program(DEMO_PROGRAM),
        EntityId(1),
        14,
        ProgramConfig::default(),
    )
    .unwrap());
    assert_eq!(report.passes, 1);
    // the restart tick runs the first assignment again
    assert_eq!(report.variables.get("steps"), Some(&Value::Number(0.0)));
    assert_eq!(
        report.variables.get("target"),
        Some(&Value::entity(EntityId(2)))
    );
}

#[test]
fn report_serializes_values_as_tagged_json() {
    let mut world = demo_world();
    let report = ran(run(
        &mut world,
        program(DEMO_PROGRAM),
        EntityId(1),
        2,
        ProgramConfig::default(),
    )
    .unwrap());
    let json: serde_json::Value = serde_json::to_value(&report).unwrap();
    assert_eq!(json["entity"], 1);
    assert_eq!(json["variables"]["target"]["object"]["entity"], 2);
    assert_eq!(json["variables"]["steps"]["number"], 0.0);
    assert!(json["error"].is_null());
}

// ══════════════════════════════════════════════════════════════════════════════
// Entity selection
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn explicit_entity_must_exist() {
    let world = demo_world();
    assert_eq!(resolve_entity(&world, Some(3)).unwrap(), EntityId(3));
    let err = resolve_entity(&world, Some(9)).unwrap_err();
    assert!(err.to_string().contains("entity#9"), "{err}");
}

#[test]
fn empty_world_has_nothing_to_script() {
    let world = SandboxWorld::from_json(r#"{ "terrain": ["...."] }"#).unwrap();
    assert!(resolve_entity(&world, None).is_err());
}

// ══════════════════════════════════════════════════════════════════════════════
// Failures
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn malformed_program_is_rejected_before_running() {
    let json = r#"{
        "main": {
            "kind": { "sequence": [ { "kind": "break", "span": { "line": 3, "column": 5 } } ] }
        }
    }"#;
    let mut world = demo_world();
    match run(&mut world, program(json), EntityId(1), 5, ProgramConfig::default()).unwrap() {
        Outcome::Rejected(errors) => {
            assert!(errors.contains(ErrorCode::BREAK_OUTSIDE_LOOP));
            let report: serde_json::Value = serde_json::from_str(&errors.to_json()).unwrap();
            assert_eq!(report["errors"][0]["code"], 600);
            assert_eq!(report["errors"][0]["span"]["line"], 3);
        }
        Outcome::Ran(report) => panic!("expected rejection, ran {report:?}"),
    }
}

#[test]
fn runtime_error_stops_early_and_is_reported() {
    let json = r#"{
        "variables": [ { "name": "a", "type": "number", "initial": { "number": 1 } } ],
        "main": {
            "kind": {
                "assign": {
                    "name": "a",
                    "value": {
                        "kind": {
                            "binary": {
                                "left": { "kind": { "variable": "a" } },
                                "op": "div",
                                "right": { "kind": { "constant": { "number": 0 } } }
                            }
                        }
                    }
                }
            }
        }
    }"#;
    let mut world = demo_world();
    let report = ran(run(&mut world, program(json), EntityId(1), 50, ProgramConfig::default()).unwrap());
    assert_eq!(report.ticks, 1);
    assert!(report.error.as_deref().unwrap().contains("division by zero"));
    assert_eq!(report.variables.get("a"), Some(&Value::Number(1.0)));
}

#[test]
fn invalid_config_is_reported_as_an_error() {
    let config = ProgramConfig {
        seconds_per_tick: -1.0,
        ..ProgramConfig::default()
    };
    let mut world = demo_world();
    let err = run(&mut world, program(DEMO_PROGRAM), EntityId(1), 5, config).unwrap_err();
    assert!(err.to_string().contains("seconds_per_tick"), "{err}");
}

#[test]
fn program_json_requires_main() {
    assert!(ProgramFile::from_json(r#"{ "variables": [] }"#).is_err());
}
