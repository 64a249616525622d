//! Run Slime programs against a sandbox world loaded from JSON.
//!
//! The binary in `main.rs` is a thin shell over [`run`]; the pieces live
//! here so they can be tested without spawning a process.

pub mod logging;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use slime_eval::{BuildError, Program, ProgramConfig};
use slime_types::{CheckErrors, EntityId, Stmt, Value, VarDecl};
use slime_world::{SandboxWorld, World};
use std::collections::BTreeMap;

/// A program as shipped in JSON: its globals and its main statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramFile {
    #[serde(default)]
    pub variables: Vec<VarDecl>,
    pub main: Stmt,
}

impl ProgramFile {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// What a finished run looked like.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub entity: EntityId,
    pub ticks: u64,
    pub passes: u64,
    pub output: Vec<String>,
    pub variables: BTreeMap<String, Value>,
    pub error: Option<String>,
}

#[derive(Debug)]
pub enum Outcome {
    /// The program was not well-formed and never ran.
    Rejected(CheckErrors),
    Ran(RunReport),
}

/// Pick the entity to script: `requested` if given, else the first one.
pub fn resolve_entity(world: &SandboxWorld, requested: Option<u32>) -> Result<EntityId> {
    match requested {
        Some(raw) => {
            let id = EntityId(raw);
            if world.entity(id).is_none() {
                bail!("world has no {id}");
            }
            Ok(id)
        }
        None => match world.entity_ids().first() {
            Some(id) => Ok(*id),
            None => bail!("world has no entities to attach the program to"),
        },
    }
}

/// Build `file` into a program, attach it to `entity`, and advance it
/// `ticks` times (stopping early on a runtime error).
pub fn run(
    world: &mut SandboxWorld,
    file: ProgramFile,
    entity: EntityId,
    ticks: u64,
    config: ProgramConfig,
) -> Result<Outcome> {
    let mut program = match Program::from_ast(file.main, file.variables, config) {
        Ok(program) => program,
        Err(BuildError::Check(errors)) => return Ok(Outcome::Rejected(errors)),
        Err(err @ BuildError::Config(_)) => return Err(err.into()),
    };
    program.attach(entity)?;
    log::debug!("running {entity} for {ticks} ticks");

    for _ in 0..ticks {
        program.advance(world);
        if program.has_error() {
            break;
        }
    }

    Ok(Outcome::Ran(RunReport {
        entity,
        ticks: program.ticks(),
        passes: program.passes(),
        output: program.take_output(),
        variables: program.environment().snapshot(),
        error: program.error().map(ToString::to_string),
    }))
}
