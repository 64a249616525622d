use anyhow::{Context, Result};
use clap::Parser;
use slime_eval::ProgramConfig;
use slime_sandbox::{logging, resolve_entity, run, Outcome, ProgramFile};
use slime_world::SandboxWorld;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Run a Slime script against a sandbox world
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// World layout (JSON)
    #[arg(long)]
    world: PathBuf,

    /// Program: `{ "variables": [...], "main": ... }` (JSON)
    #[arg(long)]
    program: PathBuf,

    /// Id of the entity the program commands; defaults to the first one
    #[arg(long)]
    entity: Option<u32>,

    /// Number of ticks to run
    #[arg(long, default_value_t = 100)]
    ticks: u64,

    /// Interpreter config (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn try_main(args: Args) -> Result<ExitCode> {
    let mut world = SandboxWorld::from_json(&read(&args.world)?)
        .with_context(|| format!("Failed to load world {}", args.world.display()))?;
    let program = ProgramFile::from_json(&read(&args.program)?)
        .with_context(|| format!("Failed to parse program {}", args.program.display()))?;
    let config = match &args.config {
        Some(path) => ProgramConfig::from_json(&read(path)?)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ProgramConfig::default(),
    };
    let entity = resolve_entity(&world, args.entity)?;

    match run(&mut world, program, entity, args.ticks, config)? {
        Outcome::Rejected(errors) => {
            println!("{}", errors.to_json());
            Ok(ExitCode::FAILURE)
        }
        Outcome::Ran(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(if report.error.is_some() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    match try_main(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
