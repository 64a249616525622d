//! A runnable script bound to one entity.

use crate::config::ProgramConfig;
use crate::env::Environment;
use crate::error::{BuildError, EvalError, EvalResult};
use crate::evaluator::Evaluator;
use crate::exec::{Flow, Node, Resumable};
use rand::rngs::StdRng;
use rand::SeedableRng;
use slime_types::{CheckErrors, EntityId, Stmt, Value, VarDecl};
use slime_world::World;

/// Most ticks a single [`Program::run_for`] call runs. Real time beyond
/// that is dropped rather than replayed.
pub const MAX_CATCH_UP_TICKS: u64 = 10_000;

/// A well-formed script plus everything it needs between ticks.
///
/// Each [`Program::advance`] performs at most one unit of work. When a pass
/// over the statement tree completes, the next tick restores every variable
/// to its initial value and starts over, so a program runs forever until it
/// hits a runtime error. Errors are sticky.
#[derive(Debug)]
pub struct Program {
    root: Node,
    env: Environment,
    entity: Option<EntityId>,
    error: Option<EvalError>,
    config: ProgramConfig,
    rng: StdRng,
    output: Vec<String>,
    ticks: u64,
    passes: u64,
    /// Real time received by `run_for` not yet turned into ticks.
    pending_seconds: f64,
}

impl Program {
    /// Validate `config`, check a syntax tree and build a program from it.
    pub fn from_ast(
        main: Stmt,
        variables: Vec<VarDecl>,
        config: ProgramConfig,
    ) -> Result<Self, BuildError> {
        config.validate()?;
        Ok(Self::checked(main, variables, config)?)
    }

    /// Build with a config the caller has already validated.
    pub(crate) fn checked(
        main: Stmt,
        variables: Vec<VarDecl>,
        config: ProgramConfig,
    ) -> Result<Self, CheckErrors> {
        let errors = slime_checker::check_program(&main, &variables);
        if errors.has_errors() {
            return Err(errors);
        }
        for warning in &errors.warnings {
            log::warn!("{warning}");
        }
        let env = Environment::from_declarations(&variables);
        Ok(Self {
            root: Node::lower(main),
            env,
            entity: None,
            error: None,
            rng: StdRng::seed_from_u64(config.rng_seed),
            config,
            output: Vec::new(),
            ticks: 0,
            passes: 0,
            pending_seconds: 0.0,
        })
    }

    /// Bind the program to the entity it commands. Only once.
    pub fn attach(&mut self, entity: EntityId) -> EvalResult<()> {
        match self.entity {
            Some(current) => Err(EvalError::AlreadyAttached(current)),
            None => {
                self.entity = Some(entity);
                Ok(())
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Execution
    // ══════════════════════════════════════════════════════════════════════

    /// One tick: at most one unit of work.
    pub fn advance(&mut self, world: &mut dyn World) {
        if self.error.is_some() {
            return;
        }
        let Some(this) = self.entity else {
            self.fail(EvalError::Detached);
            return;
        };

        self.ticks += 1;
        if !self.root.has_pending_work() {
            self.root.reset();
            self.env.restore_initial();
            self.passes += 1;
            log::debug!("{this}: pass {} complete, restarting", self.passes);
        }
        if !self.root.has_pending_work() {
            return;
        }

        let mut ev = Evaluator::new(
            &mut self.env,
            world,
            this,
            &mut self.rng,
            &self.config,
            &mut self.output,
        );
        match self.root.step_once(&mut ev) {
            Ok(Flow::Normal) => {}
            Ok(Flow::Break) => self.fail(EvalError::UncaughtBreak),
            Err(err) => self.fail(err),
        }
    }

    /// Drive the program by elapsed real time: one tick per whole
    /// `seconds_per_tick` received, carrying the remainder. At most
    /// [`MAX_CATCH_UP_TICKS`] run per call. Returns the number of ticks run.
    pub fn run_for(&mut self, world: &mut dyn World, seconds: f64) -> u64 {
        if seconds.is_finite() && seconds > 0.0 {
            self.pending_seconds += seconds;
        }
        let step = self.config.seconds_per_tick;
        // Absorb float noise such as 0.003 / 0.001 = 2.9999999999999996.
        let due = (self.pending_seconds / step + 1e-9).floor().max(0.0);
        let due = if due <= MAX_CATCH_UP_TICKS as f64 {
            let due = due as u64;
            self.pending_seconds = (self.pending_seconds - due as f64 * step).max(0.0);
            due
        } else {
            log::warn!(
                "{}s of backlog exceeds {MAX_CATCH_UP_TICKS} ticks, dropping the rest",
                self.pending_seconds
            );
            self.pending_seconds = 0.0;
            MAX_CATCH_UP_TICKS
        };

        let mut ran = 0;
        for _ in 0..due {
            if self.error.is_some() {
                break;
            }
            self.advance(world);
            ran += 1;
        }
        ran
    }

    fn fail(&mut self, err: EvalError) {
        match self.entity {
            Some(id) => log::warn!("{id}: program stopped: {err}"),
            None => log::warn!("program stopped: {err}"),
        }
        self.error = Some(err);
    }

    // ══════════════════════════════════════════════════════════════════════
    // Observation
    // ══════════════════════════════════════════════════════════════════════

    pub fn entity(&self) -> Option<EntityId> {
        self.entity
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error(&self) -> Option<&EvalError> {
        self.error.as_ref()
    }

    /// Current value of a global (or an active loop binding).
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.env.get(name)
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Everything `print` produced so far.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    /// Number of ticks that reached the statement tree.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Number of completed passes.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn config(&self) -> &ProgramConfig {
        &self.config
    }
}
