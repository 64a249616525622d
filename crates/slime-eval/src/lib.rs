//! Slime interpreter.
//!
//! Programs are syntax trees lowered into resumable nodes. A host creates
//! one [`Program`] per scripted entity, attaches it, and calls
//! [`Program::advance`] once per simulation tick (or [`Program::run_for`]
//! with elapsed time). Every tick performs at most one unit of work, so
//! any number of programs interleave on one thread without blocking.
//!
//! ```ignore
//! let factory = AstFactory::new();
//! let mut program = factory.create_program(main, variables)?;
//! program.attach(slime)?;
//! loop {
//!     program.advance(&mut world);
//! }
//! ```

pub mod config;
pub mod env;
pub mod error;
pub mod evaluator;
pub mod exec;
pub mod factory;
pub mod loops;
pub mod program;
pub mod search;

pub use config::{ConfigError, ProgramConfig};
pub use env::Environment;
pub use error::{BuildError, EvalError, EvalResult};
pub use evaluator::Evaluator;
pub use exec::{Flow, Node, Resumable};
pub use factory::AstFactory;
pub use program::{Program, MAX_CATCH_UP_TICKS};
pub use search::{distance, lies_in_direction, overlaps, search_object};
