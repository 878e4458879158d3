//! # Script engine - line-oriented flow compiler and executor
//!
//! Scripts are plain text, one statement per line. Running one is a
//! two-phase pipeline:
//!
//! 1. **Flow compilation**: a single forward pass builds a sparse jump table
//!    (line index to [`FlowNode`]) that resolves every IF/ELSE/ENDIF,
//!    WHILE/ENDW/BREAKW, GOTO, and CALL to absolute line targets, and
//!    rejects malformed nesting and unknown labels before anything runs.
//! 2. **Execution**: a program counter walks the line array, consulting the
//!    jump table for control lines and handing everything else to the
//!    statement dispatcher.
//!
//! ## Core principles
//!
//! 1. **Resolve ahead of time**: every runtime control decision is an O(1)
//!    table lookup plus at most one condition evaluation. No scanning for
//!    block ends during execution.
//! 2. **Session-owned state**: the program counter, halt flag, and call
//!    stack live in a per-run session, so a compiled [`Program`] can be run
//!    any number of times, including concurrently from different threads
//!    with separate evaluators.
//! 3. **Expressions are foreign**: the engine never parses expression text.
//!    Conditions, SET right-hand sides, and plain statements go to the
//!    [`Evaluator`] as raw text; [`ExprEvaluator`] is the default.
//!
//! ```
//! use tempo_core::script::{Script, Val};
//!
//! let mut script = Script::new();
//! script.set_var("Ctr", Val::Num(0.0));
//! script
//!     .run("WHILE Ctr < 3\n SET Ctr = Ctr + 1\nENDW")
//!     .unwrap();
//! assert_eq!(script.get_var("Ctr"), Some(Val::Num(3.0)));
//! ```

pub mod compiler;
pub mod errors;
pub mod evaluator;
pub mod executor;
pub mod expr;
pub mod host;
pub mod line;
pub mod statements;
pub mod value;

#[cfg(test)]
mod tests;

pub use compiler::{compile, FlowNode, FlowTable, Program};
pub use errors::{
    CompileError, CompileErrorKind, RuntimeError, RuntimeErrorKind, ScriptError,
};
pub use evaluator::{EvalError, Evaluator};
pub use executor::execute;
pub use expr::ExprEvaluator;
pub use host::{HostObject, Record};
pub use value::Val;

/// A script host: one evaluator (variables plus bound objects) that persists
/// across runs.
///
/// Each [`run`](Script::run) compiles from scratch and executes with fresh
/// per-run state, while the environment accumulates. To reuse a compiled
/// script instead, pair [`compile`] with [`execute`] directly.
pub struct Script<E: Evaluator = ExprEvaluator> {
    eval: E,
}

impl Script<ExprEvaluator> {
    pub fn new() -> Self {
        Self {
            eval: ExprEvaluator::new(),
        }
    }
}

impl Default for Script<ExprEvaluator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Evaluator> Script<E> {
    /// Build a host around a custom evaluator.
    pub fn with_evaluator(eval: E) -> Self {
        Self { eval }
    }

    /// Make a host object visible to scripts under `name`.
    pub fn bind(&mut self, name: &str, object: Box<dyn HostObject>) {
        self.eval.bind(name, object);
    }

    pub fn set_var(&mut self, name: &str, value: Val) {
        self.eval.set_var(name, value);
    }

    pub fn get_var(&self, name: &str) -> Option<Val> {
        self.eval.get_var(name)
    }

    /// Compile and run `source`. On failure the environment keeps every
    /// mutation made before the failing line.
    pub fn run(&mut self, source: &str) -> Result<(), ScriptError> {
        let program = compile(source)?;
        execute(&program, &mut self.eval)?;
        Ok(())
    }

    pub fn evaluator(&self) -> &E {
        &self.eval
    }

    pub fn evaluator_mut(&mut self) -> &mut E {
        &mut self.eval
    }

    pub fn into_evaluator(self) -> E {
        self.eval
    }
}
