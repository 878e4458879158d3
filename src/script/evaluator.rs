//! The seam between the engine and the expression layer.
//!
//! The engine never parses expression text itself. Conditions, assignments,
//! and plain statement lines are handed to an [`Evaluator`] as raw text, and
//! the engine only consumes the resulting value. [`crate::script::expr`]
//! provides the default implementation; embedders can swap in their own.

use thiserror::Error;

use crate::script::host::HostObject;
use crate::script::value::Val;

/// Failures surfaced by the expression layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("undefined variable: {0}")]
    UndefinedVariable(String),

    #[error("unknown object: {0}")]
    UnknownObject(String),

    #[error("unknown method: {0}")]
    UnknownMethod(String),

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("division by zero")]
    DivisionByZero,

    /// Error raised inside a host object's method.
    #[error("{0}")]
    Host(String),
}

/// Expression evaluation services the engine depends on.
///
/// The evaluator owns the variable environment and every bound host object,
/// and it outlives individual runs. Mutations made before a failing line are
/// deliberately kept.
pub trait Evaluator {
    /// Make a host object visible to scripts under `name`.
    fn bind(&mut self, name: &str, object: Box<dyn HostObject>);

    /// Create or overwrite a variable.
    fn set_var(&mut self, name: &str, value: Val);

    fn get_var(&self, name: &str) -> Option<Val>;

    /// Evaluate expression text to a value.
    fn eval(&mut self, text: &str) -> Result<Val, EvalError>;

    /// Evaluate a branch condition. Anything but a boolean is an error;
    /// conditions are never coerced.
    fn eval_bool(&mut self, text: &str) -> Result<bool, EvalError> {
        match self.eval(text)? {
            Val::Bool(b) => Ok(b),
            other => Err(EvalError::TypeMismatch(format!(
                "condition evaluated to {}, expected a boolean",
                other.type_name()
            ))),
        }
    }

    /// Run statement text for its side effects, discarding the value.
    fn exec(&mut self, text: &str) -> Result<(), EvalError> {
        self.eval(text).map(|_| ())
    }
}
