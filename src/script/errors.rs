//! Error types for the two failure tiers: structural errors caught while
//! compiling the flow table, and runtime errors raised while executing.
//!
//! Both tiers render the same way so callers can print any failure directly:
//!
//! ```text
//! <message> - Line: <1-based line number>
//! <source line text>
//! ```

use thiserror::Error;

use crate::script::evaluator::EvalError;

/// Structural problems found while building the flow table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileErrorKind {
    #[error("unmatched ELSE")]
    UnmatchedElse,

    #[error("ENDIF without IF")]
    EndifWithoutIf,

    #[error("ENDW without WHILE")]
    EndwWithoutWhile,

    #[error("BREAKW outside WHILE")]
    BreakOutsideWhile,

    #[error("IF without ENDIF")]
    MissingEndif,

    #[error("WHILE without ENDW")]
    MissingEndw,

    #[error("label not found: {0}")]
    LabelNotFound(String),
}

/// A compile failure pinned to the line that caused it.
///
/// `line` is a 0-based index into the compiled line array; the display form
/// shows it 1-based. Unclosed blocks report the opening line, everything
/// else the offending line itself.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} - Line: {}\n{}", .kind, .line + 1, .text)]
pub struct CompileError {
    pub kind: CompileErrorKind,
    pub line: usize,
    pub text: String,
}

/// What went wrong while executing a line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeErrorKind {
    #[error("RETURN without CALL")]
    ReturnWithoutCall,

    /// SET with no `=` in its tail.
    #[error("Syntax Error")]
    SetWithoutAssign,

    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// A runtime failure pinned to the last line the engine attempted.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} - Line: {}\n{}", .kind, .line + 1, .text)]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub line: usize,
    pub text: String,
}

/// Either failure tier, for callers that compile and run in one step.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScriptError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_errors_render_one_based_with_source_text() {
        let err = CompileError {
            kind: CompileErrorKind::UnmatchedElse,
            line: 2,
            text: "ELSE".into(),
        };
        assert_eq!(err.to_string(), "unmatched ELSE - Line: 3\nELSE");
    }

    #[test]
    fn runtime_errors_render_the_same_shape() {
        let err = RuntimeError {
            kind: RuntimeErrorKind::Eval(EvalError::UndefinedVariable("Nope".into())),
            line: 0,
            text: "Nope".into(),
        };
        assert_eq!(err.to_string(), "undefined variable: Nope - Line: 1\nNope");
    }
}
