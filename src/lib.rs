pub mod cli;
pub mod script;

// Re-export the engine surface
pub use script::{
    compile, execute, CompileError, CompileErrorKind, EvalError, Evaluator, ExprEvaluator,
    FlowNode, FlowTable, HostObject, Program, Record, RuntimeError, RuntimeErrorKind, Script,
    ScriptError, Val,
};
