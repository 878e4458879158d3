//! Shared helpers for the engine tests.

use crate::script::{Script, ScriptError, Val};

/// Run a script in a fresh environment, panicking with the rendered error
/// on failure.
pub fn run(source: &str) -> Script {
    let mut script = Script::new();
    if let Err(err) = script.run(source) {
        panic!("script failed:\n{}", err);
    }
    script
}

/// Run a script that is expected to fail; returns the host so tests can
/// inspect what the run mutated before failing.
pub fn run_err(source: &str) -> (Script, ScriptError) {
    let mut script = Script::new();
    let err = script.run(source).expect_err("script should have failed");
    (script, err)
}

/// Read a numeric variable after a run.
pub fn num(script: &Script, name: &str) -> f64 {
    match script.get_var(name) {
        Some(Val::Num(n)) => n,
        other => panic!("{} should be a number, got {:?}", name, other),
    }
}

/// Read a string variable after a run.
pub fn text(script: &Script, name: &str) -> String {
    match script.get_var(name) {
        Some(Val::Str(s)) => s,
        other => panic!("{} should be a string, got {:?}", name, other),
    }
}
