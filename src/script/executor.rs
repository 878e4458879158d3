//! Execution engine: a program counter walking a compiled [`Program`].
//!
//! Each step consults the flow table. Control lines resolve to the exact
//! next line index in one lookup (plus at most one condition evaluation);
//! everything else goes through the statement dispatcher. The first failing
//! line ends the run, and the evaluator keeps every mutation made before it.

use tracing::{debug, trace};

use crate::script::compiler::{FlowNode, Program};
use crate::script::errors::{RuntimeError, RuntimeErrorKind};
use crate::script::evaluator::Evaluator;
use crate::script::line::{classify, LineKind};
use crate::script::statements::{dispatch, Next};

/// Per-run state. Built fresh for every [`execute`] call, so a compiled
/// program can be reused across independent runs and nothing leaks between
/// them.
#[derive(Debug, Default)]
struct Session {
    /// Index of the line being executed.
    pc: usize,
    /// Set by STOP.
    halted: bool,
    /// Return addresses: the line index of each active CALL, innermost last.
    calls: Vec<usize>,
}

/// Run a compiled program against an evaluator.
///
/// Completion is reaching past the last line or an explicit STOP. A script
/// that ends with calls still pending simply ends; only RETURN without a
/// pending CALL is an error.
pub fn execute(program: &Program, eval: &mut dyn Evaluator) -> Result<(), RuntimeError> {
    let mut session = Session::default();

    while session.pc < program.lines.len() && !session.halted {
        let next = step(program, &mut session, eval).map_err(|kind| RuntimeError {
            kind,
            line: session.pc,
            text: program.lines[session.pc].clone(),
        })?;
        match next {
            Next::Advance => session.pc += 1,
            Next::Jump(target) => session.pc = target,
            Next::Halt => session.halted = true,
        }
    }

    debug!(
        halted = session.halted,
        pending_calls = session.calls.len(),
        "run finished"
    );
    Ok(())
}

fn step(
    program: &Program,
    session: &mut Session,
    eval: &mut dyn Evaluator,
) -> Result<Next, RuntimeErrorKind> {
    let pc = session.pc;
    let line = &program.lines[pc];

    let Some(node) = program.flow.get(&pc) else {
        trace!(line = pc + 1, text = %line, "statement");
        return dispatch(classify(line), &mut session.calls, eval);
    };

    let next = match node {
        FlowNode::If { else_entry, end } => {
            if eval.eval_bool(condition_of(line))? {
                Next::Advance
            } else if let Some(else_line) = else_entry {
                Next::Jump(else_line + 1)
            } else {
                Next::Jump(end + 1)
            }
        }
        // Reached only by falling through the true branch; the false branch
        // jumps straight into the else body.
        FlowNode::Else { owner } => Next::Jump(if_end(program, *owner) + 1),
        FlowNode::EndIf { .. } => Next::Advance,
        FlowNode::While { end } => {
            if eval.eval_bool(condition_of(line))? {
                Next::Advance
            } else {
                Next::Jump(end + 1)
            }
        }
        FlowNode::BreakW { owner } => Next::Jump(while_end(program, *owner) + 1),
        // Back to the WHILE line itself, so the condition decides again.
        FlowNode::EndW { owner } => Next::Jump(*owner),
        FlowNode::Goto { target } => Next::Jump(target + 1),
        FlowNode::Call { target } => {
            session.calls.push(pc);
            Next::Jump(target + 1)
        }
    };

    trace!(line = pc + 1, ?next, "flow");
    Ok(next)
}

/// Condition text of an IF or WHILE line.
fn condition_of(line: &str) -> &str {
    match classify(line) {
        LineKind::If(cond) | LineKind::While(cond) => cond,
        _ => unreachable!("branch node on a line without a condition"),
    }
}

fn if_end(program: &Program, owner: usize) -> usize {
    match program.flow.get(&owner) {
        Some(FlowNode::If { end, .. }) => *end,
        _ => unreachable!("ELSE anchored to a non-IF line"),
    }
}

fn while_end(program: &Program, owner: usize) -> usize {
    match program.flow.get(&owner) {
        Some(FlowNode::While { end }) => *end,
        _ => unreachable!("BREAKW anchored to a non-WHILE line"),
    }
}
