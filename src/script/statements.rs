//! Statement dispatcher: executes lines that carry no flow node.
//!
//! Control lines never get here; the executor consumed their flow nodes
//! already. What remains is comments and labels (no-ops), STOP, RETURN,
//! SET, and plain statements handed to the evaluator as text.

use crate::script::errors::RuntimeErrorKind;
use crate::script::evaluator::Evaluator;
use crate::script::line::LineKind;

/// Where execution goes after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    /// Fall through to the following line.
    Advance,
    /// Continue at an absolute line index.
    Jump(usize),
    /// The script asked to stop; no further lines run.
    Halt,
}

pub fn dispatch(
    kind: LineKind<'_>,
    calls: &mut Vec<usize>,
    eval: &mut dyn Evaluator,
) -> Result<Next, RuntimeErrorKind> {
    match kind {
        LineKind::Comment | LineKind::Label(_) => Ok(Next::Advance),
        LineKind::Stop => Ok(Next::Halt),
        LineKind::Return => match calls.pop() {
            Some(call_line) => Ok(Next::Jump(call_line + 1)),
            None => Err(RuntimeErrorKind::ReturnWithoutCall),
        },
        LineKind::Set(rest) => {
            let (name, expr) = match rest.split_once('=') {
                Some((name, expr)) => (name.trim(), expr),
                None => return Err(RuntimeErrorKind::SetWithoutAssign),
            };
            let value = eval.eval(expr)?;
            eval.set_var(name, value);
            Ok(Next::Advance)
        }
        LineKind::Statement(text) => {
            eval.exec(text)?;
            Ok(Next::Advance)
        }
        // Control keyword lines always carry a flow node, so the executor
        // never routes them here.
        _ => unreachable!("control line reached the statement dispatcher"),
    }
}
