//! Flow compiler: a single forward pass that turns source text into a
//! [`Program`], resolving every control construct to absolute line targets
//! before anything executes.
//!
//! Nesting is validated with one open-block stack per construct kind. When a
//! closer or an ELSE arrives, the innermost open block claims it; openers
//! left on a stack at end of input are unclosed blocks, reported against the
//! outermost opening line.

use std::collections::HashMap;

use tracing::debug;

use crate::script::errors::{CompileError, CompileErrorKind};
use crate::script::line::{classify, split_lines, LineKind};

/// Jump metadata for one control line. Lines absent from the flow table are
/// plain statements.
///
/// Targets are the control line itself (`end`, `owner`, label lines); the
/// executor lands one past them, so marker lines are never re-dispatched.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowNode {
    If {
        /// Line of the matching ELSE, if the block has one.
        else_entry: Option<usize>,
        /// Line of the matching ENDIF.
        end: usize,
    },
    Else {
        /// Line of the owning IF.
        owner: usize,
    },
    EndIf {
        owner: usize,
    },
    While {
        /// Line of the matching ENDW.
        end: usize,
    },
    EndW {
        /// Line of the owning WHILE.
        owner: usize,
    },
    BreakW {
        /// Line of the innermost WHILE this break exits.
        owner: usize,
    },
    Goto {
        /// Label line to jump past.
        target: usize,
    },
    Call {
        /// Label line of the subroutine entry.
        target: usize,
    },
}

/// Sparse jump table: line index to flow node.
pub type FlowTable = HashMap<usize, FlowNode>;

/// A compiled script: the normalized line array plus its jump table.
/// Immutable once built; reusable across any number of runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub lines: Vec<String>,
    pub flow: FlowTable,
}

/// Compile source text into a [`Program`].
///
/// The pass never evaluates anything; conditions stay as text on their
/// lines. The first structural problem aborts compilation.
pub fn compile(source: &str) -> Result<Program, CompileError> {
    let lines = split_lines(source);

    // Labels first, so GOTO and CALL can resolve forward references in the
    // same pass. First occurrence wins.
    let mut labels: HashMap<&str, usize> = HashMap::new();
    for (idx, line) in lines.iter().enumerate() {
        if let LineKind::Label(name) = classify(line) {
            labels.entry(name).or_insert(idx);
        }
    }

    let mut flow = FlowTable::new();
    let mut if_stack: Vec<usize> = Vec::new();
    let mut while_stack: Vec<usize> = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        match classify(line) {
            LineKind::If(_) => {
                if_stack.push(idx);
                // end is patched when the matching ENDIF arrives; unclosed
                // blocks fail compilation below.
                flow.insert(
                    idx,
                    FlowNode::If {
                        else_entry: None,
                        end: 0,
                    },
                );
            }
            LineKind::Else => {
                let owner = match if_stack.last() {
                    Some(&owner) => owner,
                    None => return Err(fail(&lines, idx, CompileErrorKind::UnmatchedElse)),
                };
                match flow.get_mut(&owner) {
                    Some(FlowNode::If { else_entry, .. }) if else_entry.is_none() => {
                        *else_entry = Some(idx);
                    }
                    // Second ELSE for the same IF.
                    _ => return Err(fail(&lines, idx, CompileErrorKind::UnmatchedElse)),
                }
                flow.insert(idx, FlowNode::Else { owner });
            }
            LineKind::EndIf => {
                let owner = match if_stack.pop() {
                    Some(owner) => owner,
                    None => return Err(fail(&lines, idx, CompileErrorKind::EndifWithoutIf)),
                };
                if let Some(FlowNode::If { end, .. }) = flow.get_mut(&owner) {
                    *end = idx;
                }
                flow.insert(idx, FlowNode::EndIf { owner });
            }
            LineKind::While(_) => {
                while_stack.push(idx);
                flow.insert(idx, FlowNode::While { end: 0 });
            }
            LineKind::BreakW => {
                let owner = match while_stack.last() {
                    Some(&owner) => owner,
                    None => return Err(fail(&lines, idx, CompileErrorKind::BreakOutsideWhile)),
                };
                // The loop's end is unknown until its ENDW arrives; the
                // executor reads it through the owner.
                flow.insert(idx, FlowNode::BreakW { owner });
            }
            LineKind::EndW => {
                let owner = match while_stack.pop() {
                    Some(owner) => owner,
                    None => return Err(fail(&lines, idx, CompileErrorKind::EndwWithoutWhile)),
                };
                if let Some(FlowNode::While { end }) = flow.get_mut(&owner) {
                    *end = idx;
                }
                flow.insert(idx, FlowNode::EndW { owner });
            }
            LineKind::Goto(name) => {
                let target = match labels.get(name) {
                    Some(&target) => target,
                    None => {
                        return Err(fail(
                            &lines,
                            idx,
                            CompileErrorKind::LabelNotFound(name.to_string()),
                        ));
                    }
                };
                flow.insert(idx, FlowNode::Goto { target });
            }
            LineKind::Call(name) => {
                let target = match labels.get(name) {
                    Some(&target) => target,
                    None => {
                        return Err(fail(
                            &lines,
                            idx,
                            CompileErrorKind::LabelNotFound(name.to_string()),
                        ));
                    }
                };
                flow.insert(idx, FlowNode::Call { target });
            }
            // Everything else is the dispatcher's problem at runtime.
            _ => {}
        }
    }

    if let Some(&open) = if_stack.first() {
        return Err(fail(&lines, open, CompileErrorKind::MissingEndif));
    }
    if let Some(&open) = while_stack.first() {
        return Err(fail(&lines, open, CompileErrorKind::MissingEndw));
    }

    debug!(lines = lines.len(), nodes = flow.len(), "compiled flow table");

    Ok(Program { lines, flow })
}

fn fail(lines: &[String], line: usize, kind: CompileErrorKind) -> CompileError {
    CompileError {
        kind,
        line,
        text: lines[line].clone(),
    }
}
