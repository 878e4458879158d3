//! Flow table construction and structural validation.

use maplit::hashmap;

use super::helpers::run_err;
use crate::script::{compile, CompileErrorKind, FlowNode, ScriptError};

#[test]
fn if_else_endif_resolve_to_one_node_each() {
    // Conditions are never evaluated at compile time, so an undefined
    // variable is fine here.
    let program = compile("IF A\nSET B = 1\nELSE\nSET B = 2\nENDIF").unwrap();
    assert_eq!(
        program.flow,
        hashmap! {
            0 => FlowNode::If { else_entry: Some(2), end: 4 },
            2 => FlowNode::Else { owner: 0 },
            4 => FlowNode::EndIf { owner: 0 },
        }
    );
}

#[test]
fn if_without_else_leaves_the_slot_empty() {
    let program = compile("IF A\nSET B = 1\nENDIF").unwrap();
    assert_eq!(
        program.flow,
        hashmap! {
            0 => FlowNode::If { else_entry: None, end: 2 },
            2 => FlowNode::EndIf { owner: 0 },
        }
    );
}

#[test]
fn breakw_is_anchored_to_its_while_line() {
    let program = compile("WHILE A\nBREAKW\nENDW").unwrap();
    assert_eq!(
        program.flow,
        hashmap! {
            0 => FlowNode::While { end: 2 },
            1 => FlowNode::BreakW { owner: 0 },
            2 => FlowNode::EndW { owner: 0 },
        }
    );
}

#[test]
fn jumps_resolve_to_label_lines() {
    let program = compile("GOTO end\nSET A = 1\n:end\nCALL end").unwrap();
    assert_eq!(
        program.flow,
        hashmap! {
            0 => FlowNode::Goto { target: 2 },
            3 => FlowNode::Call { target: 2 },
        }
    );
}

#[test]
fn nested_blocks_claim_closers_innermost_first() {
    let program = compile("IF A\nIF B\nENDIF\nENDIF").unwrap();
    assert_eq!(
        program.flow,
        hashmap! {
            0 => FlowNode::If { else_entry: None, end: 3 },
            1 => FlowNode::If { else_entry: None, end: 2 },
            2 => FlowNode::EndIf { owner: 1 },
            3 => FlowNode::EndIf { owner: 0 },
        }
    );
}

#[test]
fn compiling_the_same_source_twice_is_deterministic() {
    let source = r#"
        SET I = 0
        :loop
        WHILE I < 3
            SET I = I + 1
            IF I == 2
                BREAKW
            ELSE
                CALL noop
            ENDIF
        ENDW
        GOTO done
        :noop
        RETURN
        :done
    "#;
    assert_eq!(compile(source).unwrap(), compile(source).unwrap());
}

#[test]
fn unmatched_else_is_rejected() {
    let err = compile("SET A = 1\nELSE").unwrap_err();
    assert_eq!(err.kind, CompileErrorKind::UnmatchedElse);
    assert_eq!(err.line, 1);
    assert_eq!(err.text, "ELSE");
}

#[test]
fn second_else_for_the_same_if_is_rejected() {
    let err = compile("IF A\nELSE\nELSE\nENDIF").unwrap_err();
    assert_eq!(err.kind, CompileErrorKind::UnmatchedElse);
    assert_eq!(err.line, 2);
}

#[test]
fn else_after_a_closed_if_is_rejected() {
    let err = compile("IF x\nENDIF\nELSE").unwrap_err();
    assert_eq!(err.kind, CompileErrorKind::UnmatchedElse);
    assert_eq!(err.line, 2);
}

#[test]
fn stray_closers_are_rejected() {
    assert_eq!(
        compile("ENDIF").unwrap_err().kind,
        CompileErrorKind::EndifWithoutIf
    );
    assert_eq!(
        compile("ENDW").unwrap_err().kind,
        CompileErrorKind::EndwWithoutWhile
    );
    assert_eq!(
        compile("BREAKW").unwrap_err().kind,
        CompileErrorKind::BreakOutsideWhile
    );
}

#[test]
fn unclosed_blocks_report_the_outermost_opener() {
    let err = compile("SET A = 1\nWHILE a\nWHILE b\nENDW").unwrap_err();
    assert_eq!(err.kind, CompileErrorKind::MissingEndw);
    assert_eq!(err.line, 1);
    assert_eq!(err.text, "WHILE a");

    let err = compile("IF a\nIF b\nENDIF").unwrap_err();
    assert_eq!(err.kind, CompileErrorKind::MissingEndif);
    assert_eq!(err.line, 0);
}

#[test]
fn goto_to_an_unknown_label_is_rejected() {
    let err = compile("GOTO nowhere").unwrap_err();
    assert_eq!(
        err.kind,
        CompileErrorKind::LabelNotFound("nowhere".to_string())
    );
}

#[test]
fn nothing_runs_when_compilation_fails() {
    // The stray ENDW is after the SET, but the SET must not have executed.
    let (script, err) = run_err("SET A = 1\nENDW");
    assert!(matches!(err, ScriptError::Compile(_)));
    assert_eq!(script.get_var("A"), None);
}

#[test]
fn breakw_outside_a_block_fails_even_after_a_closed_loop() {
    let err = compile("WHILE a\nENDW\nBREAKW").unwrap_err();
    assert_eq!(err.kind, CompileErrorKind::BreakOutsideWhile);
    assert_eq!(err.line, 2);
}
