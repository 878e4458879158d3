//! WHILE / ENDW loops and BREAKW.

use super::helpers::{num, run};

#[test]
fn loop_runs_until_the_condition_goes_false() {
    let script = run(r#"
        SET I = 0
        SET Sum = 0
        WHILE I < 5
            SET I = I + 1
            SET Sum = Sum + I
        ENDW
    "#);
    assert_eq!(num(&script, "I"), 5.0);
    assert_eq!(num(&script, "Sum"), 15.0);
}

#[test]
fn false_condition_skips_the_body_entirely() {
    let script = run(r#"
        SET Ran = 0
        WHILE false
            SET Ran = 1
        ENDW
        SET After = 1
    "#);
    assert_eq!(num(&script, "Ran"), 0.0);
    assert_eq!(num(&script, "After"), 1.0);
}

#[test]
fn nested_loops_multiply_out() {
    let script = run(r#"
        SET I = 0
        SET Count = 0
        WHILE I < 3
            SET I = I + 1
            SET J = 0
            WHILE J < 4
                SET J = J + 1
                SET Count = Count + 1
            ENDW
        ENDW
    "#);
    assert_eq!(num(&script, "Count"), 12.0);
}

#[test]
fn breakw_exits_the_innermost_loop_only() {
    let script = run(r#"
        SET I = 0
        SET Inner = 0
        WHILE I < 3
            SET I = I + 1
            WHILE true
                SET Inner = Inner + 1
                BREAKW
                SET Inner = Inner + 100
            ENDW
        ENDW
    "#);
    assert_eq!(num(&script, "I"), 3.0);
    assert_eq!(num(&script, "Inner"), 3.0);
}

#[test]
fn breakw_inside_an_if_still_exits_the_loop() {
    let script = run(r#"
        SET I = 0
        WHILE true
            SET I = I + 1
            IF I >= 4
                BREAKW
            ENDIF
        ENDW
        SET After = 1
    "#);
    assert_eq!(num(&script, "I"), 4.0);
    assert_eq!(num(&script, "After"), 1.0);
}

#[test]
fn condition_is_reevaluated_each_iteration() {
    // The loop reads Limit fresh every pass, so shrinking it mid-flight
    // ends the loop early.
    let script = run(r#"
        SET I = 0
        SET Limit = 100
        WHILE I < Limit
            SET I = I + 1
            IF I == 2
                SET Limit = 0
            ENDIF
        ENDW
    "#);
    assert_eq!(num(&script, "I"), 2.0);
}
