//! Source line normalization and classification.
//!
//! A script is split into trimmed, non-empty lines once, up front. Blank
//! lines never reach the line array, so line numbers in diagnostics count
//! only surviving lines. Both the flow compiler and the statement dispatcher
//! classify lines through [`classify`], which keeps the two phases agreeing
//! on what every line is.

/// What a single trimmed line is.
///
/// Matching order is significant: comments win over everything, labels over
/// keywords, and keywords over plain statements. Keywords are exact and
/// uppercase; `if x` is a plain statement, not a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Comment,
    /// `:name` jump target.
    Label(&'a str),
    /// `IF <condition>`, condition text unparsed.
    If(&'a str),
    Else,
    EndIf,
    /// `WHILE <condition>`, condition text unparsed.
    While(&'a str),
    BreakW,
    EndW,
    /// `GOTO <label>`.
    Goto(&'a str),
    /// `CALL <label>`.
    Call(&'a str),
    Stop,
    Return,
    /// `SET <rest>`; the `name = expr` split happens at dispatch time so a
    /// missing `=` surfaces as a runtime error, not a classification change.
    Set(&'a str),
    /// Anything else: expression text evaluated for its side effects.
    Statement(&'a str),
}

/// Split source text into the line array the engine runs against.
pub fn split_lines(source: &str) -> Vec<String> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

pub fn classify(line: &str) -> LineKind<'_> {
    if line.starts_with("//") {
        return LineKind::Comment;
    }
    if let Some(name) = line.strip_prefix(':') {
        return LineKind::Label(name.trim());
    }
    if let Some(cond) = line.strip_prefix("IF ") {
        return LineKind::If(cond.trim());
    }
    if line == "ELSE" {
        return LineKind::Else;
    }
    if line == "ENDIF" {
        return LineKind::EndIf;
    }
    if let Some(cond) = line.strip_prefix("WHILE ") {
        return LineKind::While(cond.trim());
    }
    if line == "BREAKW" {
        return LineKind::BreakW;
    }
    if line == "ENDW" {
        return LineKind::EndW;
    }
    if let Some(name) = line.strip_prefix("GOTO ") {
        return LineKind::Goto(name.trim());
    }
    if let Some(name) = line.strip_prefix("CALL ") {
        return LineKind::Call(name.trim());
    }
    if line == "STOP" {
        return LineKind::Stop;
    }
    if line == "RETURN" {
        return LineKind::Return;
    }
    if let Some(rest) = line.strip_prefix("SET ") {
        return LineKind::Set(rest);
    }
    LineKind::Statement(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_and_edge_whitespace_are_dropped() {
        let lines = split_lines("  SET A = 1  \r\n\r\n\n   \nSTOP\n");
        assert_eq!(lines, vec!["SET A = 1".to_string(), "STOP".to_string()]);
    }

    #[test]
    fn keywords_must_be_exact_and_uppercase() {
        assert_eq!(classify("if x"), LineKind::Statement("if x"));
        assert_eq!(classify("STOPPING"), LineKind::Statement("STOPPING"));
        assert_eq!(classify("STOP"), LineKind::Stop);
        assert_eq!(classify("ELSEWHERE"), LineKind::Statement("ELSEWHERE"));
    }

    #[test]
    fn comments_win_over_everything() {
        assert_eq!(classify("// IF x"), LineKind::Comment);
    }

    #[test]
    fn condition_text_is_carried_through() {
        assert_eq!(classify("IF A < 3"), LineKind::If("A < 3"));
        assert_eq!(classify("WHILE !done"), LineKind::While("!done"));
    }

    #[test]
    fn labels_and_jumps_trim_their_names() {
        assert_eq!(classify(": start "), LineKind::Label("start"));
        assert_eq!(classify("GOTO  start"), LineKind::Goto("start"));
        assert_eq!(classify("CALL twice "), LineKind::Call("twice"));
    }

    #[test]
    fn set_keeps_its_tail_unsplit() {
        assert_eq!(classify("SET A = 1"), LineKind::Set("A = 1"));
        assert_eq!(classify("SET A 1"), LineKind::Set("A 1"));
    }
}
