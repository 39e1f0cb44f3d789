// src/rules/parser.rs

//! Parser for the rule-file grammar:
//!
//! ```text
//! # comment
//! prog   <- main.o util.o;
//! main.o <- main.c util.h;
//! ```
//!
//! A statement is a target name, `<-`, zero or more dependency names, and a
//! terminating `;`. Statements may span lines. The same target may appear in
//! several statements; interpreting that is left to the graph builder.

use thiserror::Error;

use crate::rules::model::{RawRuleSet, Rule};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}, column {column}: expected `<-` after target '{target}'")]
    MissingArrow {
        target: String,
        line: usize,
        column: usize,
    },

    #[error("line {line}, column {column}: `<-` without a target")]
    MissingTarget { line: usize, column: usize },

    #[error("line {line}, column {column}: second `<-` in rule for '{target}'")]
    UnexpectedArrow {
        target: String,
        line: usize,
        column: usize,
    },

    #[error("line {line}, column {column}: `;` without a rule")]
    EmptyStatement { line: usize, column: usize },

    #[error("rule for '{target}' starting at line {line} is missing its terminating `;`")]
    Unterminated { target: String, line: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Name(String),
    Arrow,
    Semicolon,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    kind: TokenKind,
    line: usize,
    column: usize,
}

enum State {
    Start,
    Target { name: String, line: usize },
    Deps { rule: Rule, line: usize },
}

/// Parse rule-file text into an unvalidated rule set.
pub fn parse(text: &str) -> Result<RawRuleSet, ParseError> {
    let mut rules = Vec::new();
    let mut state = State::Start;

    for token in tokenize(text) {
        state = match (state, token.kind) {
            (State::Start, TokenKind::Name(name)) => State::Target {
                name,
                line: token.line,
            },
            (State::Start, TokenKind::Arrow) => {
                return Err(ParseError::MissingTarget {
                    line: token.line,
                    column: token.column,
                });
            }
            (State::Start, TokenKind::Semicolon) => {
                return Err(ParseError::EmptyStatement {
                    line: token.line,
                    column: token.column,
                });
            }
            (State::Target { name, line }, TokenKind::Arrow) => State::Deps {
                rule: Rule::new(name, Vec::<String>::new()),
                line,
            },
            (State::Target { name, .. }, _) => {
                return Err(ParseError::MissingArrow {
                    target: name,
                    line: token.line,
                    column: token.column,
                });
            }
            (State::Deps { mut rule, line }, TokenKind::Name(dep)) => {
                rule.deps.push(dep);
                State::Deps { rule, line }
            }
            (State::Deps { rule, .. }, TokenKind::Semicolon) => {
                rules.push(rule);
                State::Start
            }
            (State::Deps { rule, .. }, TokenKind::Arrow) => {
                return Err(ParseError::UnexpectedArrow {
                    target: rule.target,
                    line: token.line,
                    column: token.column,
                });
            }
        };
    }

    match state {
        State::Start => Ok(RawRuleSet { rules }),
        State::Target { name, line } => Err(ParseError::Unterminated { target: name, line }),
        State::Deps { rule, line } => Err(ParseError::Unterminated {
            target: rule.target,
            line,
        }),
    }
}

fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let chars: Vec<char> = line.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            let (line, column) = (idx + 1, i + 1);

            if c.is_whitespace() {
                i += 1;
                continue;
            }
            if c == '#' {
                break;
            }

            let kind = if c == ';' {
                i += 1;
                TokenKind::Semicolon
            } else if is_arrow(&chars, i) {
                i += 2;
                TokenKind::Arrow
            } else {
                let start = i;
                while i < chars.len() && !is_delimiter(&chars, i) {
                    i += 1;
                }
                TokenKind::Name(chars[start..i].iter().collect())
            };

            tokens.push(Token { kind, line, column });
        }
    }

    tokens
}

fn is_arrow(chars: &[char], i: usize) -> bool {
    chars[i] == '<' && chars.get(i + 1) == Some(&'-')
}

fn is_delimiter(chars: &[char], i: usize) -> bool {
    let c = chars[i];
    c.is_whitespace() || c == ';' || c == '#' || is_arrow(chars, i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(raw: &RawRuleSet) -> Vec<&str> {
        raw.rules.iter().map(|r| r.target.as_str()).collect()
    }

    #[test]
    fn parses_rules_in_declaration_order() {
        let raw = parse(
            r#"
r  <- d1 d2;
d1 <- d3;
d2 <- d3 d4;
"#,
        )
        .unwrap();

        assert_eq!(targets(&raw), vec!["r", "d1", "d2"]);
        assert_eq!(raw.rules[0].deps, vec!["d1", "d2"]);
        assert_eq!(raw.rules[2].deps, vec!["d3", "d4"]);
    }

    #[test]
    fn statements_may_span_lines_and_skip_spaces_around_arrow() {
        let raw = parse("prog<-main.o\n  util.o\n;lib.a <- ;").unwrap();

        assert_eq!(raw.rules[0], Rule::new("prog", ["main.o", "util.o"]));
        assert_eq!(raw.rules[1], Rule::new("lib.a", Vec::<String>::new()));
    }

    #[test]
    fn comments_are_ignored() {
        let raw = parse("# header\na <- b; # trailing\n# a <- c;\n").unwrap();
        assert_eq!(raw.rules, vec![Rule::new("a", ["b"])]);
    }

    #[test]
    fn duplicate_targets_are_kept_for_the_graph_builder() {
        let raw = parse("a <- b; a <- c d;").unwrap();
        assert_eq!(targets(&raw), vec!["a", "a"]);
    }

    #[test]
    fn empty_input_yields_no_rules() {
        assert!(parse("  \n# nothing here\n").unwrap().rules.is_empty());
    }

    #[test]
    fn reports_missing_arrow_with_position() {
        let err = parse("a <- b;\nc d;").unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingArrow {
                target: "c".to_string(),
                line: 2,
                column: 3,
            }
        );
    }

    #[test]
    fn reports_arrow_without_target() {
        let err = parse("  <- b;").unwrap_err();
        assert_eq!(err, ParseError::MissingTarget { line: 1, column: 3 });
    }

    #[test]
    fn reports_second_arrow() {
        let err = parse("a <- b <- c;").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedArrow { ref target, .. } if target == "a"));
    }

    #[test]
    fn reports_stray_semicolon() {
        let err = parse("a <- b;;").unwrap_err();
        assert_eq!(err, ParseError::EmptyStatement { line: 1, column: 8 });
    }

    #[test]
    fn reports_unterminated_rule() {
        let err = parse("a <- b;\nc <- d\ne").unwrap_err();
        assert_eq!(
            err,
            ParseError::Unterminated {
                target: "c".to_string(),
                line: 2,
            }
        );
        assert!(err.to_string().contains("missing its terminating `;`"));
    }
}
