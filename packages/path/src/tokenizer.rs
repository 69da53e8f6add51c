//! Lexer for path data using logos
//!
//! Path data is a flat stream of command letters and numbers. Whitespace and
//! commas only separate numbers; anything else that is not a command letter or
//! a number is an error token and gets skipped by [`segments`].

use logos::Logos;
use std::ops::Range;
use tracing::trace;

/// Token types for path data
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\x0C,]+")]
pub enum Token {
    #[regex(r"[MmLlHhVvCcSsQqTtAaZz]", |lex| lex.slice().chars().next())]
    Command(char),

    #[regex(r"[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),
}

/// One command letter and the numbers that follow it
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub command: char,
    pub args: Vec<f64>,
    pub span: Range<usize>,
}

/// Split path data into command segments.
///
/// Numbers that appear before the first command letter belong to no segment
/// and are dropped, as are unrecognized characters.
pub fn segments(source: &str) -> Vec<Segment> {
    let mut out: Vec<Segment> = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(Token::Command(command)) => out.push(Segment {
                command,
                args: Vec::new(),
                span,
            }),
            Ok(Token::Number(value)) => match out.last_mut() {
                Some(segment) => {
                    segment.args.push(value);
                    segment.span.end = span.end;
                }
                None => trace!(value, "Dropping number before first command"),
            },
            Err(()) => trace!(
                slice = lexer.slice(),
                start = span.start,
                "Skipping unrecognized path input"
            ),
        }
    }

    out
}

/// Read the leading number of an attribute value (`"12px"` is 12).
pub fn parse_number(text: &str) -> Option<f64> {
    match Token::lexer(text.trim_start()).next() {
        Some(Ok(Token::Number(value))) => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        Token::lexer(source).filter_map(|r| r.ok()).collect()
    }

    #[test]
    fn test_lex_commands_and_numbers() {
        assert_eq!(
            tokens("M10,20 l-5.5 .5"),
            vec![
                Token::Command('M'),
                Token::Number(10.0),
                Token::Number(20.0),
                Token::Command('l'),
                Token::Number(-5.5),
                Token::Number(0.5),
            ]
        );
    }

    #[test]
    fn test_lex_compact_numbers() {
        // Signs and second decimal points start a new number
        assert_eq!(
            tokens("10-5.5.5"),
            vec![Token::Number(10.0), Token::Number(-5.5), Token::Number(0.5)]
        );
    }

    #[test]
    fn test_lex_exponent() {
        assert_eq!(tokens("1e2 -2.5E-1"), vec![Token::Number(100.0), Token::Number(-0.25)]);
    }

    #[test]
    fn test_segments_group_arguments() {
        let segs = segments("M 1 2 L 3 4 5 z");
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[0].command, 'M');
        assert_eq!(segs[0].args, vec![1.0, 2.0]);
        assert_eq!(segs[1].args, vec![3.0, 4.0, 5.0]);
        assert_eq!(segs[2].command, 'z');
        assert!(segs[2].args.is_empty());
    }

    #[test]
    fn test_segments_skip_garbage() {
        let segs = segments("12 M 1 X 2 # L 3 4");
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].args, vec![1.0, 2.0]);
        assert_eq!(segs[1].args, vec![3.0, 4.0]);
    }

    #[test]
    fn test_parse_number_prefix() {
        assert_eq!(parse_number("12px"), Some(12.0));
        assert_eq!(parse_number("  0.5"), Some(0.5));
        assert_eq!(parse_number("-3"), Some(-3.0));
        assert_eq!(parse_number("none"), None);
        assert_eq!(parse_number(""), None);
    }
}
