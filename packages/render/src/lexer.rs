//! Markup lexer using logos
//!
//! Markup needs two lexical modes: character content between tags and the
//! inside of a tag. Each mode is its own logos token enum; the lexer morphs
//! between them at `<`, `</`, `>` and `/>`.

use crate::error::{MarkupError, MarkupResult, Span};
use logos::{Lexer, Logos};

/// Token emitted to the parser
#[derive(Debug, Clone, PartialEq)]
pub enum MarkupToken<'src> {
    /// Character data, entities still encoded
    Text(&'src str),
    /// Comment, CDATA, doctype or processing instruction, verbatim
    Raw(&'src str),
    /// `<name`
    OpenTag(&'src str),
    /// `name="value"`, value still encoded
    Attribute { name: &'src str, value: &'src str },
    /// `>` ending an open tag
    OpenTagEnd,
    /// `/>`
    SelfClose,
    /// `</name>`
    CloseTag(&'src str),
}

pub type Spanned<'src> = (MarkupToken<'src>, Span);

#[derive(Logos, Debug, Clone, PartialEq)]
enum Content<'src> {
    #[token("<!--", |lex| scan_until(lex, "-->"))]
    Comment(&'src str),

    #[token("<![CDATA[", |lex| scan_until(lex, "]]>"))]
    Cdata(&'src str),

    #[token("<!", |lex| scan_until(lex, ">"))]
    Declaration(&'src str),

    #[token("<?", |lex| scan_until(lex, "?>"))]
    Instruction(&'src str),

    #[token("</")]
    CloseStart,

    #[token("<")]
    OpenStart,

    #[regex(r"[^<]+", |lex| lex.slice())]
    Text(&'src str),
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
enum Tag<'src> {
    #[regex(r"[A-Za-z_:][A-Za-z0-9_:.\-]*", |lex| lex.slice())]
    Name(&'src str),

    #[token("=")]
    Eq,

    #[regex(r#""[^"]*""#, strip_quotes)]
    #[regex(r"'[^']*'", strip_quotes)]
    Value(&'src str),

    #[token(">")]
    End,

    #[token("/>")]
    SelfClose,
}

/// Extend the current token through `terminator`. None leaves it unterminated.
fn scan_until<'src, T>(lex: &mut Lexer<'src, T>, terminator: &str) -> Option<&'src str>
where
    T: Logos<'src, Source = str>,
{
    let end = lex.remainder().find(terminator)?;
    lex.bump(end + terminator.len());
    Some(lex.slice())
}

fn strip_quotes<'src>(lex: &mut Lexer<'src, Tag<'src>>) -> &'src str {
    let s = lex.slice();
    &s[1..s.len() - 1]
}

fn describe(token: &Tag<'_>) -> String {
    match token {
        Tag::Name(name) => format!("name `{}`", name),
        Tag::Eq => "'='".to_string(),
        Tag::Value(_) => "quoted value".to_string(),
        Tag::End => "'>'".to_string(),
        Tag::SelfClose => "'/>'".to_string(),
    }
}

/// Split markup into tokens.
pub fn tokenize(source: &str) -> MarkupResult<Vec<Spanned<'_>>> {
    let mut tokens = Vec::new();
    let mut content = Content::lexer(source);

    while let Some(token) = content.next() {
        let span = Span::from(content.span());

        match token {
            Ok(Content::Text(text)) => tokens.push((MarkupToken::Text(text), span)),

            Ok(
                Content::Comment(raw)
                | Content::Cdata(raw)
                | Content::Declaration(raw)
                | Content::Instruction(raw),
            ) => tokens.push((MarkupToken::Raw(raw), span)),

            Ok(Content::OpenStart) => {
                let mut tag = content.morph::<Tag>();
                let result = open_tag(&mut tag, span.start, &mut tokens);
                content = tag.morph();
                result?;
            }

            Ok(Content::CloseStart) => {
                let mut tag = content.morph::<Tag>();
                let result = close_tag(&mut tag, span.start, &mut tokens);
                content = tag.morph();
                result?;
            }

            Err(()) => {
                return Err(MarkupError::lex_error(
                    span,
                    "unterminated comment, CDATA section or declaration",
                ))
            }
        }
    }

    Ok(tokens)
}

fn next_tag<'src>(lex: &mut Lexer<'src, Tag<'src>>, expected: &str) -> MarkupResult<(Tag<'src>, Span)> {
    match lex.next() {
        Some(Ok(token)) => Ok((token, lex.span().into())),
        Some(Err(())) => Err(MarkupError::lex_error(
            lex.span().into(),
            format!("unexpected character, expected {}", expected),
        )),
        None => Err(MarkupError::unexpected_eof(expected)),
    }
}

fn expect_name<'src>(lex: &mut Lexer<'src, Tag<'src>>, expected: &str) -> MarkupResult<&'src str> {
    match next_tag(lex, expected)? {
        (Tag::Name(name), _) => Ok(name),
        (other, span) => Err(MarkupError::unexpected_token(span, expected, describe(&other))),
    }
}

fn open_tag<'src>(
    lex: &mut Lexer<'src, Tag<'src>>,
    start: usize,
    tokens: &mut Vec<Spanned<'src>>,
) -> MarkupResult<()> {
    let name = expect_name(lex, "element name")?;
    tokens.push((
        MarkupToken::OpenTag(name),
        Span {
            start,
            end: lex.span().end,
        },
    ));

    loop {
        match next_tag(lex, "attribute, '>' or '/>'")? {
            (Tag::Name(name), span) => {
                match next_tag(lex, "'='")? {
                    (Tag::Eq, _) => {}
                    (other, span) => {
                        return Err(MarkupError::unexpected_token(span, "'='", describe(&other)))
                    }
                }
                let value = match next_tag(lex, "quoted attribute value")? {
                    (Tag::Value(value), value_span) => (value, value_span),
                    (other, span) => {
                        return Err(MarkupError::unexpected_token(
                            span,
                            "quoted attribute value",
                            describe(&other),
                        ))
                    }
                };
                tokens.push((
                    MarkupToken::Attribute {
                        name,
                        value: value.0,
                    },
                    Span {
                        start: span.start,
                        end: value.1.end,
                    },
                ));
            }
            (Tag::End, span) => {
                tokens.push((MarkupToken::OpenTagEnd, span));
                return Ok(());
            }
            (Tag::SelfClose, span) => {
                tokens.push((MarkupToken::SelfClose, span));
                return Ok(());
            }
            (other, span) => {
                return Err(MarkupError::unexpected_token(
                    span,
                    "attribute, '>' or '/>'",
                    describe(&other),
                ))
            }
        }
    }
}

fn close_tag<'src>(
    lex: &mut Lexer<'src, Tag<'src>>,
    start: usize,
    tokens: &mut Vec<Spanned<'src>>,
) -> MarkupResult<()> {
    let name = expect_name(lex, "element name")?;
    match next_tag(lex, "'>'")? {
        (Tag::End, span) => {
            tokens.push((MarkupToken::CloseTag(name), Span { start, end: span.end }));
            Ok(())
        }
        (other, span) => Err(MarkupError::unexpected_token(span, "'>'", describe(&other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<MarkupToken<'_>> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|(token, _)| token)
            .collect()
    }

    #[test]
    fn test_tags_and_attributes() {
        assert_eq!(
            kinds(r#"<svg viewBox='0 0 1 1'><rect id="a"/></svg>"#),
            vec![
                MarkupToken::OpenTag("svg"),
                MarkupToken::Attribute {
                    name: "viewBox",
                    value: "0 0 1 1"
                },
                MarkupToken::OpenTagEnd,
                MarkupToken::OpenTag("rect"),
                MarkupToken::Attribute { name: "id", value: "a" },
                MarkupToken::SelfClose,
                MarkupToken::CloseTag("svg"),
            ]
        );
    }

    #[test]
    fn test_raw_constructs() {
        assert_eq!(
            kinds("<?xml version=\"1.0\"?><!-- a < b --><!DOCTYPE svg><x><![CDATA[<y>]]></x>"),
            vec![
                MarkupToken::Raw("<?xml version=\"1.0\"?>"),
                MarkupToken::Raw("<!-- a < b -->"),
                MarkupToken::Raw("<!DOCTYPE svg>"),
                MarkupToken::OpenTag("x"),
                MarkupToken::OpenTagEnd,
                MarkupToken::Raw("<![CDATA[<y>]]>"),
                MarkupToken::CloseTag("x"),
            ]
        );
    }

    #[test]
    fn test_text_between_tags() {
        assert_eq!(
            kinds("<t> a &amp; b </t>"),
            vec![
                MarkupToken::OpenTag("t"),
                MarkupToken::OpenTagEnd,
                MarkupToken::Text(" a &amp; b "),
                MarkupToken::CloseTag("t"),
            ]
        );
    }

    #[test]
    fn test_spans() {
        let tokens = tokenize("<a>\n</a>").unwrap();
        assert_eq!(tokens[0].1, Span { start: 0, end: 2 });
        assert_eq!(tokens[3].1, Span { start: 4, end: 8 });
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            tokenize("<!-- never closed"),
            Err(MarkupError::LexError { .. })
        ));
        assert!(matches!(
            tokenize("<rect x=1/>"),
            Err(MarkupError::LexError { .. }) | Err(MarkupError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            tokenize("<rect x=\"1\""),
            Err(MarkupError::UnexpectedEof { .. })
        ));
    }
}
