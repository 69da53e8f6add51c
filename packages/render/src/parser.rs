use crate::error::{MarkupError, MarkupResult, Span};
use crate::lexer::{tokenize, MarkupToken};
use crate::tree::{RenderElement, RenderNode, RenderTree};
use std::borrow::Cow;
use tracing::trace;

/// Parse markup into a render tree.
///
/// Entities in text and attribute values are decoded. Whitespace-only text is
/// dropped; comments, CDATA and declarations are kept verbatim. Anything after
/// the root element other than whitespace and comments is an error.
pub fn parse_markup(source: &str) -> MarkupResult<RenderTree> {
    let tokens = tokenize(source)?;

    let mut prolog = Vec::new();
    let mut root: Option<RenderElement> = None;
    let mut stack: Vec<(RenderElement, Span)> = Vec::new();

    for (token, span) in tokens {
        match token {
            MarkupToken::OpenTag(tag) => {
                if root.is_some() && stack.is_empty() {
                    return Err(MarkupError::OutsideRoot { span });
                }
                stack.push((RenderElement::new(tag), span));
            }

            MarkupToken::Attribute { name, value } => {
                if let Some((element, _)) = stack.last_mut() {
                    element.set_attr(name, decode_entities(value));
                }
            }

            MarkupToken::OpenTagEnd => {}

            MarkupToken::SelfClose => {
                if let Some((element, _)) = stack.pop() {
                    attach(element, &mut stack, &mut root);
                }
            }

            MarkupToken::CloseTag(tag) => {
                let Some((element, _)) = stack.pop() else {
                    return Err(MarkupError::unexpected_token(span, "content", format!("</{}>", tag)));
                };
                if element.tag != tag {
                    return Err(MarkupError::MismatchedTag {
                        span,
                        expected: element.tag,
                        found: tag.to_string(),
                    });
                }
                attach(element, &mut stack, &mut root);
            }

            MarkupToken::Text(text) => {
                if text.trim().is_empty() {
                    continue;
                }
                match stack.last_mut() {
                    Some((element, _)) => element.children.push(RenderNode::text(decode_entities(text))),
                    None => return Err(MarkupError::OutsideRoot { span }),
                }
            }

            MarkupToken::Raw(raw) => match stack.last_mut() {
                Some((element, _)) => element.children.push(RenderNode::raw(raw)),
                None if root.is_none() => prolog.push(RenderNode::raw(raw)),
                None => trace!(raw, "Dropping trailing markup after root element"),
            },
        }
    }

    if let Some((element, span)) = stack.pop() {
        return Err(MarkupError::UnclosedElement {
            span,
            tag: element.tag,
        });
    }

    let root = root.ok_or(MarkupError::MissingRoot)?;
    Ok(RenderTree { prolog, root })
}

fn attach(
    element: RenderElement,
    stack: &mut [(RenderElement, Span)],
    root: &mut Option<RenderElement>,
) {
    match stack.last_mut() {
        Some((parent, _)) => parent.children.push(RenderNode::Element(element)),
        None => *root = Some(element),
    }
}

/// Decode the predefined and numeric character references. Unknown
/// references are kept as written.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut output = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('&') {
        output.push_str(&rest[..start]);
        rest = &rest[start..];

        let decoded = rest
            .find(';')
            .and_then(|end| decode_reference(&rest[1..end]).map(|c| (c, end)));

        match decoded {
            Some((c, end)) => {
                output.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                output.push('&');
                rest = &rest[1..];
            }
        }
    }

    output.push_str(rest);
    Cow::Owned(output)
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}
