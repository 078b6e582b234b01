//! Evaluation of Python literal nodes into catalog values.

use crate::types::DefaultValue;
use std::iter::Peekable;
use std::str::Chars;
use tree_sitter::Node;

/// Outcome of evaluating a default argument
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Literal {
    Value(DefaultValue),
    /// Explicit `None`
    Null,
    /// Anything that is not a scalar literal, kept as source text
    Opaque(String),
}

pub(crate) fn evaluate(node: Node<'_>, source: &str) -> Literal {
    let node = unwrap_parens(node);
    let text = &source[node.byte_range()];
    let value = match node.kind() {
        "string" => plain_string(node, source).map(DefaultValue::Text),
        "integer" => parse_integer(text).map(DefaultValue::Integer),
        "float" => parse_float(text).map(DefaultValue::Float),
        "true" => Some(DefaultValue::Bool(true)),
        "false" => Some(DefaultValue::Bool(false)),
        "none" => return Literal::Null,
        "unary_operator" => signed_number(node, source),
        _ => None,
    };
    value
        .map(Literal::Value)
        .unwrap_or_else(|| Literal::Opaque(text.to_string()))
}

/// Contents of a plain string literal.
///
/// Returns `None` for f-strings, bytes and anything that is not a single
/// `string` node (implicit concatenation included).
pub(crate) fn plain_string(node: Node<'_>, source: &str) -> Option<String> {
    let node = unwrap_parens(node);
    if node.kind() != "string" {
        return None;
    }

    let mut prefix = "";
    let mut body_start = None;
    let mut body_end = None;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "string_start" => {
                prefix = source[child.byte_range()].trim_end_matches(['"', '\'']);
                body_start = Some(child.end_byte());
            }
            "string_end" => body_end = Some(child.start_byte()),
            "interpolation" => return None,
            _ => {}
        }
    }

    let prefix = prefix.to_ascii_lowercase();
    if prefix.contains('f') || prefix.contains('b') {
        return None;
    }
    let body = source.get(body_start?..body_end?)?;
    if prefix.contains('r') {
        Some(body.to_string())
    } else {
        Some(unescape(body))
    }
}

fn unwrap_parens(mut node: Node<'_>) -> Node<'_> {
    while node.kind() == "parenthesized_expression" && node.named_child_count() == 1 {
        match node.named_child(0) {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

fn signed_number(node: Node<'_>, source: &str) -> Option<DefaultValue> {
    let operator = node.child_by_field_name("operator")?;
    let argument = unwrap_parens(node.child_by_field_name("argument")?);
    let negate = match &source[operator.byte_range()] {
        "-" => true,
        "+" => false,
        _ => return None,
    };
    let text = &source[argument.byte_range()];
    match argument.kind() {
        "integer" => {
            let value = parse_integer(text)?;
            let value = if negate { value.checked_neg()? } else { value };
            Some(DefaultValue::Integer(value))
        }
        "float" => {
            let value = parse_float(text)?;
            Some(DefaultValue::Float(if negate { -value } else { value }))
        }
        _ => None,
    }
}

/// Python type of a numeric literal, including ones too large for `i64`.
///
/// `None` for complex literals and non-numbers.
pub(crate) fn numeric_type(node: Node<'_>, source: &str) -> Option<&'static str> {
    let mut node = unwrap_parens(node);
    if node.kind() == "unary_operator" {
        node = unwrap_parens(node.child_by_field_name("argument")?);
    }
    if source[node.byte_range()].ends_with(['j', 'J']) {
        return None;
    }
    match node.kind() {
        "integer" => Some("int"),
        "float" => Some("float"),
        _ => None,
    }
}

pub(crate) fn parse_integer(text: &str) -> Option<i64> {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != '_')
        .collect::<String>()
        .to_ascii_lowercase();
    if cleaned.ends_with('j') {
        return None;
    }
    let (digits, radix) = if let Some(rest) = cleaned.strip_prefix("0x") {
        (rest, 16)
    } else if let Some(rest) = cleaned.strip_prefix("0o") {
        (rest, 8)
    } else if let Some(rest) = cleaned.strip_prefix("0b") {
        (rest, 2)
    } else {
        (cleaned.as_str(), 10)
    };
    i64::from_str_radix(digits, radix).ok()
}

pub(crate) fn parse_float(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    if cleaned.ends_with(['j', 'J']) {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Decode Python escape sequences in a non-raw string body
pub(crate) fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\n') => {}
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('a') => out.push('\x07'),
            Some('b') => out.push('\x08'),
            Some('f') => out.push('\x0c'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('v') => out.push('\x0b'),
            Some('x') => push_code_point(&mut out, &mut chars, 16, 2, "\\x"),
            Some('u') => push_code_point(&mut out, &mut chars, 16, 4, "\\u"),
            Some('U') => push_code_point(&mut out, &mut chars, 16, 8, "\\U"),
            Some(digit @ '0'..='7') => {
                let mut digits = String::from(digit);
                while digits.len() < 3 {
                    match chars.peek() {
                        Some(next @ '0'..='7') => {
                            digits.push(*next);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                match u32::from_str_radix(&digits, 8).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push('\\');
                        out.push_str(&digits);
                    }
                }
            }
            // Unknown escapes stay verbatim, as Python does
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn push_code_point(
    out: &mut String,
    chars: &mut Peekable<Chars<'_>>,
    radix: u32,
    width: usize,
    marker: &str,
) {
    let mut digits = String::with_capacity(width);
    while digits.len() < width {
        match chars.peek() {
            Some(c) if c.is_digit(radix) => {
                digits.push(*c);
                chars.next();
            }
            _ => break,
        }
    }
    let decoded = (digits.len() == width)
        .then(|| u32::from_str_radix(&digits, radix).ok())
        .flatten()
        .and_then(char::from_u32);
    match decoded {
        Some(c) => out.push(c),
        None => {
            out.push_str(marker);
            out.push_str(&digits);
        }
    }
}
