//! Annotation type expressions: `string|nil`, `DreamMesh[]`,
//! `table<string, number>`, `(A|B)[]`, `fun(x: number)`.

use crate::model::TypeDescriptor;

const PRIMITIVES: &[&str] = &[
    "nil", "any", "boolean", "number", "integer", "string", "table", "function", "userdata",
    "thread", "self",
];

/// Parse a type expression into a descriptor tree.
pub fn parse_type(text: &str) -> TypeDescriptor {
    let text = text.trim();

    let alternatives = split_top_level(text, '|');
    if alternatives.len() > 1 {
        return TypeDescriptor::Union(alternatives.into_iter().map(parse_type).collect());
    }

    // `?` marks optional; the descriptor itself is unaffected
    let text = text.strip_suffix('?').unwrap_or(text).trim_end();

    if let Some(inner) = text.strip_suffix("[]") {
        return TypeDescriptor::Array(Box::new(parse_type(inner)));
    }

    if let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        if is_balanced(inner) {
            return parse_type(inner);
        }
    }

    if let Some(inner) = text.strip_prefix("table<").and_then(|t| t.strip_suffix('>')) {
        let parts = split_top_level(inner, ',');
        if parts.len() == 2 {
            return TypeDescriptor::Dict(
                Box::new(parse_type(parts[0])),
                Box::new(parse_type(parts[1])),
            );
        }
    }

    if text.starts_with("fun(") || text == "fun" {
        return TypeDescriptor::Primitive("function".to_string());
    }

    if PRIMITIVES.contains(&text) || is_literal(text) {
        return TypeDescriptor::Primitive(text.to_string());
    }

    TypeDescriptor::Custom(text.to_string())
}

/// Split an annotation tail into its leading type expression and the rest.
///
/// The type ends at the first whitespace outside brackets, except around a
/// `|` so that `string | nil` stays one expression.
pub fn split_type(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut depth: i32 = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'<' | b'(' | b'{' | b'[' => depth += 1,
            b'>' | b')' | b'}' | b']' => depth -= 1,
            b if b.is_ascii_whitespace() && depth <= 0 => {
                let next = text[i..].trim_start();
                let prev_is_pipe = text[..i].trim_end().ends_with('|');
                if next.starts_with('|') || prev_is_pipe {
                    i += 1;
                    continue;
                }
                return (&text[..i], text[i..].trim());
            }
            _ => {}
        }
        i += 1;
    }

    (text, "")
}

fn is_literal(text: &str) -> bool {
    let quoted = |q: char| text.len() >= 2 && text.starts_with(q) && text.ends_with(q);
    quoted('"') || quoted('\'') || text.parse::<f64>().is_ok() || text == "true" || text == "false"
}

fn is_balanced(text: &str) -> bool {
    let mut depth: i32 = 0;
    for c in text.chars() {
        match c {
            '(' | '<' | '{' => depth += 1,
            ')' | '>' | '}' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

/// Split on `sep` wherever it is not nested inside brackets.
fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth: i32 = 0;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '<' | '(' | '{' | '[' => depth += 1,
            '>' | ')' | '}' | ']' => depth -= 1,
            c if c == sep && depth == 0 => {
                parts.push(text[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim());
    parts
}
