//! Delimiter validation and tree construction for templates.

use super::{DelimiterErrorKind, Part, TemplateError, TextNode};

/// Scans the source for delimiter balance before anything is built.
///
/// `[`, `]` and `|` are always structural; there is no escape syntax for
/// literal occurrences.
pub fn validate_delimiters(source: &str, allow_nested: bool) -> Result<(), TemplateError> {
    let mut open_positions = Vec::new();
    for (position, ch) in source.char_indices() {
        match ch {
            '[' => {
                if !allow_nested && !open_positions.is_empty() {
                    return Err(TemplateError {
                        kind: DelimiterErrorKind::NestedNotAllowed,
                        position,
                    });
                }
                open_positions.push(position);
            }
            ']' => {
                if open_positions.pop().is_none() {
                    return Err(TemplateError {
                        kind: DelimiterErrorKind::UnmatchedClosing,
                        position,
                    });
                }
            }
            _ => {}
        }
    }
    if let Some(&position) = open_positions.first() {
        return Err(TemplateError { kind: DelimiterErrorKind::UnmatchedOpening, position });
    }
    Ok(())
}

/// Builds the node tree from validated (balanced) input. Pure recursive
/// descent: literal runs between spans, each span's alternatives parsed as
/// templates of their own.
pub(super) fn build(source: &str) -> TextNode {
    // The delimiters are ASCII, so byte scanning never lands inside a
    // multi-byte character and slicing on these offsets stays on char
    // boundaries.
    let bytes = source.as_bytes();
    let mut parts = Vec::new();
    let mut cursor = 0;
    let mut literal_start = 0;

    while cursor < bytes.len() {
        if bytes[cursor] == b'[' {
            if literal_start < cursor {
                parts.push(Part::Literal(source[literal_start..cursor].to_string()));
            }
            let close = matching_close(bytes, cursor);
            let body = &source[cursor + 1..close];
            let alternatives = split_alternatives(body).into_iter().map(build).collect();
            parts.push(Part::Variants(alternatives));
            cursor = close + 1;
            literal_start = cursor;
        } else {
            cursor += 1;
        }
    }
    if literal_start < bytes.len() {
        parts.push(Part::Literal(source[literal_start..].to_string()));
    }
    TextNode { parts }
}

fn matching_close(bytes: &[u8], open: usize) -> usize {
    let mut depth = 0_usize;
    for (offset, &byte) in bytes.iter().enumerate().skip(open) {
        match byte {
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return offset;
                }
            }
            _ => {}
        }
    }
    // Unreachable on validated input; every opening delimiter has a match.
    bytes.len().saturating_sub(1)
}

/// Splits a span body on top-level `|` only; nested spans keep theirs.
fn split_alternatives(body: &str) -> Vec<&str> {
    let bytes = body.as_bytes();
    let mut alternatives = Vec::new();
    let mut depth = 0_usize;
    let mut start = 0;
    for (offset, &byte) in bytes.iter().enumerate() {
        match byte {
            b'[' => depth += 1,
            b']' => depth -= 1,
            b'|' if depth == 0 => {
                alternatives.push(&body[start..offset]);
                start = offset + 1;
            }
            _ => {}
        }
    }
    alternatives.push(&body[start..]);
    alternatives
}
