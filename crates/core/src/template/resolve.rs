//! Random and replayed traversal of a parsed template tree.

use crate::rng::DrawSource;

use super::{IndexChoice, IndexTree, Part, ResolveError, TextNode};

/// Depth-first random resolution. Every variant span draws one uniform
/// index from `source`, which is threaded by reference so nested spans
/// continue the same stream instead of reusing the seed.
pub(super) fn resolve_random(node: &TextNode, source: &mut DrawSource) -> (String, IndexTree) {
    let mut text = String::new();
    let mut trace = IndexTree::default();
    for part in &node.parts {
        match part {
            Part::Literal(literal) => text.push_str(literal),
            Part::Variants(alternatives) => {
                let index = source.next_index(alternatives.len());
                let (chosen_text, children) = resolve_random(&alternatives[index], source);
                text.push_str(&chosen_text);
                trace.choices.push(IndexChoice { index, children });
            }
        }
    }
    (text, trace)
}

/// Depth-first replay from an explicit index cursor, visiting spans in the
/// exact order [`resolve_random`] draws for them.
pub(super) fn select_node(
    node: &TextNode,
    cursor: &mut std::slice::Iter<'_, usize>,
) -> Result<String, ResolveError> {
    let mut text = String::new();
    for part in &node.parts {
        match part {
            Part::Literal(literal) => text.push_str(literal),
            Part::Variants(alternatives) => {
                let &index = cursor.next().ok_or(ResolveError::OutOfIndices)?;
                let alternative = alternatives.get(index).ok_or(ResolveError::IndexOutOfRange {
                    index,
                    alternatives: alternatives.len(),
                })?;
                text.push_str(&select_node(alternative, cursor)?);
            }
        }
    }
    Ok(text)
}
