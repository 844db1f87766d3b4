//! Delimited-alternation templates.
//!
//! A template string like `"hello [world|there]"` parses once into an
//! immutable tree of literal runs and `[a|b|c]` variant spans (alternatives
//! may nest further spans). The tree can then be resolved any number of
//! times: randomly via [`Template::pick`], randomly-with-a-trace via
//! [`Template::pick_indices`], or deterministically from an explicit index
//! path via [`Template::select_variants`].

mod parse;
mod resolve;

use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::rng::{DrawSource, SeedLike};

pub use parse::validate_delimiters;

/// Why a template failed delimiter validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DelimiterErrorKind {
    UnmatchedOpening,
    UnmatchedClosing,
    NestedNotAllowed,
}

/// A delimiter problem and the byte position it was found at. Malformed
/// templates fail here, at parse time; they are never best-effort resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TemplateError {
    pub kind: DelimiterErrorKind,
    pub position: usize,
}

impl fmt::Display for TemplateError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self.kind {
            DelimiterErrorKind::UnmatchedOpening => "unmatched opening delimiter",
            DelimiterErrorKind::UnmatchedClosing => "unmatched closing delimiter",
            DelimiterErrorKind::NestedNotAllowed => "nested delimiters are not allowed here",
        };
        write!(formatter, "{description} at byte {}", self.position)
    }
}

impl Error for TemplateError {}

/// Why replaying an explicit index path failed. The three cases point at
/// different caller bugs, so they stay distinct.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveError {
    /// The path ran out before every variant span was resolved.
    OutOfIndices,
    /// A choice pointed past the span's alternatives.
    IndexOutOfRange { index: usize, alternatives: usize },
    /// Indices remained after the whole template was resolved.
    LeftoverIndices { unused: usize },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfIndices => formatter
                .write_str("Ran out of variant indices before the template was fully resolved."),
            Self::IndexOutOfRange { index, alternatives } => write!(
                formatter,
                "Variant index {index} exceeds the {alternatives} available alternatives."
            ),
            Self::LeftoverIndices { unused } => {
                write!(formatter, "{unused} variant indices were left unconsumed.")
            }
        }
    }
}

impl Error for ResolveError {}

/// One parsed node: literal runs interleaved with variant spans.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TextNode {
    parts: Vec<Part>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Part {
    Literal(String),
    Variants(Vec<TextNode>),
}

/// The nested record of choices one resolution made, in the depth-first
/// order [`Template::pick`] visits variant spans.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexTree {
    choices: Vec<IndexChoice>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexChoice {
    pub index: usize,
    pub children: IndexTree,
}

impl IndexTree {
    pub fn choices(&self) -> &[IndexChoice] {
        &self.choices
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Depth-first flattening; feeding the result back into
    /// [`Template::select_variants`] reproduces the resolution.
    pub fn flatten(&self) -> Vec<usize> {
        let mut flat = Vec::new();
        self.flatten_into(&mut flat);
        flat
    }

    /// The flattened path as a numeral string, choices joined by `.`.
    /// [`decode_indices`] is the exact inverse.
    pub fn encode(&self) -> String {
        let flat: Vec<String> = self.flatten().iter().map(|index| index.to_string()).collect();
        flat.join(".")
    }

    fn flatten_into(&self, flat: &mut Vec<usize>) {
        for choice in &self.choices {
            flat.push(choice.index);
            choice.children.flatten_into(flat);
        }
    }
}

/// Decodes a flattened numeral string: digit runs become indices, any
/// non-digit run separates them. Inverts [`IndexTree::encode`] exactly.
pub fn decode_indices(encoded: &str) -> Vec<usize> {
    encoded
        .split(|ch: char| !ch.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .filter_map(|run| run.parse().ok())
        .collect()
}

/// An immutable parse of a delimited-alternation string. Resolution never
/// mutates the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    source: String,
    root: TextNode,
}

impl Template {
    /// Validates delimiters (nesting allowed), then builds the tree.
    /// Validation and construction are separate passes; a tree is only
    /// ever built from balanced input.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        parse::validate_delimiters(source, true)?;
        Ok(Self { source: source.to_string(), root: parse::build(source) })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// xxh3 of the source text; lets a recorded resolution verify it is
    /// replayed against the template that produced it.
    pub fn fingerprint(&self) -> u64 {
        xxh3_64(self.source.as_bytes())
    }

    /// Resolves one path through the tree and returns both the text and
    /// the choice trace. One draw source is spawned per call and threaded
    /// through the whole recursion, so nested spans never re-consume the
    /// seed.
    pub fn resolve(&self, seed: Option<SeedLike<'_>>) -> (String, IndexTree) {
        let mut source = DrawSource::resolve(seed);
        resolve::resolve_random(&self.root, &mut source)
    }

    /// Randomly resolves the template to text.
    pub fn pick(&self, seed: Option<SeedLike<'_>>) -> String {
        self.resolve(seed).0
    }

    /// Randomly resolves the template and returns only the choice trace;
    /// replaying it through [`Self::select_variants`] yields exactly the
    /// text [`Self::pick`] would have produced for the same seed.
    pub fn pick_indices(&self, seed: Option<SeedLike<'_>>) -> IndexTree {
        self.resolve(seed).1
    }

    /// Deterministically resolves the template from an explicit path,
    /// consuming indices depth-first in the same order `pick` chooses.
    pub fn select_variants(&self, indices: &[usize]) -> Result<String, ResolveError> {
        let mut cursor = indices.iter();
        let text = resolve::select_node(&self.root, &mut cursor)?;
        let unused = cursor.count();
        if unused > 0 {
            return Err(ResolveError::LeftoverIndices { unused });
        }
        Ok(text)
    }

    /// [`Self::select_variants`] over a nested trace.
    pub fn select_variants_tree(&self, tree: &IndexTree) -> Result<String, ResolveError> {
        self.select_variants(&tree.flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NESTED_TEMPLATE: &str = "token1 [A[1[a|b]|2[c|d]]|B] token2 [C|D[1|2]]";

    #[test]
    fn a_template_without_spans_resolves_to_itself() {
        let template = Template::parse("just literal text").expect("valid template");
        assert_eq!(template.pick(Some(1_u64.into())), "just literal text");
        assert_eq!(template.select_variants(&[]).expect("no spans"), "just literal text");
    }

    #[test]
    fn explicit_indices_resolve_the_nested_fixture() {
        let template = Template::parse(NESTED_TEMPLATE).expect("valid template");
        assert_eq!(
            template.select_variants(&[0, 1, 0, 1, 1]).expect("valid path"),
            "token1 A2c token2 D2"
        );
        assert_eq!(
            template.select_variants(&[1, 0]).expect("valid path"),
            "token1 B token2 C"
        );
        assert_eq!(
            template.select_variants(&[0, 0, 1, 1, 0]).expect("valid path"),
            "token1 A1b token2 D1"
        );
    }

    #[test]
    fn running_out_of_indices_is_its_own_error() {
        let template = Template::parse(NESTED_TEMPLATE).expect("valid template");
        assert_eq!(template.select_variants(&[0]), Err(ResolveError::OutOfIndices));
    }

    #[test]
    fn an_index_past_the_alternatives_is_its_own_error() {
        let template = Template::parse("[a|b]").expect("valid template");
        assert_eq!(
            template.select_variants(&[2]),
            Err(ResolveError::IndexOutOfRange { index: 2, alternatives: 2 })
        );
    }

    #[test]
    fn leftover_indices_are_their_own_error() {
        let template = Template::parse("[a|b]").expect("valid template");
        assert_eq!(
            template.select_variants(&[0, 3, 4]),
            Err(ResolveError::LeftoverIndices { unused: 2 })
        );
    }

    #[test]
    fn picked_indices_replay_to_the_picked_text() {
        let template = Template::parse(NESTED_TEMPLATE).expect("valid template");
        for seed in 0..64_u64 {
            let (text, indices) = template.resolve(Some(seed.into()));
            assert_eq!(template.select_variants_tree(&indices).expect("valid trace"), text);
            assert_eq!(template.select_variants(&indices.flatten()).expect("valid trace"), text);
        }
    }

    #[test]
    fn picking_is_deterministic_per_seed() {
        let template = Template::parse(NESTED_TEMPLATE).expect("valid template");
        assert_eq!(template.pick(Some(1_236_u64.into())), template.pick(Some(1_236_u64.into())));
    }

    #[test]
    fn a_retained_generator_decorrelates_successive_picks() {
        let template = Template::parse("[0|1|2|3|4|5|6|7]").expect("valid template");
        let mut rng = crate::rng::SeededRng::new(Some(4_444_u64.into()));
        let picks: Vec<String> =
            (0..8).map(|_| template.pick(Some((&mut rng).into()))).collect();
        assert!(picks.windows(2).any(|pair| pair[0] != pair[1]), "picks all identical: {picks:?}");
    }

    #[test]
    fn encode_and_decode_invert_each_other() {
        let template = Template::parse(NESTED_TEMPLATE).expect("valid template");
        let indices = template.pick_indices(Some(17_u64.into()));
        let encoded = indices.encode();
        assert_eq!(decode_indices(&encoded), indices.flatten());
    }

    #[test]
    fn decoding_groups_on_any_non_digit_run() {
        assert_eq!(decode_indices("0.12.3"), vec![0, 12, 3]);
        assert_eq!(decode_indices("0, 12 - 3"), vec![0, 12, 3]);
        assert_eq!(decode_indices(""), Vec::<usize>::new());
    }

    #[test]
    fn fingerprints_differ_per_source_and_are_stable() {
        let left = Template::parse("[a|b]").expect("valid template");
        let right = Template::parse("[a|c]").expect("valid template");
        assert_ne!(left.fingerprint(), right.fingerprint());
        assert_eq!(left.fingerprint(), Template::parse("[a|b]").unwrap().fingerprint());
    }

    #[test]
    fn index_trees_round_trip_through_serde() {
        let template = Template::parse(NESTED_TEMPLATE).expect("valid template");
        let indices = template.pick_indices(Some(3_u64.into()));
        let json = serde_json::to_string(&indices).expect("serializable");
        let back: IndexTree = serde_json::from_str(&json).expect("deserializable");
        assert_eq!(back, indices);
    }
}
