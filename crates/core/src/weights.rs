//! Cumulative weights and weighted selection.
//!
//! Layered: weights normalize into running totals once, a target weight
//! resolves to an index, and [`WeightedPicker`] binds the precomputed
//! totals to a slice of items so repeated picks skip re-validation.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

use crate::rng::{DrawSource, SeedLike};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeightError {
    /// A weight was negative (or NaN).
    Negative,
    /// Items and weights have different lengths.
    LengthMismatch,
    /// Construction was attempted over zero usable items.
    EmptyConstruction,
}

impl fmt::Display for WeightError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::Negative => "All weights must be non-negative numbers.",
            Self::LengthMismatch => "The number of weights must match the number of items.",
            Self::EmptyConstruction => "Cannot create a picker from an empty array.",
        };
        formatter.write_str(message)
    }
}

impl Error for WeightError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickError {
    /// Picking from an empty collection.
    Empty,
    /// Every weight in the collection is zero.
    ZeroTotalWeight,
}

impl fmt::Display for PickError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::Empty => "Cannot pick an item from an empty array.",
            Self::ZeroTotalWeight => "Cannot pick an item from an array with total weight 0.",
        };
        formatter.write_str(message)
    }
}

impl Error for PickError {}

/// Running totals of a weight sequence.
///
/// Fails before any randomness is consumed when a weight is negative or
/// NaN. The output is non-decreasing and its last element is the total.
pub fn to_cumulative_weights(weights: &[f64]) -> Result<Vec<f64>, WeightError> {
    let mut cumulative_weights = Vec::with_capacity(weights.len());
    let mut total = 0.0;
    for &weight in weights {
        if weight < 0.0 || weight.is_nan() {
            return Err(WeightError::Negative);
        }
        total += weight;
        cumulative_weights.push(total);
    }
    Ok(cumulative_weights)
}

/// Smallest index whose cumulative weight is `>= target_weight`.
///
/// `None` for a negative target, an empty sequence, or a target above the
/// total. Callers scale their targets into `[0, total]`, so the last case
/// only shows up through floating-point slop at the boundary.
pub fn weighted_index(cumulative_weights: &[f64], target_weight: f64) -> Option<usize> {
    if target_weight < 0.0 {
        return None;
    }
    // Linear scan; swap for a binary search if weight lists ever get long.
    cumulative_weights.iter().position(|&weight| weight >= target_weight)
}

/// Draws a target in `[0, total)` and resolves it to an index.
pub fn pick_weighted_index(
    cumulative_weights: &[f64],
    seed: Option<SeedLike<'_>>,
) -> Result<usize, PickError> {
    let mut source = DrawSource::resolve(seed);
    pick_weighted_index_with(cumulative_weights, &mut source)
}

pub(crate) fn pick_weighted_index_with(
    cumulative_weights: &[f64],
    source: &mut DrawSource,
) -> Result<usize, PickError> {
    let Some(&total) = cumulative_weights.last() else {
        return Err(PickError::Empty);
    };
    if total <= 0.0 {
        return Err(PickError::ZeroTotalWeight);
    }
    let target_weight = source.next_unit() * total;
    // The unit draw stays below 1, so only boundary slop can push the
    // target past the total; the last index covers it.
    Ok(weighted_index(cumulative_weights, target_weight).unwrap_or(cumulative_weights.len() - 1))
}

/// A reusable weighted picker over borrowed items.
///
/// Weights are validated and accumulated once at construction; every
/// [`pick`](Self::pick) after that only draws and scans.
#[derive(Clone, Debug)]
pub struct WeightedPicker<'a, T> {
    entries: Vec<&'a T>,
    cumulative_weights: Vec<f64>,
}

impl<'a, T> WeightedPicker<'a, T> {
    /// Binds parallel item and weight slices. Length mismatch and negative
    /// weights fail here, not at the first pick.
    pub fn new(items: &'a [T], weights: &[f64]) -> Result<Self, WeightError> {
        if items.len() != weights.len() {
            return Err(WeightError::LengthMismatch);
        }
        let cumulative_weights = to_cumulative_weights(weights)?;
        Ok(Self { entries: items.iter().collect(), cumulative_weights })
    }

    /// Derives each item's weight through `weight_of`.
    pub fn by_weight(items: &'a [T], weight_of: impl Fn(&T) -> f64) -> Result<Self, WeightError> {
        let weights: Vec<f64> = items.iter().map(weight_of).collect();
        Self::new(items, &weights)
    }

    /// Builds a picker from a category distribution. Items whose category
    /// weight is not above zero are dropped (a missing category counts as
    /// `default_weight`); dropping everything is a construction error.
    pub fn from_distribution<K: Ord>(
        items: &'a [T],
        category_of: impl Fn(&T) -> K,
        distribution: &BTreeMap<K, f64>,
        default_weight: f64,
    ) -> Result<Self, WeightError> {
        let mut entries = Vec::new();
        let mut weights = Vec::new();
        for item in items {
            let weight =
                distribution.get(&category_of(item)).copied().unwrap_or(default_weight);
            if weight > 0.0 {
                entries.push(item);
                weights.push(weight);
            }
        }
        if entries.is_empty() {
            return Err(WeightError::EmptyConstruction);
        }
        let cumulative_weights = to_cumulative_weights(&weights)?;
        Ok(Self { entries, cumulative_weights })
    }

    /// Picks one item proportionally to its weight. May be called any
    /// number of times with different seed options.
    pub fn pick(&self, seed: Option<SeedLike<'_>>) -> Result<&'a T, PickError> {
        let index = pick_weighted_index(&self.cumulative_weights, seed)?;
        Ok(self.entries[index])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
