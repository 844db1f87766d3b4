//! Fisher-Yates shuffling and uniform picks.

use crate::rng::{DrawSource, SeedLike};
use crate::weights::PickError;

/// Shuffles the slice in place, last index down to 1, swapping each
/// position with a uniformly chosen earlier-or-equal one. O(n); the same
/// seed and input order always produce the same output order.
pub fn shuffle_in_place<T>(items: &mut [T], seed: Option<SeedLike<'_>>) {
    let mut source = DrawSource::resolve(seed);
    shuffle_with(items, &mut source);
}

/// Copy-returning wrapper around [`shuffle_in_place`]; never mutates its
/// input.
pub fn shuffled<T: Clone>(items: &[T], seed: Option<SeedLike<'_>>) -> Vec<T> {
    let mut copy = items.to_vec();
    shuffle_in_place(&mut copy, seed);
    copy
}

pub(crate) fn shuffle_with<T>(items: &mut [T], source: &mut DrawSource) {
    for position in (1..items.len()).rev() {
        let swap_with = source.next_index(position + 1);
        items.swap(position, swap_with);
    }
}

/// Picks one item uniformly.
pub fn pick_item<'a, T>(items: &'a [T], seed: Option<SeedLike<'_>>) -> Result<&'a T, PickError> {
    if items.is_empty() {
        return Err(PickError::Empty);
    }
    let mut source = DrawSource::resolve(seed);
    Ok(&items[source.next_index(items.len())])
}

/// Picks up to `count` distinct items by taking a shuffled prefix. Asking
/// for more items than exist returns all of them in shuffled order.
pub fn pick_items<'a, T>(
    items: &'a [T],
    count: usize,
    seed: Option<SeedLike<'_>>,
) -> Vec<&'a T> {
    let mut indices: Vec<usize> = (0..items.len()).collect();
    shuffle_in_place(&mut indices, seed);
    indices.truncate(count.min(items.len()));
    indices.into_iter().map(|index| &items[index]).collect()
}
