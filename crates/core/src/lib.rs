pub mod record;
pub mod rng;
pub mod scale;
pub mod seed;
pub mod shuffle;
pub mod template;
pub mod weights;

pub use record::{ReplayError, ResolutionRecord};
pub use rng::{OutputProfile, SeedLike, SeededRng, ambient_seed};
pub use scale::{scale_unit, scale_unit_to_int};
pub use seed::{INT_SEED_MAX, advance_int_seed, to_int_seed};
pub use shuffle::{pick_item, pick_items, shuffle_in_place, shuffled};
pub use template::{
    DelimiterErrorKind, IndexChoice, IndexTree, ResolveError, Template, TemplateError,
    decode_indices, validate_delimiters,
};
pub use weights::{
    PickError, WeightError, WeightedPicker, pick_weighted_index, to_cumulative_weights,
    weighted_index,
};
