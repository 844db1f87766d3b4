//! Deterministic generator over a mutable integer base, plus the seed-like
//! inputs every entry point in this crate accepts.
//!
//! A [`SeededRng`] owns a single integer base. Each `next()` derives the
//! output from the current base and advances the base by exactly one step,
//! so retaining one generator across calls yields a reproducible sequence
//! while spawning fresh ones from the same raw value replays it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

use crate::scale::{scale_unit, scale_unit_to_int};
use crate::seed::{self, INT_SEED_MAX};

/// Largest base value usable without f64 precision loss, 2^53 - 1.
pub const WIDE_BASE_BOUND: u64 = (1_u64 << 53) - 1;

const UINT32_BOUND: u64 = u32::MAX as u64;

/// A seed accepted by every randomized entry point in this crate.
///
/// `Value` and `Lazy` leave all external state untouched; `Stream` consumes
/// exactly one value from the referenced generator, advancing it. Wrapping
/// the whole thing in `Option` expresses "no seed requested": `None` routes
/// the caller to ambient, non-deterministic randomness.
pub enum SeedLike<'a> {
    /// A plain numeric base.
    Value(f64),
    /// A zero-argument producer, invoked exactly once.
    Lazy(&'a dyn Fn() -> f64),
    /// A stateful generator; one value is consumed from it.
    Stream(&'a mut SeededRng),
}

impl SeedLike<'_> {
    /// Resolves the seed to a raw number, consuming one value from a
    /// `Stream` source.
    pub fn evaluate(self) -> f64 {
        match self {
            Self::Value(value) => value,
            Self::Lazy(produce) => produce(),
            Self::Stream(rng) => rng.next(),
        }
    }
}

impl From<f64> for SeedLike<'static> {
    fn from(value: f64) -> Self {
        Self::Value(value)
    }
}

impl From<u64> for SeedLike<'static> {
    fn from(value: u64) -> Self {
        Self::Value(value as f64)
    }
}

impl<'a> From<&'a mut SeededRng> for SeedLike<'a> {
    fn from(rng: &'a mut SeededRng) -> Self {
        Self::Stream(rng)
    }
}

/// Output configuration for a [`SeededRng`].
///
/// One parametrized generator replaces a subclass per range: each profile
/// couples the base wrap-around bound with the output transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputProfile {
    /// Floats in `[0, 1)`.
    UnitFloat,
    /// Integer-valued floats in `[0, 2^53 - 1]`.
    WideInt,
    /// Integer-valued floats in `[0, 2^31 - 1]`.
    Int32,
    /// Integer-valued floats in `[0, 2^32 - 1]`.
    Uint32,
}

impl OutputProfile {
    fn base_bound(self) -> u64 {
        match self {
            Self::UnitFloat | Self::WideInt => WIDE_BASE_BOUND,
            Self::Int32 => INT_SEED_MAX,
            Self::Uint32 => UINT32_BOUND,
        }
    }

    fn transform(self, unit: f64) -> f64 {
        match self {
            Self::UnitFloat => unit,
            Self::WideInt => scale_unit_to_int(unit, 0, WIDE_BASE_BOUND as i64) as f64,
            Self::Int32 => scale_unit_to_int(unit, 0, INT_SEED_MAX as i64) as f64,
            Self::Uint32 => scale_unit_to_int(unit, 0, UINT32_BOUND as i64) as f64,
        }
    }
}

/// Deterministic pseudo-random generator with an explicit, inspectable base.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeededRng {
    base: u64,
    profile: OutputProfile,
}

impl SeededRng {
    /// Unit-float generator. `None` picks an ambient random base.
    pub fn new(seed: Option<SeedLike<'_>>) -> Self {
        Self::with_profile(seed, OutputProfile::UnitFloat)
    }

    pub fn with_profile(seed: Option<SeedLike<'_>>, profile: OutputProfile) -> Self {
        let base = match seed {
            Some(seed_like) => normalize_base(seed_like.evaluate(), profile.base_bound()),
            None => ambient_seed() % profile.base_bound(),
        };
        Self { base, profile }
    }

    /// Derives a unit-float generator from a seed, consuming one value from
    /// a `Stream` source. `None` passes through: callers use the absent
    /// result to mean "no seed requested".
    pub fn spawn(seed: Option<SeedLike<'_>>) -> Option<Self> {
        seed.map(|seed_like| Self::new(Some(seed_like)))
    }

    /// The current base. Reading it does not advance anything.
    pub fn base(&self) -> u64 {
        self.base
    }

    /// Returns the value `next()` would produce, without advancing.
    pub fn peek(&self) -> f64 {
        self.profile.transform(self.current_unit())
    }

    /// Returns the value derived from the current base and advances the
    /// base by exactly one step.
    pub fn next(&mut self) -> f64 {
        let out = self.peek();
        self.advance_base();
        out
    }

    /// Uniform float in `[min, max)`, advancing the base once.
    pub fn next_in_range(&mut self, min: f64, max: f64) -> f64 {
        let unit = self.current_unit();
        self.advance_base();
        scale_unit(unit, min, max)
    }

    /// Uniform integer in `[min, max]`, advancing the base once.
    pub fn next_int_in_range(&mut self, min: i64, max: i64) -> i64 {
        let unit = self.current_unit();
        self.advance_base();
        scale_unit_to_int(unit, min, max)
    }

    /// Skips ahead `steps` Lehmer steps, producing a decorrelated base
    /// rather than the `+steps` neighborhood of the current one.
    pub fn increment(&mut self, steps: u32) {
        // INT_SEED_MAX is prime, so once folded into [1, INT_SEED_MAX - 1]
        // the multiplicative step can never reach the 0 fixed point.
        let mut folded = self.base % INT_SEED_MAX;
        if folded == 0 {
            folded = 1;
        }
        for _ in 0..steps {
            folded = seed::advance_int_seed(folded);
        }
        self.base = folded;
    }

    /// A generator with the same current base, optionally skipped ahead.
    /// The parent is never touched; with `n_increments == 0` both produce
    /// identical future output until one of them advances.
    pub fn clone_offset(&self, n_increments: u32) -> Self {
        let mut branched = self.clone();
        if n_increments > 0 {
            branched.increment(n_increments);
        }
        branched
    }

    fn current_unit(&self) -> f64 {
        seed::unit_from_bits(seed::mix_bits(self.base))
    }

    fn advance_base(&mut self) {
        self.base = (self.base + 1) % self.profile.base_bound();
    }
}

static AMBIENT_SEED_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Entropy for the unseeded path: wall clock, pid, and a process-wide
/// counter folded through the bit mixer.
pub fn ambient_seed() -> u64 {
    let now_nanos =
        SystemTime::now().duration_since(UNIX_EPOCH).map_or(0_u128, |duration| duration.as_nanos());
    let pid = u64::from(std::process::id());
    let counter = AMBIENT_SEED_COUNTER.fetch_add(1, Ordering::Relaxed);

    let entropy = (now_nanos as u64)
        ^ ((now_nanos >> 64) as u64)
        ^ pid.rotate_left(17)
        ^ counter.rotate_left(7);

    seed::mix_bits(entropy)
}

/// Where a randomized operation draws from: a spawned deterministic
/// generator, or an ambient ChaCha stream when no seed was requested.
pub(crate) enum DrawSource {
    Seeded(SeededRng),
    Ambient(ChaCha8Rng),
}

impl DrawSource {
    pub(crate) fn resolve(seed: Option<SeedLike<'_>>) -> Self {
        match SeededRng::spawn(seed) {
            Some(rng) => Self::Seeded(rng),
            None => Self::Ambient(ChaCha8Rng::seed_from_u64(ambient_seed())),
        }
    }

    pub(crate) fn next_unit(&mut self) -> f64 {
        match self {
            Self::Seeded(rng) => rng.next(),
            Self::Ambient(rng) => seed::unit_from_bits(rng.next_u64()),
        }
    }

    /// Uniform index in `[0, len)`. The unit draw is strictly below 1, so
    /// the scaled value never reaches `len`.
    pub(crate) fn next_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        (self.next_unit() * len as f64) as usize
    }
}

fn normalize_base(value: f64, bound: u64) -> u64 {
    if value.is_finite() && value.fract() == 0.0 {
        let wrapped = value % bound as f64;
        let wrapped = if wrapped < 0.0 { wrapped + bound as f64 } else { wrapped };
        wrapped as u64
    } else {
        seed::mix_bits(value.to_bits()) % bound
    }
}
