//! Integer seed normalization and the bit-mixing primitives shared by the
//! rest of the crate.

/// Upper bound of the normalized integer seed range, 2^31 - 1.
///
/// This is a Mersenne prime, which keeps the multiplicative step in
/// [`advance_int_seed`] inside the group of nonzero residues.
pub const INT_SEED_MAX: u64 = 2_147_483_647;

const LEHMER_MULTIPLIER: u64 = 16_807;

/// Maps any finite number onto an integer seed in `[1, INT_SEED_MAX]`.
///
/// Integer inputs wrap modulo [`INT_SEED_MAX`]; a wrapped result of zero or
/// below is pushed back up by the modulus, so `0` maps to [`INT_SEED_MAX`]
/// and never to `0` (zero is a fixed point of the modular arithmetic and
/// must stay out of the range). Non-integer inputs are scrambled through the
/// bit mixer first and then scaled into the same range.
pub fn to_int_seed(value: f64) -> u64 {
    let max = INT_SEED_MAX as f64;
    let candidate = if value.is_finite() && value.fract() == 0.0 {
        value % max
    } else {
        (unit_from_bits(mix_bits(value.to_bits())) * max).floor()
    };
    if candidate <= 0.0 { (candidate + max) as u64 } else { candidate as u64 }
}

/// Lehmer / Park-Miller step: `(seed * 16807) % INT_SEED_MAX`.
///
/// Cheap way to decorrelate successive seeds without consuming a generator.
pub fn advance_int_seed(seed: u64) -> u64 {
    ((u128::from(seed) * u128::from(LEHMER_MULTIPLIER)) % u128::from(INT_SEED_MAX)) as u64
}

/// Splitmix64 finalizer. Well distributed even for adjacent inputs, which is
/// what lets the generator advance its base by plain `+1` between draws.
pub(crate) fn mix_bits(mut value: u64) -> u64 {
    value ^= value >> 30;
    value = value.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    value ^= value >> 27;
    value = value.wrapping_mul(0x94D0_49BB_1331_11EB);
    value ^ (value >> 31)
}

/// Top 53 bits of `bits` as a float in `[0, 1)`.
pub(crate) fn unit_from_bits(bits: u64) -> f64 {
    (bits >> 11) as f64 / (1_u64 << 53) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_maps_to_the_maximum_never_to_zero() {
        assert_eq!(to_int_seed(0.0), INT_SEED_MAX);
    }

    #[test]
    fn integer_inputs_wrap_modulo_the_maximum() {
        assert_eq!(to_int_seed(1.0), 1);
        assert_eq!(to_int_seed(INT_SEED_MAX as f64), INT_SEED_MAX);
        assert_eq!(to_int_seed(INT_SEED_MAX as f64 + 5.0), 5);
    }

    #[test]
    fn negative_integers_wrap_into_the_positive_range() {
        assert_eq!(to_int_seed(-1.0), INT_SEED_MAX - 1);
        assert_eq!(to_int_seed(-(INT_SEED_MAX as f64)), INT_SEED_MAX);
    }

    #[test]
    fn fractional_inputs_land_inside_the_contract_range() {
        for value in [0.5, -3.25, 1234.00001, 0.000_001] {
            let normalized = to_int_seed(value);
            assert!((1..=INT_SEED_MAX).contains(&normalized), "out of range for {value}");
        }
    }

    #[test]
    fn fractional_inputs_are_deterministic() {
        assert_eq!(to_int_seed(0.123_456), to_int_seed(0.123_456));
    }

    #[test]
    fn lehmer_step_matches_the_classic_constants() {
        assert_eq!(advance_int_seed(1), 16_807);
        assert_eq!(advance_int_seed(2), 33_614);
    }

    #[test]
    fn lehmer_step_never_reaches_zero_from_the_unit_range() {
        let mut seed = 1;
        for _ in 0..1_000 {
            seed = advance_int_seed(seed);
            assert_ne!(seed, 0);
            assert!(seed < INT_SEED_MAX);
        }
    }

    #[test]
    fn unit_from_bits_stays_below_one() {
        assert_eq!(unit_from_bits(0), 0.0);
        assert!(unit_from_bits(u64::MAX) < 1.0);
    }

    #[test]
    fn mixing_adjacent_values_produces_distant_outputs() {
        let a = mix_bits(41);
        let b = mix_bits(42);
        assert_ne!(a, b);
        assert!((a ^ b).count_ones() > 8, "adjacent inputs should differ in many bits");
    }
}
