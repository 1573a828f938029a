//! Difficulty-to-target arithmetic and result comparison (§4.5).

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::error::DagError;

/// Computes `target = floor(2^256 / difficulty)`, serialized big-endian
/// into 32 bytes. `difficulty` is four little-endian 64-bit limbs, limb 0
/// least significant (§4.5). Rejects a zero difficulty rather than
/// dividing by zero.
pub fn get_target(difficulty: &[u64; 4]) -> Result<[u8; 32], DagError> {
    let d = BigUint::from(difficulty[0])
        + (BigUint::from(difficulty[1]) << 64)
        + (BigUint::from(difficulty[2]) << 128)
        + (BigUint::from(difficulty[3]) << 192);

    if d.is_zero() {
        return Err(DagError::ZeroDifficulty);
    }

    let two_256 = BigUint::one() << 256;
    let q = two_256 / d;

    let bytes = q.to_bytes_be();
    let mut target = [0u8; 32];
    let start = 32 - bytes.len();
    target[start..].copy_from_slice(&bytes);
    Ok(target)
}

/// `result < target`, both 32-byte big-endian magnitudes, compared
/// byte-wise lexicographically. Strict `<` is deliberate (matching
/// ethminer, not the reference Python implementation's `<=`) (§4.5).
pub fn below_target(result: &[u8; 32], target: &[u8; 32]) -> bool {
    result.as_slice() < target.as_slice()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_difficulty_is_rejected() {
        assert!(matches!(
            get_target(&[0, 0, 0, 0]),
            Err(DagError::ZeroDifficulty)
        ));
    }

    #[test]
    fn difficulty_one_is_all_ff() {
        let target = get_target(&[1, 0, 0, 0]).unwrap();
        assert_eq!(target, [0xffu8; 32]);
    }

    #[test]
    fn target_is_monotonically_non_increasing_in_difficulty() {
        let low = get_target(&[1_000, 0, 0, 0]).unwrap();
        let high = get_target(&[2_000, 0, 0, 0]).unwrap();
        assert!(high.as_slice() <= low.as_slice());
    }

    #[test]
    fn target_matches_bit_exact_big_integer_division() {
        let difficulty = 4_000_000_000u64;
        let expected = (BigUint::one() << 256) / BigUint::from(difficulty);
        let target = get_target(&[difficulty, 0, 0, 0]).unwrap();
        assert_eq!(BigUint::from_bytes_be(&target), expected);
    }

    #[test]
    fn below_target_uses_strict_less_than() {
        let target = [0x10u8; 32];
        let equal = [0x10u8; 32];
        let mut lower = [0x10u8; 32];
        lower[31] = 0x0f;

        assert!(!below_target(&equal, &target));
        assert!(below_target(&lower, &target));
    }

    #[test]
    fn scenario_one_result_is_below_scenario_three_target() {
        let result = hex::decode(
            "00000000b4c2c97e7bbbc5cafd7abf0782a0dc5e7d4bcac73385515a02be3547",
        )
        .unwrap();
        let result: [u8; 32] = result.try_into().unwrap();
        let target = get_target(&[4_000_000_000, 0, 0, 0]).unwrap();
        assert!(below_target(&result, &target));
    }
}
