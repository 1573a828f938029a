//! Per-epoch parameters: cache size, dataset size, seed hash (§4.1).

use crate::algo::Algorithm;
use crate::hash::keccak256;

pub const HASH_BYTES: u64 = 64;
pub const MIX_BYTES: u64 = 128;
pub const SEED_BYTES: usize = 32;

const CACHE_BYTES_INIT: u64 = 1 << 24;
const CACHE_BYTES_GROWTH: u64 = 1 << 17;
const DATASET_BYTES_INIT: u64 = 1 << 30;
const DATASET_BYTES_GROWTH: u64 = 1 << 23;

fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n == 2 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut i = 3u64;
    while i * i <= n {
        if n % i == 0 {
            return false;
        }
        i += 2;
    }
    true
}

/// `cache_bytes(epoch)`: the largest multiple-of-128 value at or below
/// `2^24 + 2^17 * epoch` such that dividing by `HASH_BYTES` gives a prime
/// line count (§4.1).
pub fn cache_bytes(epoch: u64) -> u64 {
    let mut sz = CACHE_BYTES_INIT + CACHE_BYTES_GROWTH * epoch - HASH_BYTES;
    while !is_prime(sz / HASH_BYTES) {
        sz -= 2 * HASH_BYTES;
    }
    sz
}

/// `full_lines(epoch)`: the largest prime line count at or below
/// `(2^30 + 2^23 * epoch) / 128 - 1` (§4.1).
pub fn full_lines(epoch: u64) -> u64 {
    let mut sz = (DATASET_BYTES_INIT + DATASET_BYTES_GROWTH * epoch) / MIX_BYTES - 1;
    while !is_prime(sz) {
        sz -= 2;
    }
    sz
}

/// `seedhash(epoch, algo)`: iterated Keccak-256 over a zero-initialized
/// 32-byte buffer. Iteration count is `epoch` for ethash/ubqhash,
/// `2*epoch` for etchash (§4.1).
pub fn seedhash(epoch: u64, algo: Algorithm) -> [u8; SEED_BYTES] {
    let rounds = match algo {
        Algorithm::Ethash | Algorithm::Ubqhash => epoch,
        Algorithm::Etchash => epoch * 2,
    };
    let mut seed = [0u8; SEED_BYTES];
    for _ in 0..rounds {
        seed = keccak256(&seed);
    }
    seed
}
