//! Cache construction: seed -> sequential hash chain -> randmemohash
//! rounds (§4.2).

use crate::algo::Algorithm;
use crate::hash::{read_u32_le, Blake2b512Line, Keccak512Line, LineHash};
use crate::params::HASH_BYTES;

const CACHE_ROUNDS: usize = 3;

/// Builds the cache from `seed`, dispatching on a runtime [`Algorithm`]
/// to the matching line hash: Keccak-512 for ethash/etchash, BLAKE2b-512
/// for ubqhash (§4.2, §6). The entry point callers reach for once
/// `AlgoConfig::map_coin` has already resolved an `Algorithm` value.
pub fn mkcache_for(cache_bytes: u64, seed: &[u8; 32], algo: Algorithm) -> Vec<u8> {
    match algo {
        Algorithm::Ethash | Algorithm::Etchash => mkcache::<Keccak512Line>(cache_bytes, seed),
        Algorithm::Ubqhash => mkcache::<Blake2b512Line>(cache_bytes, seed),
    }
}

/// Builds the cache in place from `seed`, sized `cache_bytes` (a multiple
/// of `HASH_BYTES`). `H` selects the 64-byte line hash: Keccak-512 for
/// ethash/etchash, BLAKE2b-512 for ubqhash (§4.2).
pub fn mkcache<H: LineHash>(cache_bytes: u64, seed: &[u8; 32]) -> Vec<u8> {
    let n = (cache_bytes / HASH_BYTES) as usize;
    assert!(n > 0, "cache_bytes must hold at least one line");

    let mut cache = vec![0u8; cache_bytes as usize];
    mkcache_init::<H>(&mut cache, seed, n);
    for _ in 0..CACHE_ROUNDS {
        mkcache_round::<H>(&mut cache, n);
    }
    cache
}

fn mkcache_init<H: LineHash>(cache: &mut [u8], seed: &[u8; 32], n: usize) {
    cache[..64].copy_from_slice(&H::hash64(seed));
    for j in 1..n {
        let (prev, cur) = cache.split_at_mut(j * 64);
        let prev_line = &prev[(j - 1) * 64..j * 64];
        let next = H::hash64(prev_line);
        cur[..64].copy_from_slice(&next);
    }
}

fn mkcache_round<H: LineHash>(cache: &mut [u8], n: usize) {
    let mut tmp = [0u8; 64];
    for j in 0..n {
        let prev = (j + n - 1) % n;
        let v = (read_u32_le(&cache[j * 64..j * 64 + 4]) as usize) % n;

        for k in 0..64 {
            tmp[k] = cache[prev * 64 + k] ^ cache[v * 64 + k];
        }
        let hashed = H::hash64(&tmp);
        cache[j * 64..j * 64 + 64].copy_from_slice(&hashed);
    }
}
