//! Full dataset construction: 256-parent FNV aggregation over the cache,
//! always finished with Keccak-512 regardless of the cache's line hash
//! (§4.3). Items are independent pure functions of (cache, index), so
//! range construction may be sharded or parallelized by the caller; this
//! module also offers a `rayon`-parallel entry point for convenience.

use rayon::prelude::*;

use crate::hash::{fnv, keccak512, read_u32_le, write_u32_le};
use crate::params::HASH_BYTES;

const DATASET_PARENTS: usize = 256;
const WORDS_PER_ITEM: usize = 16; // HASH_BYTES / 4

/// Computes a single 64-byte dataset item for `item_index` from `cache`
/// (§4.3). `cache.len()` must be a multiple of `HASH_BYTES`.
pub fn calc_dataset_item(cache: &[u8], item_index: u64) -> [u8; 64] {
    let n = (cache.len() as u64) / HASH_BYTES;
    let r = WORDS_PER_ITEM as u64;

    let cache_line = (item_index % n) as usize * 64;
    let mut mix = [0u8; 64];
    mix.copy_from_slice(&cache[cache_line..cache_line + 64]);

    let first = read_u32_le(&mix[0..4]) ^ (item_index as u32);
    write_u32_le(&mut mix[0..4], first);

    mix = keccak512(&mix);

    for j in 0..DATASET_PARENTS {
        let word_idx = (j as u64 % r) as usize;
        let mix_word = read_u32_le(&mix[word_idx * 4..word_idx * 4 + 4]);
        let cache_index = (fnv(item_index as u32 ^ j as u32, mix_word) as u64 % n) as usize * 64;

        for k in 0..WORDS_PER_ITEM {
            let a = read_u32_le(&mix[k * 4..k * 4 + 4]);
            let b = read_u32_le(&cache[cache_index + k * 4..cache_index + k * 4 + 4]);
            write_u32_le(&mut mix[k * 4..k * 4 + 4], fnv(a, b));
        }
    }

    keccak512(&mix)
}

/// Fills `out` (a buffer of `lines * MIX_BYTES` bytes) with DAG lines
/// `[start_line, start_line + lines)`, each line being dataset items
/// `2*L` and `2*L+1` concatenated (§4.3). Composable: any partitioning of
/// `[0, L)` into consecutive sub-ranges concatenated equals the whole.
pub fn calc_dataset_range(out: &mut [u8], start_line: u64, lines: u64, cache: &[u8]) {
    debug_assert_eq!(out.len() as u64, lines * 128);
    for i in 0..2 * lines {
        let item = calc_dataset_item(cache, 2 * start_line + i);
        let offset = (i * 64) as usize;
        out[offset..offset + 64].copy_from_slice(&item);
    }
}

/// Same as [`calc_dataset_range`] but computes items in parallel with
/// `rayon`; item order in the output is preserved.
pub fn calc_dataset_range_parallel(out: &mut [u8], start_line: u64, lines: u64, cache: &[u8]) {
    debug_assert_eq!(out.len() as u64, lines * 128);
    out.par_chunks_mut(64)
        .enumerate()
        .for_each(|(i, chunk)| {
            let item = calc_dataset_item(cache, 2 * start_line + i as u64);
            chunk.copy_from_slice(&item);
        });
}

/// Convenience wrapper building the full dataset for `full_lines` lines.
pub fn calc_dataset(full_lines: u64, cache: &[u8]) -> Vec<u8> {
    let mut dag = vec![0u8; (full_lines * 128) as usize];
    calc_dataset_range_parallel(&mut dag, 0, full_lines, cache);
    dag
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Keccak512Line;

    fn test_cache() -> Vec<u8> {
        crate::cache::mkcache::<Keccak512Line>(64 * 17, &[0u8; 32])
    }

    #[test]
    fn items_are_deterministic() {
        let cache = test_cache();
        let a = calc_dataset_item(&cache, 0);
        let b = calc_dataset_item(&cache, 0);
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_indices_give_distinct_items() {
        let cache = test_cache();
        assert_ne!(calc_dataset_item(&cache, 0), calc_dataset_item(&cache, 1));
    }

    #[test]
    fn range_composition_matches_concatenated_subranges() {
        let cache = test_cache();
        let lines = 6u64;

        let mut whole = vec![0u8; (lines * 128) as usize];
        calc_dataset_range(&mut whole, 0, lines, &cache);

        let mut parts = Vec::new();
        let mut a = vec![0u8; 2 * 128];
        calc_dataset_range(&mut a, 0, 2, &cache);
        parts.extend_from_slice(&a);
        let mut b = vec![0u8; 4 * 128];
        calc_dataset_range(&mut b, 2, 4, &cache);
        parts.extend_from_slice(&b);

        assert_eq!(whole, parts);
    }

    #[test]
    fn parallel_matches_sequential() {
        let cache = test_cache();
        let lines = 10u64;

        let mut seq = vec![0u8; (lines * 128) as usize];
        calc_dataset_range(&mut seq, 0, lines, &cache);

        let mut par = vec![0u8; (lines * 128) as usize];
        calc_dataset_range_parallel(&mut par, 0, lines, &cache);

        assert_eq!(seq, par);
    }

    #[test]
    fn dag_line_halves_are_consecutive_items() {
        let cache = test_cache();
        let mut line = vec![0u8; 128];
        calc_dataset_range(&mut line, 3, 1, &cache);

        assert_eq!(&line[0..64], &calc_dataset_item(&cache, 6)[..]);
        assert_eq!(&line[64..128], &calc_dataset_item(&cache, 7)[..]);
    }
}
