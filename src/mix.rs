//! The Hashimoto mixer (§4.4): 64 pseudo-random 128-byte line accesses
//! combining a header hash and nonce with dataset contents.
//!
//! Four dataset-provider shapes all produce the same result for the same
//! epoch: an in-memory full dataset, a file-backed full dataset, a
//! sharded two-file DAG handle, and a "light" mode that recomputes each
//! line on demand from the cache. They are modeled as one trait so the
//! mixing loop itself is written once.

use crate::dataset::calc_dataset_item;
use crate::error::DagError;
use crate::hash::{fnv, keccak256, keccak512, read_u32_le, write_u32_le};

const ACCESSES: usize = 64;
const MIX_BYTES: usize = 128;
const HASH_BYTES: usize = 64;
const WORDS_PER_MIX: usize = MIX_BYTES / 4;

pub type Cmix = [u8; 32];
pub type HashResult = [u8; 32];

/// Supplies 128-byte DAG lines to the mixing loop. Implementations may
/// fail (file I/O); in-memory/light providers never do in practice, but
/// the trait is fallible uniformly so `hashimoto` has one signature.
pub trait DatasetProvider {
    fn full_lines(&self) -> u64;
    fn line(&self, index: u64, out: &mut [u8; MIX_BYTES]) -> Result<(), DagError>;
}

/// Direct index into a contiguous in-memory dataset (§4.4 "full,
/// in-memory").
pub struct FullDataset<'a> {
    pub dag: &'a [u8],
    pub full_lines: u64,
}

impl<'a> DatasetProvider for FullDataset<'a> {
    fn full_lines(&self) -> u64 {
        self.full_lines
    }

    fn line(&self, index: u64, out: &mut [u8; MIX_BYTES]) -> Result<(), DagError> {
        let offset = (index as usize) * MIX_BYTES;
        out.copy_from_slice(&self.dag[offset..offset + MIX_BYTES]);
        Ok(())
    }
}

/// Recomputes the requested line on demand from the cache: two
/// `calc_dataset_item` calls combined into one 128-byte line (§4.4
/// "light").
pub struct LightDataset<'a> {
    pub cache: &'a [u8],
    pub full_lines: u64,
}

impl<'a> DatasetProvider for LightDataset<'a> {
    fn full_lines(&self) -> u64 {
        self.full_lines
    }

    fn line(&self, index: u64, out: &mut [u8; MIX_BYTES]) -> Result<(), DagError> {
        let a = calc_dataset_item(self.cache, 2 * index);
        let b = calc_dataset_item(self.cache, 2 * index + 1);
        out[0..64].copy_from_slice(&a);
        out[64..128].copy_from_slice(&b);
        Ok(())
    }
}

/// Positional reads from a single open file descriptor holding a
/// complete, unsharded dataset (§4.4 "full, file-backed").
pub struct FileDataset<'a> {
    pub file: &'a std::fs::File,
    pub full_lines: u64,
}

impl<'a> DatasetProvider for FileDataset<'a> {
    fn full_lines(&self) -> u64 {
        self.full_lines
    }

    fn line(&self, index: u64, out: &mut [u8; MIX_BYTES]) -> Result<(), DagError> {
        use std::os::unix::fs::FileExt;
        let offset = index * MIX_BYTES as u64;
        let got = self.file.read_at(out, offset)?;
        if got != MIX_BYTES {
            return Err(DagError::ShortRead {
                expected: MIX_BYTES,
                got,
            });
        }
        Ok(())
    }
}

/// Routes reads through a sharded two-file [`crate::dagio::DagHandle`]
/// (§4.4 "full, sharded file").
pub struct DagHandleDataset<'a> {
    pub handle: &'a crate::dagio::DagHandle,
}

impl<'a> DatasetProvider for DagHandleDataset<'a> {
    fn full_lines(&self) -> u64 {
        self.handle.full_lines()
    }

    fn line(&self, index: u64, out: &mut [u8; MIX_BYTES]) -> Result<(), DagError> {
        self.handle.pread(out, 1, index)
    }
}

pub fn hashimoto_dag(
    handle: &crate::dagio::DagHandle,
    header_hash: &[u8; 32],
    nonce: u64,
) -> Result<(Cmix, HashResult), DagError> {
    let provider = DagHandleDataset { handle };
    hashimoto(&provider, header_hash, nonce)
}

fn mix_setup(header_hash: &[u8; 32], nonce: u64) -> ([u8; HASH_BYTES], [u8; MIX_BYTES]) {
    let mut pre = [0u8; 40];
    pre[..32].copy_from_slice(header_hash);
    pre[32..].copy_from_slice(&nonce.to_le_bytes());
    let s = keccak512(&pre);

    let mut mix = [0u8; MIX_BYTES];
    mix[0..HASH_BYTES].copy_from_slice(&s);
    mix[HASH_BYTES..].copy_from_slice(&s);
    (s, mix)
}

fn mix_line_index(round: usize, mix: &[u8; MIX_BYTES], s: &[u8; HASH_BYTES], full_lines: u64) -> u64 {
    let v1 = (round as u32) ^ read_u32_le(&s[0..4]);
    let word_index = round % WORDS_PER_MIX;
    let v2 = read_u32_le(&mix[word_index * 4..word_index * 4 + 4]);
    (fnv(v1, v2) as u64) % full_lines
}

fn mix_do_mix(mix: &mut [u8; MIX_BYTES], line: &[u8; MIX_BYTES]) {
    for j in 0..WORDS_PER_MIX {
        let a = read_u32_le(&mix[j * 4..j * 4 + 4]);
        let b = read_u32_le(&line[j * 4..j * 4 + 4]);
        write_u32_le(&mut mix[j * 4..j * 4 + 4], fnv(a, b));
    }
}

fn mix_finish(mix: &[u8; MIX_BYTES], s: &[u8; HASH_BYTES]) -> (Cmix, HashResult) {
    let mut cmix = [0u8; 32];
    for i in (0..WORDS_PER_MIX).step_by(4) {
        let v1 = read_u32_le(&mix[i * 4..i * 4 + 4]);
        let v2 = read_u32_le(&mix[i * 4 + 4..i * 4 + 8]);
        let v3 = read_u32_le(&mix[i * 4 + 8..i * 4 + 12]);
        let v4 = read_u32_le(&mix[i * 4 + 12..i * 4 + 16]);
        let word = fnv(fnv(fnv(v1, v2), v3), v4);
        write_u32_le(&mut cmix[i..i + 4], word);
    }

    let mut pre = [0u8; HASH_BYTES + 32];
    pre[..HASH_BYTES].copy_from_slice(s);
    pre[HASH_BYTES..].copy_from_slice(&cmix);
    let result = keccak256(&pre);

    (cmix, result)
}

/// Runs the Hashimoto mixing loop (§4.4) against any [`DatasetProvider`].
pub fn hashimoto<P: DatasetProvider>(
    provider: &P,
    header_hash: &[u8; 32],
    nonce: u64,
) -> Result<(Cmix, HashResult), DagError> {
    let (s, mut mix) = mix_setup(header_hash, nonce);
    let full_lines = provider.full_lines();
    let mut line = [0u8; MIX_BYTES];

    for round in 0..ACCESSES {
        let idx = mix_line_index(round, &mix, &s, full_lines);
        provider.line(idx, &mut line)?;
        mix_do_mix(&mut mix, &line);
    }

    Ok(mix_finish(&mix, &s))
}

pub fn hashimoto_full(
    dag: &[u8],
    full_lines: u64,
    header_hash: &[u8; 32],
    nonce: u64,
) -> (Cmix, HashResult) {
    let provider = FullDataset { dag, full_lines };
    hashimoto(&provider, header_hash, nonce).expect("in-memory dataset reads never fail")
}

pub fn hashimoto_light(
    cache: &[u8],
    full_lines: u64,
    header_hash: &[u8; 32],
    nonce: u64,
) -> (Cmix, HashResult) {
    let provider = LightDataset { cache, full_lines };
    hashimoto(&provider, header_hash, nonce).expect("light recomputation never fails")
}

pub fn hashimoto_file(
    file: &std::fs::File,
    full_lines: u64,
    header_hash: &[u8; 32],
    nonce: u64,
) -> Result<(Cmix, HashResult), DagError> {
    let provider = FileDataset { file, full_lines };
    hashimoto(&provider, header_hash, nonce)
}
