//! Hash primitives shared by the cache and dataset builders.
//!
//! The Ethash family mixes three building blocks: Keccak-256/512 (the
//! `sha3` crate's Keccak variant, not the NIST SHA3 padding), BLAKE2b-512
//! for UBQhash, and a 32-bit FNV-1 variant used to aggregate dataset
//! parents and mix words. All multi-byte values are little-endian.

use blake2::Blake2b512;
use byteorder::{ByteOrder, LittleEndian};
use sha3::{Digest, Keccak256, Keccak512};

/// FNV prime used throughout Ethash's dataset and mixing steps.
///
/// Note this is FNV-1 (multiply-then-xor), not FNV-1a (xor-then-multiply)
/// used by ProgPoW/KawPow.
pub const FNV_PRIME: u32 = 0x0100_0193;

#[inline(always)]
pub fn fnv(v1: u32, v2: u32) -> u32 {
    v1.wrapping_mul(FNV_PRIME) ^ v2
}

#[inline]
pub fn read_u32_le(buf: &[u8]) -> u32 {
    LittleEndian::read_u32(buf)
}

#[inline]
pub fn write_u32_le(buf: &mut [u8], v: u32) {
    LittleEndian::write_u32(buf, v);
}

#[inline]
pub fn read_u64_le(buf: &[u8]) -> u64 {
    LittleEndian::read_u64(buf)
}

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

pub fn keccak512(data: &[u8]) -> [u8; 64] {
    let mut hasher = Keccak512::new();
    hasher.update(data);
    hasher.finalize().into()
}

pub fn blake2b512(data: &[u8]) -> [u8; 64] {
    let mut hasher = Blake2b512::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// The 64-byte line hash used by the cache builder (§4.2). Ethash and
/// ETChash use Keccak-512; UBQhash uses BLAKE2b-512. Factoring the two
/// parallel cache builders from the original source into one builder
/// generic over this trait avoids duplicating `mkcache`/`mkcache_round`.
pub trait LineHash {
    fn hash64(data: &[u8]) -> [u8; 64];
}

pub struct Keccak512Line;
impl LineHash for Keccak512Line {
    fn hash64(data: &[u8]) -> [u8; 64] {
        keccak512(data)
    }
}

pub struct Blake2b512Line;
impl LineHash for Blake2b512Line {
    fn hash64(data: &[u8]) -> [u8; 64] {
        blake2b512(data)
    }
}
