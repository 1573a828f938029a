//! Hex helpers for header hashes and similar fixed-width fields (§4.8).
//!
//! No binary is shipped from this crate; these exist so downstream
//! verification tools can decode/encode the same fixed-width hex fields
//! the core works with, matching the original's `hex_decode_big_endian`
//! without its `exit(1)`-on-error behavior.

use crate::error::DagError;

/// Decodes a big-endian hex string (with or without a leading `0x`) into
/// exactly `N` bytes. Rejects a length mismatch or a non-hex digit
/// instead of aborting the process (§4.8, §7).
pub fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], DagError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    if s.len() != N * 2 {
        return Err(DagError::WrongHexLength {
            expected: N * 2,
            got: s.len(),
        });
    }

    let mut out = [0u8; N];
    for (i, chunk) in s.as_bytes().chunks(2).enumerate() {
        let hi = hex_digit(chunk[0])?;
        let lo = hex_digit(chunk[1])?;
        out[i] = (hi << 4) | lo;
    }
    Ok(out)
}

/// Decodes a 32-byte header hash (§3).
pub fn decode_header_hash(s: &str) -> Result<[u8; 32], DagError> {
    decode_fixed::<32>(s)
}

/// Encodes bytes as lowercase hex with a leading `0x`.
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

fn hex_digit(c: u8) -> Result<u8, DagError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(DagError::BadHexDigit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_with_0x_prefix() {
        let hash = decode_header_hash(
            "0x892a2e92b8a050dff196e1a19efcb2a903655584913e719435c0ad2b53cfa7bd",
        )
        .unwrap();
        assert_eq!(
            encode_hex(&hash),
            "0x892a2e92b8a050dff196e1a19efcb2a903655584913e719435c0ad2b53cfa7bd"
        );
    }

    #[test]
    fn accepts_missing_0x_prefix() {
        let a = decode_header_hash(
            "0x892a2e92b8a050dff196e1a19efcb2a903655584913e719435c0ad2b53cfa7bd",
        )
        .unwrap();
        let b = decode_header_hash(
            "892a2e92b8a050dff196e1a19efcb2a903655584913e719435c0ad2b53cfa7bd",
        )
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(matches!(
            decode_header_hash("0x1234"),
            Err(DagError::WrongHexLength { .. })
        ));
    }

    #[test]
    fn rejects_non_hex_digit() {
        let bad = "zz".repeat(32);
        assert!(matches!(
            decode_header_hash(&bad),
            Err(DagError::BadHexDigit)
        ));
    }
}
