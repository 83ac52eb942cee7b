//! Base-4 nucleotide encoding and little-endian integer helpers.
//!
//! Prefix table slots are keyed by the k-length prefix read as a base-4 number,
//! most significant symbol first, with A=0, C=1, G=2, T=3.

use std::io::{self, Read, Write};

/// Nucleotides in digit order
pub const BASES: [u8; 4] = *b"ACGT";

/// Map a nucleotide to its base-4 digit (case-insensitive)
#[inline]
pub fn encode_base(byte: u8) -> Option<u32> {
    match byte {
        b'A' | b'a' => Some(0),
        b'C' | b'c' => Some(1),
        b'G' | b'g' => Some(2),
        b'T' | b't' => Some(3),
        _ => None,
    }
}

/// Encode a prefix as a base-4 integer.
///
/// Returns `None` if any byte is outside the nucleotide alphabet. The caller is
/// responsible for keeping `prefix.len()` small enough that `4^len` fits in u32.
pub fn encode_prefix(prefix: &[u8]) -> Option<u32> {
    prefix
        .iter()
        .try_fold(0u32, |code, &b| Some((code << 2) | encode_base(b)?))
}

/// Decode a base-4 integer back to a `k`-length uppercase prefix
pub fn decode_prefix(mut code: u32, k: usize) -> Vec<u8> {
    let mut prefix = vec![b'A'; k];
    for slot in prefix.iter_mut().rev() {
        *slot = BASES[(code & 0b11) as usize];
        code >>= 2;
    }
    prefix
}

/// Write a u32 in little-endian format
pub fn write_u32_le<W: Write>(writer: &mut W, value: u32) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

/// Read a u32 in little-endian format
pub fn read_u32_le<R: Read>(reader: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Write a u64 in little-endian format
pub fn write_u64_le<W: Write>(writer: &mut W, value: u64) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

/// Read a u64 in little-endian format
pub fn read_u64_le<R: Read>(reader: &mut R) -> io::Result<u64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}
