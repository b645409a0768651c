//! Message serialization to and from a length-prefixed bitstream.
//!
//! Layout: a 16-bit big-endian header holding the payload length in bytes,
//! followed by the UTF-8 payload. Every byte is expanded most significant bit
//! first. Bits are `u8` values, always `0` or `1`.

use super::error::{Result, WatermarkError};

/// Length of the header in bits.
pub const HEADER_BITS: usize = 16;

/// Largest payload the header can describe.
pub const MAX_MESSAGE_BYTES: usize = u16::MAX as usize;

/// Total bits needed for a payload of `byte_len` bytes.
pub fn bitstream_len(byte_len: usize) -> usize {
    HEADER_BITS + 8 * byte_len
}

/// Encodes a message into its bitstream.
///
/// Fails with [`WatermarkError::MessageTooLarge`] above 65535 UTF-8 bytes.
pub fn encode(message: &str) -> Result<Vec<u8>> {
    let payload = message.as_bytes();
    let len = u16::try_from(payload.len())
        .map_err(|_| WatermarkError::MessageTooLarge { len: payload.len() })?;

    let mut bits = Vec::with_capacity(bitstream_len(payload.len()));
    for byte in len.to_be_bytes().iter().chain(payload) {
        push_byte(&mut bits, *byte);
    }
    Ok(bits)
}

/// Reads the payload length declared by the header.
///
/// Fails with [`WatermarkError::MalformedBitstream`] if fewer than
/// [`HEADER_BITS`] bits are given.
pub fn declared_len(bits: &[u8]) -> Result<usize> {
    let header = bits.get(..HEADER_BITS).ok_or(WatermarkError::MalformedBitstream {
        needed: HEADER_BITS,
        available: bits.len(),
    })?;

    let len = header
        .iter()
        .fold(0u16, |acc, bit| (acc << 1) | u16::from(bit & 1));
    Ok(len as usize)
}

/// Decodes a bitstream back into its message.
///
/// Bits past the declared payload are ignored.
pub fn decode(bits: &[u8]) -> Result<String> {
    let len = declared_len(bits)?;
    let needed = bitstream_len(len);
    if bits.len() < needed {
        return Err(WatermarkError::MalformedBitstream {
            needed,
            available: bits.len(),
        });
    }

    let payload: Vec<u8> = bits[HEADER_BITS..needed].chunks_exact(8).map(pack_byte).collect();
    Ok(String::from_utf8(payload)?)
}

fn push_byte(bits: &mut Vec<u8>, byte: u8) {
    bits.extend((0..8).rev().map(|shift| (byte >> shift) & 1));
}

fn pack_byte(chunk: &[u8]) -> u8 {
    chunk.iter().fold(0u8, |acc, bit| (acc << 1) | (bit & 1))
}
