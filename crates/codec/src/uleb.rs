//! Unsigned LEB128 codec
//!
//! Lengths and counts in the canonical encoding are ULEB128: 7 data bits per
//! byte, high bit set on every byte except the last. Values up to 127 take a
//! single byte, which is why short names carry a one-byte length prefix.

/// Reasons a ULEB128 value failed to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UlebError {
    /// Input ended before the terminating byte
    Truncated,
    /// Value does not fit in 64 bits
    Overflow,
    /// Encoding has redundant trailing zero groups
    NonCanonical,
}

/// Append `value` as ULEB128.
pub fn encode_uleb128(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf.push(byte);
        if value == 0 {
            break;
        }
    }
}

/// Decode a ULEB128 value from the front of `data`, returning (value, bytes_consumed).
pub fn decode_uleb128(data: &[u8]) -> Result<(u64, usize), UlebError> {
    let mut value: u64 = 0;
    let mut shift = 0u32;
    for (i, &byte) in data.iter().enumerate() {
        let group = (byte & 0x7F) as u64;
        if shift == 63 && group > 1 {
            return Err(UlebError::Overflow);
        }
        value |= group << shift;
        if byte & 0x80 == 0 {
            if i > 0 && byte == 0 {
                return Err(UlebError::NonCanonical);
            }
            return Ok((value, i + 1));
        }
        shift += 7;
        if shift > 63 {
            return Err(UlebError::Overflow);
        }
    }
    Err(UlebError::Truncated)
}
