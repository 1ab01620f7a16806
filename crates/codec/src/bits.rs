//! Signed values carried as unsigned bits
//!
//! Signed integers are stored inside single-field wrapper structs
//! (`I32 { bits: u32 }`). The codecs only ever see the unsigned pattern;
//! callers convert at the edge with these helpers (two's complement over the
//! field width).

use childfield_core::{Error, Result};

fn check_width(width: u32) -> Result<()> {
    match width {
        8 | 16 | 32 | 64 | 128 => Ok(()),
        other => Err(Error::invalid_input(format!(
            "signed width must be 8, 16, 32, 64 or 128 bits, got {}",
            other
        ))),
    }
}

/// Interpret the low `width` bits of `bits` as a two's complement value
///
/// # Errors
///
/// `ValueOutOfRange` if `bits` has set bits above `width`; `InvalidInput` for
/// an unsupported width.
pub fn bits_to_signed(bits: u128, width: u32) -> Result<i128> {
    check_width(width)?;
    if width == 128 {
        return Ok(bits as i128);
    }
    if bits >> width != 0 {
        return Err(Error::value_out_of_range(format!("u{}", width), bits));
    }
    let sign = 1u128 << (width - 1);
    if bits & sign == 0 {
        Ok(bits as i128)
    } else {
        Ok(bits as i128 - (1i128 << width))
    }
}

/// Two's complement bit pattern of `value` over `width` bits
///
/// # Errors
///
/// `ValueOutOfRange` if `value` does not fit in `width` signed bits.
pub fn signed_to_bits(value: i128, width: u32) -> Result<u128> {
    check_width(width)?;
    if width == 128 {
        return Ok(value as u128);
    }
    let min = -(1i128 << (width - 1));
    let max = (1i128 << (width - 1)) - 1;
    if value < min || value > max {
        return Err(Error::value_out_of_range(format!("i{}", width), value));
    }
    Ok((value as u128) & ((1u128 << width) - 1))
}

/// `I32 { bits }` → `i32`
pub fn i32_from_bits(bits: u32) -> i32 {
    bits as i32
}

/// `i32` → `I32 { bits }`
pub fn i32_to_bits(value: i32) -> u32 {
    value as u32
}

/// `I64 { bits }` → `i64`
pub fn i64_from_bits(bits: u64) -> i64 {
    bits as i64
}

/// `i64` → `I64 { bits }`
pub fn i64_to_bits(value: i64) -> u64 {
    value as u64
}

/// `I128 { bits }` → `i128`
pub fn i128_from_bits(bits: u128) -> i128 {
    bits as i128
}

/// `i128` → `I128 { bits }`
pub fn i128_to_bits(value: i128) -> u128 {
    value as u128
}
