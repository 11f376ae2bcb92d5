//! Numbers typed by the operator at a sub-prompt.
//!
//! Addresses are hexadecimal without a `0x` prefix (a prefix is tolerated),
//! sizes and lengths are decimal. Surrounding blanks are ignored. Both
//! parsers reject anything else instead of stopping at the first bad byte.

#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum NumberError {
    #[error("no digits")]
    Empty,
    #[error("unexpected {byte:#04x} at position {position}")]
    InvalidDigit { position: usize, byte: u8 },
    #[error("value does not fit in 64 bits")]
    Overflow,
}

/// Parse a hexadecimal address such as `2000000` or `3F215040`.
///
/// # Errors
/// See [`NumberError`].
pub fn parse_hex(input: &[u8]) -> Result<u64, NumberError> {
    let input = input.trim_ascii();
    let digits = input
        .strip_prefix(b"0x")
        .or_else(|| input.strip_prefix(b"0X"))
        .unwrap_or(input);
    parse_radix(digits, 16)
}

/// Parse a decimal size or length.
///
/// # Errors
/// See [`NumberError`].
pub fn parse_decimal(input: &[u8]) -> Result<u64, NumberError> {
    parse_radix(input.trim_ascii(), 10)
}

fn parse_radix(digits: &[u8], radix: u32) -> Result<u64, NumberError> {
    if digits.is_empty() {
        return Err(NumberError::Empty);
    }

    digits.iter().enumerate().try_fold(0u64, |value, (position, &byte)| {
        let digit = char::from(byte)
            .to_digit(radix)
            .ok_or(NumberError::InvalidDigit { position, byte })?;
        value
            .checked_mul(u64::from(radix))
            .and_then(|v| v.checked_add(u64::from(digit)))
            .ok_or(NumberError::Overflow)
    })
}
