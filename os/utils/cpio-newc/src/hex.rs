//! ASCII hexadecimal decoding of header fields.
//!
//! Accepted digits are `0-9`, `A-F` and `a-f`. Archive writers differ in the
//! case they emit, so both are read; anything else is rejected rather than
//! folded into a garbage value.

#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum HexError {
    #[error("invalid hex digit {byte:#04x} at position {position}")]
    InvalidDigit { position: usize, byte: u8 },
    #[error("{len} hex digits do not fit in 32 bits")]
    TooLong { len: usize },
}

/// Decode up to eight ASCII hex digits, most significant first.
///
/// An empty input decodes to zero.
///
/// # Errors
/// [`HexError::InvalidDigit`] for a byte outside the accepted alphabet,
/// [`HexError::TooLong`] for more than eight digits.
///
/// ```rust
/// # use cpio_newc::decode_hex;
/// assert_eq!(decode_hex(b"0000006E"), Ok(110));
/// assert_eq!(decode_hex(b"deadBEEF"), Ok(0xDEAD_BEEF));
/// assert!(decode_hex(b"0000006G").is_err());
/// ```
pub const fn decode_hex(digits: &[u8]) -> Result<u32, HexError> {
    if digits.len() > 8 {
        return Err(HexError::TooLong { len: digits.len() });
    }

    let mut value = 0u32;
    let mut i = 0;
    while i < digits.len() {
        let byte = digits[i];
        let nibble = match byte {
            b'0'..=b'9' => byte - b'0',
            b'A'..=b'F' => byte - b'A' + 10,
            b'a'..=b'f' => byte - b'a' + 10,
            _ => return Err(HexError::InvalidDigit { position: i, byte }),
        };
        value = (value << 4) | nibble as u32;
        i += 1;
    }

    Ok(value)
}
