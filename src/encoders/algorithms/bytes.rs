//! Bridge between big integers and raw big-endian bytes.
//!
//! Base 256 is a power of two, so num-bigint converts it in linear time
//! without going through the generic radix converter.

use num_bigint::BigUint;
use num_traits::Zero;

/// Reads big-endian bytes as an integer. Leading zero bytes do not change the value.
pub fn bytes_to_integer(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Big-endian bytes of `value` with no leading zero bytes; zero is `[0]`.
pub fn integer_to_bytes(value: &BigUint) -> Vec<u8> {
    value.to_bytes_be()
}

/// Big-endian bytes left-padded with zeros to a multiple of `word` bytes.
///
/// Zero produces an empty vector.
pub fn integer_to_words(value: &BigUint, word: usize) -> Vec<u8> {
    if value.is_zero() {
        return Vec::new();
    }
    let bytes = integer_to_bytes(value);
    let padded_len = bytes.len().div_ceil(word) * word;
    let mut out = vec![0u8; padded_len - bytes.len()];
    out.extend_from_slice(&bytes);
    out
}
