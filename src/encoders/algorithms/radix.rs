//! Arbitrary-base conversion for integers with millions of digits.
//!
//! Parsing uses pairing: adjacent digit groups are folded two at a time,
//! `(v1, w1), (v2, w2) -> (v1 * w2 + v2, w1 * w2)`, so every multiplication
//! is between operands of similar size. Printing uses divide-and-conquer:
//! the value is split by `base^(2^k)` and both halves are printed at fixed
//! width with the next smaller divisor. Both produce exactly what Horner's
//! rule and repeated division produce.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};
use tracing::debug;

use super::errors::ConversionError;
use crate::core::alphabet::{Alphabet, DECIMAL_CHARS, HEX_CHARS};

/// Parses `text` as a number in the alphabet's base, most significant digit first.
///
/// An empty string is the zero digit and parses to 0. Leading zero digits do
/// not change the value.
///
/// # Errors
///
/// Returns [`ConversionError::InvalidCharacter`] for the first character not
/// in the alphabet.
pub fn digits_to_integer(text: &str, alphabet: &Alphabet) -> Result<BigUint, ConversionError> {
    let digits = decode_digits(text, alphabet)?;
    let first = digits.iter().position(|&d| d != 0).unwrap_or(digits.len());
    let digits = &digits[first..];
    let base = alphabet.base();

    // Decimal and hex digit values map straight onto num-bigint's own parser
    if is_native_radix(alphabet) {
        return Ok(BigUint::from_radix_be(digits, base).unwrap_or_default());
    }

    debug!(base, digits = digits.len(), "pairing digits");
    Ok(pair_digits(digits, base))
}

/// Prints `value` in the alphabet's base with no leading zero digits.
///
/// Zero prints as the empty string.
pub fn integer_to_digits(value: &BigUint, alphabet: &Alphabet) -> String {
    if value.is_zero() {
        return String::new();
    }
    if is_hex(alphabet) {
        return value.to_str_radix(16);
    }

    let base = alphabet.base();
    debug!(base, bits = value.bits(), "splitting integer");
    let digits = split_digits(value, base);
    let first = digits.iter().position(|&d| d != 0).unwrap_or(digits.len());
    let chars = alphabet.chars();
    digits[first..].iter().map(|&d| chars[d as usize]).collect()
}

/// Digit values of `value` in `base`, most significant first, left-padded
/// with zeros to a power-of-two width.
pub fn split_digits(value: &BigUint, base: u32) -> Vec<u8> {
    let divisors = divisor_table(value, base);
    let top = divisors.len() - 1;
    let mut out = Vec::with_capacity(2usize << top);
    split(value.clone(), &divisors, top, base, &mut out);
    out
}

/// `[base, base^2, base^4, ...]`, stopping at the first divisor whose square
/// exceeds `value`.
fn divisor_table(value: &BigUint, base: u32) -> Vec<BigUint> {
    let value_bits = value.bits();
    let mut divisors = vec![BigUint::from(base)];
    loop {
        let last = &divisors[divisors.len() - 1];
        if last.bits() * 2 - 1 > value_bits {
            break;
        }
        let next = last * last;
        divisors.push(next);
    }
    divisors
}

/// Writes exactly `2^(level+1)` digits of `value` into `out`.
///
/// Requires `value < base^(2^(level+1))`.
fn split(value: BigUint, divisors: &[BigUint], level: usize, base: u32, out: &mut Vec<u8>) {
    let width = 2usize << level;
    if let Some(small) = value.to_u64() {
        push_fixed_width(small, base, width, out);
        return;
    }

    // level 0 holds values below base^2, which always fit a u64
    let (high, low) = value.div_rem(&divisors[level]);
    split(high, divisors, level - 1, base, out);
    split(low, divisors, level - 1, base, out);
}

fn push_fixed_width(mut value: u64, base: u32, width: usize, out: &mut Vec<u8>) {
    let start = out.len();
    out.resize(start + width, 0);
    let base = u64::from(base);
    for slot in out[start..].iter_mut().rev() {
        if value == 0 {
            break;
        }
        *slot = (value % base) as u8;
        value /= base;
    }
}

/// Folds digit values into one integer by pairing adjacent groups.
pub fn pair_digits(digits: &[u8], base: u32) -> BigUint {
    if digits.is_empty() {
        return BigUint::zero();
    }

    // The first few folds only touch machine words; a group of `width`
    // digits is what `log2(width)` pairing passes would have built.
    let (width, word_weight) = word_group(base);
    let mut values: Vec<BigUint> = digits
        .chunks(width)
        .map(|group| BigUint::from(horner_u64(group, base)))
        .collect();

    let tail_len = match digits.len() % width {
        0 => width,
        n => n,
    };
    // every group but the last weighs `full`; the last weighs `tail`
    let mut full = BigUint::from(word_weight);
    let mut tail = BigUint::from(base).pow(tail_len as u32);

    while values.len() > 2 {
        let n = values.len();
        let mut next = Vec::with_capacity(n.div_ceil(2));
        let mut iter = values.into_iter();
        let mut consumed = 0;
        while let Some(high) = iter.next() {
            match iter.next() {
                Some(low) => {
                    consumed += 2;
                    let weight = if consumed == n { &tail } else { &full };
                    next.push(high * weight + low);
                }
                None => next.push(high),
            }
        }

        if n % 2 == 0 {
            tail = &full * &tail;
        }
        if next.len() > 2 {
            full = &full * &full;
        }
        values = next;
    }

    let mut iter = values.into_iter();
    let first = iter.next().unwrap_or_default();
    match iter.next() {
        Some(second) => first * &tail + second,
        None => first,
    }
}

/// Largest power-of-two digit count whose weight still fits a u64, and that weight.
fn word_group(base: u32) -> (usize, u64) {
    let base = u64::from(base);
    let mut width = 1usize;
    let mut weight = base;
    while let Some(squared) = weight.checked_mul(weight) {
        width *= 2;
        weight = squared;
    }
    (width, weight)
}

fn horner_u64(digits: &[u8], base: u32) -> u64 {
    let base = u64::from(base);
    digits
        .iter()
        .fold(0u64, |acc, &d| acc * base + u64::from(d))
}

fn decode_digits(text: &str, alphabet: &Alphabet) -> Result<Vec<u8>, ConversionError> {
    text.chars()
        .enumerate()
        .map(|(position, c)| {
            alphabet
                .decode_char(c)
                .ok_or_else(|| ConversionError::invalid_character(c, position))
        })
        .collect()
}

fn is_hex(alphabet: &Alphabet) -> bool {
    alphabet.chars().iter().copied().eq(HEX_CHARS.chars())
}

fn is_native_radix(alphabet: &Alphabet) -> bool {
    is_hex(alphabet) || alphabet.chars().iter().copied().eq(DECIMAL_CHARS.chars())
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn naive_to_digits(value: &BigUint, alphabet: &Alphabet) -> String {
        let base = BigUint::from(alphabet.base());
        let mut value = value.clone();
        let mut out = Vec::new();
        while !value.is_zero() {
            let (q, r) = value.div_rem(&base);
            out.push(alphabet.encode_digit(r.to_u32().unwrap()).unwrap());
            value = q;
        }
        out.iter().rev().collect()
    }

    fn naive_to_integer(text: &str, alphabet: &Alphabet) -> BigUint {
        let base = BigUint::from(alphabet.base());
        text.chars().fold(BigUint::zero(), |acc, c| {
            acc * &base + BigUint::from(alphabet.decode_char(c).unwrap())
        })
    }

    fn random_integer(rng: &mut StdRng, max_bytes: usize) -> BigUint {
        let len = rng.random_range(0..=max_bytes);
        let bytes: Vec<u8> = (0..len).map(|_| rng.random()).collect();
        BigUint::from_bytes_be(&bytes)
    }

    fn alphabets() -> Vec<Alphabet> {
        vec![
            Alphabet::decimal(),
            Alphabet::hex(),
            Alphabet::content(),
            Alphabet::book_id(),
        ]
    }

    #[test]
    fn test_zero_is_empty() {
        for alphabet in alphabets() {
            assert_eq!(integer_to_digits(&BigUint::zero(), &alphabet), "");
            assert_eq!(digits_to_integer("", &alphabet).unwrap(), BigUint::zero());
        }
    }

    #[test]
    fn test_one_is_second_character() {
        let book_id = Alphabet::book_id();
        assert_eq!(integer_to_digits(&BigUint::one(), &book_id), "\"");
        let content = Alphabet::content();
        assert_eq!(integer_to_digits(&BigUint::one(), &content), "a");
    }

    #[test]
    fn test_small_values() {
        let content = Alphabet::content();
        assert_eq!(integer_to_digits(&BigUint::from(29u32), &content), "a ");
        assert_eq!(integer_to_digits(&BigUint::from(30u32), &content), "aa");
        assert_eq!(digits_to_integer("aa", &content).unwrap(), BigUint::from(30u32));
        assert_eq!(
            integer_to_digits(&BigUint::from(1234567890u64), &Alphabet::decimal()),
            "1234567890"
        );
    }

    #[test]
    fn test_leading_zero_digits_are_ignored() {
        let book_id = Alphabet::book_id();
        let plain = digits_to_integer("Hello~", &book_id).unwrap();
        let padded = digits_to_integer("!!Hello~", &book_id).unwrap();
        assert_eq!(plain, padded);
        assert_eq!(integer_to_digits(&padded, &book_id), "Hello~");
    }

    #[test]
    fn test_invalid_character_position() {
        let err = digits_to_integer("abcA", &Alphabet::content()).unwrap_err();
        assert_eq!(err, ConversionError::invalid_character('A', 3));
    }

    #[test]
    fn test_matches_naive_printing() {
        let mut rng = StdRng::seed_from_u64(7);
        for alphabet in alphabets() {
            for _ in 0..40 {
                let value = random_integer(&mut rng, 600);
                assert_eq!(
                    integer_to_digits(&value, &alphabet),
                    naive_to_digits(&value, &alphabet),
                    "base {}",
                    alphabet.base()
                );
            }
        }
    }

    #[test]
    fn test_matches_naive_parsing() {
        let mut rng = StdRng::seed_from_u64(11);
        for alphabet in alphabets() {
            let chars = alphabet.chars();
            for _ in 0..40 {
                let len = rng.random_range(0..1500);
                let text: String = (0..len)
                    .map(|_| chars[rng.random_range(0..chars.len())])
                    .collect();
                assert_eq!(
                    digits_to_integer(&text, &alphabet).unwrap(),
                    naive_to_integer(&text, &alphabet),
                    "base {} length {}",
                    alphabet.base(),
                    len
                );
            }
        }
    }

    #[test]
    fn test_pairing_every_length_near_group_boundaries() {
        // Group widths are 8 or 16 digits; cover odd tails and pass counts
        let content = Alphabet::content();
        let chars = content.chars();
        for len in 1..70 {
            let text: String = (0..len).map(|i| chars[(i * 7 + 3) % 29]).collect();
            assert_eq!(
                pair_digits(&decode_digits(&text, &content).unwrap(), 29),
                naive_to_integer(&text, &content),
                "length {}",
                len
            );
        }
    }

    #[test]
    fn test_split_digits_fixed_width() {
        let digits = split_digits(&BigUint::from(5u32), 10);
        assert_eq!(digits, vec![0, 5]);
        let digits = split_digits(&BigUint::from(123u32), 10);
        assert_eq!(digits.len(), 4);
        assert_eq!(digits, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_divisor_table_stops_at_square() {
        let value = BigUint::from(10u32).pow(40);
        let divisors = divisor_table(&value, 10);
        let last = divisors.last().unwrap();
        assert!(last * last > value);
        assert_eq!(divisors[0], BigUint::from(10u32));
        assert_eq!(divisors[1], BigUint::from(100u32));
    }

    #[test]
    fn test_word_group() {
        assert_eq!(word_group(10), (16, 10u64.pow(16)));
        assert_eq!(word_group(29), (8, 29u64.pow(8)));
        assert_eq!(word_group(94), (8, 94u64.pow(8)));
        assert_eq!(word_group(2), (32, 1u64 << 32));
    }

    #[test]
    fn test_custom_alphabet_roundtrip() {
        let alphabet = Alphabet::from_chars("αβγδε").unwrap();
        let value = BigUint::from(987_654_321u64);
        let text = integer_to_digits(&value, &alphabet);
        assert!(!text.starts_with('α'));
        assert_eq!(digits_to_integer(&text, &alphabet).unwrap(), value);
    }
}
