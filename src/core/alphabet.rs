use std::collections::HashMap;
use std::sync::LazyLock;

use crate::encoders::algorithms::errors::ConversionError;

/// Decimal digits, base 10.
pub const DECIMAL_CHARS: &str = "0123456789";

/// Lowercase hexadecimal digits, base 16.
pub const HEX_CHARS: &str = "0123456789abcdef";

/// The 29 symbols a book page is written in. Space is digit zero.
pub const CONTENT_CHARS: &str = " abcdefghijklmnopqrstuvwxyz,.";

/// Printable ASCII without space (`!` through `~`), base 94.
pub const BOOK_ID_CHARS: &str = concat!(
    "!\"#$%&'()*+,-./0123456789:;<=>?@",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`",
    "abcdefghijklmnopqrstuvwxyz{|}~"
);

static DECIMAL: LazyLock<Alphabet> = LazyLock::new(|| builtin(DECIMAL_CHARS));
static HEX: LazyLock<Alphabet> = LazyLock::new(|| builtin(HEX_CHARS));
static CONTENT: LazyLock<Alphabet> = LazyLock::new(|| builtin(CONTENT_CHARS));
static BOOK_ID: LazyLock<Alphabet> = LazyLock::new(|| builtin(BOOK_ID_CHARS));

fn builtin(chars: &str) -> Alphabet {
    Alphabet::from_chars(chars).expect("built-in alphabets are valid")
}

/// An ordered character set defining a positional base.
///
/// The position of a character is its digit value, so `chars[0]` is the
/// zero digit. Bases are limited to 2..=256 so that digit values fit a `u8`.
#[derive(Debug, Clone)]
pub struct Alphabet {
    chars: Vec<char>,
    char_to_index: HashMap<char, u8>,
    // ASCII characters resolve through this table instead of the map
    ascii: [Option<u8>; 128],
}

impl Alphabet {
    /// Creates an alphabet from an ordered list of characters.
    ///
    /// # Errors
    ///
    /// Returns an error if the alphabet has fewer than two characters, more
    /// than 256, or contains duplicates.
    pub fn new(chars: Vec<char>) -> Result<Self, ConversionError> {
        if chars.len() < 2 {
            return Err(ConversionError::InvalidAlphabet(format!(
                "alphabet needs at least 2 characters, got {}",
                chars.len()
            )));
        }
        if chars.len() > 256 {
            return Err(ConversionError::InvalidAlphabet(format!(
                "alphabet may hold at most 256 characters, got {}",
                chars.len()
            )));
        }

        let mut char_to_index = HashMap::with_capacity(chars.len());
        let mut ascii = [None; 128];
        for (i, &c) in chars.iter().enumerate() {
            let digit = i as u8;
            if char_to_index.insert(c, digit).is_some() {
                return Err(ConversionError::InvalidAlphabet(format!(
                    "duplicate character in alphabet: {:?}",
                    c
                )));
            }
            if c.is_ascii() {
                ascii[c as usize] = Some(digit);
            }
        }

        Ok(Alphabet {
            chars,
            char_to_index,
            ascii,
        })
    }

    /// Creates an alphabet from a string of characters.
    pub fn from_chars(s: &str) -> Result<Self, ConversionError> {
        Self::new(s.chars().collect())
    }

    /// Base 10.
    pub fn decimal() -> Self {
        DECIMAL.clone()
    }

    /// Base 16, lowercase.
    pub fn hex() -> Self {
        HEX.clone()
    }

    /// Base 29 page alphabet.
    pub fn content() -> Self {
        CONTENT.clone()
    }

    /// Base 94 book ID alphabet.
    pub fn book_id() -> Self {
        BOOK_ID.clone()
    }

    /// Returns the base (radix) of the alphabet.
    pub fn base(&self) -> u32 {
        self.chars.len() as u32
    }

    /// The character standing for digit zero.
    pub fn zero_char(&self) -> char {
        self.chars[0]
    }

    /// The characters in digit order.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Encodes a digit (0 to base-1) as a character.
    ///
    /// Returns `None` if the digit is out of range.
    pub fn encode_digit(&self, digit: u32) -> Option<char> {
        self.chars.get(digit as usize).copied()
    }

    /// Decodes a character back to its digit value.
    ///
    /// Returns `None` if the character is not in the alphabet.
    #[inline]
    pub fn decode_char(&self, c: char) -> Option<u8> {
        if c.is_ascii() {
            self.ascii[c as usize]
        } else {
            self.char_to_index.get(&c).copied()
        }
    }

    pub fn contains(&self, c: char) -> bool {
        self.decode_char(c).is_some()
    }

    /// Keeps only the characters of `text` that belong to this alphabet.
    pub fn filter(&self, text: &str) -> String {
        text.chars().filter(|&c| self.contains(c)).collect()
    }
}
