//! The flat page text of a book and its page/line view.
//!
//! Book content is the base-29 digit string of the index, least significant
//! digit first, padded with the zero digit (space) to `CHARS_PER_BOOK`.

use num_bigint::BigUint;

use super::{Book, Page};
use crate::core::alphabet::Alphabet;
use crate::core::layout::{CHARS_PER_BOOK, CHARS_PER_LINE, CHARS_PER_PAGE};
use crate::encoders::algorithms::errors::{BookError, ConversionError};
use crate::encoders::algorithms::radix::{digits_to_integer, integer_to_digits};

/// Full-length page text for `index`.
///
/// The caller keeps `index` within the library; a larger index yields more
/// than `CHARS_PER_BOOK` characters.
pub fn index_to_content(index: &BigUint, alphabet: &Alphabet) -> String {
    let digits = integer_to_digits(index, alphabet);
    let mut content = String::with_capacity(CHARS_PER_BOOK.max(digits.len()));
    content.extend(digits.chars().rev());
    let missing = CHARS_PER_BOOK.saturating_sub(content.chars().count());
    content.extend(std::iter::repeat_n(alphabet.zero_char(), missing));
    content
}

/// Book index of `content`. Any length is accepted; text after the end is
/// implied zero digits and does not change the value.
pub fn content_to_index(content: &str, alphabet: &Alphabet) -> Result<BigUint, ConversionError> {
    let reversed: String = content.chars().rev().collect();
    digits_to_integer(&reversed, alphabet)
}

/// Splits flat text into pages of lines. The last line and page may be short.
pub fn paginate(content: &str) -> Vec<Page> {
    chunk_chars(content, CHARS_PER_PAGE)
        .into_iter()
        .map(|page| Page {
            lines: chunk_chars(page, CHARS_PER_LINE)
                .into_iter()
                .map(str::to_string)
                .collect(),
        })
        .collect()
}

/// Joins every line of every page back into one buffer.
pub fn flatten(book: &Book) -> String {
    let mut content = String::with_capacity(book.pages.len() * CHARS_PER_PAGE);
    for line in book.pages.iter().flat_map(|page| page.lines.iter()) {
        content.push_str(line);
    }
    content
}

/// Flattens `book`, checking every character against `alphabet` and the
/// total length against `CHARS_PER_BOOK`.
pub fn validated_content(book: &Book, alphabet: &Alphabet) -> Result<String, BookError> {
    let content = flatten(book);
    let mut count = 0;
    for (position, c) in content.chars().enumerate() {
        if !alphabet.contains(c) {
            return Err(BookError::InvalidContent { char: c, position });
        }
        count += 1;
    }
    if count > CHARS_PER_BOOK {
        return Err(BookError::ContentTooLong {
            actual: count,
            max: CHARS_PER_BOOK,
        });
    }
    Ok(content)
}

fn chunk_chars(text: &str, size: usize) -> Vec<&str> {
    let mut chunks = Vec::with_capacity(text.len() / size + 1);
    let mut start = 0;
    let mut count = 0;
    for (offset, _) in text.char_indices() {
        if count == size {
            chunks.push(&text[start..offset]);
            start = offset;
            count = 0;
        }
        count += 1;
    }
    if count > 0 {
        chunks.push(&text[start..]);
    }
    chunks
}

/// Page, line and column of a character offset, all zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub page: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn of(offset: usize) -> Self {
        Position {
            page: offset / CHARS_PER_PAGE,
            line: (offset % CHARS_PER_PAGE) / CHARS_PER_LINE,
            column: offset % CHARS_PER_LINE,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "page {}, line {}, column {}",
            self.page + 1,
            self.line + 1,
            self.column + 1
        )
    }
}
