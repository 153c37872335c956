//! The library: every book operation over one shared, read-only context.

use num_bigint::BigUint;
use rand::Rng;
use std::cmp::Ordering;
use std::sync::OnceLock;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::content::{content_to_index, index_to_content, paginate, validated_content};
use super::image::BookImage;
use super::location::Location;
use super::text::normalize_search_text;
use super::{Book, BookMetadata, Selection};
use crate::core::alphabet::Alphabet;
use crate::core::layout::{
    CHARS_PER_BOOK, CHARS_PER_PAGE, MAX_BOOK_ID_LENGTH, MAX_BOOK_IMAGE_DATA_LENGTH,
    MAX_INDEX_BITS, PAGES_PER_BOOK,
};
use crate::encoders::algorithms::errors::BookError;
use crate::encoders::algorithms::radix::{digits_to_integer, integer_to_digits};

/// Result of `browse`, `search` and `random`.
///
/// `invalid_data` means no book was produced and the caller should ask for
/// different input. `data_truncated` means the input was cut to fit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookResult {
    pub book: Option<Book>,
    pub book_id: Option<String>,
    pub data_truncated: bool,
    pub invalid_data: bool,
}

impl BookResult {
    fn invalid(data_truncated: bool) -> Self {
        BookResult {
            invalid_data: true,
            data_truncated,
            ..Default::default()
        }
    }
}

/// Alphabets and bounds shared by every operation. Holds no per-request state.
#[derive(Debug)]
pub struct Library {
    content: Alphabet,
    book_id: Alphabet,
    max_index: OnceLock<BigUint>,
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}

impl Library {
    pub fn new() -> Self {
        Library {
            content: Alphabet::content(),
            book_id: Alphabet::book_id(),
            max_index: OnceLock::new(),
        }
    }

    /// Index of the last book, `29^CHARS_PER_BOOK - 1`. Computed on first use.
    pub fn max_index(&self) -> &BigUint {
        self.max_index.get_or_init(|| {
            let started = Instant::now();
            let max = BigUint::from(self.content.base()).pow(CHARS_PER_BOOK as u32) - 1u32;
            debug!(elapsed = ?started.elapsed(), "computed maximum book index");
            max
        })
    }

    /// True when `index` names no book. Only an index with exactly
    /// `MAX_INDEX_BITS` bits needs the full comparison.
    pub fn exceeds_max_index(&self, index: &BigUint) -> bool {
        match index.bits().cmp(&MAX_INDEX_BITS) {
            Ordering::Less => false,
            Ordering::Greater => true,
            Ordering::Equal => index > self.max_index(),
        }
    }

    /// The full 410-page book at `index`.
    pub fn book_at(&self, index: &BigUint) -> Book {
        let started = Instant::now();
        let content = index_to_content(index, &self.content);
        debug!(elapsed = ?started.elapsed(), "rendered book content");
        Book::from_pages(paginate(&content))
    }

    /// Base-94 ID of `index`.
    pub fn book_id_of(&self, index: &BigUint) -> String {
        integer_to_digits(index, &self.book_id)
    }

    /// Book index of the text in `book`. Missing pages and lines count as spaces.
    pub fn index_of(&self, book: &Book) -> Result<BigUint, BookError> {
        let content = validated_content(book, &self.content)?;
        Ok(content_to_index(&content, &self.content)?)
    }

    /// Opens the book named by a base-94 ID.
    ///
    /// Characters outside the ID alphabet are ignored. An ID longer than
    /// `MAX_BOOK_ID_LENGTH` keeps its trailing characters.
    pub fn browse_book_id(&self, input: &str) -> Result<BookResult, BookError> {
        info!(input_len = input.len(), "browse by book id");
        let filtered = self.book_id.filter(input);

        let mut data_truncated = false;
        let mut id = filtered.as_str();
        if id.len() > MAX_BOOK_ID_LENGTH {
            warn!(len = id.len(), max = MAX_BOOK_ID_LENGTH, "book id truncated");
            // ID alphabet is ASCII, so byte offsets are character offsets
            id = &id[id.len() - MAX_BOOK_ID_LENGTH..];
            data_truncated = true;
        }
        if id.is_empty() {
            warn!("book id has no valid characters");
            return Ok(BookResult::invalid(data_truncated));
        }

        let index = digits_to_integer(id, &self.book_id)?;
        if self.exceeds_max_index(&index) {
            warn!(bits = index.bits(), "book id is beyond the last book");
            return Ok(BookResult::invalid(data_truncated));
        }

        Ok(BookResult {
            book: Some(self.book_at(&index)),
            book_id: None,
            data_truncated,
            invalid_data: false,
        })
    }

    /// Opens the book drawn by an image. Longer images keep their leading bytes.
    pub fn browse_book_image(&self, data: &[u8]) -> Result<BookResult, BookError> {
        info!(bytes = data.len(), "browse by book image");
        if data.is_empty() {
            warn!("book image is empty");
            return Ok(BookResult::invalid(false));
        }

        let mut data_truncated = false;
        let mut data = data;
        if data.len() > MAX_BOOK_IMAGE_DATA_LENGTH {
            warn!(len = data.len(), max = MAX_BOOK_IMAGE_DATA_LENGTH, "book image truncated");
            data = &data[..MAX_BOOK_IMAGE_DATA_LENGTH];
            data_truncated = true;
        }

        let index = BookImage::from_data(data.to_vec()).to_index();
        if self.exceeds_max_index(&index) {
            warn!(bits = index.bits(), "book image is beyond the last book");
            return Ok(BookResult::invalid(data_truncated));
        }

        Ok(BookResult {
            book: Some(self.book_at(&index)),
            book_id: Some(self.book_id_of(&index)),
            data_truncated,
            invalid_data: false,
        })
    }

    /// Finds the book holding `text`, surrounded by `pages` pages of random
    /// text. With `pages == 0` the book is the bare text.
    ///
    /// The text is reduced to the content alphabet first; nothing left means
    /// `invalid_data`.
    pub fn search<R: Rng + ?Sized>(
        &self,
        text: &str,
        pages: usize,
        rng: &mut R,
    ) -> Result<BookResult, BookError> {
        let mut text = normalize_search_text(text, &self.content);
        info!(chars = text.len(), pages, "search");
        if text.is_empty() {
            warn!("search text has no valid characters");
            return Ok(BookResult::invalid(false));
        }

        let mut data_truncated = false;
        if text.len() > CHARS_PER_BOOK {
            warn!(len = text.len(), max = CHARS_PER_BOOK, "search text truncated");
            // content alphabet is ASCII
            text.truncate(CHARS_PER_BOOK);
            data_truncated = true;
        }

        let book = self.compose(&text, pages, rng);
        Ok(BookResult {
            book: Some(book),
            book_id: None,
            data_truncated,
            invalid_data: false,
        })
    }

    /// A book of `pages` pages of random text; at least one page.
    pub fn random<R: Rng + ?Sized>(&self, pages: usize, rng: &mut R) -> Result<BookResult, BookError> {
        info!(pages, "random book");
        let book = self.compose("", pages.max(1), rng);
        Ok(BookResult {
            book: Some(book),
            ..Default::default()
        })
    }

    /// Recomputes ID, image and location for a book already on screen.
    pub fn metadata(&self, book: &Book) -> Result<BookMetadata, BookError> {
        info!(pages = book.pages.len(), "book metadata");
        let started = Instant::now();
        let index = self.index_of(book)?;
        debug!(elapsed = ?started.elapsed(), bits = index.bits(), "parsed book content");

        let book_id = self.book_id_of(&index);
        let book_image_data = BookImage::from_index(&index).into_data();
        let location = Location::from_index(&index);
        debug!(elapsed = ?started.elapsed(), "derived book metadata");

        Ok(BookMetadata {
            book_id,
            book_image_data,
            location,
        })
    }

    /// Pads `text` with random characters on both sides to whole pages.
    ///
    /// The book grows past `pages` when the text alone needs more room.
    fn compose<R: Rng + ?Sized>(&self, text: &str, pages: usize, rng: &mut R) -> Book {
        let text_len = text.chars().count();
        let pages = pages.min(PAGES_PER_BOOK);

        let (content, leading) = if pages == 0 {
            (text.to_string(), 0)
        } else {
            let pages = pages.max(text_len.div_ceil(CHARS_PER_PAGE));
            let padding = pages * CHARS_PER_PAGE - text_len;
            let leading = rng.random_range(0..=padding);

            let mut content = String::with_capacity(pages * CHARS_PER_PAGE);
            content.extend(self.random_chars(leading, rng));
            content.push_str(text);
            content.extend(self.random_chars(padding - leading, rng));
            (content, leading)
        };

        debug!(chars = content.len(), leading, "composed book");

        let selection = (text_len > 0).then(|| Selection {
            start: leading,
            end: Some(leading + text_len - 1),
        });
        Book {
            pages: paginate(&content),
            selection,
        }
    }

    fn random_chars<'a, R: Rng + ?Sized>(
        &'a self,
        count: usize,
        rng: &'a mut R,
    ) -> impl Iterator<Item = char> + 'a {
        let chars = self.content.chars();
        (0..count).map(move |_| chars[rng.random_range(0..chars.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::content::flatten;
    use crate::book::Page;
    use num_traits::{One, Zero};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_browse_id_roundtrip() {
        let library = Library::new();
        let index = BigUint::from(123_456_789_012_345u64);
        let id = library.book_id_of(&index);
        let result = library.browse_book_id(&id).unwrap();
        assert!(!result.invalid_data);
        assert!(!result.data_truncated);
        let book = result.book.unwrap();
        assert_eq!(book.pages.len(), PAGES_PER_BOOK);
        assert_eq!(library.index_of(&book).unwrap(), index);
    }

    #[test]
    fn test_browse_id_ignores_foreign_characters() {
        let library = Library::new();
        let plain = library.browse_book_id("abc").unwrap().book.unwrap();
        let noisy = library.browse_book_id(" a\tb\nc é").unwrap().book.unwrap();
        assert_eq!(plain, noisy);
    }

    #[test]
    fn test_browse_id_without_valid_characters() {
        let library = Library::new();
        let result = library.browse_book_id("  \n\té").unwrap();
        assert!(result.invalid_data);
        assert!(result.book.is_none());
    }

    #[test]
    fn test_browse_id_of_one() {
        let library = Library::new();
        let result = library.browse_book_id("\"").unwrap();
        let content = flatten(&result.book.unwrap());
        assert!(content.starts_with('a'));
        assert!(content[1..].chars().all(|c| c == ' '));
    }

    #[test]
    fn test_browse_image_reports_book_id() {
        let library = Library::new();
        let index = BigUint::from(987_654_321u64);
        let image = BookImage::from_index(&index);
        let result = library.browse_book_image(image.data()).unwrap();
        assert_eq!(result.book_id.as_deref(), Some(library.book_id_of(&index).as_str()));
        assert_eq!(library.index_of(&result.book.unwrap()).unwrap(), index);
    }

    #[test]
    fn test_browse_image_empty() {
        let library = Library::new();
        assert!(library.browse_book_image(&[]).unwrap().invalid_data);
    }

    #[test]
    fn test_overlong_id_keeps_trailing_characters() {
        let library = Library::new();
        // trailing MAX_BOOK_ID_LENGTH characters name book 1
        let input = format!("{}{}\"", "~".repeat(100), "!".repeat(MAX_BOOK_ID_LENGTH - 1));
        let result = library.browse_book_id(&input).unwrap();
        assert!(result.data_truncated);
        assert!(!result.invalid_data);
        let content = flatten(&result.book.unwrap());
        assert_eq!(content.chars().count(), CHARS_PER_BOOK);
        assert!(content.starts_with('a'));
        assert!(content[1..].chars().all(|c| c == ' '));
    }

    #[test]
    fn test_id_beyond_last_book_is_invalid() {
        let library = Library::new();
        let result = library.browse_book_id(&"~".repeat(MAX_BOOK_ID_LENGTH)).unwrap();
        assert!(result.invalid_data);
        assert!(!result.data_truncated);
        assert!(result.book.is_none());

        let result = library
            .browse_book_id(&format!("!{}", "~".repeat(MAX_BOOK_ID_LENGTH)))
            .unwrap();
        assert!(result.invalid_data);
        assert!(result.data_truncated);
    }

    #[test]
    fn test_overlong_image_keeps_leading_bytes() {
        let library = Library::new();
        let mut data = vec![0u8; MAX_BOOK_IMAGE_DATA_LENGTH];
        data[0] = 1;
        let expected = library.browse_book_image(&data).unwrap();
        assert!(!expected.data_truncated);

        data.extend_from_slice(&[0xff; 4]);
        let result = library.browse_book_image(&data).unwrap();
        assert!(result.data_truncated);
        assert!(!result.invalid_data);
        assert_eq!(result.book_id.as_deref(), Some("\""));
        assert_eq!(result.book, expected.book);
    }

    #[test]
    fn test_image_just_past_last_book_is_invalid() {
        let library = Library::new();
        let past_end = library.max_index().clone() + 1u32;
        assert_eq!(past_end.bits(), MAX_INDEX_BITS);

        let image = BookImage::from_index(&past_end);
        assert_eq!(image.data().len(), MAX_BOOK_IMAGE_DATA_LENGTH);
        let result = library.browse_book_image(image.data()).unwrap();
        assert!(result.invalid_data);
        assert!(!result.data_truncated);
        assert!(result.book.is_none());
        assert!(!library.exceeds_max_index(library.max_index()));
    }

    #[test]
    fn test_exceeds_max_index_by_bit_length() {
        let library = Library::new();
        assert!(!library.exceeds_max_index(&BigUint::zero()));
        assert!(!library.exceeds_max_index(&(BigUint::one() << (MAX_INDEX_BITS - 1) as usize)));
        assert!(library.exceeds_max_index(&(BigUint::one() << MAX_INDEX_BITS as usize)));
        // the fast paths never need the exact bound
        assert!(library.max_index.get().is_none());
    }

    #[test]
    fn test_search_places_text() {
        let library = Library::new();
        let result = library.search("Hello", 1, &mut rng()).unwrap();
        let book = result.book.unwrap();
        assert_eq!(book.pages.len(), 1);
        let content = flatten(&book);
        assert_eq!(content.len(), CHARS_PER_PAGE);

        let selection = book.selection.unwrap();
        let end = selection.end.unwrap();
        assert_eq!(end, selection.start + 4);
        assert_eq!(&content[selection.start..=end], "hello");
    }

    #[test]
    fn test_search_without_padding() {
        let library = Library::new();
        let result = library.search("a tale of two cities", 0, &mut rng()).unwrap();
        let book = result.book.unwrap();
        assert_eq!(flatten(&book), "a tale of two cities");
        assert_eq!(
            book.selection,
            Some(Selection {
                start: 0,
                end: Some(19)
            })
        );
    }

    #[test]
    fn test_search_result_browses_back() {
        let library = Library::new();
        let book = library.search("the library", 2, &mut rng()).unwrap().book.unwrap();
        let metadata = library.metadata(&book).unwrap();
        let browsed = library.browse_book_id(&metadata.book_id).unwrap().book.unwrap();
        let found = flatten(&book);
        assert!(flatten(&browsed).starts_with(&found));
    }

    #[test]
    fn test_search_rejects_empty_text() {
        let library = Library::new();
        let result = library.search("!!! 42 ???", 1, &mut rng()).unwrap();
        // only spaces survive normalization here
        assert!(!result.invalid_data);
        let result = library.search("!!!???", 1, &mut rng()).unwrap();
        assert!(result.invalid_data);
        assert!(result.book.is_none());
    }

    #[test]
    fn test_search_grows_pages_for_long_text() {
        let library = Library::new();
        let text = "ab".repeat(CHARS_PER_PAGE);
        let book = library.search(&text, 1, &mut rng()).unwrap().book.unwrap();
        assert_eq!(book.pages.len(), 2);
        assert_eq!(book.selection.unwrap().start, 0);
    }

    #[test]
    fn test_search_truncates_overlong_text() {
        let library = Library::new();
        let text = "z".repeat(CHARS_PER_BOOK + 10);
        let result = library.search(&text, 0, &mut rng()).unwrap();
        assert!(result.data_truncated);
        assert_eq!(result.book.unwrap().char_count(), CHARS_PER_BOOK);
    }

    #[test]
    fn test_random_has_no_selection() {
        let library = Library::new();
        let book = library.random(0, &mut rng()).unwrap().book.unwrap();
        assert_eq!(book.pages.len(), 1);
        assert!(book.selection.is_none());
        assert_eq!(book.char_count(), CHARS_PER_PAGE);
    }

    #[test]
    fn test_random_clamps_pages() {
        let library = Library::new();
        let book = library.random(PAGES_PER_BOOK + 5, &mut rng()).unwrap().book.unwrap();
        assert_eq!(book.pages.len(), PAGES_PER_BOOK);
    }

    #[test]
    fn test_seeded_random_is_reproducible() {
        let library = Library::new();
        let a = library.random(1, &mut rng()).unwrap();
        let b = library.random(1, &mut rng()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_metadata_of_index_641() {
        let library = Library::new();
        let book = library.book_at(&BigUint::from(641u32));
        let metadata = library.metadata(&book).unwrap();
        assert_eq!(metadata.location.room_index, "2");
        assert_eq!(metadata.location.wall_index_in_room, 1);
        assert_eq!(metadata.book_image_data, vec![0x81, 0x02, 0, 0]);
        assert_eq!(
            digits_to_integer(&metadata.book_id, &Alphabet::book_id()).unwrap(),
            BigUint::from(641u32)
        );
    }

    #[test]
    fn test_metadata_of_short_book_pads_with_spaces() {
        let library = Library::new();
        let short = Book::from_pages(vec![Page {
            lines: vec!["abc".to_string()],
        }]);
        let full = library.book_at(&library.index_of(&short).unwrap());
        assert_eq!(library.metadata(&short).unwrap(), library.metadata(&full).unwrap());
    }

    #[test]
    fn test_metadata_rejects_foreign_characters() {
        let library = Library::new();
        let book = Book::from_pages(vec![Page {
            lines: vec!["Abc".to_string()],
        }]);
        assert!(matches!(
            library.metadata(&book),
            Err(BookError::InvalidContent { char: 'A', position: 0 })
        ));
    }

    #[test]
    fn test_metadata_of_empty_book() {
        let library = Library::new();
        let metadata = library.metadata(&Book::from_pages(Vec::new())).unwrap();
        assert_eq!(metadata.book_id, "");
        assert!(metadata.book_image_data.is_empty());
        assert_eq!(metadata.location.room_index, "1");
    }
}
