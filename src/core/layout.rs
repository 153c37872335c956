//! Physical layout of the library.
//!
//! These numbers define the bijection between a book index and its views;
//! changing any of them changes every book.

pub const PAGES_PER_BOOK: usize = 410;
pub const LINES_PER_PAGE: usize = 40;
pub const CHARS_PER_LINE: usize = 80;
pub const CHARS_PER_PAGE: usize = LINES_PER_PAGE * CHARS_PER_LINE;
pub const CHARS_PER_BOOK: usize = PAGES_PER_BOOK * CHARS_PER_PAGE;

pub const BOOKS_PER_SHELF: u32 = 32;
pub const SHELVES_PER_WALL: u32 = 5;
pub const WALLS_PER_ROOM: u32 = 4;
pub const BOOKS_PER_WALL: u32 = BOOKS_PER_SHELF * SHELVES_PER_WALL;
pub const BOOKS_PER_ROOM: u32 = BOOKS_PER_WALL * WALLS_PER_ROOM;

/// Longest book ID: base-94 digits of the largest index.
pub const MAX_BOOK_ID_LENGTH: usize = 972_399;

/// Longest book image in bytes: base-2^32 digits of the largest index, 4 bytes each.
pub const MAX_BOOK_IMAGE_DATA_LENGTH: usize = 796_712;

/// Bit length of the largest index, `29^CHARS_PER_BOOK - 1`.
pub const MAX_INDEX_BITS: u64 = 6_373_672;

/// Bytes per book image pixel (RGBA).
pub const BYTES_PER_PIXEL: usize = 4;
