//! Common imports for working with books.
//!
//! ```
//! use babel_books::prelude::*;
//! ```

pub use crate::book::{Book, BookMetadata, Library, Location, Page, Selection};
pub use crate::core::alphabet::Alphabet;
pub use crate::core::layout::{CHARS_PER_BOOK, CHARS_PER_LINE, CHARS_PER_PAGE, PAGES_PER_BOOK};
pub use crate::encoders::algorithms::bytes::{bytes_to_integer, integer_to_bytes};
pub use crate::encoders::algorithms::radix::{digits_to_integer, integer_to_digits};
pub use crate::worker::{Request, Response, Worker};
