//! Library of Babel codec.
//!
//! Every book is one integer below `29^1312000`. This crate converts that
//! index to and from its other names: a base-94 book ID, 410 pages of
//! base-29 text, an RGBA book image, and a shelf location.
//!
//! ```
//! use babel_books::{Library, radix, Alphabet};
//! use num_bigint::BigUint;
//!
//! let library = Library::new();
//! let book = library.browse_book_id("Babel").unwrap().book.unwrap();
//! let metadata = library.metadata(&book).unwrap();
//! assert_eq!(metadata.book_id, "Babel");
//!
//! let id = radix::integer_to_digits(&BigUint::from(94u32), &Alphabet::book_id());
//! assert_eq!(id, "\"!");
//! ```

pub mod book;
mod core;
mod encoders;
pub mod prelude;
pub mod worker;

pub use book::{
    Book, BookImage, BookMetadata, BookResult, Library, Location, Page, Position, Selection,
};
pub use crate::core::alphabet::{Alphabet, BOOK_ID_CHARS, CONTENT_CHARS, DECIMAL_CHARS, HEX_CHARS};
pub use crate::core::config::{ConfigError, OutputFormat, Settings};
pub use crate::core::layout;
pub use encoders::algorithms::{BookError, ConversionError};
pub use encoders::{bytes, radix};
pub use worker::{
    BrowseSource, Operation, PageOptions, Request, Response, Worker, WorkerError, WorkerHandle,
};
