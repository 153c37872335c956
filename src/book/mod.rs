//! Books and the views derived from a book index.

pub mod content;
pub mod image;
pub mod library;
pub mod location;
pub mod text;

use serde::{Deserialize, Serialize};

pub use content::Position;
pub use image::BookImage;
pub use library::{BookResult, Library};
pub use location::Location;

/// One page: up to `LINES_PER_PAGE` lines of up to `CHARS_PER_LINE` characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Page {
    pub lines: Vec<String>,
}

/// Where a search text was placed in the flat character buffer.
///
/// `end` is inclusive; `None` marks a position only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub start: usize,
    pub end: Option<usize>,
}

/// A book as pages of lines. Short books (search results without padding)
/// hold fewer pages; the missing text is implied spaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub pages: Vec<Page>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<Selection>,
}

impl Book {
    pub fn from_pages(pages: Vec<Page>) -> Self {
        Book {
            pages,
            selection: None,
        }
    }

    /// Total characters held by the pages.
    pub fn char_count(&self) -> usize {
        self.pages
            .iter()
            .flat_map(|page| page.lines.iter())
            .map(|line| line.chars().count())
            .sum()
    }
}

/// Everything derived from an existing book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookMetadata {
    pub book_id: String,
    pub book_image_data: Vec<u8>,
    pub location: Location,
}
