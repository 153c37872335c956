//! Book images: the index as base-2^32 digits, least significant first,
//! drawn as RGBA pixels.

use num_bigint::BigUint;
use num_integer::Roots;

use crate::core::layout::BYTES_PER_PIXEL;
use crate::encoders::algorithms::bytes::{bytes_to_integer, integer_to_words};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookImage {
    data: Vec<u8>,
}

impl BookImage {
    /// Image of `index`: big-endian bytes padded to whole pixels, then reversed.
    pub fn from_index(index: &BigUint) -> Self {
        let mut data = integer_to_words(index, BYTES_PER_PIXEL);
        data.reverse();
        BookImage { data }
    }

    /// Wraps raw image bytes. Length need not be a whole number of pixels.
    pub fn from_data(data: Vec<u8>) -> Self {
        BookImage { data }
    }

    pub fn to_index(&self) -> BigUint {
        let mut be = self.data.clone();
        be.reverse();
        bytes_to_integer(&be)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// RGBA pixels; a trailing partial pixel is returned short.
    pub fn pixels(&self) -> std::slice::Chunks<'_, u8> {
        self.data.chunks(BYTES_PER_PIXEL)
    }

    pub fn pixel_count(&self) -> usize {
        self.data.len().div_ceil(BYTES_PER_PIXEL)
    }

    /// Lowercase hex, one space-separated group per pixel.
    pub fn to_hex(&self) -> String {
        self.pixels().map(hex::encode).collect::<Vec<_>>().join(" ")
    }

    /// Parses the form written by [`BookImage::to_hex`]. Whitespace is ignored.
    pub fn from_hex(text: &str) -> Result<Self, hex::FromHexError> {
        let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        Ok(BookImage {
            data: hex::decode(digits)?,
        })
    }

    /// Near-square canvas that holds every pixel: `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        let pixels = self.pixel_count();
        if pixels == 0 {
            return (0, 0);
        }
        let mut width = pixels.sqrt();
        if width * width < pixels {
            width += 1;
        }
        (width, pixels.div_ceil(width))
    }
}
