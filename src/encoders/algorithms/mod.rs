pub mod bytes;
pub mod errors;
pub mod radix;

// Re-export error types for public API
pub use errors::{BookError, ConversionError};
