pub mod algorithms;

// Re-export commonly used items
pub use algorithms::{bytes, radix};
