use thiserror::Error;

/// Errors raised while converting between digit strings and integers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The input contains a character not in the alphabet
    #[error("invalid character {char:?} at position {position}")]
    InvalidCharacter { char: char, position: usize },
    /// The alphabet itself cannot define a base
    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),
}

impl ConversionError {
    pub fn invalid_character(c: char, position: usize) -> Self {
        ConversionError::InvalidCharacter { char: c, position }
    }
}

/// Errors raised by book operations.
#[derive(Debug, Error)]
pub enum BookError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    /// Page text contains a character outside the content alphabet
    #[error("book content has invalid character {char:?} at offset {position}")]
    InvalidContent { char: char, position: usize },
    #[error("book content is {actual} characters, at most {max} allowed")]
    ContentTooLong { actual: usize, max: usize },
    /// Big-integer arithmetic failed; no partial result exists
    #[error("computation failed: {0}")]
    Computation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_character_display() {
        let err = ConversionError::invalid_character('~', 12);
        assert_eq!(err.to_string(), "invalid character '~' at position 12");
    }

    #[test]
    fn test_conversion_error_is_transparent() {
        let err: BookError = ConversionError::invalid_character('x', 3).into();
        assert_eq!(err.to_string(), "invalid character 'x' at position 3");
    }

    #[test]
    fn test_content_too_long_display() {
        let err = BookError::ContentTooLong {
            actual: 10,
            max: 5,
        };
        assert!(err.to_string().contains("10 characters"));
        assert!(err.to_string().contains("at most 5"));
    }
}
