use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::core::alphabet::Alphabet;

/// Reduces free text to the content alphabet.
///
/// Accented letters lose their marks (`é` becomes `e`), everything is
/// lowercased, and characters still outside the alphabet are dropped.
pub fn normalize_search_text(text: &str, alphabet: &Alphabet) -> String {
    text.nfd()
        .filter(|&c| !is_combining_mark(c))
        .flat_map(char::to_lowercase)
        .filter(|&c| alphabet.contains(c))
        .collect()
}
