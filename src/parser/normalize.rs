use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Strip diacritics: decompose, drop combining marks, recompose.
///
/// Letters without a decomposition (e.g. `ø`, `ß`) are left as they are and
/// will simply not match any token.
pub fn strip_accents(word: &str) -> String {
    word.nfd()
        .filter(|c| !is_combining_mark(*c))
        .nfc()
        .collect()
}
