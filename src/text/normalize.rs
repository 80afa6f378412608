// Canonical form normalization for detected tokens
// Lowercases, folds accents to their base letter and trims edge punctuation

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize a raw token into its canonical form.
///
/// Rules, applied in order:
/// 1. Lowercase
/// 2. Strip diacritics (NFD decomposition, combining marks dropped)
/// 3. Trim leading/trailing characters that are not alphanumeric
///
/// Hyphens inside a word survive ("ex-ministro"), standalone punctuation
/// normalizes to the empty string. Never fails; the empty string is the
/// "not a term" result.
pub fn normalize(raw: &str) -> String {
    let folded: String = raw
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    folded
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_string()
}

/// Normalize a multi-word phrase into the canonical key used for glossary lookups.
///
/// Each token is normalized independently; empty tokens are dropped and the
/// rest are joined with a single space. "Tasa de Interés" -> "tasa de interes".
pub fn normalize_phrase(raw: &str) -> String {
    super::tokenize(raw)
        .map(|token| normalize(token.raw))
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
