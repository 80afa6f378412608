// Tokenizer - splits transcript text into raw tokens with byte offsets
// Offsets are kept so context snippets can be sliced without re-scanning

use regex::Regex;
use std::sync::LazyLock;

/// Default number of characters captured on each side of a token's midpoint
pub const DEFAULT_CONTEXT_WIDTH: usize = 40;

/// Anything that is not whitespace or sentence punctuation.
/// Hyphens and straight apostrophes stay inside tokens; the normalizer trims them at the edges.
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[^\s.,;:!?¡¿"()\[\]{}«»“”‘’…—–]+"#).expect("token pattern is valid")
});

/// Punctuation that ends a clause; quotes are not included
const CLAUSE_BREAKS: &[char] = &[
    '.', ',', ';', ':', '!', '?', '¡', '¿', '(', ')', '[', ']', '{', '}', '…', '—', '–',
];

/// A raw token and its position in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// The token exactly as it appears in the text
    pub raw: &'a str,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// Clause punctuation separates this token from the previous one
    pub breaks_phrase: bool,
}

/// Lazy iterator over the tokens of a text.
///
/// Holds only a cursor into the borrowed text; clone it (or call
/// [`tokenize`] again) to restart.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    text: &'a str,
    cursor: usize,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.text.len() {
            return None;
        }
        let found = TOKEN_PATTERN.find_at(self.text, self.cursor)?;
        let gap = &self.text[self.cursor..found.start()];
        self.cursor = found.end();
        Some(Token {
            raw: found.as_str(),
            start: found.start(),
            end: found.end(),
            breaks_phrase: gap.contains(CLAUSE_BREAKS),
        })
    }
}

/// Split text on whitespace and sentence punctuation
pub fn tokenize(text: &str) -> Tokens<'_> {
    Tokens { text, cursor: 0 }
}

/// Slice the text around a token for use as a review snippet.
///
/// Takes `width` characters before and after the token's midpoint, clipped to
/// the text bounds, then collapses whitespace. A span that is out of range or
/// splits a character is widened to the enclosing character boundaries.
pub fn context_window(text: &str, start: usize, end: usize, width: usize) -> String {
    let (start, end) = char_span(text, start, end);
    let token = &text[start..end];
    let token_chars = token.chars().count();
    let midpoint = token
        .char_indices()
        .nth(token_chars / 2)
        .map(|(offset, _)| start + offset)
        .unwrap_or(end);

    let window_start = if width == 0 {
        midpoint
    } else {
        text[..midpoint]
            .char_indices()
            .rev()
            .nth(width - 1)
            .map(|(offset, _)| offset)
            .unwrap_or(0)
    };
    let window_end = text[midpoint..]
        .char_indices()
        .nth(width)
        .map(|(offset, _)| midpoint + offset)
        .unwrap_or(text.len());

    text[window_start..window_end]
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Clamp a byte span to the text and widen it to character boundaries
fn char_span(text: &str, start: usize, end: usize) -> (usize, usize) {
    let mut end = end.min(text.len());
    let mut start = start.min(end);
    while !text.is_char_boundary(start) {
        start -= 1;
    }
    while !text.is_char_boundary(end) {
        end += 1;
    }
    (start, end)
}

#[cfg(test)]
#[path = "tokenize_test.rs"]
mod tests;
