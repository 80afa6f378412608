// Text cleanup for transcriber output
// Handles SentencePiece-style word markers and stray spacing

/// Word-boundary marker emitted by SentencePiece tokenizers
const SENTENCEPIECE_MARKER: char = '▁';

/// Normalize transcriber output before detection.
///
/// "▁" marks the start of a new word, so it becomes a space; then runs of
/// whitespace (including newlines) collapse to one space and the ends are trimmed.
/// Word pieces without a marker are left as the transcriber produced them.
pub fn normalize_transcript(text: &str) -> String {
    text.replace(SENTENCEPIECE_MARKER, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
