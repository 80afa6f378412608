use super::*;

#[test]
fn test_sentencepiece_markers_become_spaces() {
    assert_eq!(
        normalize_transcript("▁La▁inflación▁y▁el▁desempleo"),
        "La inflación y el desempleo"
    );
}

#[test]
fn test_whitespace_collapses() {
    assert_eq!(normalize_transcript("  mucho \n\n laburo\t hoy "), "mucho laburo hoy");
}

#[test]
fn test_short_words_are_not_joined() {
    // Spanish has many one-letter words; they must stay separate
    assert_eq!(normalize_transcript("A la y o"), "A la y o");
}

#[test]
fn test_empty_input() {
    assert_eq!(normalize_transcript(""), "");
    assert_eq!(normalize_transcript("▁▁ "), "");
}
