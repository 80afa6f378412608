// Text processing - tokenization and canonical normalization of transcript text

mod normalize;
mod tokenize;

pub use normalize::{normalize, normalize_phrase};
pub use tokenize::{context_window, tokenize, Token, Tokens, DEFAULT_CONTEXT_WIDTH};
