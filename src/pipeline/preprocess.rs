//! Bound the extracted text before it is sent to the model.
//!
//! Token counts are estimated with a fixed ratio of [`CHARS_PER_TOKEN`]
//! characters per token rather than a real tokenizer. This is a rough
//! approximation for English prose; it is not a contract with any model's
//! tokenizer. Characters here are Unicode scalar values, so truncation never
//! cuts a UTF-8 sequence in half.

use tracing::debug;

/// Characters assumed per token.
pub const CHARS_PER_TOKEN: usize = 4;

/// Default input budget in estimated tokens.
pub const DEFAULT_MAX_INPUT_TOKENS: usize = 12_000;

/// Appended after the kept prefix when the text is truncated.
pub const TRUNCATION_NOTICE: &str =
    "\n\n[Note: The document was truncated due to length constraints.]";

/// Estimated token count of `text`, rounded up.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

/// Return `text` unchanged if it fits in `max_tokens`, otherwise its first
/// `max_tokens * CHARS_PER_TOKEN` characters followed by [`TRUNCATION_NOTICE`].
pub fn bound_text(text: &str, max_tokens: usize) -> String {
    let max_chars = max_tokens.saturating_mul(CHARS_PER_TOKEN);
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((cut, _)) => {
            debug!(
                "Truncating text from ~{} to {} estimated tokens",
                estimate_tokens(text),
                max_tokens
            );
            let mut bounded = String::with_capacity(cut + TRUNCATION_NOTICE.len());
            bounded.push_str(&text[..cut]);
            bounded.push_str(TRUNCATION_NOTICE);
            bounded
        }
    }
}
