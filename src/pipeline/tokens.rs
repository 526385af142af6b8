//! Token counting against the configured model's BPE vocabulary.
//!
//! Usage reporting only: the count is shown to the user next to the
//! rewritten text. It never shapes the request — long inputs are not
//! chunked, so a document exceeding the model's context window fails as a
//! service error surfaced by the rewrite stage.

use crate::error::ConvertError;
use tiktoken_rs::get_bpe_from_model;

/// Count how many tokens `text` consumes under `model`'s tokenizer.
///
/// # Errors
/// Fatal when the model name has no registered tokenizer; there is no
/// approximate fallback.
pub fn count_tokens(text: &str, model: &str) -> Result<usize, ConvertError> {
    let bpe = get_bpe_from_model(model).map_err(|e| ConvertError::TokenizerUnavailable {
        model: model.to_string(),
        detail: e.to_string(),
    })?;
    Ok(bpe.encode_with_special_tokens(text).len())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = "gpt-3.5-turbo";

    #[test]
    fn empty_string_counts_zero() {
        assert_eq!(count_tokens("", MODEL).unwrap(), 0);
    }

    #[test]
    fn nonempty_string_counts_positive() {
        assert!(count_tokens("hello world", MODEL).unwrap() > 0);
    }

    #[test]
    fn count_is_nondecreasing_as_text_grows() {
        let mut text = String::new();
        let mut previous = 0;
        for _ in 0..20 {
            text.push_str(" alpha beta");
            let count = count_tokens(&text, MODEL).unwrap();
            assert!(
                count >= previous,
                "count dropped from {previous} to {count} at {} chars",
                text.len()
            );
            previous = count;
        }
        assert!(previous > 0);
    }

    #[test]
    fn unknown_model_is_a_config_error() {
        let err = count_tokens("hello", "definitely-not-a-model").unwrap_err();
        assert!(matches!(err, ConvertError::TokenizerUnavailable { .. }));
    }
}
