//! Prompt templates for the LaTeX-and-code-to-plain-English rewrite.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing the rewrite behaviour (e.g.
//!    tweaking how tables are summarised) requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the assembled prompt directly
//!    without spinning up a real LLM, making prompt regressions easy to catch.
//!
//! Callers can override the system preamble via
//! [`crate::config::ConversionConfig::system_prompt`]; the constants here are
//! used when no override is provided.

/// System preamble sent alongside every rewrite request (chat endpoint only).
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an intelligent assistant.";

/// The fixed five-rule instruction template wrapped around the document text.
///
/// The placeholder is filled by [`build_rewrite_prompt`]; keep the rule
/// numbering stable — downstream docs reference rules by number.
const REWRITE_TEMPLATE: &str = r#"You are an intelligent assistant. Your task is to convert LaTeX code and programming code in the given text to plain English and provide summaries for tables and images. Follow these specific instructions:

1. Keep the plain text exactly as it is. Do not provide any overview or summary of the entire text.
2. Convert any LaTeX code into a human-readable format. For example, $\alpha$ should be read as "alpha", and $ax^2+bx+c=0$ should be read as "a x squared plus b x plus c equals zero".
3. For programming code, read the code line by line and provide a high-level description of what the code is doing. For example, if the code is "for i in range(10): print(i)", you can say "A loop that prints numbers from 0 to 9".
4. For tables, provide a summarized explanation of the concept covered in the table without mentioning the formatting. For example, if a table shows a logical representation of inputs and outputs, explain the logical relationship in plain English.
5. For images, mention that there is an image at that position, but do not narrate the source or provide additional context about the image.

Text to convert:
"#;

/// Assemble the full rewrite prompt for a document's extracted text.
pub fn build_rewrite_prompt(text: &str) -> String {
    format!("{REWRITE_TEMPLATE}{text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_all_five_rules() {
        let prompt = build_rewrite_prompt("hello");
        for rule in ["1. Keep the plain text", "2. Convert any LaTeX", "3. For programming code", "4. For tables", "5. For images"] {
            assert!(prompt.contains(rule), "missing rule: {rule}");
        }
    }

    #[test]
    fn prompt_ends_with_document_text() {
        let prompt = build_rewrite_prompt("$x^2$ is x squared.");
        assert!(prompt.ends_with("$x^2$ is x squared."));
    }

    #[test]
    fn prompt_is_strictly_longer_than_input() {
        let text = "short";
        assert!(build_rewrite_prompt(text).len() > text.len());
    }
}
