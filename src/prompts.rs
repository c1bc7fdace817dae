//! System prompt for vision-model page transcription.
//!
//! Kept in one place so the default behaviour can be changed without touching
//! the request-building or retry code, and so tests can inspect the prompt
//! without a live API. Callers override it via
//! [`crate::config::OcrConfig::system_prompt`].

/// Default system prompt sent with every page image.
///
/// Used when `OcrConfig::system_prompt` is `None`.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a document transcription engine. You are given an image of a single PDF page.

Follow these rules precisely:

1. Transcribe ALL visible text completely and accurately, in natural reading order.
2. Preserve paragraph breaks. Flatten multi-column layouts into reading order.
3. Render tables row by row, cells separated by " | ".
4. Do not describe images, logos, or decorations; transcribe only text.
5. Output ONLY the page text. No commentary, no code fences, no "Page X" markers."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prompt_forbids_commentary() {
        assert!(DEFAULT_SYSTEM_PROMPT.contains("ONLY the page text"));
        assert!(!DEFAULT_SYSTEM_PROMPT.is_empty());
    }
}
