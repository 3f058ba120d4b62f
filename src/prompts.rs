//! Prompts for LLM-based PDF summarisation.
//!
//! Every prompt lives here so the wording can change in one place and unit
//! tests can inspect it without calling a model.
//!
//! Callers can override both via [`crate::config::SummaryConfig::system_prompt`]
//! and [`crate::config::SummaryConfig::summary_prompt`]; the constants are used
//! only when no override is provided.

/// Default system message sent with every summarisation request.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a professional document summarizer that creates clear, comprehensive summaries in markdown format.";

/// Default instruction placed in front of the extracted document text.
///
/// Ends with a blank line so the document text starts on its own paragraph.
pub const SUMMARY_PROMPT: &str = r#"
You are a professional document summarizer. Your task is to create a comprehensive
summary of the provided PDF content. Follow these guidelines:

1. Begin with a brief overview of the document's main purpose and key findings
2. Create a structured summary with sections and subsections if applicable
3. Include all important concepts, arguments, and conclusions
4. Use bullet points for lists of features, benefits, or steps
5. Keep the language clear, concise, and professional
6. Format the response as Markdown
7. The summary should be thorough but concise, capturing all essential information

Here is the document content to summarize:

"#;

/// Build the user message: the instruction template followed by the text.
pub fn user_message(template: &str, document_text: &str) -> String {
    let mut msg = String::with_capacity(template.len() + document_text.len());
    msg.push_str(template);
    msg.push_str(document_text);
    msg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_is_template_then_text() {
        let msg = user_message(SUMMARY_PROMPT, "Body text.");
        assert!(msg.starts_with(SUMMARY_PROMPT));
        assert!(msg.ends_with("summarize:\n\nBody text."));
    }

    #[test]
    fn summary_prompt_asks_for_markdown() {
        assert!(SUMMARY_PROMPT.contains("Markdown"));
        assert!(DEFAULT_SYSTEM_PROMPT.contains("markdown"));
    }
}
