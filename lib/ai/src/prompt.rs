//! Prompts for intent classification.

use crate::backend::LlmRequest;

/// Instructions given to the model on every classification.
pub const CLASSIFIER_SYSTEM_PROMPT: &str = "You are an intent classifier. You will be provided with a set of possible intents and a user message. Return the name of the intent that best matches the user message. If none of the intents apply, return NONE.";

/// The answer the model gives when no candidate applies.
pub const NO_INTENT: &str = "NONE";

/// Token budget for the answer; a label is a word or two.
pub const MAX_ANSWER_TOKENS: u32 = 10;

/// Builds the user prompt listing the candidates and the utterance.
#[must_use]
pub fn classification_prompt(text: &str, candidates: &[String]) -> String {
    format!(
        "Possible intents: {}\nUser message: {text}\nIntent:",
        candidates.join(", ")
    )
}

/// Builds the full, deterministic classification request.
#[must_use]
pub fn classification_request(text: &str, candidates: &[String]) -> LlmRequest {
    LlmRequest::new(classification_prompt(text, candidates))
        .with_system(CLASSIFIER_SYSTEM_PROMPT)
        .with_max_tokens(MAX_ANSWER_TOKENS)
        .with_temperature(0.0)
}

/// Maps the model's answer onto a candidate, ignoring case and surrounding
/// whitespace. Returns the candidate's own spelling.
#[must_use]
pub fn match_candidate<'a>(answer: &str, candidates: &'a [String]) -> Option<&'a str> {
    let answer = answer.trim().to_lowercase();
    candidates
        .iter()
        .find(|c| c.to_lowercase() == answer)
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<String> {
        vec!["price".to_string(), "Opening Hours".to_string()]
    }

    #[test]
    fn prompt_lists_candidates_and_text() {
        let prompt = classification_prompt("How much?", &candidates());
        assert_eq!(
            prompt,
            "Possible intents: price, Opening Hours\nUser message: How much?\nIntent:"
        );
    }

    #[test]
    fn request_is_deterministic_and_short() {
        let request = classification_request("How much?", &candidates());
        assert_eq!(request.system.as_deref(), Some(CLASSIFIER_SYSTEM_PROMPT));
        assert_eq!(request.max_tokens, Some(10));
        assert_eq!(request.temperature, Some(0.0));
    }

    #[test]
    fn answer_matching_ignores_case_and_whitespace() {
        let candidates = candidates();
        assert_eq!(match_candidate("  PRICE\n", &candidates), Some("price"));
        assert_eq!(
            match_candidate("opening hours", &candidates),
            Some("Opening Hours")
        );
    }

    #[test]
    fn none_and_unknown_answers_do_not_match() {
        let candidates = candidates();
        assert_eq!(match_candidate(NO_INTENT, &candidates), None);
        assert_eq!(match_candidate("refund", &candidates), None);
        assert_eq!(match_candidate("", &candidates), None);
    }
}
