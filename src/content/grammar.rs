//! Rule-based grammar hints for free English production.
//!
//! No grading happens here: the rules catch a handful of beginner mistakes
//! and phrase the hint as a nudge, matching the tone of the lesson material.

use regex::Regex;
use std::sync::OnceLock;

static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();

fn rules() -> &'static [(Regex, &'static str)] {
    RULES.get_or_init(|| {
        vec![
            (
                Regex::new(r"(?i)\bI am a \w+s\b").expect("valid pattern"),
                "After 'a', use the singular (say 'a student', not 'a students').",
            ),
            (
                // Case-sensitive on purpose: only lowercase standalone 'i'
                Regex::new(r"\bi\b").expect("valid pattern"),
                "'I' is always capitalized in English.",
            ),
            (
                Regex::new(r"(?i)\ba [aeiou]").expect("valid pattern"),
                "Before a vowel sound, use 'an' instead of 'a' (an apple).",
            ),
            (
                Regex::new(r"(?i)\b(am|is|are) not\b").expect("valid pattern"),
                "Nice use of the negative form!",
            ),
        ]
    })
}

pub fn analyze(text: &str) -> Vec<String> {
    let mut hints = Vec::new();

    for (pattern, hint) in rules() {
        if pattern.is_match(text) {
            hints.push((*hint).to_string());
        }
    }

    // Contraction tip; spoken English prefers "I'm"
    if text.contains("I am") && !text.contains("I'm") {
        hints.push("You can contract 'I am' to 'I'm' - it sounds more natural.".to_string());
    }

    hints
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_after_indefinite_article() {
        let hints = analyze("I am a students.");
        assert!(hints.iter().any(|h| h.contains("singular")));
    }

    #[test]
    fn test_lowercase_i() {
        let hints = analyze("Yesterday i went home.");
        assert!(hints.iter().any(|h| h.contains("capitalized")));

        // Uppercase I does not trigger the rule
        let hints = analyze("Yesterday I went home.");
        assert!(!hints.iter().any(|h| h.contains("capitalized")));
    }

    #[test]
    fn test_article_before_vowel() {
        let hints = analyze("She has a apple.");
        assert!(hints.iter().any(|h| h.contains("an")));
    }

    #[test]
    fn test_negation_encouragement() {
        let hints = analyze("He is not tired.");
        assert!(hints.iter().any(|h| h.contains("negative")));
    }

    #[test]
    fn test_contraction_tip() {
        let hints = analyze("I am happy.");
        assert!(hints.iter().any(|h| h.contains("I'm")));

        let hints = analyze("I'm happy.");
        assert!(!hints.iter().any(|h| h.contains("more natural")));
    }

    #[test]
    fn test_clean_sentence_yields_no_hints() {
        let hints = analyze("She works in London.");
        assert!(hints.is_empty());
    }
}
