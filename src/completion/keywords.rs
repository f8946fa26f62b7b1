//! Search-keyword generation for authored roles.

use std::collections::HashSet;

use crate::completion::CompletionProvider;

/// Bounds on the generated keyword set.
pub const MIN_KEYWORDS: usize = 5;
pub const MAX_KEYWORDS: usize = 8;

/// Common words that carry no search signal on their own.
const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "that", "this", "are", "was", "will", "have", "has", "from",
    "their", "our", "your", "they", "them", "into", "onto", "also", "who", "which", "all", "any",
    "can", "may", "its",
];

/// Build the keyword-extraction prompt.
pub fn keywords_prompt(title: &str, description: &str) -> String {
    format!(
        "Extract {MIN_KEYWORDS} to {MAX_KEYWORDS} short search keywords for the following role. \
         Return them as a single comma-separated list, nothing else.\n\n\
         Job Title: {title}\nDescription: {description}"
    )
}

/// Parse a model response into a normalized keyword list.
///
/// Accepts comma- or newline-separated output, tolerating bullet
/// markers, numbering, and quoting.
pub fn parse_keywords(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keywords = Vec::new();

    for piece in raw.split(|c| c == ',' || c == '\n' || c == ';') {
        let cleaned = piece
            .trim()
            .trim_start_matches(|c: char| c.is_ascii_digit() || c == '.' || c == ')' || c == '-' || c == '*')
            .trim()
            .trim_matches(|c| c == '"' || c == '\'')
            .to_lowercase();

        if cleaned.len() < 2 || !seen.insert(cleaned.clone()) {
            continue;
        }
        keywords.push(cleaned);
        if keywords.len() == MAX_KEYWORDS {
            break;
        }
    }

    keywords
}

/// Deterministic fallback: the significant lower-cased words of the
/// title and description, in first-appearance order.
pub fn fallback_keywords(title: &str, description: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keywords = Vec::new();

    let combined = format!("{title} {description}");
    for word in combined.split(|c: char| !c.is_alphanumeric()) {
        let word = word.to_lowercase();
        if word.len() <= 2 || STOPWORDS.contains(&word.as_str()) || !seen.insert(word.clone()) {
            continue;
        }
        keywords.push(word);
        if keywords.len() == MAX_KEYWORDS {
            break;
        }
    }

    keywords
}

/// Generate search keywords, preferring the completion provider and
/// falling back deterministically when it fails or returns too few
/// usable entries.
pub fn generate_keywords(
    provider: Option<&dyn CompletionProvider>,
    title: &str,
    description: &str,
) -> Vec<String> {
    if let Some(provider) = provider {
        match provider.complete(&keywords_prompt(title, description)) {
            Ok(raw) => {
                let parsed = parse_keywords(&raw);
                if parsed.len() >= MIN_KEYWORDS {
                    return parsed;
                }
                tracing::warn!(
                    parsed = parsed.len(),
                    "completion returned too few keywords, using fallback"
                );
            }
            Err(err) => {
                tracing::warn!(error = %err, "keyword generation failed, using fallback");
            }
        }
    }

    fallback_keywords(title, description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, RmError};

    struct Canned(&'static str);

    impl CompletionProvider for Canned {
        fn complete(&self, _prompt: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct Down;

    impl CompletionProvider for Down {
        fn complete(&self, _prompt: &str) -> Result<String> {
            Err(RmError::Provider("unavailable".to_string()))
        }
    }

    #[test]
    fn parses_comma_separated_list() {
        let parsed = parse_keywords("finance, excel, modeling, reporting, analysis");
        assert_eq!(parsed, vec!["finance", "excel", "modeling", "reporting", "analysis"]);
    }

    #[test]
    fn parses_bulleted_and_numbered_lists() {
        let parsed = parse_keywords("1. Finance\n2. Excel\n- modeling\n* reporting\n\"analysis\"");
        assert_eq!(parsed, vec!["finance", "excel", "modeling", "reporting", "analysis"]);
    }

    #[test]
    fn parse_dedupes_and_caps() {
        let raw = "a1, a2, a3, a4, a5, a6, a7, a8, a9, a10, a1, a2";
        let parsed = parse_keywords(raw);
        assert_eq!(parsed.len(), MAX_KEYWORDS);
        assert_eq!(parsed[0], "a1");
    }

    #[test]
    fn fallback_takes_significant_words_in_order() {
        let keywords = fallback_keywords("Financial Analyst", "Analyzes data with Excel models");
        assert_eq!(
            keywords,
            vec!["financial", "analyst", "analyzes", "data", "excel", "models"]
        );
    }

    #[test]
    fn fallback_skips_stopwords_and_short_words(){
        let keywords = fallback_keywords("QA", "Works with the team and for our clients");
        assert!(!keywords.contains(&"the".to_string()));
        assert!(!keywords.contains(&"and".to_string()));
        assert!(!keywords.contains(&"qa".to_string()));
    }

    #[test]
    fn fallback_caps_at_maximum() {
        let description = "alpha bravo charlie delta echo foxtrot golf hotel india juliett";
        let keywords = fallback_keywords("Operator", description);
        assert_eq!(keywords.len(), MAX_KEYWORDS);
    }

    #[test]
    fn provider_output_is_preferred_when_sufficient() {
        let keywords = generate_keywords(
            Some(&Canned("finance, excel, modeling, reporting, analysis, audit")),
            "Analyst",
            "irrelevant",
        );
        assert_eq!(keywords.len(), 6);
        assert_eq!(keywords[0], "finance");
    }

    #[test]
    fn sparse_provider_output_triggers_fallback() {
        let keywords = generate_keywords(
            Some(&Canned("finance, excel")),
            "Financial Analyst",
            "Builds models and reports",
        );
        assert!(keywords.contains(&"financial".to_string()));
        assert!(keywords.len() >= 4);
    }

    #[test]
    fn provider_failure_triggers_fallback() {
        let keywords = generate_keywords(Some(&Down), "Financial Analyst", "Builds Excel models");
        assert_eq!(keywords, vec!["financial", "analyst", "builds", "excel", "models"]);
    }
}
