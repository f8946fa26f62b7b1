//! Score recalibration for hybrid search results.
//!
//! The hybrid engine's native relevance scores are small and
//! non-uniformly distributed (strong matches typically land between
//! 0.01 and 0.1). A piecewise-linear mapping stretches that range into
//! a human-meaningful [0, 1] relevancy percentage, and lexical overlap
//! between the role title and the query boosts the result. The whole
//! thing is pure: no I/O, no randomness.

use std::collections::HashSet;

use crate::config::ScoringConfig;

/// Map a raw engine score plus lexical signals into a normalized,
/// boosted relevance score in [0, 1].
pub fn recalibrate(raw_score: f64, title: &str, query_text: &str, config: &ScoringConfig) -> f64 {
    let base = base_score(raw_score, config).clamp(0.0, 1.0);

    let title_norm = title.trim().to_lowercase();
    let query_norm = query_text.trim().to_lowercase();
    let title_words = tokenize(&title_norm);
    let query_words = tokenize(&query_norm);

    let boosted = if title_in_query(&title_norm, &query_norm, &query_words) {
        base * config.title_match_boost
    } else {
        match overlap_count(&title_words, &query_words) {
            n if n >= 2 => base * config.strong_overlap_boost,
            1 => base * config.weak_overlap_boost,
            _ => base,
        }
    };

    boosted.clamp(0.0, 1.0)
}

/// Number of distinct words shared by title and query. Exposed so the
/// matcher can attach its "Title keyword match" reason from the same
/// tokenization the boost used.
pub fn title_query_overlap(title: &str, query_text: &str) -> usize {
    let title_words = tokenize(&title.to_lowercase());
    let query_words = tokenize(&query_text.to_lowercase());
    overlap_count(&title_words, &query_words)
}

fn base_score(raw: f64, config: &ScoringConfig) -> f64 {
    let [low, mid, high] = config.breakpoints;
    if raw <= low {
        raw * 10.0
    } else if raw <= mid {
        0.5 + (raw - low) * 13.33
    } else if raw <= high {
        0.7 + (raw - mid) * 20.0
    } else {
        0.9 + ((raw - high) * 10.0).min(0.1)
    }
}

fn title_in_query(title_norm: &str, query_norm: &str, query_words: &HashSet<String>) -> bool {
    if !title_norm.is_empty() && query_norm.contains(title_norm) {
        return true;
    }
    // A long query word prefixing the title catches truncated or
    // inflected forms ("engineering" vs "Engineer roles").
    query_words
        .iter()
        .any(|word| word.len() > 3 && title_norm.starts_with(word.as_str()))
}

fn overlap_count(title_words: &HashSet<String>, query_words: &HashSet<String>) -> usize {
    title_words.intersection(query_words).count()
}

fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
