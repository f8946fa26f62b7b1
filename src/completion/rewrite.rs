//! Description rewriting to professional third-person voice.
//!
//! The completion service does the real rewrite; when it is
//! unconfigured, fails, or echoes its input back unchanged, a
//! deterministic phrase-substitution table converts the most common
//! first-person constructions instead. Either path runs through the
//! same output cleanup.

use std::sync::LazyLock;

use regex::Regex;

use crate::completion::CompletionProvider;

/// First-person phrase substitutions, applied in order. Longer phrases
/// come first so "I am responsible for" is not eaten by "I am".
static SUBSTITUTIONS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)\bI am responsible for\b", "Responsible for"),
        (r"(?i)\bMy role is\b", "The role is"),
        (r"(?i)\bI analyze\b", "Analyzes"),
        (r"(?i)\bI manage\b", "Manages"),
        (r"(?i)\bI work\b", "Works"),
        (r"(?i)\bI develop\b", "Develops"),
        (r"(?i)\bI design\b", "Designs"),
        (r"(?i)\bI lead\b", "Leads"),
        (r"(?i)\bI create\b", "Creates"),
        (r"(?i)\bI build\b", "Builds"),
        (r"(?i)\bI oversee\b", "Oversees"),
        (r"(?i)\bI coordinate\b", "Coordinates"),
        (r"(?i)\bI support\b", "Supports"),
        (r"(?i)\bI handle\b", "Handles"),
        (r"(?i)\bI provide\b", "Provides"),
        (r"(?i)\bI ensure\b", "Ensures"),
        (r"(?i)\bI write\b", "Writes"),
        (r"(?i)\bI maintain\b", "Maintains"),
        (r"(?i)\bI am\b", "Is"),
        (r"(?i)\bmy\b", "their"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (Regex::new(pattern).expect("substitution pattern is valid"), replacement)
    })
    .collect()
});

static LABEL_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(?:job title|title|description)\s*:\s*").unwrap());

static MARKDOWN_EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*{1,2}([^*]*)\*{1,2}").unwrap());

static HEADER_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*#+\s*").unwrap());

/// Build the rewrite prompt, with the title as context for the model.
pub fn rewrite_prompt(title: &str, description: &str) -> String {
    format!(
        "Rewrite the following job description in a professional third-person voice. \
         Keep the meaning intact and return only the rewritten description.\n\n\
         Job Title: {title}\nDescription: {description}"
    )
}

/// Deterministic phrase-substitution rewrite, used when the completion
/// provider is unavailable or silently failed.
pub fn fallback_rewrite(text: &str) -> String {
    let mut result = text.to_string();
    for (pattern, replacement) in SUBSTITUTIONS.iter() {
        result = pattern.replace_all(&result, *replacement).into_owned();
    }
    result
}

/// Clean generated output: strip surrounding quotes, markdown
/// emphasis/headers, echoed label lines, and collapse blank runs.
pub fn cleanup(text: &str) -> String {
    let mut trimmed = text.trim();

    for (open, close) in [('"', '"'), ('\'', '\''), ('\u{201c}', '\u{201d}')] {
        if trimmed.len() >= 2 && trimmed.starts_with(open) && trimmed.ends_with(close) {
            trimmed = trimmed[open.len_utf8()..trimmed.len() - close.len_utf8()].trim();
        }
    }

    let mut lines: Vec<String> = Vec::new();
    let mut last_blank = false;
    for line in trimmed.lines() {
        let line = HEADER_PREFIX.replace(line, "");
        let line = LABEL_LINE.replace(&line, "");
        let line = MARKDOWN_EMPHASIS.replace_all(&line, "$1");
        let line = line.trim_end();

        let blank = line.trim().is_empty();
        if blank && (last_blank || lines.is_empty()) {
            continue;
        }
        last_blank = blank;
        lines.push(line.to_string());
    }
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}

/// Rewrite a description to third person, preferring the completion
/// provider and falling back to the substitution table.
///
/// Returns the rewritten text and whether rewriting actually changed
/// anything. A provider response byte-identical to the input counts as
/// a silent failure and routes through the fallback.
pub fn rewrite_description(
    provider: Option<&dyn CompletionProvider>,
    title: &str,
    description: &str,
) -> (String, bool) {
    let original = description.trim();

    if let Some(provider) = provider {
        match provider.complete(&rewrite_prompt(title, original)) {
            Ok(raw) => {
                let cleaned = cleanup(&raw);
                if !cleaned.is_empty() && cleaned != original {
                    return (cleaned, true);
                }
                tracing::warn!("completion provider echoed the description, using fallback rewrite");
            }
            Err(err) => {
                tracing::warn!(error = %err, "completion provider failed, using fallback rewrite");
            }
        }
    }

    let rewritten = cleanup(&fallback_rewrite(original));
    let changed = rewritten != original;
    (rewritten, changed)
}
