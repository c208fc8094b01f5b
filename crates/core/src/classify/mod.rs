mod confidence;
mod rules;

use crate::types::{Classification, ClassificationInput};

pub use confidence::{confidence, MAX_CONFIDENCE, MIN_CONFIDENCE};
pub use rules::{ClassificationRule, RuleSet};

pub const FALLBACK_LABEL: &str = "needs-triage";

/// Suggests labels for an issue or pull request from the active rules in `rules`.
///
/// Keywords match as case-insensitive substrings of `"{title} {body}"`, so the
/// keyword `test` also fires on "testing". Labels come back in rule order; when
/// nothing matches the result is `["needs-triage"]`.
pub fn classify(title: &str, body: &str, rules: &RuleSet) -> Classification {
    let content = format!("{title} {body}").to_lowercase();

    let mut labels: Vec<String> = Vec::new();
    for rule in rules.active() {
        if rule.matches(&content) && !labels.contains(&rule.label) {
            labels.push(rule.label.clone());
        }
    }
    if labels.is_empty() {
        labels.push(FALLBACK_LABEL.to_string());
    }

    let confidence = confidence(&content);
    tracing::debug!(?labels, confidence, "classified content");

    Classification { labels, confidence }
}

pub fn classify_input(input: &ClassificationInput, rules: &RuleSet) -> Classification {
    classify(&input.title, &input.body, rules)
}
