use once_cell::sync::Lazy;
use regex::Regex;

pub const MIN_CONFIDENCE: i64 = 60;
pub const MAX_CONFIDENCE: i64 = 95;
pub const PHRASE_BONUS: i64 = 15;

const PHRASES: [&str; 2] = ["bug report", "feature request"];

static RE_SIGNAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(bug|feature|fix|add|improve|update|error|issue|enhancement|documentation)\b")
        .expect("valid regex")
});

/// Heuristic 60..=95 score for lower-cased `content`.
pub fn confidence(content: &str) -> u8 {
    let signals = RE_SIGNAL.find_iter(content).count() as f64;
    let words = content.split_whitespace().count().max(1) as f64;

    let mut score = ((signals / words) * 1000.0).round() as i64;
    if PHRASES.iter().any(|p| content.contains(p)) {
        score += PHRASE_BONUS;
    }

    score.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_is_floor() {
        assert_eq!(confidence(""), 60);
        assert_eq!(confidence("   "), 60);
    }

    #[test]
    fn signal_words_are_whole_words() {
        // "fixed" and "issues" are not whole-word signals
        let diluted = format!("fixed issues {}", "word ".repeat(100));
        assert_eq!(confidence(&diluted), 60);
    }

    #[test]
    fn dense_signals_hit_ceiling() {
        assert_eq!(confidence("fix the bug"), 95);
    }

    #[test]
    fn ratio_scales_by_a_thousand() {
        // 1 signal in 14 words -> 71.4 -> 71
        let text = format!("bug {}", "word ".repeat(13));
        assert_eq!(confidence(&text), 71);
    }

    #[test]
    fn phrase_bonus_applies_before_clamp() {
        // 1 signal in 16 words -> 62.5 -> 63, plus 15
        let text = format!("bug report {}", "word ".repeat(14));
        assert_eq!(confidence(&text), 78);
    }
}
