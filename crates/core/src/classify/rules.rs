use serde::{Deserialize, Serialize};

/// A label and the substrings that trigger it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRule {
    pub label: String,
    pub keywords: Vec<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl ClassificationRule {
    pub fn new(label: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            label: label.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            active: true,
        }
    }

    /// `content` must already be lower-cased.
    pub fn matches(&self, content: &str) -> bool {
        self.keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .any(|k| content.contains(&k.to_lowercase()))
    }
}

/// Ordered, mutable rule table. Labels are unique; evaluation follows insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    rules: Vec<ClassificationRule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            rules: vec![
                ClassificationRule::new(
                    "bug",
                    &["bug", "error", "issue", "problem", "broken", "fix", "crash", "fail"],
                ),
                ClassificationRule::new(
                    "enhancement",
                    &["feature", "enhancement", "improvement", "add", "new", "implement"],
                ),
                ClassificationRule::new(
                    "documentation",
                    &["docs", "documentation", "readme", "guide", "tutorial", "example"],
                ),
                ClassificationRule::new(
                    "performance",
                    &["performance", "slow", "speed", "optimize", "memory", "cpu"],
                ),
                ClassificationRule::new(
                    "security",
                    &["security", "vulnerability", "cve", "exploit", "auth", "permission"],
                ),
                ClassificationRule::new(
                    "ui/ux",
                    &["ui", "ux", "design", "interface", "layout", "style", "css"],
                ),
                ClassificationRule::new(
                    "testing",
                    &["test", "testing", "spec", "unit", "integration", "e2e"],
                ),
            ],
        }
    }
}

impl RuleSet {
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    pub fn active(&self) -> impl Iterator<Item = &ClassificationRule> {
        self.rules.iter().filter(|r| r.active)
    }

    pub fn get(&self, label: &str) -> Option<&ClassificationRule> {
        self.rules.iter().find(|r| r.label == label)
    }

    /// Replaces the rule with the same label in place, or appends it.
    pub fn upsert(&mut self, rule: ClassificationRule) {
        match self.rules.iter_mut().find(|r| r.label == rule.label) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
    }

    pub fn remove(&mut self, label: &str) -> Option<ClassificationRule> {
        let idx = self.rules.iter().position(|r| r.label == label)?;
        Some(self.rules.remove(idx))
    }

    /// Returns false when no rule carries `label`.
    pub fn set_active(&mut self, label: &str, active: bool) -> bool {
        match self.rules.iter_mut().find(|r| r.label == label) {
            Some(rule) => {
                rule.active = active;
                true
            }
            None => false,
        }
    }

    /// Flips a rule's active flag and returns the new state.
    pub fn toggle(&mut self, label: &str) -> Option<bool> {
        let rule = self.rules.iter_mut().find(|r| r.label == label)?;
        rule.active = !rule.active;
        Some(rule.active)
    }

    pub fn set_keywords(&mut self, label: &str, keywords: Vec<String>) -> bool {
        match self.rules.iter_mut().find(|r| r.label == label) {
            Some(rule) => {
                rule.keywords = keywords;
                true
            }
            None => false,
        }
    }
}
