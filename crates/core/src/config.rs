use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::classify::{ClassificationRule, RuleSet};

pub const CONFIG_FILE: &str = "repopulse.toml";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub min_score: Option<u8>,
    pub classifier: ClassifierConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ClassifierConfig {
    pub replace_defaults: bool,
    pub disabled: Vec<String>,
    pub rules: Vec<ClassificationRule>,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents =
            std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let config: Config =
            toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
        if let Some(score) = config.min_score {
            if score > 100 {
                anyhow::bail!("{}: min_score must be 0..=100, got {score}", path.display());
            }
        }
        Ok(config)
    }

    pub fn discover() -> Option<Self> {
        let path = Path::new(CONFIG_FILE);
        if path.exists() {
            Config::load(path).ok()
        } else {
            None
        }
    }

    /// The rule table the classifier should read, after overrides and toggles.
    pub fn rule_set(&self) -> RuleSet {
        let mut rules = if self.classifier.replace_defaults {
            RuleSet::empty()
        } else {
            RuleSet::default()
        };
        for rule in &self.classifier.rules {
            rules.upsert(rule.clone());
        }
        for label in &self.classifier.disabled {
            if !rules.set_active(label, false) {
                tracing::warn!(%label, "disabled label has no matching rule");
            }
        }
        rules
    }
}
