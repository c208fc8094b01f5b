//! Batch reductions over scored repositories and classified issues.
//!
//! Both summaries store sums and counts rather than averages so that partial
//! results can be merged in any order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{CheckKind, CheckStatus, Classification, HealthAssessment};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pass: u64,
    pub warning: u64,
    pub fail: u64,
}

impl StatusCounts {
    fn record(&mut self, status: CheckStatus) {
        match status {
            CheckStatus::Pass => self.pass += 1,
            CheckStatus::Warning => self.warning += 1,
            CheckStatus::Fail => self.fail += 1,
        }
    }

    fn merge(&mut self, other: StatusCounts) {
        self.pass += other.pass;
        self.warning += other.warning;
        self.fail += other.fail;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSummary {
    pub repositories: u64,
    pub score_sum: u64,
    pub min_score: Option<u8>,
    pub max_score: Option<u8>,
    pub checks: BTreeMap<CheckKind, StatusCounts>,
}

impl HealthSummary {
    pub fn record(&mut self, assessment: &HealthAssessment) {
        self.repositories += 1;
        self.score_sum += u64::from(assessment.score);
        self.min_score = Some(self.min_score.map_or(assessment.score, |m| m.min(assessment.score)));
        self.max_score = Some(self.max_score.map_or(assessment.score, |m| m.max(assessment.score)));
        for c in &assessment.checks {
            self.checks.entry(c.kind).or_default().record(c.status);
        }
    }

    pub fn merge(&mut self, other: HealthSummary) {
        self.repositories += other.repositories;
        self.score_sum += other.score_sum;
        self.min_score = merge_opt(self.min_score, other.min_score, u8::min);
        self.max_score = merge_opt(self.max_score, other.max_score, u8::max);
        for (kind, counts) in other.checks {
            self.checks.entry(kind).or_default().merge(counts);
        }
    }

    pub fn average_score(&self) -> f64 {
        if self.repositories == 0 {
            0.0
        } else {
            self.score_sum as f64 / self.repositories as f64
        }
    }
}

impl<'a> FromIterator<&'a HealthAssessment> for HealthSummary {
    fn from_iter<I: IntoIterator<Item = &'a HealthAssessment>>(iter: I) -> Self {
        let mut summary = HealthSummary::default();
        for a in iter {
            summary.record(a);
        }
        summary
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSummary {
    pub issues: u64,
    pub confidence_sum: u64,
    pub label_counts: BTreeMap<String, u64>,
}

impl LabelSummary {
    pub fn record(&mut self, classification: &Classification) {
        self.issues += 1;
        self.confidence_sum += u64::from(classification.confidence);
        for label in &classification.labels {
            *self.label_counts.entry(label.clone()).or_default() += 1;
        }
    }

    pub fn merge(&mut self, other: LabelSummary) {
        self.issues += other.issues;
        self.confidence_sum += other.confidence_sum;
        for (label, n) in other.label_counts {
            *self.label_counts.entry(label).or_default() += n;
        }
    }

    pub fn average_confidence(&self) -> f64 {
        if self.issues == 0 {
            0.0
        } else {
            self.confidence_sum as f64 / self.issues as f64
        }
    }
}

impl<'a> FromIterator<&'a Classification> for LabelSummary {
    fn from_iter<I: IntoIterator<Item = &'a Classification>>(iter: I) -> Self {
        let mut summary = LabelSummary::default();
        for c in iter {
            summary.record(c);
        }
        summary
    }
}

fn merge_opt(a: Option<u8>, b: Option<u8>, f: fn(u8, u8) -> u8) -> Option<u8> {
    match (a, b) {
        (Some(x), Some(y)) => Some(f(x, y)),
        (x, None) => x,
        (None, y) => y,
    }
}
