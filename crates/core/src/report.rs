use serde::{Deserialize, Serialize};

use crate::{
    summary::{HealthSummary, LabelSummary},
    types::{CheckStatus, Classification, HealthAssessment},
};

pub const REPORT_VERSION: &str = "0.1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inputs {
    pub input_path: String,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryHealth {
    pub full_name: String,
    #[serde(flatten)]
    pub assessment: HealthAssessment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateResult {
    pub min_score: u8,
    pub pass: bool,
    pub failing: Vec<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub report_version: String,
    pub evaluated_at: chrono::DateTime<chrono::Utc>,
    pub inputs: Inputs,
    pub repositories: Vec<RepositoryHealth>,
    pub summary: HealthSummary,
    pub gate: Option<GateResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueLabels {
    pub number: Option<u64>,
    pub title: String,
    #[serde(flatten)]
    pub classification: Classification,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub report_version: String,
    pub inputs: Inputs,
    pub active_labels: Vec<String>,
    pub issues: Vec<IssueLabels>,
    pub summary: LabelSummary,
}

pub fn evaluate_gate(min_score: u8, repositories: &[RepositoryHealth]) -> GateResult {
    let failing: Vec<String> = repositories
        .iter()
        .filter(|r| r.assessment.score < min_score)
        .map(|r| r.full_name.clone())
        .collect();
    let pass = failing.is_empty();
    GateResult {
        min_score,
        pass,
        reason: if pass {
            "all repositories meet the minimum score".to_string()
        } else {
            format!("{} repositories below {}", failing.len(), min_score)
        },
        failing,
    }
}

fn status_mark(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "PASS",
        CheckStatus::Warning => "WARN",
        CheckStatus::Fail => "FAIL",
    }
}

impl HealthReport {
    pub fn to_markdown(&self) -> String {
        let mut s = String::new();
        s.push_str("# repopulse health report\n\n");
        s.push_str(&format!("- report_version: `{}`\n", self.report_version));
        s.push_str(&format!("- input_path: `{}`\n", self.inputs.input_path));
        s.push_str(&format!("- evaluated_at: `{}`\n", self.evaluated_at.to_rfc3339()));
        s.push('\n');

        s.push_str("## Summary\n\n");
        s.push_str(&format!("- repositories: `{}`\n", self.summary.repositories));
        s.push_str(&format!(
            "- average_score: `{:.1}`\n",
            self.summary.average_score()
        ));
        if let (Some(lo), Some(hi)) = (self.summary.min_score, self.summary.max_score) {
            s.push_str(&format!("- score_range: `{lo}..={hi}`\n"));
        }
        s.push('\n');

        if let Some(g) = &self.gate {
            s.push_str("## Score gate\n\n");
            s.push_str(&format!("- min_score: `{}`\n", g.min_score));
            s.push_str(&format!("- pass: `{}`\n", g.pass));
            s.push_str(&format!("- reason: `{}`\n", g.reason));
            for name in &g.failing {
                s.push_str(&format!("  - {}\n", name));
            }
            s.push('\n');
        }

        s.push_str("## Repositories\n\n");
        if self.repositories.is_empty() {
            s.push_str("- (none)\n");
        }
        for r in &self.repositories {
            s.push_str(&format!(
                "### {} ({}/100)\n\n",
                r.full_name, r.assessment.score
            ));
            s.push_str("| Check | Status | Details |\n|---|---|---|\n");
            for c in &r.assessment.checks {
                s.push_str(&format!(
                    "| {} | {} | {} |\n",
                    c.kind,
                    status_mark(c.status),
                    c.description
                ));
            }
            let recs: Vec<&str> = r
                .assessment
                .checks
                .iter()
                .filter_map(|c| c.recommendation.as_deref())
                .collect();
            if !recs.is_empty() {
                s.push_str("\nRecommendations:\n");
                for rec in recs {
                    s.push_str(&format!("- {}\n", rec));
                }
            }
            s.push('\n');
        }

        s
    }
}

impl ClassificationReport {
    pub fn to_markdown(&self) -> String {
        let mut s = String::new();
        s.push_str("# repopulse label suggestions\n\n");
        s.push_str(&format!("- report_version: `{}`\n", self.report_version));
        s.push_str(&format!("- input_path: `{}`\n", self.inputs.input_path));
        s.push_str(&format!(
            "- active_labels: `{}`\n",
            self.active_labels.join(", ")
        ));
        s.push('\n');

        s.push_str("## Summary\n\n");
        s.push_str(&format!("- issues: `{}`\n", self.summary.issues));
        s.push_str(&format!(
            "- average_confidence: `{:.1}`\n",
            self.summary.average_confidence()
        ));
        for (label, n) in &self.summary.label_counts {
            s.push_str(&format!("  - {}: {}\n", label, n));
        }
        s.push('\n');

        s.push_str("## Issues\n\n");
        if self.issues.is_empty() {
            s.push_str("- (none)\n");
        }
        for i in &self.issues {
            let prefix = i.number.map(|n| format!("#{n} ")).unwrap_or_default();
            s.push_str(&format!(
                "- {}{}: `{}` ({}%)\n",
                prefix,
                i.title,
                i.classification.labels.join(", "),
                i.classification.confidence
            ));
        }

        s
    }
}
