pub mod classify;
pub mod config;
pub mod health;
pub mod input;
pub mod report;
pub mod summary;
pub mod types;

use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};

use crate::{
    classify::{classify_input, RuleSet},
    health::compute_health,
    report::{
        evaluate_gate, ClassificationReport, HealthReport, Inputs, IssueLabels, RepositoryHealth,
        REPORT_VERSION,
    },
    summary::{HealthSummary, LabelSummary},
};

pub use crate::classify::classify;
pub use crate::health::health_score;

pub const DEFAULT_MAX_TOTAL_BYTES_SCANNED: u64 = 50 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct HealthOptions {
    pub now: DateTime<Utc>,
    pub min_score: Option<u8>,
    pub max_total_bytes_scanned: u64,
}

impl HealthOptions {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now,
            min_score: None,
            max_total_bytes_scanned: DEFAULT_MAX_TOTAL_BYTES_SCANNED,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClassifyOptions {
    pub rules: RuleSet,
    pub max_total_bytes_scanned: u64,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            rules: RuleSet::default(),
            max_total_bytes_scanned: DEFAULT_MAX_TOTAL_BYTES_SCANNED,
        }
    }
}

pub fn analyze_health(input: &Path, opts: HealthOptions) -> anyhow::Result<HealthReport> {
    let loaded = input::load_snapshots(input, opts.max_total_bytes_scanned)
        .with_context(|| format!("failed to load snapshots at {}", input.display()))?;

    let repositories: Vec<RepositoryHealth> = loaded
        .items
        .iter()
        .map(|snap| RepositoryHealth {
            full_name: snap.full_name.clone(),
            assessment: compute_health(snap, opts.now),
        })
        .collect();

    let summary: HealthSummary = repositories.iter().map(|r| &r.assessment).collect();
    let gate = opts.min_score.map(|m| evaluate_gate(m, &repositories));
    tracing::info!(
        repositories = summary.repositories,
        average = summary.average_score(),
        "health analysis complete"
    );

    Ok(HealthReport {
        report_version: REPORT_VERSION.to_string(),
        evaluated_at: opts.now,
        inputs: Inputs {
            input_path: input.display().to_string(),
            sources: loaded.sources,
        },
        repositories,
        summary,
        gate,
    })
}

pub fn analyze_issues(input: &Path, opts: ClassifyOptions) -> anyhow::Result<ClassificationReport> {
    let loaded = input::load_issues(input, opts.max_total_bytes_scanned)
        .with_context(|| format!("failed to load issues at {}", input.display()))?;

    let issues: Vec<IssueLabels> = loaded
        .items
        .into_iter()
        .map(|issue| {
            let classification = classify_input(&issue, &opts.rules);
            IssueLabels {
                number: issue.number,
                title: issue.title,
                classification,
            }
        })
        .collect();

    let summary: LabelSummary = issues.iter().map(|i| &i.classification).collect();
    tracing::info!(
        issues = summary.issues,
        average_confidence = summary.average_confidence(),
        "classification complete"
    );

    Ok(ClassificationReport {
        report_version: REPORT_VERSION.to_string(),
        inputs: Inputs {
            input_path: input.display().to_string(),
            sources: loaded.sources,
        },
        active_labels: opts.rules.active().map(|r| r.label.clone()).collect(),
        issues,
        summary,
    })
}
