use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};

use repopulse_core::classify::RuleSet;
use repopulse_core::health::compute_health;
use repopulse_core::input::load_snapshots;
use repopulse_core::types::CheckKind;
use repopulse_core::{analyze_health, analyze_issues, ClassifyOptions, HealthOptions};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap()
}

#[test]
fn analyze_fixture_scores_every_repository() {
    let input = Path::new("../../fixtures/repos");
    let report = analyze_health(input, HealthOptions::at(now())).expect("analyze_health ok");

    let scores: Vec<(&str, u8)> = report
        .repositories
        .iter()
        .map(|r| (r.full_name.as_str(), r.assessment.score))
        .collect();
    assert_eq!(
        scores,
        vec![("acme/widgets", 100), ("acme/legacy", 29), ("acme/dormant", 57)]
    );

    assert_eq!(report.inputs.sources.len(), 2);
    assert_eq!(report.summary.repositories, 3);
    assert!((report.summary.average_score() - 62.0).abs() < 1e-9);
    assert_eq!(report.summary.checks[&CheckKind::RecentActivity].fail, 1);
    assert!(report.gate.is_none());
}

#[test]
fn min_score_gate_reports_failures() {
    let input = Path::new("../../fixtures/repos");
    let opts = HealthOptions {
        min_score: Some(60),
        ..HealthOptions::at(now())
    };

    let report = analyze_health(input, opts).expect("analyze_health with gate");
    let gate = report.gate.as_ref().expect("gate present");

    assert!(!gate.pass);
    assert_eq!(gate.failing, vec!["acme/legacy", "acme/dormant"]);
}

#[test]
fn neglected_repository_snapshot() {
    let loaded = load_snapshots(Path::new("../../fixtures/repos/b_batch.json"), u64::MAX)
        .expect("load batch");
    let legacy = compute_health(&loaded.items[0], now());

    insta::assert_json_snapshot!("neglected_repository", legacy);
}

#[test]
fn analyze_issues_fixture_suggests_labels() {
    let input = Path::new("../../fixtures/issues");
    let report = analyze_issues(input, ClassifyOptions::default()).expect("analyze_issues ok");

    let labels: Vec<Vec<String>> = report
        .issues
        .iter()
        .map(|i| i.classification.labels.clone())
        .collect();
    assert_eq!(
        labels,
        vec![
            vec!["bug".to_string()],
            vec!["enhancement".to_string()],
            vec!["bug".to_string(), "documentation".to_string()],
            vec!["needs-triage".to_string()],
        ]
    );

    let confidences: Vec<u8> = report
        .issues
        .iter()
        .map(|i| i.classification.confidence)
        .collect();
    assert_eq!(confidences, vec![60, 95, 95, 60]);

    assert_eq!(report.summary.label_counts["bug"], 2);
    assert_eq!(report.active_labels.len(), 7);
}

#[test]
fn analyze_issues_honors_disabled_rules() {
    let mut rules = RuleSet::default();
    rules.set_active("bug", false);
    let opts = ClassifyOptions {
        rules,
        ..ClassifyOptions::default()
    };

    let report = analyze_issues(Path::new("../../fixtures/issues"), opts).expect("analyze");
    assert_eq!(report.issues[0].classification.labels, vec!["needs-triage"]);
    assert!(!report.active_labels.contains(&"bug".to_string()));
}

#[test]
fn missing_input_is_reported_with_context() {
    let err = analyze_health(Path::new("../../fixtures/nope"), HealthOptions::at(now()))
        .unwrap_err();
    let msg = format!("{:#}", err);
    assert!(msg.contains("failed to load snapshots"));
    assert!(msg.contains("input not found"));
}
