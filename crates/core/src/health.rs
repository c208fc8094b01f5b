use chrono::{DateTime, Utc};

use crate::types::{CheckKind, CheckStatus, HealthAssessment, HealthCheck, RepositorySnapshot};

pub const ACTIVE_DAYS: i64 = 30;
pub const STALE_DAYS: i64 = 90;
pub const MAX_OPEN_ISSUES: u64 = 50;
pub const HEALTHY_CONTRIBUTORS: u64 = 5;
pub const MIN_CONTRIBUTORS: u64 = 2;

/// Runs every check against `snapshot`, measuring push age from `now`.
pub fn compute_health(snapshot: &RepositorySnapshot, now: DateTime<Utc>) -> HealthAssessment {
    let days = days_since_push(snapshot.pushed_at, now);

    let checks: Vec<HealthCheck> = CheckKind::ALL
        .iter()
        .map(|kind| match kind {
            CheckKind::Readme => readme_check(snapshot),
            CheckKind::License => license_check(snapshot),
            CheckKind::RecentActivity => activity_check(days),
            CheckKind::IssueManagement => issues_check(snapshot.open_issues_count),
            CheckKind::CommunityEngagement => community_check(snapshot.contributor_count),
            CheckKind::Documentation => description_check(snapshot.description.as_deref()),
            CheckKind::ReleaseManagement => releases_check(snapshot.release_count),
        })
        .collect();

    let score = health_score(&checks);
    tracing::debug!(repo = %snapshot.full_name, days, score, "computed health");

    HealthAssessment { score, checks }
}

/// round(100 * passed / total), half rounding up. An empty slice scores 0.
pub fn health_score(checks: &[HealthCheck]) -> u8 {
    let total = checks.len() as u64;
    if total == 0 {
        return 0;
    }
    let passed = checks.iter().filter(|c| c.passed()).count() as u64;
    ((200 * passed + total) / (2 * total)) as u8
}

/// Whole days elapsed since the last push; a push after `now` counts as zero.
pub fn days_since_push(pushed_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - pushed_at).num_days().max(0)
}

fn check(
    kind: CheckKind,
    status: CheckStatus,
    description: String,
    recommendation: Option<&str>,
) -> HealthCheck {
    HealthCheck {
        kind,
        status,
        description,
        recommendation: recommendation.map(str::to_string),
    }
}

fn readme_check(snapshot: &RepositorySnapshot) -> HealthCheck {
    if snapshot.has_readme {
        check(
            CheckKind::Readme,
            CheckStatus::Pass,
            "Repository has a README file".to_string(),
            None,
        )
    } else {
        check(
            CheckKind::Readme,
            CheckStatus::Fail,
            "No README file found".to_string(),
            Some("Add a README.md explaining what the project does and how to use it"),
        )
    }
}

fn license_check(snapshot: &RepositorySnapshot) -> HealthCheck {
    if !snapshot.has_license {
        return check(
            CheckKind::License,
            CheckStatus::Warning,
            "No license file found".to_string(),
            Some("Add a LICENSE file to clarify how others may use the code"),
        );
    }

    let description = match snapshot.license_name.as_deref() {
        Some(name) if !name.is_empty() => format!("Licensed under {name}"),
        _ => "Repository has a license file".to_string(),
    };
    check(CheckKind::License, CheckStatus::Pass, description, None)
}

fn activity_check(days: i64) -> HealthCheck {
    let description = match days {
        0 => "Last pushed today".to_string(),
        1 => "Last pushed 1 day ago".to_string(),
        n => format!("Last pushed {n} days ago"),
    };

    if days <= ACTIVE_DAYS {
        check(CheckKind::RecentActivity, CheckStatus::Pass, description, None)
    } else if days <= STALE_DAYS {
        check(
            CheckKind::RecentActivity,
            CheckStatus::Warning,
            description,
            Some("Push updates regularly so users can see the project is maintained"),
        )
    } else {
        check(
            CheckKind::RecentActivity,
            CheckStatus::Fail,
            description,
            Some("Project looks inactive; resume maintenance or archive the repository"),
        )
    }
}

fn issues_check(open_issues: u64) -> HealthCheck {
    let description = format!("{open_issues} open issues");
    if open_issues < MAX_OPEN_ISSUES {
        check(CheckKind::IssueManagement, CheckStatus::Pass, description, None)
    } else {
        check(
            CheckKind::IssueManagement,
            CheckStatus::Warning,
            description,
            Some("Triage the backlog and close stale or duplicate issues"),
        )
    }
}

fn community_check(contributors: u64) -> HealthCheck {
    let description = match contributors {
        1 => "1 contributor".to_string(),
        n => format!("{n} contributors"),
    };

    let recommendation = Some("Add CONTRIBUTING guidelines and label good first issues");
    if contributors >= HEALTHY_CONTRIBUTORS {
        check(CheckKind::CommunityEngagement, CheckStatus::Pass, description, None)
    } else if contributors >= MIN_CONTRIBUTORS {
        check(
            CheckKind::CommunityEngagement,
            CheckStatus::Warning,
            description,
            recommendation,
        )
    } else {
        check(
            CheckKind::CommunityEngagement,
            CheckStatus::Fail,
            description,
            recommendation,
        )
    }
}

fn description_check(description: Option<&str>) -> HealthCheck {
    match description {
        Some(d) if !d.is_empty() => check(
            CheckKind::Documentation,
            CheckStatus::Pass,
            "Repository has a description".to_string(),
            None,
        ),
        _ => check(
            CheckKind::Documentation,
            CheckStatus::Warning,
            "No repository description".to_string(),
            Some("Add a short description so the project is easier to discover"),
        ),
    }
}

fn releases_check(releases: u64) -> HealthCheck {
    if releases > 0 {
        let description = match releases {
            1 => "1 release published".to_string(),
            n => format!("{n} releases published"),
        };
        check(CheckKind::ReleaseManagement, CheckStatus::Pass, description, None)
    } else {
        check(
            CheckKind::ReleaseManagement,
            CheckStatus::Warning,
            "No releases published".to_string(),
            Some("Publish tagged releases so users can track versions"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    fn snapshot() -> RepositorySnapshot {
        RepositorySnapshot {
            full_name: "acme/widgets".to_string(),
            description: Some("A tool".to_string()),
            open_issues_count: 5,
            pushed_at: now() - Duration::days(10),
            has_readme: true,
            has_license: true,
            license_name: Some("MIT".to_string()),
            contributor_count: 8,
            release_count: 3,
        }
    }

    fn status_of(a: &HealthAssessment, kind: CheckKind) -> CheckStatus {
        a.checks.iter().find(|c| c.kind == kind).unwrap().status
    }

    #[test]
    fn neglected_repository_scores_29() {
        let snap = RepositorySnapshot {
            description: Some(String::new()),
            open_issues_count: 10,
            pushed_at: now() - Duration::days(5),
            has_readme: false,
            has_license: false,
            license_name: None,
            contributor_count: 1,
            release_count: 0,
            ..snapshot()
        };

        let a = compute_health(&snap, now());
        let statuses: Vec<CheckStatus> = a.checks.iter().map(|c| c.status).collect();

        use CheckStatus::*;
        assert_eq!(
            statuses,
            vec![Fail, Warning, Pass, Pass, Fail, Warning, Warning]
        );
        assert_eq!(a.score, 29);
    }

    #[test]
    fn healthy_repository_scores_100() {
        let a = compute_health(&snapshot(), now());
        assert_eq!(a.score, 100);
        assert!(a.checks.iter().all(|c| c.recommendation.is_none()));
        assert_eq!(a.checks[1].description, "Licensed under MIT");
    }

    #[test]
    fn activity_thresholds_are_inclusive() {
        let at = |days| {
            let snap = RepositorySnapshot {
                pushed_at: now() - Duration::days(days),
                ..snapshot()
            };
            compute_health(&snap, now())
        };

        assert_eq!(status_of(&at(30), CheckKind::RecentActivity), CheckStatus::Pass);
        assert_eq!(status_of(&at(31), CheckKind::RecentActivity), CheckStatus::Warning);
        assert_eq!(status_of(&at(90), CheckKind::RecentActivity), CheckStatus::Warning);
        assert_eq!(status_of(&at(91), CheckKind::RecentActivity), CheckStatus::Fail);
    }

    #[test]
    fn partial_days_are_floored() {
        let pushed = now() - Duration::days(30) - Duration::hours(23);
        assert_eq!(days_since_push(pushed, now()), 30);
    }

    #[test]
    fn future_push_counts_as_today() {
        let pushed = now() + Duration::hours(3);
        assert_eq!(days_since_push(pushed, now()), 0);
        assert_eq!(activity_check(0).description, "Last pushed today");
    }

    #[test]
    fn fifty_open_issues_is_a_warning() {
        assert_eq!(issues_check(49).status, CheckStatus::Pass);
        let c = issues_check(50);
        assert_eq!(c.status, CheckStatus::Warning);
        assert!(c.recommendation.is_some());
    }

    #[test]
    fn license_without_name_still_passes() {
        let snap = RepositorySnapshot {
            license_name: None,
            ..snapshot()
        };
        let c = license_check(&snap);
        assert_eq!(c.status, CheckStatus::Pass);
        assert_eq!(c.description, "Repository has a license file");
    }

    #[test]
    fn only_missing_or_empty_description_is_a_warning() {
        assert_eq!(description_check(Some("")).status, CheckStatus::Warning);
        assert_eq!(description_check(None).status, CheckStatus::Warning);
        assert_eq!(description_check(Some("   ")).status, CheckStatus::Pass);
    }

    #[test]
    fn whitespace_description_is_taken_as_given() {
        let snap = RepositorySnapshot {
            description: Some("   ".to_string()),
            ..snapshot()
        };
        let a = compute_health(&snap, now());
        assert_eq!(status_of(&a, CheckKind::Documentation), CheckStatus::Pass);
        assert_eq!(a.score, 100);
    }

    #[test]
    fn empty_license_name_falls_back_to_generic_description() {
        let snap = RepositorySnapshot {
            license_name: Some(String::new()),
            ..snapshot()
        };
        assert_eq!(license_check(&snap).description, "Repository has a license file");
    }

    #[test]
    fn community_recommendation_only_below_five() {
        assert!(community_check(4).recommendation.is_some());
        assert!(community_check(5).recommendation.is_none());
        assert_eq!(community_check(2).status, CheckStatus::Warning);
        assert_eq!(community_check(0).status, CheckStatus::Fail);
    }

    #[test]
    fn score_rounds_half_up() {
        let pass = check(CheckKind::Readme, CheckStatus::Pass, String::new(), None);
        let fail = check(CheckKind::Readme, CheckStatus::Fail, String::new(), None);

        assert_eq!(health_score(&[]), 0);
        assert_eq!(health_score(&[pass.clone(), fail.clone()]), 50);
        assert_eq!(health_score(&[pass.clone(), fail.clone(), fail.clone()]), 33);
        assert_eq!(health_score(&[pass.clone(), pass, fail]), 67);
    }
}
