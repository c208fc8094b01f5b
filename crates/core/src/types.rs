use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Fetched repository metadata plus the auxiliary signals the scorer reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySnapshot {
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub open_issues_count: u64,
    pub pushed_at: DateTime<Utc>,
    #[serde(default)]
    pub has_readme: bool,
    #[serde(default)]
    pub has_license: bool,
    #[serde(default)]
    pub license_name: Option<String>,
    #[serde(default)]
    pub contributor_count: u64,
    #[serde(default)]
    pub release_count: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckKind {
    Readme,
    License,
    RecentActivity,
    IssueManagement,
    CommunityEngagement,
    Documentation,
    ReleaseManagement,
}

impl CheckKind {
    /// Evaluation order of the health checks.
    pub const ALL: [CheckKind; 7] = [
        CheckKind::Readme,
        CheckKind::License,
        CheckKind::RecentActivity,
        CheckKind::IssueManagement,
        CheckKind::CommunityEngagement,
        CheckKind::Documentation,
        CheckKind::ReleaseManagement,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CheckKind::Readme => "README",
            CheckKind::License => "License",
            CheckKind::RecentActivity => "Recent Activity",
            CheckKind::IssueManagement => "Issue Management",
            CheckKind::CommunityEngagement => "Community Engagement",
            CheckKind::Documentation => "Documentation",
            CheckKind::ReleaseManagement => "Release Management",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckStatus {
    Pass,
    Warning,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub kind: CheckKind,
    pub status: CheckStatus,
    pub description: String,
    pub recommendation: Option<String>,
}

impl HealthCheck {
    pub fn passed(&self) -> bool {
        self.status == CheckStatus::Pass
    }
}

/// Score plus the ordered checks it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthAssessment {
    pub score: u8,
    pub checks: Vec<HealthCheck>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationInput {
    #[serde(default)]
    pub number: Option<u64>,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub labels: Vec<String>,
    pub confidence: u8,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
