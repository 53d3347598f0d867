#![allow(
    clippy::module_name_repetitions,
    reason = "Response suffix is intentional for clarity"
)]

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use super::{ActivityType, Difficulty, SubmissionStatus};
use crate::serde_helpers::LenientDateTime;

/// A registered student.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub batch: String,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub avatar: Option<String>,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub solved: i64,
    #[serde(default)]
    pub streak: i64,
    #[serde_as(as = "Option<LenientDateTime>")]
    pub last_active: Option<DateTime<Utc>>,
    #[serde_as(as = "Option<LenientDateTime>")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde_as(as = "Option<LenientDateTime>")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Result of a successful login.
#[derive(Debug, Deserialize)]
#[non_exhaustive]
pub struct Token {
    pub access_token: SecretString,
    /// Always `bearer`
    pub token_type: String,
    pub user: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct TestCase {
    pub id: Option<String>,
    pub challenge_id: Option<String>,
    pub input: String,
    pub output: String,
    #[serde(default)]
    pub is_hidden: bool,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Challenge {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub category: String,
    pub points: i64,
    /// Seconds allowed per test case
    pub time_limit: i64,
    #[serde_as(as = "Option<LenientDateTime>")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde_as(as = "Option<LenientDateTime>")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
    #[serde(default)]
    pub solved_by: i64,
    /// Whether the signed-in user has solved it
    #[serde(default)]
    pub completed: bool,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Submission {
    pub id: String,
    pub user_id: String,
    pub challenge_id: String,
    pub code: String,
    pub language: String,
    pub status: SubmissionStatus,
    /// Milliseconds
    pub runtime: Option<i64>,
    /// Kilobytes
    pub memory: Option<i64>,
    #[serde_as(as = "Option<LenientDateTime>")]
    pub created_at: Option<DateTime<Utc>>,
    pub challenge_title: Option<String>,
    pub user_name: Option<String>,
}

/// A badge, with the signed-in user's progress when returned by `/badges/me`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    /// JSON document describing how the badge is earned
    pub criteria: String,
    #[serde(default)]
    pub earned: bool,
    #[serde_as(as = "Option<LenientDateTime>")]
    pub earned_at: Option<DateTime<Utc>>,
    pub progress: Option<i64>,
    pub total: Option<i64>,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Activity {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub title: String,
    pub description: String,
    /// JSON document with activity-specific data
    pub metadata: Option<String>,
    #[serde_as(as = "Option<LenientDateTime>")]
    pub created_at: Option<DateTime<Utc>>,
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct UserSettings {
    pub email_notifications: bool,
    pub achievement_notifications: bool,
    pub weekly_digest: bool,
    pub dark_mode: bool,
    pub compact_view: bool,
}

/// Leaderboard entry with rank, as returned by `/leaderboard/top` and `/leaderboard/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct RankedUser {
    pub id: String,
    pub rank: i64,
    pub name: String,
    pub avatar: Option<String>,
    pub batch: String,
    pub points: i64,
    pub solved: i64,
    /// Number of badges earned
    #[serde(default)]
    pub badges: i64,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    /// Only present for `/leaderboard/me`
    pub percentile: Option<f64>,
}
