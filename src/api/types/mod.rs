//! Types for the KhwopaCoder HTTP API.
//!
//! - **Common types**: enums shared by requests and responses.
//! - **Request types**: builder-pattern structs for each endpoint that takes input
//!   (e.g. [`request::LoginRequest`], [`request::SubmissionsRequest`]).
//! - **Response types**: structs mirroring the JSON the backend returns
//!   (e.g. [`response::User`], [`response::Challenge`]).
//!
//! # Request Building
//!
//! ```
//! use khwopacoder_client::api::types::Difficulty;
//! use khwopacoder_client::api::types::request::RandomChallengeRequest;
//!
//! let any = RandomChallengeRequest::builder().build();
//! let hard = RandomChallengeRequest::builder().difficulty(Difficulty::Hard).build();
//! ```

use serde::{Deserialize, Serialize};

pub mod request;
pub mod response;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
#[non_exhaustive]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Verdict of the code runner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum SubmissionStatus {
    Accepted,
    WrongAnswer,
    TimeLimitExceeded,
    MemoryLimitExceeded,
    RuntimeError,
    CompilationError,
    /// Unknown verdict from the API (captures the raw value for debugging).
    #[serde(untagged)]
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ActivityType {
    ChallengeCompleted,
    ChallengeAttempted,
    BadgeEarned,
    RankUp,
    Streak,
    /// Unknown activity type from the API (captures the raw value for debugging).
    #[serde(untagged)]
    Unknown(String),
}

/// Window over which a rank is computed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[non_exhaustive]
pub enum RankPeriod {
    #[default]
    Overall,
    Monthly,
    Weekly,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names() {
        assert_eq!(Difficulty::Medium.to_string(), "MEDIUM");
        assert_eq!(
            serde_json::to_string(&SubmissionStatus::TimeLimitExceeded).unwrap(),
            r#""TIME_LIMIT_EXCEEDED""#
        );
        assert_eq!(RankPeriod::Weekly.to_string(), "weekly");
        assert_eq!(ActivityType::BadgeEarned.to_string(), "BADGE_EARNED");
    }

    #[test]
    fn unknown_values_are_captured() {
        let status: SubmissionStatus = serde_json::from_str(r#""PRESENTATION_ERROR""#).unwrap();
        assert_eq!(status, SubmissionStatus::Unknown("PRESENTATION_ERROR".to_owned()));

        let activity: ActivityType = serde_json::from_str(r#""new_submission""#).unwrap();
        assert_eq!(activity, ActivityType::Unknown("new_submission".to_owned()));
    }
}
