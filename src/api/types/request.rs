#![allow(
    clippy::module_name_repetitions,
    reason = "Request suffix is intentional for clarity"
)]

use bon::Builder;
use secrecy::{ExposeSecret as _, SecretString};
use serde::{Serialize, Serializer};
use serde_with::skip_serializing_none;

use super::{Difficulty, RankPeriod, SubmissionStatus};

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Builder, Serialize)]
#[non_exhaustive]
pub struct LoginRequest {
    #[builder(into)]
    pub email: String,
    #[builder(into)]
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
}

/// Body of `POST /auth/register`.
#[skip_serializing_none]
#[derive(Debug, Clone, Builder, Serialize)]
#[non_exhaustive]
pub struct RegisterRequest {
    #[builder(into)]
    pub email: String,
    #[builder(into)]
    pub name: String,
    #[builder(into)]
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
    /// Graduation batch, e.g. `2021`
    #[builder(into)]
    pub batch: String,
    #[builder(into)]
    pub github: Option<String>,
    #[builder(into)]
    pub linkedin: Option<String>,
}

/// Query of `GET /challenges/random`.
#[skip_serializing_none]
#[derive(Debug, Clone, Builder, Default, Serialize)]
#[non_exhaustive]
pub struct RandomChallengeRequest {
    pub difficulty: Option<Difficulty>,
}

/// Body of `POST /submissions`.
#[derive(Debug, Clone, Builder, Serialize)]
#[non_exhaustive]
pub struct SubmissionRequest {
    #[builder(into)]
    pub challenge_id: String,
    #[builder(into)]
    pub code: String,
    /// Runner language, e.g. `python` or `cpp`
    #[builder(into)]
    pub language: String,
}

/// Query of `GET /submissions`.
#[skip_serializing_none]
#[derive(Debug, Clone, Builder, Default, Serialize)]
#[non_exhaustive]
pub struct SubmissionsRequest {
    #[builder(into)]
    pub user_id: Option<String>,
    #[builder(into)]
    pub challenge_id: Option<String>,
    pub status: Option<SubmissionStatus>,
}

/// Query of `GET /leaderboard/top`.
#[skip_serializing_none]
#[derive(Debug, Clone, Builder, Default, Serialize)]
#[non_exhaustive]
pub struct TopPerformersRequest {
    pub limit: Option<u32>,
}

/// Query of `GET /leaderboard/me`.
#[skip_serializing_none]
#[derive(Debug, Clone, Builder, Default, Serialize)]
#[non_exhaustive]
pub struct RankRequest {
    pub period: Option<RankPeriod>,
}

/// Body of `PUT /users/me`. Unset fields are left unchanged.
#[skip_serializing_none]
#[derive(Debug, Clone, Builder, Default, Serialize)]
#[non_exhaustive]
pub struct UserUpdateRequest {
    #[builder(into)]
    pub name: Option<String>,
    #[builder(into)]
    pub batch: Option<String>,
    #[builder(into)]
    pub github: Option<String>,
    #[builder(into)]
    pub linkedin: Option<String>,
    #[builder(into)]
    pub avatar: Option<String>,
}

/// Body of `PUT /users/me/settings`. Unset fields are left unchanged.
#[skip_serializing_none]
#[derive(Debug, Clone, Builder, Default, Serialize)]
#[non_exhaustive]
pub struct SettingsUpdateRequest {
    pub email_notifications: Option<bool>,
    pub achievement_notifications: Option<bool>,
    pub weekly_digest: Option<bool>,
    pub dark_mode: Option<bool>,
    pub compact_view: Option<bool>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ToQueryParams as _;

    #[test]
    fn login_exposes_password_only_on_the_wire() {
        let request = LoginRequest::builder()
            .email("student@khwopa.edu.np")
            .password("hunter2".to_owned())
            .build();

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"email": "student@khwopa.edu.np", "password": "hunter2"})
        );
        assert!(!format!("{request:?}").contains("hunter2"));
    }

    #[test]
    fn register_skips_missing_profiles() {
        let request = RegisterRequest::builder()
            .email("a@b.c")
            .name("Asha")
            .password("pw".to_owned())
            .batch("2021")
            .github("asha")
            .build();

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "email": "a@b.c",
                "name": "Asha",
                "password": "pw",
                "batch": "2021",
                "github": "asha"
            })
        );
    }

    #[test]
    fn query_params() {
        assert_eq!(SubmissionsRequest::default().query_params(), "");

        let request = SubmissionsRequest::builder()
            .challenge_id("c1")
            .status(SubmissionStatus::WrongAnswer)
            .build();
        assert_eq!(
            request.query_params(),
            "?challenge_id=c1&status=WRONG_ANSWER"
        );

        let request = RandomChallengeRequest::builder()
            .difficulty(Difficulty::Easy)
            .build();
        assert_eq!(request.query_params(), "?difficulty=EASY");

        let request = RankRequest::builder().period(RankPeriod::Monthly).build();
        assert_eq!(request.query_params(), "?period=monthly");

        let request = TopPerformersRequest::builder().limit(10).build();
        assert_eq!(request.query_params(), "?limit=10");
    }

    #[test]
    fn partial_updates_only_send_set_fields() {
        let request = SettingsUpdateRequest::builder().dark_mode(true).build();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"dark_mode": true})
        );

        let request = UserUpdateRequest::builder().avatar("https://x/y.png").build();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"avatar": "https://x/y.png"})
        );
    }
}
