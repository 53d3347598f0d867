#![cfg(feature = "api")]
#![allow(
    clippy::unwrap_used,
    reason = "Do not need additional syntax for setting up tests"
)]

//! Integration tests for the dashboard HTTP API client.
//!
//! These tests use `httpmock` to stand in for the backend.
//!
//! ```bash
//! cargo test --features api
//! ```

mod auth {
    use std::sync::Arc;

    use httpmock::{Method::GET, Method::POST, MockServer};
    use khwopacoder_client::api::Client;
    use khwopacoder_client::api::types::request::LoginRequest;
    use khwopacoder_client::auth::{CredentialStore, ExposeSecret as _, MemoryStore, SecretString};
    use reqwest::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn login_stores_token_for_later_requests() -> anyhow::Result<()> {
        let server = MockServer::start();
        let store = Arc::new(MemoryStore::new());
        let shared: Arc<dyn CredentialStore> = Arc::<MemoryStore>::clone(&store);
        let client = Client::new(&server.base_url())?.with_store(shared);

        let login = server.mock(|when, then| {
            when.method(POST)
                .path("/auth/login")
                .json_body(json!({"email": "ram@khwopa.edu.np", "password": "hunter2"}));
            then.status(StatusCode::OK).json_body(json!({
                "access_token": "header.payload.sig",
                "token_type": "bearer",
                "user": {
                    "id": "u1",
                    "email": "ram@khwopa.edu.np",
                    "name": "Ram",
                    "batch": "2021",
                    "points": 40,
                    "created_at": "2025-01-05T08:30:00.123456"
                }
            }));
        });
        let settings = server.mock(|when, then| {
            when.method(GET)
                .path("/users/me/settings")
                .header("authorization", "Bearer header.payload.sig");
            then.status(StatusCode::OK).json_body(json!({
                "email_notifications": true,
                "achievement_notifications": true,
                "weekly_digest": false,
                "dark_mode": true,
                "compact_view": false
            }));
        });

        let request = LoginRequest::builder()
            .email("ram@khwopa.edu.np")
            .password("hunter2".to_owned())
            .build();
        let token = client.login(&request).await?;

        assert_eq!(token.access_token.expose_secret(), "header.payload.sig");
        let user = token.user.unwrap();
        assert_eq!(user.points, 40);
        assert_eq!(
            user.created_at.unwrap().to_rfc3339(),
            "2025-01-05T08:30:00.123456+00:00"
        );
        assert_eq!(
            store.token()?.unwrap().expose_secret(),
            "header.payload.sig"
        );

        let settings_response = client.settings().await?;
        assert!(settings_response.dark_mode);

        login.assert();
        settings.assert();

        client.logout()?;
        assert!(store.token()?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn me_returns_current_user() -> anyhow::Result<()> {
        let server = MockServer::start();
        let store = Arc::new(MemoryStore::new());
        store.set_token(Some(SecretString::from("header.payload.sig".to_owned())))?;
        let client = Client::new(&server.base_url())?.with_store(store);

        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/auth/me")
                .header("authorization", "Bearer header.payload.sig");
            then.status(StatusCode::OK).json_body(json!({
                "id": "u1",
                "email": "ram@khwopa.edu.np",
                "name": "Ram",
                "batch": "2021",
                "streak": 3
            }));
        });

        let user = client.me().await?;

        mock.assert();
        assert_eq!(user.id, "u1");
        assert_eq!(user.streak, 3);
        assert!(user.github.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn unauthorized_is_a_status_error() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        let mock = server.mock(|when, then| {
            when.method(GET).path("/users/me/settings");
            then.status(StatusCode::UNAUTHORIZED)
                .json_body(json!({"detail": "Not authenticated"}));
        });

        let err = client.settings().await.unwrap_err();

        assert_eq!(err.kind(), khwopacoder_client::error::Kind::Status);
        let status = err
            .downcast_ref::<khwopacoder_client::error::Status>()
            .unwrap();
        assert_eq!(status.status_code, StatusCode::UNAUTHORIZED);
        assert_eq!(status.path, "/users/me/settings");
        assert!(status.message.contains("Not authenticated"));
        mock.assert();
        Ok(())
    }
}

mod challenges {
    use httpmock::{Method::GET, MockServer};
    use khwopacoder_client::api::Client;
    use khwopacoder_client::api::types::Difficulty;
    use khwopacoder_client::api::types::request::RandomChallengeRequest;
    use reqwest::StatusCode;
    use serde_json::json;

    fn challenge(id: &str, difficulty: &str) -> serde_json::Value {
        json!({
            "id": id,
            "title": "Two Sum",
            "description": "Find two numbers that add up to a target.",
            "difficulty": difficulty,
            "category": "Arrays",
            "points": 10,
            "time_limit": 2,
            "created_at": "2025-02-01T09:00:00Z",
            "test_cases": [
                {"input": "2 7 11 15\n9", "output": "0 1", "is_hidden": false}
            ],
            "solved_by": 3
        })
    }

    #[tokio::test]
    async fn list_and_get() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        let list = server.mock(|when, then| {
            when.method(GET).path("/challenges");
            then.status(StatusCode::OK)
                .json_body(json!([challenge("c1", "EASY"), challenge("c2", "HARD")]));
        });
        let one = server.mock(|when, then| {
            when.method(GET).path("/challenges/c2");
            then.status(StatusCode::OK).json_body(challenge("c2", "HARD"));
        });

        let challenges = client.challenges().await?;
        assert_eq!(challenges.len(), 2);
        assert_eq!(challenges[0].difficulty, Difficulty::Easy);
        assert_eq!(challenges[0].test_cases.len(), 1);
        assert!(!challenges[0].completed);

        let challenge = client.challenge("c2").await?;
        assert_eq!(challenge.difficulty, Difficulty::Hard);
        assert_eq!(challenge.solved_by, 3);

        list.assert();
        one.assert();
        Ok(())
    }

    #[tokio::test]
    async fn random_with_difficulty() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/challenges/random")
                .query_param("difficulty", "MEDIUM");
            then.status(StatusCode::OK).json_body(challenge("c9", "MEDIUM"));
        });

        let request = RandomChallengeRequest::builder()
            .difficulty(Difficulty::Medium)
            .build();
        let challenge = client.random_challenge(&request).await?;

        assert_eq!(challenge.id, "c9");
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn null_body_is_not_found() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        let mock = server.mock(|when, then| {
            when.method(GET).path("/challenges/missing");
            then.status(StatusCode::OK).body("null");
        });

        let err = client.challenge("missing").await.unwrap_err();
        let status = err
            .downcast_ref::<khwopacoder_client::error::Status>()
            .unwrap();
        assert_eq!(status.status_code, StatusCode::NOT_FOUND);
        mock.assert();
        Ok(())
    }
}

mod submissions {
    use httpmock::{Method::GET, Method::POST, MockServer};
    use khwopacoder_client::api::Client;
    use khwopacoder_client::api::types::SubmissionStatus;
    use khwopacoder_client::api::types::request::{SubmissionRequest, SubmissionsRequest};
    use reqwest::StatusCode;
    use serde_json::json;

    fn submission(status: &str) -> serde_json::Value {
        json!({
            "id": "s1",
            "user_id": "u1",
            "challenge_id": "c1",
            "code": "print(1)",
            "language": "python",
            "status": status,
            "runtime": 12,
            "memory": 2048,
            "created_at": "2025-02-01 09:00:00"
        })
    }

    #[tokio::test]
    async fn submit_posts_code() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        let mock = server.mock(|when, then| {
            when.method(POST).path("/submissions").json_body(json!({
                "challenge_id": "c1",
                "code": "print(1)",
                "language": "python"
            }));
            then.status(StatusCode::OK).json_body(submission("ACCEPTED"));
        });

        let request = SubmissionRequest::builder()
            .challenge_id("c1")
            .code("print(1)")
            .language("python")
            .build();
        let submission = client.submit(&request).await?;

        assert_eq!(submission.status, SubmissionStatus::Accepted);
        assert_eq!(submission.runtime, Some(12));
        assert!(submission.created_at.is_some());
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn filtered_listing_and_unknown_verdict() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/submissions")
                .query_param("challenge_id", "c1")
                .query_param("status", "WRONG_ANSWER");
            then.status(StatusCode::OK)
                .json_body(json!([submission("WRONG_ANSWER"), submission("OUTPUT_LIMIT")]));
        });

        let request = SubmissionsRequest::builder()
            .challenge_id("c1")
            .status(SubmissionStatus::WrongAnswer)
            .build();
        let submissions = client.submissions(&request).await?;

        assert_eq!(submissions[0].status, SubmissionStatus::WrongAnswer);
        assert_eq!(
            submissions[1].status,
            SubmissionStatus::Unknown("OUTPUT_LIMIT".to_owned())
        );
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn per_challenge_path() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        let mock = server.mock(|when, then| {
            when.method(GET).path("/submissions/challenge/c1");
            then.status(StatusCode::OK).json_body(json!([]));
        });

        assert!(client.challenge_submissions("c1").await?.is_empty());
        mock.assert();
        Ok(())
    }
}

mod leaderboard {
    use httpmock::{Method::GET, MockServer};
    use khwopacoder_client::api::Client;
    use khwopacoder_client::api::types::RankPeriod;
    use khwopacoder_client::api::types::request::{RankRequest, TopPerformersRequest};
    use reqwest::StatusCode;
    use serde_json::json;

    fn ranked(rank: i64, percentile: Option<f64>) -> serde_json::Value {
        json!({
            "id": format!("u{rank}"),
            "rank": rank,
            "name": "Sita",
            "batch": "2022",
            "points": 300 - rank,
            "solved": 12,
            "badges": 2,
            "percentile": percentile
        })
    }

    #[tokio::test]
    async fn top_performers_with_limit() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/leaderboard/top")
                .query_param("limit", "2");
            then.status(StatusCode::OK)
                .json_body(json!([ranked(1, None), ranked(2, None)]));
        });

        let request = TopPerformersRequest::builder().limit(2).build();
        let top = client.top_performers(&request).await?;

        assert_eq!(top.len(), 2);
        assert_eq!(top[1].rank, 2);
        assert_eq!(top[0].badges, 2);
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn my_rank_for_period() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/leaderboard/me")
                .query_param("period", "weekly");
            then.status(StatusCode::OK).json_body(ranked(7, Some(92.5)));
        });

        let request = RankRequest::builder().period(RankPeriod::Weekly).build();
        let rank = client.my_rank(&request).await?;

        assert_eq!(rank.rank, 7);
        assert_eq!(rank.percentile, Some(92.5));
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn batch_path() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        let mock = server.mock(|when, then| {
            when.method(GET).path("/leaderboard/batch/2021");
            then.status(StatusCode::OK).json_body(json!([]));
        });

        assert!(client.batch_leaderboard("2021").await?.is_empty());
        mock.assert();
        Ok(())
    }
}

mod users {
    use httpmock::{Method::PUT, MockServer};
    use khwopacoder_client::api::Client;
    use khwopacoder_client::api::types::request::{SettingsUpdateRequest, UserUpdateRequest};
    use reqwest::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn partial_profile_update() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/users/me")
                .json_body(json!({"github": "https://github.com/hari"}));
            then.status(StatusCode::OK).json_body(json!({
                "id": "u3",
                "email": "hari@khwopa.edu.np",
                "name": "Hari",
                "batch": "2023",
                "github": "https://github.com/hari",
                "shoe_size": 44
            }));
        });

        let request = UserUpdateRequest::builder()
            .github("https://github.com/hari")
            .build();
        let user = client.update_me(&request).await?;

        assert_eq!(user.github.as_deref(), Some("https://github.com/hari"));
        assert_eq!(user.streak, 0);
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn settings_update_sends_only_changes() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/users/me/settings")
                .json_body(json!({"compact_view": true}));
            then.status(StatusCode::OK).json_body(json!({
                "email_notifications": true,
                "achievement_notifications": true,
                "weekly_digest": true,
                "dark_mode": false,
                "compact_view": true
            }));
        });

        let request = SettingsUpdateRequest::builder().compact_view(true).build();
        let settings = client.update_settings(&request).await?;

        assert!(settings.compact_view);
        mock.assert();
        Ok(())
    }
}

mod activities {
    use httpmock::{Method::GET, MockServer};
    use khwopacoder_client::api::Client;
    use khwopacoder_client::api::types::ActivityType;
    use reqwest::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn recent_activities_and_badges() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        let activities = server.mock(|when, then| {
            when.method(GET).path("/activities/recent");
            then.status(StatusCode::OK).json_body(json!([{
                "id": "a1",
                "user_id": "u1",
                "type": "BADGE_EARNED",
                "title": "Earned First Blood",
                "description": "Solved a first challenge",
                "metadata": "{\"badge_id\":\"b1\"}",
                "created_at": "2025-02-01T09:00:00.5+00:00",
                "user_name": "Ram"
            }]));
        });
        let badges = server.mock(|when, then| {
            when.method(GET).path("/badges/me");
            then.status(StatusCode::OK).json_body(json!([{
                "id": "b1",
                "name": "First Blood",
                "description": "Solve your first challenge",
                "icon": "droplet",
                "color": "red",
                "criteria": "{\"solved\":1}",
                "earned": true,
                "earned_at": "2025-02-01T09:00:00",
                "progress": 1,
                "total": 1
            }]));
        });

        let recent = client.recent_activities().await?;
        assert_eq!(recent[0].activity_type, ActivityType::BadgeEarned);
        assert_eq!(recent[0].user_name.as_deref(), Some("Ram"));

        let mine = client.my_badges().await?;
        assert!(mine[0].earned);
        assert_eq!(mine[0].progress, mine[0].total);

        activities.assert();
        badges.assert();
        Ok(())
    }
}
