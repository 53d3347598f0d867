//! Client for the KhwopaCoder HTTP API.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use khwopacoder_client::api::Client;
//! use khwopacoder_client::api::types::request::LoginRequest;
//! use khwopacoder_client::auth::MemoryStore;
//!
//! # async fn example() -> khwopacoder_client::Result<()> {
//! let client = Client::new("http://localhost:8000")?.with_store(Arc::new(MemoryStore::new()));
//!
//! let login = LoginRequest::builder()
//!     .email("student@khwopa.edu.np")
//!     .password("secret".to_owned())
//!     .build();
//! client.login(&login).await?;
//!
//! for challenge in client.challenges().await? {
//!     println!("{} ({})", challenge.title, challenge.difficulty);
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use reqwest::{
    Client as ReqwestClient, Method, RequestBuilder,
    header::{HeaderMap, HeaderValue},
};
use secrecy::{ExposeSecret as _, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::types::request::{
    LoginRequest, RandomChallengeRequest, RankRequest, RegisterRequest, SettingsUpdateRequest,
    SubmissionRequest, SubmissionsRequest, TopPerformersRequest, UserUpdateRequest,
};
use super::types::response::{
    Activity, Badge, Challenge, RankedUser, Submission, Token, User, UserSettings,
};
use crate::auth::CredentialStore;
use crate::error::Error;
use crate::{Result, ToQueryParams as _};

/// HTTP client for the KhwopaCoder API.
///
/// When a [`CredentialStore`] is attached, every request carries
/// `Authorization: Bearer <token>` while the store holds a token, and
/// [`login`](Self::login) / [`logout`](Self::logout) update it. Share the same store with
/// the real-time connection so both use the same identity.
#[derive(Clone)]
pub struct Client {
    host: Url,
    client: ReqwestClient,
    store: Option<Arc<dyn CredentialStore>>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("host", &self.host.as_str())
            .field("store", &self.store.is_some())
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new API client for `host`, e.g. `http://localhost:8000` or
    /// `https://example.com/api/`.
    pub fn new(host: &str) -> Result<Client> {
        let mut headers = HeaderMap::new();

        headers.insert("User-Agent", HeaderValue::from_static("khwopacoder_client"));
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = ReqwestClient::builder().default_headers(headers).build()?;

        let mut host = Url::parse(host)?;
        if host.cannot_be_a_base() {
            return Err(Error::validation(format!("{host} cannot be used as an API base")));
        }
        if !host.path().ends_with('/') {
            let path = format!("{}/", host.path());
            host.set_path(&path);
        }

        Ok(Self {
            host,
            client,
            store: None,
        })
    }

    /// Creates a client for the host in `KHWOPACODER_API_URL`, or the local default.
    pub fn from_env() -> Result<Client> {
        Self::new(&crate::api_url_from_env())
    }

    /// Attach the credential store used for bearer authentication.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Returns the base URL of the API.
    #[must_use]
    pub fn host(&self) -> &Url {
        &self.host
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.host.clone();
        url.path_segments_mut()
            .map_err(|()| Error::validation(format!("{} cannot be used as an API base", self.host)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn builder(&self, method: Method, url: &str) -> Result<RequestBuilder> {
        let mut builder = self.client.request(method, url);
        if let Some(token) = self.token()? {
            builder = builder.bearer_auth(token.expose_secret());
        }
        Ok(builder)
    }

    fn token(&self) -> Result<Option<SecretString>> {
        match &self.store {
            Some(store) => store.token(),
            None => Ok(None),
        }
    }

    async fn get<Req: Serialize, Res: DeserializeOwned>(
        &self,
        segments: &[&str],
        req: &Req,
    ) -> Result<Res> {
        let url = format!("{}{}", self.url(segments)?, req.query_params());
        let request = self.builder(Method::GET, &url)?.build()?;
        crate::request(&self.client, request).await
    }

    async fn send<Req: Serialize, Res: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: &Req,
    ) -> Result<Res> {
        let url = self.url(segments)?;
        let request = self.builder(method, url.as_str())?.json(body).build()?;
        crate::request(&self.client, request).await
    }

    /// Signs in and, when a store is attached, saves the returned token in it.
    pub async fn login(&self, request: &LoginRequest) -> Result<Token> {
        let token: Token = self.send(Method::POST, &["auth", "login"], request).await?;

        if let Some(store) = &self.store {
            store.set_token(Some(token.access_token.clone()))?;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(stored = self.store.is_some(), "Logged in");

        Ok(token)
    }

    /// Creates a new account. Does not sign in.
    pub async fn register(&self, request: &RegisterRequest) -> Result<User> {
        self.send(Method::POST, &["auth", "register"], request).await
    }

    /// The user the stored token belongs to.
    pub async fn me(&self) -> Result<User> {
        self.get(&["auth", "me"], &()).await
    }

    /// Forgets the stored token. The backend keeps no session, so this is local only.
    pub fn logout(&self) -> Result<()> {
        if let Some(store) = &self.store {
            store.set_token(None)?;
        }
        Ok(())
    }

    pub async fn challenges(&self) -> Result<Vec<Challenge>> {
        self.get(&["challenges"], &()).await
    }

    pub async fn challenge(&self, id: &str) -> Result<Challenge> {
        self.get(&["challenges", id], &()).await
    }

    /// A random challenge, optionally restricted to one difficulty.
    pub async fn random_challenge(&self, request: &RandomChallengeRequest) -> Result<Challenge> {
        self.get(&["challenges", "random"], request).await
    }

    /// Submits code for judging and returns the judged submission.
    pub async fn submit(&self, request: &SubmissionRequest) -> Result<Submission> {
        self.send(Method::POST, &["submissions"], request).await
    }

    pub async fn submissions(&self, request: &SubmissionsRequest) -> Result<Vec<Submission>> {
        self.get(&["submissions"], request).await
    }

    pub async fn my_submissions(&self) -> Result<Vec<Submission>> {
        self.get(&["submissions", "me"], &()).await
    }

    pub async fn submission(&self, id: &str) -> Result<Submission> {
        self.get(&["submissions", id], &()).await
    }

    pub async fn challenge_submissions(&self, challenge_id: &str) -> Result<Vec<Submission>> {
        self.get(&["submissions", "challenge", challenge_id], &())
            .await
    }

    /// All users ordered by points.
    pub async fn leaderboard(&self) -> Result<Vec<User>> {
        self.get(&["leaderboard"], &()).await
    }

    pub async fn batch_leaderboard(&self, batch: &str) -> Result<Vec<User>> {
        self.get(&["leaderboard", "batch", batch], &()).await
    }

    pub async fn top_performers(&self, request: &TopPerformersRequest) -> Result<Vec<RankedUser>> {
        self.get(&["leaderboard", "top"], request).await
    }

    /// The signed-in user's rank and percentile.
    pub async fn my_rank(&self, request: &RankRequest) -> Result<RankedUser> {
        self.get(&["leaderboard", "me"], request).await
    }

    pub async fn users(&self) -> Result<Vec<User>> {
        self.get(&["users"], &()).await
    }

    pub async fn user(&self, id: &str) -> Result<User> {
        self.get(&["users", id], &()).await
    }

    pub async fn update_me(&self, request: &UserUpdateRequest) -> Result<User> {
        self.send(Method::PUT, &["users", "me"], request).await
    }

    pub async fn settings(&self) -> Result<UserSettings> {
        self.get(&["users", "me", "settings"], &()).await
    }

    pub async fn update_settings(&self, request: &SettingsUpdateRequest) -> Result<UserSettings> {
        self.send(Method::PUT, &["users", "me", "settings"], request)
            .await
    }

    pub async fn badges(&self) -> Result<Vec<Badge>> {
        self.get(&["badges"], &()).await
    }

    /// Badges with the signed-in user's progress.
    pub async fn my_badges(&self) -> Result<Vec<Badge>> {
        self.get(&["badges", "me"], &()).await
    }

    pub async fn recent_activities(&self) -> Result<Vec<Activity>> {
        self.get(&["activities", "recent"], &()).await
    }

    pub async fn my_activities(&self) -> Result<Vec<Activity>> {
        self.get(&["activities", "me"], &()).await
    }
}
