#![cfg_attr(doc, doc = include_str!("../README.md"))]

#[cfg(feature = "api")]
pub mod api;
pub mod auth;
pub mod error;
pub mod realtime;
#[cfg(feature = "api")]
pub(crate) mod serde_helpers;
pub mod ws;

#[cfg(feature = "api")]
use reqwest::{Request, StatusCode};
#[cfg(feature = "api")]
use serde::Serialize;
#[cfg(feature = "api")]
use serde::de::DeserializeOwned;

use crate::error::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Environment variable holding the backend base URL, e.g. `https://khwopacoder.example.com`
pub const API_URL_VAR: &str = "KHWOPACODER_API_URL";

/// Base URL used when [`API_URL_VAR`] is unset
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// The backend base URL from [`API_URL_VAR`], or [`DEFAULT_API_URL`] when unset or blank.
#[must_use]
pub fn api_url_from_env() -> String {
    std::env::var(API_URL_VAR)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_owned())
}

/// Trait for converting request types to URL query parameters.
///
/// This trait is automatically implemented for all types that implement [`Serialize`].
/// It uses [`serde_html_form`] to serialize the struct fields into a query string.
#[cfg(feature = "api")]
pub trait ToQueryParams: Serialize {
    /// Converts the request to a URL query string.
    ///
    /// Returns an empty string if no parameters are set, otherwise returns
    /// a string starting with `?` followed by URL-encoded key-value pairs.
    fn query_params(&self) -> String {
        let params = serde_html_form::to_string(self)
            .inspect_err(|e| {
                #[cfg(feature = "tracing")]
                tracing::error!("Unable to convert to URL-encoded string {e:?}");
                #[cfg(not(feature = "tracing"))]
                let _: &serde_html_form::ser::Error = e;
            })
            .unwrap_or_default();

        if params.is_empty() {
            String::new()
        } else {
            format!("?{params}")
        }
    }
}

#[cfg(feature = "api")]
impl<T: Serialize> ToQueryParams for T {}

#[cfg(feature = "api")]
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        level = "debug",
        skip(client, request),
        fields(
            method = %request.method(),
            path = request.url().path(),
            status_code
        )
    )
)]
async fn request<Response: DeserializeOwned>(
    client: &reqwest::Client,
    request: Request,
) -> Result<Response> {
    let method = request.method().clone();
    let path = request.url().path().to_owned();

    let response = client.execute(request).await?;
    let status_code = response.status();

    #[cfg(feature = "tracing")]
    tracing::Span::current().record("status_code", status_code.as_u16());

    if !status_code.is_success() {
        let message = response.text().await.unwrap_or_default();

        #[cfg(feature = "tracing")]
        tracing::warn!(
            status = %status_code,
            method = %method,
            path = %path,
            message = %message,
            "API request failed"
        );

        return Err(Error::status(status_code, method, path, message));
    }

    let json_value = response.json::<serde_json::Value>().await?;
    let response_data: Option<Response> = serde_helpers::deserialize_with_warnings(json_value)?;

    if let Some(response) = response_data {
        Ok(response)
    } else {
        #[cfg(feature = "tracing")]
        tracing::warn!(method = %method, path = %path, "API resource not found");
        Err(Error::status(
            StatusCode::NOT_FOUND,
            method,
            path,
            "Unable to find requested resource",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_api_url_is_local() {
        assert_eq!(DEFAULT_API_URL, "http://localhost:8000");
        assert_eq!(API_URL_VAR, "KHWOPACODER_API_URL");
        assert!(!api_url_from_env().is_empty());
    }

    #[cfg(feature = "api")]
    #[test]
    fn empty_query_params() {
        assert_eq!(().query_params(), "");
    }
}
