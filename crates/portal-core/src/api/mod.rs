//! HTTP client for the school API.
//!
//! Each call makes exactly one attempt. Failures never escape as panics or
//! transport errors: they come back as an [`ApiError`] whose message is safe
//! to show to the user.

mod error;
pub mod types;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
pub use error::{ApiError, ApiErrorKind, ApiResult};
pub use types::{
    DEFAULT_COLOR, DashboardPayload, DashboardResponse, LoginRequest, LoginResponse, OTP_LENGTH,
    OtpRequest, OtpResponse, StudentCounts, ThemeColor, UserProfile, format_rupees,
};

/// Default base URL of the school API.
pub const DEFAULT_BASE_URL: &str = "https://aapsuj.accevate.co/flutter-api";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV_VAR: &str = "PORTAL_BASE_URL";

/// Standard User-Agent header for Portal API requests.
pub const USER_AGENT: &str = concat!("portal/", env!("CARGO_PKG_VERSION"));

const LOGIN_PATH: &str = "login.php";
const VERIFY_OTP_PATH: &str = "verify_otp.php";
const DASHBOARD_PATH: &str = "dashboard.php";

const LOGIN_FALLBACK: &str = "Login failed";
const VERIFY_OTP_FALLBACK: &str = "OTP verification failed";
const DASHBOARD_FALLBACK: &str = "Failed to load dashboard";

/// Resolves the base URL with precedence: env > config > default.
///
/// # Errors
/// Returns an error if the selected URL does not parse.
pub fn resolve_base_url(config_base_url: Option<&str>) -> Result<String> {
    if let Ok(env_url) = std::env::var(BASE_URL_ENV_VAR) {
        let trimmed = env_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.to_string());
        }
    }

    if let Some(config_url) = config_base_url {
        let trimmed = config_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.to_string());
        }
    }

    Ok(DEFAULT_BASE_URL.to_string())
}

/// Like [`resolve_base_url`], with an explicit override (e.g. a CLI flag) taking precedence.
///
/// # Errors
/// Returns an error if the selected URL does not parse.
pub fn resolve_base_url_with_override(
    override_url: Option<&str>,
    config_base_url: Option<&str>,
) -> Result<String> {
    if let Some(url) = override_url.map(str::trim).filter(|u| !u.is_empty()) {
        validate_url(url)?;
        return Ok(url.to_string());
    }
    resolve_base_url(config_base_url)
}

fn validate_url(url: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid API base URL: {url}"))?;
    Ok(())
}

/// Client for the three school API calls.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Creates a client for `base_url`.
    ///
    /// # Panics
    /// - In test builds (`#[cfg(test)]`), panics if `base_url` is the production API.
    /// - At runtime, panics if `PORTAL_BLOCK_REAL_API=1` and `base_url` is the production API.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        #[cfg(test)]
        if base_url == DEFAULT_BASE_URL {
            panic!(
                "Tests must not use the production school API!\n\
                 Point the client at a mock server (e.g., wiremock).\n\
                 Found base_url: {base_url}"
            );
        }

        #[cfg(not(test))]
        if std::env::var("PORTAL_BLOCK_REAL_API").is_ok_and(|v| v == "1")
            && base_url == DEFAULT_BASE_URL
        {
            panic!(
                "PORTAL_BLOCK_REAL_API=1 but trying to use the production school API!\n\
                 Set PORTAL_BASE_URL to a mock server.\n\
                 Found base_url: {base_url}"
            );
        }

        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submits user id and password.
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        tracing::debug!(userid = %request.userid, "login request");
        self.post(LOGIN_PATH, request, None, LOGIN_FALLBACK).await
    }

    /// Submits the one-time passcode for `request.userid`.
    pub async fn verify_otp(&self, request: &OtpRequest) -> ApiResult<OtpResponse> {
        tracing::debug!(userid = %request.userid, "verify otp request");
        self.post(VERIFY_OTP_PATH, request, None, VERIFY_OTP_FALLBACK)
            .await
    }

    /// Fetches the dashboard snapshot with `token` as bearer credential.
    pub async fn fetch_dashboard(&self, token: &str) -> ApiResult<DashboardResponse> {
        tracing::debug!("dashboard request");
        self.post(
            DASHBOARD_PATH,
            &serde_json::json!({}),
            Some(token),
            DASHBOARD_FALLBACK,
        )
        .await
    }

    async fn post<B, T>(
        &self,
        path: &str,
        body: &B,
        bearer: Option<&str>,
        fallback: &str,
    ) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{path}", self.base_url);
        let mut builder = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .header("accept", "application/json")
            .header("user-agent", USER_AGENT)
            .json(body);
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(%url, error = %e, "request failed");
            ApiError::transport(fallback, &e)
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            tracing::warn!(%url, error = %e, "failed to read response body");
            ApiError::transport(fallback, &e)
        })?;

        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "request rejected");
            return Err(ApiError::http_status(status.as_u16(), &text, fallback));
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::warn!(%url, error = %e, "malformed response");
            ApiError::malformed(fallback, e)
        })
    }
}
