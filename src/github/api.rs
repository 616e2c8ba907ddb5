//! GitHub repository-description endpoint client.
//!
//! Thin wrapper over `GET https://api.github.com/repos/{owner}/{repo}`.
//! The request carries the actor's token when one is supplied and nothing
//! otherwise; anonymous requests draw on the shared unauthenticated rate
//! budget, which is why the resolver treats them carefully.

use crate::types::{Owner, Repo};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = "ghmeta";

/// Errors from the description endpoint.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The repository does not exist, or is invisible to these credentials.
    #[error("repository not found")]
    NotFound,
    /// The rate budget for these credentials is exhausted.
    #[error("rate limited")]
    RateLimited,
    /// Any other non-2xx answer. Retryable per standard policy.
    #[error("github api returned status {0}")]
    Status(u16),
    /// The endpoint could not be reached.
    #[error("transport error: {0}")]
    Transport(String),
    /// A 200 answer whose body did not decode. Fatal, never retried.
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Owner sub-object of a repository description.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct OwnerPayload {
    pub id: i64,
}

/// The fields of a repository description we consume. Everything beyond
/// `private` and the identity fields is passed through to the record
/// unmodified.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RepoPayload {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    pub owner: OwnerPayload,
    pub clone_url: String,
    pub private: bool,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub language: Option<String>,
}

/// The repository-description collaborator, seam for tests.
pub trait RepoHost: Send + Sync {
    /// Describe `owner/repo`, authenticating with `token` when given.
    fn describe(
        &self,
        owner: &Owner,
        repo: &Repo,
        token: Option<&str>,
    ) -> Result<RepoPayload, ApiError>;
}

/// Production [`RepoHost`] backed by the GitHub REST API over `ureq`.
pub struct GithubApi {
    agent: ureq::Agent,
    base_url: String,
}

impl Default for GithubApi {
    fn default() -> Self {
        Self::new()
    }
}

impl GithubApi {
    pub fn new() -> Self {
        Self {
            agent: ureq::builder().timeout(Duration::from_secs(10)).build(),
            base_url: API_BASE.to_string(),
        }
    }
}

impl RepoHost for GithubApi {
    fn describe(
        &self,
        owner: &Owner,
        repo: &Repo,
        token: Option<&str>,
    ) -> Result<RepoPayload, ApiError> {
        let url = format!("{}/repos/{}/{}", self.base_url, owner, repo);

        let mut request = self
            .agent
            .get(&url)
            .set("User-Agent", USER_AGENT)
            .set("Accept", "application/vnd.github.v3+json");
        if let Some(token) = token {
            request = request.set("Authorization", &format!("token {}", token));
        }

        match request.call() {
            Ok(response) => {
                let body = response
                    .into_string()
                    .map_err(|e| ApiError::Transport(e.to_string()))?;
                serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
            }
            Err(ureq::Error::Status(404, _)) => Err(ApiError::NotFound),
            Err(ureq::Error::Status(429, _)) => Err(ApiError::RateLimited),
            Err(ureq::Error::Status(403, response)) => {
                // GitHub signals an exhausted budget as 403 with a zeroed
                // remaining-quota header. Any other 403 is an ordinary
                // upstream rejection.
                if response.header("X-RateLimit-Remaining") == Some("0") {
                    Err(ApiError::RateLimited)
                } else {
                    Err(ApiError::Status(403))
                }
            }
            Err(ureq::Error::Status(code, _)) => Err(ApiError::Status(code)),
            Err(ureq::Error::Transport(e)) => Err(ApiError::Transport(e.to_string())),
        }
    }
}
