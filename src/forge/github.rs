//! forge::github
//!
//! GitHub forge implementation using the REST API.
//!
//! # Design
//!
//! Releases are listed with `GET /repos/{owner}/{repo}/releases`, following
//! `page` until a short page comes back, and deleted by numeric id with
//! `DELETE /repos/{owner}/{repo}/releases/{id}`.
//!
//! # Rate Limiting
//!
//! Returns `ForgeError::RateLimited` when limits are hit. No automatic
//! retry; every request is attempted once.
//!
//! # Example
//!
//! ```ignore
//! use resetit::forge::github::GitHubForge;
//! use resetit::forge::Forge;
//! use std::time::Duration;
//!
//! let forge = GitHubForge::new("ghp_xxx", "octocat", "hello-world", Duration::from_secs(30))?;
//! for release in forge.list_releases().await? {
//!     println!("{}", release);
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use super::traits::{Forge, ForgeError, Release};

/// Default GitHub API base URL.
const DEFAULT_API_BASE: &str = "https://api.github.com";

/// User-Agent header value for API requests.
pub(crate) const USER_AGENT_VALUE: &str = concat!("resetit/", env!("CARGO_PKG_VERSION"));

/// GitHub's maximum page size.
const PER_PAGE: usize = 100;

/// GitHub forge implementation.
pub struct GitHubForge {
    /// HTTP client for making requests
    client: Client,
    /// Personal access token
    token: String,
    /// Repository owner (user or organization)
    owner: String,
    /// Repository name
    repo: String,
    /// API base URL (configurable for GitHub Enterprise and tests)
    api_base: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitHubForge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubForge")
            .field("has_token", &!self.token.is_empty())
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GitHubForge {
    /// Create a new GitHub forge.
    ///
    /// # Arguments
    ///
    /// * `token` - Personal access token
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `timeout` - Per-request timeout
    ///
    /// # Errors
    ///
    /// Returns `ForgeError::InvalidConfig` if the HTTP client cannot be built.
    pub fn new(
        token: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ForgeError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ForgeError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client,
            token: token.into(),
            owner: owner.into(),
            repo: repo.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        })
    }

    /// Use a custom API base URL (e.g., `https://github.example.com/api/v3`).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Get the repository owner.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Get the repository name.
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Get the API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Build common headers for API requests.
    fn headers(&self) -> Result<HeaderMap, ForgeError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", self.token)).map_err(|_| {
            ForgeError::InvalidConfig("access token is not a valid header value".into())
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        Ok(headers)
    }

    /// Build URL for a repository endpoint.
    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_base, self.owner, self.repo, path
        )
    }

    /// Handle API response, mapping errors appropriately.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: Response,
    ) -> Result<T, ForgeError> {
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("Failed to parse response: {}", e),
            })
        } else {
            Err(self.error_from_response(response, status).await)
        }
    }

    /// Map an error response from the API.
    async fn error_from_response(&self, response: Response, status: StatusCode) -> ForgeError {
        // GitHub Apps report the fine-grained permission a request needed
        let required_permissions = response
            .headers()
            .get("X-Accepted-GitHub-Permissions")
            .and_then(|v| v.to_str().ok())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        let message = match response.json::<GitHubErrorResponse>().await {
            Ok(err) => err.message,
            Err(_) => "Unknown error".to_string(),
        };

        match status {
            StatusCode::UNAUTHORIZED => ForgeError::AuthFailed("Invalid or expired token".into()),
            StatusCode::FORBIDDEN => {
                let mut err_msg = format!("Permission denied: {}", message);
                if let Some(perms) = required_permissions {
                    err_msg.push_str(&format!(" [required: {}]", perms));
                }
                ForgeError::AuthFailed(err_msg)
            }
            StatusCode::NOT_FOUND => ForgeError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => ForgeError::RateLimited,
            _ if status.is_server_error() => ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("GitHub server error: {}", message),
            },
            _ => ForgeError::ApiError {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl Forge for GitHubForge {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn list_releases(&self) -> Result<Vec<Release>, ForgeError> {
        let mut releases = Vec::new();
        let mut page: u32 = 1;

        loop {
            let url = self.repo_url(&format!("releases?per_page={}&page={}", PER_PAGE, page));

            let response = self
                .client
                .get(&url)
                .headers(self.headers()?)
                .send()
                .await
                .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

            let page_releases: Vec<GitHubRelease> = self.handle_response(response).await?;
            let page_count = page_releases.len();
            releases.extend(page_releases.into_iter().map(Release::from));

            if page_count < PER_PAGE {
                break;
            }
            page += 1;
        }

        Ok(releases)
    }

    async fn delete_release(&self, release: &Release) -> Result<(), ForgeError> {
        let id = release
            .id
            .ok_or_else(|| ForgeError::MissingReleaseId(release.tag_name.clone()))?;
        let url = self.repo_url(&format!("releases/{}", id));

        let response = self
            .client
            .delete(&url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.error_from_response(response, status).await)
        }
    }
}

// --------------------------------------------------------------------------
// API Response Types
// --------------------------------------------------------------------------

/// GitHub error response format.
#[derive(Deserialize)]
struct GitHubErrorResponse {
    message: String,
}

/// GitHub release response format (subset).
#[derive(Deserialize)]
struct GitHubRelease {
    id: u64,
    name: Option<String>,
    tag_name: String,
}

impl From<GitHubRelease> for Release {
    fn from(gh: GitHubRelease) -> Self {
        Release {
            id: Some(gh.id),
            name: gh.name.unwrap_or_default(),
            tag_name: gh.tag_name,
        }
    }
}
