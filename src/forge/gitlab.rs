//! forge::gitlab
//!
//! GitLab forge implementation using the REST API (v4).
//!
//! # Design
//!
//! GitLab addresses a project by its full path (`group/subgroup/project`),
//! URL-encoded as a single path segment, and keys releases by tag name
//! rather than by a synthetic id:
//!
//! - `GET  {base}/api/v4/projects/{path}/releases?per_page=100&page=N`
//! - `DELETE {base}/api/v4/projects/{path}/releases/{tag}`
//!
//! The base URL defaults to `https://gitlab.com` and can point at a
//! self-managed instance.
//!
//! # Example
//!
//! ```ignore
//! use resetit::forge::gitlab::GitLabForge;
//! use resetit::forge::Forge;
//! use std::time::Duration;
//!
//! let forge = GitLabForge::new("glpat-xxx", "https://gitlab.example.com", "team/sub/proj", Duration::from_secs(30))?;
//! let releases = forge.list_releases().await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;

use super::github::USER_AGENT_VALUE;
use super::traits::{Forge, ForgeError, Release};

/// GitLab's maximum page size.
const PER_PAGE: usize = 100;

/// GitLab forge implementation.
pub struct GitLabForge {
    /// HTTP client for making requests
    client: Client,
    /// Personal access token
    token: String,
    /// API root, e.g. `https://gitlab.com/api/v4`
    api_base: Url,
    /// Full project path (`group/.../project`)
    project_path: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitLabForge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitLabForge")
            .field("has_token", &!self.token.is_empty())
            .field("api_base", &self.api_base.as_str())
            .field("project_path", &self.project_path)
            .finish()
    }
}

impl GitLabForge {
    /// Create a new GitLab forge.
    ///
    /// # Arguments
    ///
    /// * `token` - Personal access token
    /// * `base_url` - Instance URL, e.g. `https://gitlab.com`
    /// * `project_path` - Full project path, e.g. `group/subgroup/project`
    /// * `timeout` - Per-request timeout
    ///
    /// # Errors
    ///
    /// Returns `ForgeError::InvalidConfig` if the base URL cannot be parsed
    /// or the HTTP client cannot be built.
    pub fn new(
        token: impl Into<String>,
        base_url: &str,
        project_path: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ForgeError> {
        let api_base = api_base_for(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ForgeError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client,
            token: token.into(),
            api_base,
            project_path: project_path.into(),
        })
    }

    /// Get the full project path.
    pub fn project_path(&self) -> &str {
        &self.project_path
    }

    /// Get the API base URL.
    pub fn api_base(&self) -> &str {
        self.api_base.as_str()
    }

    /// Build common headers for API requests.
    fn headers(&self) -> Result<HeaderMap, ForgeError> {
        let mut token = HeaderValue::from_str(&self.token).map_err(|_| {
            ForgeError::InvalidConfig("access token is not a valid header value".into())
        })?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("PRIVATE-TOKEN", token);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        Ok(headers)
    }

    /// Build URL for `projects/{path}/releases[/{segments}]`.
    ///
    /// Every segment is percent-encoded, so `/` inside the project path or
    /// a tag name becomes `%2F`.
    fn releases_url(&self, segments: &[&str]) -> Result<Url, ForgeError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| ForgeError::InvalidConfig("base URL cannot hold a path".into()))?
            .pop_if_empty()
            .push("projects")
            .push(&self.project_path)
            .push("releases")
            .extend(segments);
        Ok(url)
    }

    /// Decode a successful response, or map the error status.
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
        let message = match response.json::<GitLabErrorResponse>().await {
            Ok(err) => err.into_message(),
            Err(_) => "Unknown error".to_string(),
        };

        match status {
            StatusCode::UNAUTHORIZED => ForgeError::AuthFailed("Invalid or expired token".into()),
            StatusCode::FORBIDDEN => ForgeError::AuthFailed(format!("Permission denied: {}", message)),
            StatusCode::NOT_FOUND => ForgeError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => ForgeError::RateLimited,
            _ if status.is_server_error() => ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("GitLab server error: {}", message),
            },
            _ => ForgeError::ApiError {
                status: status.as_u16(),
                message,
            },
        }
    }
}

/// Derive the v4 API root from an instance URL.
fn api_base_for(base_url: &str) -> Result<Url, ForgeError> {
    let mut url = Url::parse(base_url.trim_end_matches('/'))
        .map_err(|e| ForgeError::InvalidConfig(format!("invalid GitLab URL '{}': {}", base_url, e)))?;
    url.path_segments_mut()
        .map_err(|_| ForgeError::InvalidConfig(format!("invalid GitLab URL '{}'", base_url)))?
        .pop_if_empty()
        .extend(["api", "v4"]);
    Ok(url)
}

#[async_trait]
impl Forge for GitLabForge {
    fn name(&self) -> &'static str {
        "gitlab"
    }

    async fn list_releases(&self) -> Result<Vec<Release>, ForgeError> {
        let mut releases = Vec::new();
        let mut page: u32 = 1;

        loop {
            let mut url = self.releases_url(&[])?;
            url.query_pairs_mut()
                .append_pair("per_page", &PER_PAGE.to_string())
                .append_pair("page", &page.to_string());

            let response = self
                .client
                .get(url)
                .headers(self.headers()?)
                .send()
                .await
                .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

            let page_releases: Vec<GitLabRelease> = self.handle_response(response).await?;
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
        if release.tag_name.is_empty() {
            return Err(ForgeError::MissingReleaseId(release.display_name().to_string()));
        }
        let url = self.releases_url(&[release.tag_name.as_str()])?;

        let response = self
            .client
            .delete(url)
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

/// GitLab error response format; either key may be present.
#[derive(Deserialize)]
struct GitLabErrorResponse {
    message: Option<serde_json::Value>,
    error: Option<String>,
}

impl GitLabErrorResponse {
    fn into_message(self) -> String {
        match (self.message, self.error) {
            (Some(serde_json::Value::String(s)), _) => s,
            (Some(other), _) => other.to_string(),
            (None, Some(error)) => error,
            (None, None) => "Unknown error".to_string(),
        }
    }
}

/// GitLab release response format (subset).
#[derive(Deserialize)]
struct GitLabRelease {
    name: Option<String>,
    tag_name: String,
}

impl From<GitLabRelease> for Release {
    fn from(gl: GitLabRelease) -> Self {
        Release {
            id: None,
            name: gl.name.unwrap_or_default(),
            tag_name: gl.tag_name,
        }
    }
}
