//! GitHub Releases platform for lastci.
//!
//! Implements the [`ReleasePlatform`] trait on top of octocrab. Every call
//! targets a single repository; transport retries and timeouts are
//! octocrab's.

use async_trait::async_trait;
use bytes::Bytes;
use lastci_release::error::{Error, Result};
use lastci_release::platform::{CreatedRelease, NewRelease, ReleasePlatform, ReleaseSummary};
use octocrab::Octocrab;
use octocrab::params::repos::Reference;
use octocrab::repos::releases::MakeLatest;
use tracing::debug;

const BACKEND: &str = "GitHub";

/// Configuration for the GitHub Releases platform.
#[derive(Clone)]
pub struct GitHubReleaseConfig {
    /// Repository owner (e.g., "octo")
    pub owner: String,
    /// Repository name (e.g., "kernel")
    pub repo: String,
    /// GitHub token for authentication
    pub token: String,
}

impl GitHubReleaseConfig {
    /// Creates a new GitHub release configuration.
    #[must_use]
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for GitHubReleaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubReleaseConfig")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("token", &"***")
            .finish()
    }
}

/// GitHub Releases platform.
pub struct GitHubReleasePlatform {
    config: GitHubReleaseConfig,
    client: Octocrab,
}

impl GitHubReleasePlatform {
    /// Creates a platform with an authenticated octocrab client.
    ///
    /// No request is made here; an invalid token surfaces on the first call.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty, the repository is not set, or
    /// the client cannot be built.
    pub fn new(config: GitHubReleaseConfig) -> Result<Self> {
        if config.token.trim().is_empty() {
            return Err(Error::MissingToken);
        }
        if config.owner.is_empty() || config.repo.is_empty() {
            return Err(Error::missing_context("repository"));
        }

        let client = Octocrab::builder()
            .personal_token(config.token.clone())
            .build()
            .map_err(|e| backend_error(&e))?;

        Ok(Self { config, client })
    }

    /// The configured `owner/repo`.
    #[must_use]
    pub fn repository(&self) -> String {
        format!("{}/{}", self.config.owner, self.config.repo)
    }

    fn repos(&self) -> octocrab::repos::RepoHandler<'_> {
        self.client.repos(&self.config.owner, &self.config.repo)
    }
}

#[async_trait]
impl ReleasePlatform for GitHubReleasePlatform {
    fn name(&self) -> &'static str {
        BACKEND
    }

    async fn create_release(&self, release: &NewRelease) -> Result<CreatedRelease> {
        debug!(repo = %self.repository(), tag = %release.tag, "Creating GitHub release");
        let make_latest = if release.make_latest {
            MakeLatest::True
        } else {
            MakeLatest::False
        };

        let created = self
            .repos()
            .releases()
            .create(&release.tag)
            .name(&release.title)
            .body(&release.body)
            .make_latest(make_latest)
            .send()
            .await
            .map_err(|e| backend_error(&e))?;

        Ok(CreatedRelease {
            id: created.id.0,
            html_url: created.html_url.to_string(),
        })
    }

    async fn upload_asset(&self, release_id: u64, name: &str, content: Bytes) -> Result<()> {
        debug!(release_id, asset = %name, bytes = content.len(), "Uploading release asset");
        self.repos()
            .releases()
            .upload_asset(release_id, name, content)
            .send()
            .await
            .map_err(|e| backend_error(&e))?;
        Ok(())
    }

    async fn list_releases(&self, per_page: u8) -> Result<Vec<ReleaseSummary>> {
        let page = self
            .repos()
            .releases()
            .list()
            .per_page(per_page)
            .send()
            .await
            .map_err(|e| backend_error(&e))?;

        Ok(page
            .items
            .into_iter()
            .map(|r| ReleaseSummary {
                id: r.id.0,
                tag_name: r.tag_name,
                created_at: r.created_at,
            })
            .collect())
    }

    async fn delete_release(&self, release_id: u64) -> Result<()> {
        self.repos()
            .releases()
            .delete(release_id)
            .await
            .map_err(|e| backend_error(&e))
    }

    async fn delete_tag(&self, tag: &str) -> Result<()> {
        self.repos()
            .delete_ref(&Reference::Tag(tag.to_string()))
            .await
            .map_err(|e| backend_error(&e))
    }
}

/// Convert an octocrab error, attaching a hint for common GitHub failures.
fn backend_error(err: &octocrab::Error) -> Error {
    let help = match err {
        octocrab::Error::GitHub { source, .. } => help_for_message(&source.message),
        _ => None,
    };
    Error::backend(BACKEND, err.to_string(), help)
}

fn help_for_message(message: &str) -> Option<String> {
    if message.contains("Bad credentials") {
        Some("The token was rejected; check that it has not expired".to_string())
    } else if message.contains("Resource not accessible") {
        Some("The token needs `contents: write` permission on the repository".to_string())
    } else if message.contains("Not Found") {
        Some("Check the repository name and that the token can see it".to_string())
    } else if message.contains("already_exists") || message.contains("Validation Failed") {
        Some("A release or asset with this name may already exist".to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new() {
        let config = GitHubReleaseConfig::new("owner", "repo", "token");
        assert_eq!(config.owner, "owner");
        assert_eq!(config.repo, "repo");
        assert_eq!(config.token, "token");
    }

    #[test]
    fn test_config_debug_hides_token() {
        let config = GitHubReleaseConfig::new("owner", "repo", "ghp_secret");
        let debug_str = format!("{config:?}");
        assert!(debug_str.contains("owner"));
        assert!(!debug_str.contains("ghp_secret"));
    }

    #[test]
    fn test_new_rejects_empty_token() {
        let result = GitHubReleasePlatform::new(GitHubReleaseConfig::new("owner", "repo", " "));
        assert!(matches!(result, Err(Error::MissingToken)));
    }

    #[test]
    fn test_new_rejects_missing_repository() {
        let result = GitHubReleasePlatform::new(GitHubReleaseConfig::new("", "repo", "token"));
        assert!(matches!(
            result,
            Err(Error::MissingContext {
                field: "repository"
            })
        ));
    }

    #[tokio::test]
    async fn test_platform_new() {
        let platform =
            GitHubReleasePlatform::new(GitHubReleaseConfig::new("octo", "kernel", "token"))
                .unwrap();
        assert_eq!(platform.name(), "GitHub");
        assert_eq!(platform.repository(), "octo/kernel");
    }

    #[test]
    fn test_help_for_message() {
        assert!(help_for_message("Bad credentials").is_some());
        assert!(
            help_for_message("Resource not accessible by integration")
                .unwrap()
                .contains("contents: write")
        );
        assert!(help_for_message("Not Found").is_some());
        assert!(help_for_message("Validation Failed").is_some());
        assert!(help_for_message("Server Error").is_none());
    }
}
