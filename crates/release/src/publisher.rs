//! Release publisher.
//!
//! Creates one tagged release for the current commit and uploads every file
//! in the build directory as an asset.
//!
//! The sequence is strictly linear: validate, enumerate, create, then upload
//! one file at a time. A failure part-way through leaves whatever was already
//! created on the platform; nothing is rolled back.
//!
//! Running a publisher and a [`ReleasePruner`](crate::ReleasePruner) against
//! the same repository at the same time can race (the pruner may delete a
//! release that is still receiving assets). Callers that need both should
//! run them one after the other.

use crate::artifact::collect_candidates;
use crate::config::{DryRun, ReleaseConfig};
use crate::context::ExecutionContext;
use crate::error::{Error, Result};
use crate::notes::{release_body, release_title, tag_name};
use crate::platform::{NewRelease, ReleasePlatform};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

/// Outcome of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedRelease {
    /// Platform identifier (0 for a dry run)
    pub id: u64,
    /// Release page URL (empty for a dry run)
    pub url: String,
    /// Tag name
    pub tag: String,
    /// Uploaded asset names, in upload order
    pub assets: Vec<String>,
    /// Whether this was a dry run
    pub dry_run: bool,
}

/// Publishes a build directory as a release.
pub struct ReleasePublisher<'a> {
    platform: &'a dyn ReleasePlatform,
    dry_run: DryRun,
}

impl<'a> ReleasePublisher<'a> {
    /// Creates a publisher that talks to `platform`.
    #[must_use]
    pub fn new(platform: &'a dyn ReleasePlatform) -> Self {
        Self {
            platform,
            dry_run: DryRun::No,
        }
    }

    /// Sets the dry-run flag.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: DryRun) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Publish using the current time for the release notes.
    ///
    /// # Errors
    ///
    /// See [`ReleasePublisher::publish_at`].
    pub async fn publish(
        &self,
        config: &ReleaseConfig,
        ctx: &ExecutionContext,
    ) -> Result<PublishedRelease> {
        self.publish_at(config, ctx, Utc::now()).await
    }

    /// Publish with an explicit build timestamp.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingToken`] if the token is empty (checked first, before
    ///   touching the file system)
    /// - [`Error::MissingContext`] if the commit SHA is empty
    /// - [`Error::NoFiles`] if the build directory is missing or has no files
    /// - [`Error::Artifact`] if a file cannot be read
    /// - [`Error::Backend`] if release creation or an upload fails
    pub async fn publish_at(
        &self,
        config: &ReleaseConfig,
        ctx: &ExecutionContext,
        generated_at: DateTime<Utc>,
    ) -> Result<PublishedRelease> {
        if !config.has_token() {
            return Err(Error::MissingToken);
        }
        if ctx.sha.is_empty() {
            return Err(Error::missing_context("sha"));
        }

        let tag = tag_name(&ctx.sha);
        let new_release = NewRelease {
            tag: tag.clone(),
            title: release_title(ctx),
            body: release_body(config, ctx, generated_at),
            make_latest: true,
        };

        let candidates = collect_candidates(config.build_dir())?;
        if candidates.is_empty() {
            return Err(Error::no_files(config.build_dir()));
        }
        debug!(
            dir = %config.build_dir().display(),
            count = candidates.len(),
            "Collected release candidates"
        );

        if self.dry_run.is_dry_run() {
            let assets: Vec<String> = candidates.into_iter().map(|c| c.name).collect();
            info!(
                platform = self.platform.name(),
                tag = %tag,
                assets = ?assets,
                "Would create release and upload assets"
            );
            return Ok(PublishedRelease {
                id: 0,
                url: String::new(),
                tag,
                assets,
                dry_run: true,
            });
        }

        let created = self
            .platform
            .create_release(&new_release)
            .await
            .map_err(|e| e.context("failed to create release"))?;
        info!(
            release_id = created.id,
            url = %created.html_url,
            tag = %tag,
            "Created release"
        );

        let mut assets = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let content = candidate.read()?;
            let size = content.len();
            self.platform
                .upload_asset(created.id, &candidate.name, content)
                .await
                .map_err(|e| e.context(&format!("failed to upload {}", candidate.name)))?;
            info!(asset = %candidate.name, bytes = size, "Uploaded asset");
            assets.push(candidate.name);
        }

        Ok(PublishedRelease {
            id: created.id,
            url: created.html_url,
            tag,
            assets,
            dry_run: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FailOn, PlatformCall, RecordingPlatform};
    use tempfile::TempDir;

    const SHA: &str = "0123456789abcdef0123456789abcdef01234567";

    fn ctx() -> ExecutionContext {
        ExecutionContext::new(SHA, "octo", "kernel")
    }

    fn build_dir(files: &[&str]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for name in files {
            std::fs::write(temp.path().join(name), name.as_bytes()).unwrap();
        }
        temp
    }

    #[tokio::test]
    async fn test_empty_token_fails_before_anything() {
        let platform = RecordingPlatform::new();
        let config = ReleaseConfig::new("", "/nonexistent/path");

        let err = ReleasePublisher::new(&platform)
            .publish(&config, &ctx())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::MissingToken));
        assert!(platform.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_sha_fails() {
        let platform = RecordingPlatform::new();
        let dir = build_dir(&["Image"]);
        let config = ReleaseConfig::new("token", dir.path());

        let err = ReleasePublisher::new(&platform)
            .publish(&config, &ExecutionContext::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::MissingContext { field: "sha" }));
        assert!(platform.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_dir_is_no_files() {
        let platform = RecordingPlatform::new();
        let temp = TempDir::new().unwrap();
        let config = ReleaseConfig::new("token", temp.path().join("out"));

        let err = ReleasePublisher::new(&platform)
            .publish(&config, &ctx())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NoFiles { .. }));
        assert!(platform.calls().is_empty());
    }

    #[tokio::test]
    async fn test_dir_with_only_subdirs_is_no_files() {
        let platform = RecordingPlatform::new();
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("nested")).unwrap();
        std::fs::write(temp.path().join("nested").join("Image"), b"x").unwrap();
        let config = ReleaseConfig::new("token", temp.path());

        let err = ReleasePublisher::new(&platform)
            .publish(&config, &ctx())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NoFiles { .. }));
        assert!(platform.calls().is_empty());
    }

    #[tokio::test]
    async fn test_creates_one_release_and_uploads_each_file() {
        let platform = RecordingPlatform::new();
        let dir = build_dir(&["Image.gz", "boot.img", "dtbo.img"]);
        let config = ReleaseConfig::new("token", dir.path());

        let published = ReleasePublisher::new(&platform)
            .publish(&config, &ctx())
            .await
            .unwrap();

        let calls = platform.calls();
        let creates = calls
            .iter()
            .filter(|c| matches!(c, PlatformCall::CreateRelease(_)))
            .count();
        assert_eq!(creates, 1);
        assert!(matches!(calls[0], PlatformCall::CreateRelease(_)));
        assert_eq!(
            platform.uploaded_names(),
            vec!["Image.gz", "boot.img", "dtbo.img"]
        );
        assert_eq!(published.assets, platform.uploaded_names());
        assert_eq!(published.tag, format!("last-ci-{SHA}"));
        assert!(!published.dry_run);
    }

    #[tokio::test]
    async fn test_new_release_fields() {
        let platform = RecordingPlatform::new();
        let dir = build_dir(&["Image"]);
        let config = ReleaseConfig::new("token", dir.path()).with_config_name("gki_defconfig");

        ReleasePublisher::new(&platform)
            .publish(&config, &ctx())
            .await
            .unwrap();

        let Some(PlatformCall::CreateRelease(release)) = platform.calls().first().cloned() else {
            panic!("expected a create call first");
        };
        assert_eq!(release.tag, format!("last-ci-{SHA}"));
        assert_eq!(release.title, "Kernel CI Build (0123456)");
        assert!(release.make_latest);
        assert!(release.body.contains("Config: gki_defconfig"));
    }

    #[tokio::test]
    async fn test_uploads_target_created_release_with_file_contents() {
        let platform = RecordingPlatform::new();
        let dir = build_dir(&["boot.img"]);
        let config = ReleaseConfig::new("token", dir.path());

        ReleasePublisher::new(&platform)
            .publish(&config, &ctx())
            .await
            .unwrap();

        assert_eq!(
            platform.calls()[1],
            PlatformCall::UploadAsset {
                release_id: 1,
                name: "boot.img".to_string(),
                size: "boot.img".len(),
            }
        );
    }

    #[tokio::test]
    async fn test_create_failure_is_wrapped() {
        let platform = RecordingPlatform::new().failing_on(FailOn::CreateRelease);
        let dir = build_dir(&["Image"]);
        let config = ReleaseConfig::new("token", dir.path());

        let err = ReleasePublisher::new(&platform)
            .publish(&config, &ctx())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Backend { .. }));
        assert!(err.to_string().contains("failed to create release"));
        assert!(platform.uploaded_names().is_empty());
    }

    #[tokio::test]
    async fn test_upload_failure_stops_without_rollback() {
        let platform =
            RecordingPlatform::new().failing_on(FailOn::Upload("b.img".to_string()));
        let dir = build_dir(&["a.img", "b.img", "c.img"]);
        let config = ReleaseConfig::new("token", dir.path());

        let err = ReleasePublisher::new(&platform)
            .publish(&config, &ctx())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("failed to upload b.img"));
        // a.img stays uploaded, c.img is never attempted, nothing is deleted.
        assert_eq!(platform.uploaded_names(), vec!["a.img", "b.img"]);
        assert!(
            !platform
                .calls()
                .iter()
                .any(|c| matches!(c, PlatformCall::DeleteRelease(_) | PlatformCall::DeleteTag(_)))
        );
    }

    #[tokio::test]
    async fn test_dry_run_makes_no_calls() {
        let platform = RecordingPlatform::new();
        let dir = build_dir(&["Image", "dtbo.img"]);
        let config = ReleaseConfig::new("token", dir.path());

        let published = ReleasePublisher::new(&platform)
            .with_dry_run(DryRun::Yes)
            .publish(&config, &ctx())
            .await
            .unwrap();

        assert!(platform.calls().is_empty());
        assert!(published.dry_run);
        assert_eq!(published.assets, vec!["Image", "dtbo.img"]);
    }

    #[tokio::test]
    async fn test_dry_run_still_validates() {
        let platform = RecordingPlatform::new();
        let temp = TempDir::new().unwrap();
        let config = ReleaseConfig::new("token", temp.path());

        let err = ReleasePublisher::new(&platform)
            .with_dry_run(DryRun::Yes)
            .publish(&config, &ctx())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NoFiles { .. }));
    }
}
