//! In-memory [`ReleasePlatform`] for tests.
//!
//! [`RecordingPlatform`] records every call it receives and can be told to
//! fail a specific operation, so publisher and pruner behaviour can be
//! asserted without a network.

use crate::error::{Error, Result};
use crate::platform::{CreatedRelease, NewRelease, ReleasePlatform, ReleaseSummary};
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::{Mutex, PoisonError};

/// A call received by [`RecordingPlatform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    /// `create_release`
    CreateRelease(NewRelease),
    /// `upload_asset`
    UploadAsset {
        /// Target release
        release_id: u64,
        /// Asset name
        name: String,
        /// Payload size in bytes
        size: usize,
    },
    /// `list_releases`
    ListReleases {
        /// Requested page size
        per_page: u8,
    },
    /// `delete_release`
    DeleteRelease(u64),
    /// `delete_tag`
    DeleteTag(String),
}

/// An operation [`RecordingPlatform`] can be told to fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailOn {
    /// Fail release creation.
    CreateRelease,
    /// Fail the upload of the asset with this name.
    Upload(String),
    /// Fail the listing.
    List,
    /// Fail deleting the release with this id.
    DeleteRelease(u64),
    /// Fail deleting this tag.
    DeleteTag(String),
}

/// Recording, in-memory platform.
#[derive(Debug, Default)]
pub struct RecordingPlatform {
    releases: Vec<ReleaseSummary>,
    fail_on: Option<FailOn>,
    calls: Mutex<Vec<PlatformCall>>,
}

impl RecordingPlatform {
    /// Creates a platform with no existing releases.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the releases returned by `list_releases`.
    #[must_use]
    pub fn with_releases(mut self, releases: Vec<ReleaseSummary>) -> Self {
        self.releases = releases;
        self
    }

    /// Makes one operation fail.
    #[must_use]
    pub fn failing_on(mut self, fail_on: FailOn) -> Self {
        self.fail_on = Some(fail_on);
        self
    }

    /// All calls received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Names of uploaded assets, in upload order.
    #[must_use]
    pub fn uploaded_names(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::UploadAsset { name, .. } => Some(name),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: PlatformCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    fn check(&self, op: &FailOn) -> Result<()> {
        if self.fail_on.as_ref() == Some(op) {
            return Err(Error::backend(
                "memory",
                format!("injected failure: {op:?}"),
                None,
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ReleasePlatform for RecordingPlatform {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn create_release(&self, release: &NewRelease) -> Result<CreatedRelease> {
        self.record(PlatformCall::CreateRelease(release.clone()));
        self.check(&FailOn::CreateRelease)?;
        Ok(CreatedRelease {
            id: 1,
            html_url: format!("https://example.invalid/releases/tag/{}", release.tag),
        })
    }

    async fn upload_asset(&self, release_id: u64, name: &str, content: Bytes) -> Result<()> {
        self.record(PlatformCall::UploadAsset {
            release_id,
            name: name.to_string(),
            size: content.len(),
        });
        self.check(&FailOn::Upload(name.to_string()))
    }

    async fn list_releases(&self, per_page: u8) -> Result<Vec<ReleaseSummary>> {
        self.record(PlatformCall::ListReleases { per_page });
        self.check(&FailOn::List)?;
        Ok(self
            .releases
            .iter()
            .take(usize::from(per_page))
            .cloned()
            .collect())
    }

    async fn delete_release(&self, release_id: u64) -> Result<()> {
        self.record(PlatformCall::DeleteRelease(release_id));
        self.check(&FailOn::DeleteRelease(release_id))
    }

    async fn delete_tag(&self, tag: &str) -> Result<()> {
        self.record(PlatformCall::DeleteTag(tag.to_string()));
        self.check(&FailOn::DeleteTag(tag.to_string()))
    }
}
