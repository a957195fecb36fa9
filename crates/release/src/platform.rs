//! Hosting platform seam.
//!
//! This module defines the [`ReleasePlatform`] trait that provider crates
//! implement to talk to a source-hosting service.
//!
//! # Architecture
//!
//! The release crate provides:
//! - [`ReleasePlatform`] trait - the remote operations the publisher and
//!   pruner need
//! - [`NewRelease`], [`CreatedRelease`], [`ReleaseSummary`] - the data that
//!   crosses the seam
//!
//! Provider crates implement `ReleasePlatform`:
//! - `lastci-github` - GitHub Releases via octocrab
//!
//! Implementations are expected to report every failure as
//! [`Error::Backend`](crate::Error::Backend). Retries and rate limiting are
//! their concern; callers treat each call as atomic.

use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

/// A release to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRelease {
    /// Tag name (created by the platform if it does not exist)
    pub tag: String,
    /// Release title
    pub title: String,
    /// Release notes
    pub body: String,
    /// Mark as the repository's latest release
    pub make_latest: bool,
}

/// A release as returned by the platform after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedRelease {
    /// Platform identifier
    pub id: u64,
    /// Browser URL of the release page
    pub html_url: String,
}

/// One entry from a release listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSummary {
    /// Platform identifier
    pub id: u64,
    /// Tag the release points at
    pub tag_name: String,
    /// Creation time, if the platform reports one
    pub created_at: Option<DateTime<Utc>>,
}

impl ReleaseSummary {
    /// Creates a summary without a creation time.
    #[must_use]
    pub fn new(id: u64, tag_name: impl Into<String>) -> Self {
        Self {
            id,
            tag_name: tag_name.into(),
            created_at: None,
        }
    }

    /// Sets the creation time.
    #[must_use]
    pub const fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

/// Remote operations on a single repository's releases.
#[async_trait]
pub trait ReleasePlatform: Send + Sync {
    /// Returns the name of this platform (e.g., "GitHub").
    fn name(&self) -> &'static str;

    /// Create a release.
    async fn create_release(&self, release: &NewRelease) -> Result<CreatedRelease>;

    /// Upload one asset to an existing release.
    async fn upload_asset(&self, release_id: u64, name: &str, content: Bytes) -> Result<()>;

    /// List at most `per_page` releases (a single page, newest first as
    /// reported by the platform).
    async fn list_releases(&self, per_page: u8) -> Result<Vec<ReleaseSummary>>;

    /// Delete a release object. The tag is left in place.
    async fn delete_release(&self, release_id: u64) -> Result<()>;

    /// Delete a tag reference.
    async fn delete_tag(&self, tag: &str) -> Result<()>;
}
