//! Best-effort cleanup of old CI releases.
//!
//! Keeps the newest `keep_count` releases whose tag starts with
//! [`TAG_PREFIX`](crate::notes::TAG_PREFIX) and deletes the rest together
//! with their tags. Releases with any other tag are never touched.
//!
//! Cleanup never fails the caller. The first error stops the remaining
//! deletions, is logged as a warning, and is handed back inside
//! [`CleanupOutcome::Failed`].

use crate::config::DryRun;
use crate::error::{Error, Result};
use crate::notes::is_ci_tag;
use crate::platform::{ReleasePlatform, ReleaseSummary};
use std::cmp::Reverse;
use tracing::{debug, info, warn};

/// Page size of the single listing request.
pub const LIST_PAGE_SIZE: u8 = 100;

/// Result of a cleanup run.
#[derive(Debug)]
pub enum CleanupOutcome {
    /// Every selected release was deleted (or nothing needed deleting).
    Completed {
        /// Tags deleted, oldest last
        deleted: Vec<String>,
        /// Number of CI releases kept
        kept: usize,
    },
    /// Cleanup stopped early.
    Failed {
        /// Tags deleted before the failure
        deleted: Vec<String>,
        /// What went wrong
        cause: Error,
    },
}

impl CleanupOutcome {
    /// Tags that were deleted.
    #[must_use]
    pub fn deleted(&self) -> &[String] {
        match self {
            Self::Completed { deleted, .. } | Self::Failed { deleted, .. } => deleted,
        }
    }

    /// Whether the run completed without error.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// The error that stopped the run, if any.
    #[must_use]
    pub const fn cause(&self) -> Option<&Error> {
        match self {
            Self::Completed { .. } => None,
            Self::Failed { cause, .. } => Some(cause),
        }
    }
}

/// Deletes CI releases beyond a retention count.
pub struct ReleasePruner<'a> {
    platform: &'a dyn ReleasePlatform,
    dry_run: DryRun,
}

impl<'a> ReleasePruner<'a> {
    /// Creates a pruner that talks to `platform`.
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

    /// Delete all but the newest `keep_count` CI releases.
    pub async fn cleanup(&self, token: &str, keep_count: usize) -> CleanupOutcome {
        let mut deleted = Vec::new();
        match self.run(token, keep_count, &mut deleted).await {
            Ok(kept) => CleanupOutcome::Completed { deleted, kept },
            Err(cause) => {
                warn!(
                    error = %cause,
                    deleted = deleted.len(),
                    "Failed to clean up old releases"
                );
                CleanupOutcome::Failed { deleted, cause }
            }
        }
    }

    async fn run(&self, token: &str, keep_count: usize, deleted: &mut Vec<String>) -> Result<usize> {
        if token.trim().is_empty() {
            return Err(Error::MissingToken);
        }

        let releases = self.platform.list_releases(LIST_PAGE_SIZE).await?;
        let ci_releases = newest_first(
            releases
                .into_iter()
                .filter(|r| is_ci_tag(&r.tag_name))
                .collect(),
        );
        debug!(count = ci_releases.len(), keep_count, "Found CI releases");

        if ci_releases.len() <= keep_count {
            return Ok(ci_releases.len());
        }

        for release in &ci_releases[keep_count..] {
            if self.dry_run.is_dry_run() {
                info!(tag = %release.tag_name, "Would delete old release");
            } else {
                self.platform.delete_release(release.id).await?;
                self.platform.delete_tag(&release.tag_name).await?;
                info!(tag = %release.tag_name, release_id = release.id, "Deleted old release");
            }
            deleted.push(release.tag_name.clone());
        }

        Ok(keep_count)
    }
}

/// Order releases newest first.
///
/// Dated releases are sorted by creation time, descending. Undated ones
/// follow in their listing order, so a listing without timestamps is kept
/// exactly as returned.
fn newest_first(mut releases: Vec<ReleaseSummary>) -> Vec<ReleaseSummary> {
    releases.sort_by_key(|r| Reverse(r.created_at));
    releases
}
