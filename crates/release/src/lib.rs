//! Publish CI kernel builds as GitHub-style releases.
//!
//! This crate holds the platform-independent half of `lastci`: it turns a
//! build directory into one tagged release with generated notes, and prunes
//! old CI releases beyond a retention count. Remote calls go through the
//! [`ReleasePlatform`] trait, implemented for GitHub in `lastci-github`.
//!
//! # Architecture
//!
//! - [`config`] - build description ([`ReleaseConfig`], [`FeatureFlags`])
//! - [`context`] - CI-supplied values ([`ExecutionContext`])
//! - [`notes`] - tag, title and release body rendering
//! - [`artifact`] - build directory scanning
//! - [`platform`] - the remote seam
//! - [`publisher`] - create release and upload assets (hard failures)
//! - [`pruner`] - delete old CI releases (soft failures)
//!
//! # Example
//!
//! ```rust,ignore
//! use lastci_release::{ExecutionContext, ReleaseConfig, ReleasePublisher, ReleasePruner};
//!
//! let config = ReleaseConfig::new(token, "out").with_arch("arm64");
//! let ctx = ExecutionContext::from_env();
//! let published = ReleasePublisher::new(&platform).publish(&config, &ctx).await?;
//! let outcome = ReleasePruner::new(&platform).cleanup(&config.token, 5).await;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod artifact;
pub mod config;
pub mod context;
pub mod error;
pub mod notes;
pub mod platform;
pub mod publisher;
pub mod pruner;
pub mod test_utils;

// Re-export main types
pub use artifact::{CandidateFile, collect_candidates};
pub use config::{DryRun, FeatureFlags, ReleaseConfig};
pub use context::ExecutionContext;
pub use error::{Error, Result};
pub use notes::{TAG_PREFIX, tag_name};
pub use platform::{CreatedRelease, NewRelease, ReleasePlatform, ReleaseSummary};
pub use publisher::{PublishedRelease, ReleasePublisher};
pub use pruner::{CleanupOutcome, ReleasePruner};
