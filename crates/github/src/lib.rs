//! GitHub provider for lastci.
//!
//! Provides [`GitHubReleasePlatform`], the octocrab-backed implementation of
//! [`lastci_release::ReleasePlatform`].

#![warn(missing_docs)]

pub mod release;

pub use release::{GitHubReleaseConfig, GitHubReleasePlatform};
