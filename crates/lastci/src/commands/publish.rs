//! `lastci publish` - create a release and upload the build directory.

use super::cleanup::{CleanupReport, run_cleanup};
use super::{github_platform, resolve_context};
use crate::cli::{CliError, PublishArgs};
use lastci_release::{
    DryRun, ExecutionContext, FeatureFlags, PublishedRelease, ReleaseConfig, ReleasePublisher,
};
use serde::Serialize;
use std::fmt::Write;
use tracing::instrument;

/// Result of the `publish` command.
#[derive(Debug, Clone, Serialize)]
pub struct PublishOutput {
    /// The created release
    pub release: PublishedRelease,
    /// Cleanup that ran afterwards, if `--keep` was given
    pub cleanup: Option<CleanupReport>,
}

impl PublishOutput {
    /// Human-readable rendering.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.release.dry_run {
            let _ = write!(out, "Would publish release {}", self.release.tag);
        } else {
            let _ = write!(out, "Published release {}", self.release.tag);
            let _ = write!(out, "\n  URL: {}", self.release.url);
        }
        let _ = write!(out, "\n  Assets: {}", self.release.assets.join(", "));
        if let Some(cleanup) = &self.cleanup {
            let _ = write!(out, "\n{}", cleanup.render());
        }
        out
    }
}

/// Build the release configuration from command-line arguments.
#[must_use]
pub fn release_config(args: &PublishArgs) -> ReleaseConfig {
    ReleaseConfig::new(args.repo.token.clone(), args.dir.clone())
        .with_source(args.kernel_url.clone(), args.kernel_branch.clone())
        .with_config_name(args.config_name.clone())
        .with_arch(args.arch.clone())
        .with_features(FeatureFlags {
            kernelsu: args.kernelsu,
            susfs: args.susfs,
            lxc: args.lxc,
            bbr: args.bbr,
            kpm: args.kpm,
        })
}

/// Execute the `publish` command.
///
/// # Errors
///
/// Returns an error if inputs are missing, the build directory is empty, or
/// GitHub rejects the release or an upload. A failing `--keep` cleanup is
/// reported in the output, not as an error.
#[instrument(name = "publish", skip_all, fields(dir = %args.dir.display()))]
pub async fn execute_publish(
    args: &PublishArgs,
    env_ctx: ExecutionContext,
) -> Result<PublishOutput, CliError> {
    let config = release_config(args);
    if !config.has_token() {
        return Err(lastci_release::Error::MissingToken.into());
    }

    let mut ctx = resolve_context(env_ctx, args.repo.repo.as_deref())?;
    if let Some(sha) = &args.sha {
        ctx.sha.clone_from(sha);
    }

    let dry_run = DryRun::from(args.repo.dry_run);
    let platform = github_platform(&args.repo, &ctx)?;

    let release = ReleasePublisher::new(&platform)
        .with_dry_run(dry_run)
        .publish(&config, &ctx)
        .await?;

    let cleanup = match args.keep {
        Some(keep) => Some(run_cleanup(&platform, &config.token, keep, dry_run).await),
        None => None,
    };

    Ok(PublishOutput { release, cleanup })
}
