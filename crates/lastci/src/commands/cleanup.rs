//! `lastci cleanup` - prune old CI releases.
//!
//! Never fails: problems are reported as a warning in the returned report.

use super::{github_platform, resolve_context};
use crate::cli::CleanupArgs;
use lastci_release::{CleanupOutcome, DryRun, ExecutionContext, ReleasePlatform, ReleasePruner};
use serde::Serialize;
use std::fmt::Write;

/// Serializable summary of a cleanup run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    /// Whether cleanup ran to completion
    pub completed: bool,
    /// Tags that were deleted (or would be, in a dry run)
    pub deleted: Vec<String>,
    /// Why cleanup stopped early, if it did
    pub warning: Option<String>,
    /// Whether this was a dry run
    pub dry_run: bool,
}

impl CleanupReport {
    /// Build a report from a pruner outcome.
    #[must_use]
    pub fn from_outcome(outcome: &CleanupOutcome, dry_run: DryRun) -> Self {
        Self {
            completed: outcome.is_completed(),
            deleted: outcome.deleted().to_vec(),
            warning: outcome.cause().map(ToString::to_string),
            dry_run: dry_run.is_dry_run(),
        }
    }

    /// Human-readable rendering.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let verb = if self.dry_run { "Would delete" } else { "Deleted" };
        let _ = write!(out, "{verb} {} old release(s)", self.deleted.len());
        for tag in &self.deleted {
            let _ = write!(out, "\n  - {tag}");
        }
        if let Some(warning) = &self.warning {
            let _ = write!(out, "\nwarning: cleanup stopped early: {warning}");
        }
        out
    }
}

/// Run the pruner against an existing platform.
pub async fn run_cleanup(
    platform: &dyn ReleasePlatform,
    token: &str,
    keep: usize,
    dry_run: DryRun,
) -> CleanupReport {
    let outcome = ReleasePruner::new(platform)
        .with_dry_run(dry_run)
        .cleanup(token, keep)
        .await;
    CleanupReport::from_outcome(&outcome, dry_run)
}

/// Execute the `cleanup` command.
pub async fn execute_cleanup(args: &CleanupArgs, env_ctx: ExecutionContext) -> CleanupReport {
    let dry_run = DryRun::from(args.repo.dry_run);

    let platform = resolve_context(env_ctx, args.repo.repo.as_deref())
        .map_err(|e| e.to_string())
        .and_then(|ctx| github_platform(&args.repo, &ctx).map_err(|e| e.to_string()));

    match platform {
        Ok(platform) => run_cleanup(&platform, &args.repo.token, args.keep, dry_run).await,
        Err(warning) => {
            tracing::warn!(error = %warning, "Skipping release cleanup");
            CleanupReport {
                completed: false,
                deleted: Vec::new(),
                warning: Some(warning),
                dry_run: dry_run.is_dry_run(),
            }
        }
    }
}
