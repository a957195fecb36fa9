//! Command implementations.
//!
//! Each command resolves its inputs (arguments, then CI environment), builds
//! the GitHub platform, and hands off to `lastci-release`.

pub mod cleanup;
pub mod publish;

use crate::cli::{CliError, RepoArgs};
use lastci_github::{GitHubReleaseConfig, GitHubReleasePlatform};
use lastci_release::ExecutionContext;
use lastci_release::context::parse_repository;

/// Apply `--repo` on top of the environment-derived context.
///
/// # Errors
///
/// Returns a configuration error if `--repo` is not `owner/name`.
pub fn resolve_context(
    mut ctx: ExecutionContext,
    repo: Option<&str>,
) -> Result<ExecutionContext, CliError> {
    if let Some(repo) = repo {
        let (owner, name) = parse_repository(repo).ok_or_else(|| {
            CliError::config(format!("Invalid repository '{repo}'"))
                .with_help("Use the owner/name form, e.g. --repo octo/kernel")
        })?;
        ctx.owner = owner;
        ctx.repo = name;
    }
    Ok(ctx)
}

/// Build the GitHub platform for the resolved repository.
///
/// # Errors
///
/// Returns an error if the token is empty or the repository is unknown.
pub fn github_platform(
    args: &RepoArgs,
    ctx: &ExecutionContext,
) -> lastci_release::Result<GitHubReleasePlatform> {
    GitHubReleasePlatform::new(GitHubReleaseConfig::new(
        ctx.owner.clone(),
        ctx.repo.clone(),
        args.token.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_context_override() {
        let ctx = ExecutionContext::new("sha", "env-owner", "env-repo");
        let resolved = resolve_context(ctx, Some("octo/kernel")).unwrap();
        assert_eq!(resolved.owner, "octo");
        assert_eq!(resolved.repo, "kernel");
        assert_eq!(resolved.sha, "sha");
    }

    #[test]
    fn test_resolve_context_keeps_env() {
        let ctx = ExecutionContext::new("sha", "env-owner", "env-repo");
        let resolved = resolve_context(ctx.clone(), None).unwrap();
        assert_eq!(resolved, ctx);
    }

    #[test]
    fn test_resolve_context_invalid() {
        let err = resolve_context(ExecutionContext::default(), Some("nope")).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
    }
}
