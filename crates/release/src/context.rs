use std::fmt;

/// Values supplied by the CI environment that triggered the build.
///
/// Passed explicitly into the publisher and pruner rather than read from
/// process globals, so callers decide where they come from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    /// The git commit SHA that triggered the build.
    pub sha: String,
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Workflow name, if known.
    pub workflow: Option<String>,
    /// Workflow run identifier, if known.
    pub run_id: Option<String>,
}

impl ExecutionContext {
    /// Creates a context for the given commit and repository.
    #[must_use]
    pub fn new(sha: impl Into<String>, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            sha: sha.into(),
            owner: owner.into(),
            repo: repo.into(),
            workflow: None,
            run_id: None,
        }
    }

    /// Sets the workflow name.
    #[must_use]
    pub fn with_workflow(mut self, workflow: impl Into<String>) -> Self {
        self.workflow = Some(workflow.into());
        self
    }

    /// Sets the workflow run identifier.
    #[must_use]
    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    /// Reads the context from GitHub Actions environment variables.
    ///
    /// Missing variables leave the corresponding field empty (or `None`).
    #[must_use]
    pub fn from_env() -> Self {
        let (owner, repo) = std::env::var("GITHUB_REPOSITORY")
            .ok()
            .and_then(|s| parse_repository(&s))
            .unwrap_or_default();

        Self {
            sha: std::env::var("GITHUB_SHA").unwrap_or_default(),
            owner,
            repo,
            workflow: non_empty_var("GITHUB_WORKFLOW"),
            run_id: non_empty_var("GITHUB_RUN_ID"),
        }
    }

    /// Short form of the commit SHA (first 7 characters).
    #[must_use]
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }
}

impl fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.repo, self.short_sha())
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Parse an `owner/repo` string.
#[must_use]
pub fn parse_repository(repo_str: &str) -> Option<(String, String)> {
    let (owner, repo) = repo_str.trim().split_once('/')?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}
