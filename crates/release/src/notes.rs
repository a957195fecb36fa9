//! Release naming and release-notes generation.
//!
//! Everything here is a pure function of its inputs; the build timestamp is
//! passed in so the rendered body is reproducible.

use crate::config::ReleaseConfig;
use crate::context::ExecutionContext;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write;

/// Tag prefix that marks a release as created by CI.
pub const TAG_PREFIX: &str = "last-ci-";

/// Placeholder used when a build metadata value is unavailable.
pub const UNKNOWN: &str = "Unknown";

const TITLE: &str = "Kernel CI Build";

/// Tag name for the given commit SHA.
#[must_use]
pub fn tag_name(sha: &str) -> String {
    format!("{TAG_PREFIX}{sha}")
}

/// Whether a tag was produced by [`tag_name`].
#[must_use]
pub fn is_ci_tag(tag: &str) -> bool {
    tag.starts_with(TAG_PREFIX)
}

/// Human-readable release title.
#[must_use]
pub fn release_title(ctx: &ExecutionContext) -> String {
    format!("{TITLE} ({})", ctx.short_sha())
}

/// Render the release body.
#[must_use]
pub fn release_body(
    config: &ReleaseConfig,
    ctx: &ExecutionContext,
    generated_at: DateTime<Utc>,
) -> String {
    let mut body = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(body, "## Kernel Build");
    let _ = writeln!(body, "- Config: {}", config.config_name);
    let _ = writeln!(body, "- Branch: {}", config.kernel_branch);
    let _ = writeln!(body, "- Source: {}", config.kernel_url);
    let _ = writeln!(body, "- Architecture: {}", config.arch);

    let _ = writeln!(body);
    let _ = writeln!(body, "## Features");
    for (label, enabled) in config.features.labelled() {
        let _ = writeln!(body, "- {label}: {enabled}");
    }

    let _ = writeln!(body);
    let _ = writeln!(body, "## Build Info");
    let _ = writeln!(
        body,
        "- Build Time: {}",
        generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    let _ = writeln!(body, "- Workflow: {}", or_unknown(ctx.workflow.as_deref()));
    let _ = writeln!(body, "- Run ID: {}", or_unknown(ctx.run_id.as_deref()));
    let _ = writeln!(body, "- Commit: {}", or_unknown(Some(ctx.sha.as_str())));

    body
}

fn or_unknown(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(UNKNOWN)
}
