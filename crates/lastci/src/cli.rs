use crate::tracing::{LogLevel, TracingFormat};
use clap::{Args, Parser, Subcommand};
use miette::{Diagnostic, Report};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application
pub const EXIT_OK: i32 = 0;
/// CLI or configuration error exit code
pub const EXIT_CLI: i32 = 2;
/// Release or platform error exit code
pub const EXIT_RELEASE: i32 = 3;

/// CLI-specific error types with proper exit code mapping
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum CliError {
    /// CLI or configuration error (exit code 2)
    #[error("Configuration error: {message}")]
    #[diagnostic(code(lastci::cli::config))]
    Config {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// Release creation, upload, or file error (exit code 3)
    #[error("Release failed: {message}")]
    #[diagnostic(code(lastci::cli::release))]
    Release {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
}

impl CliError {
    /// Create a new configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new release error
    #[must_use]
    pub fn release(message: impl Into<String>) -> Self {
        Self::Release {
            message: message.into(),
            help: None,
        }
    }

    /// Add help text to an existing error, returning a new error with the help text set.
    #[must_use]
    pub fn with_help(self, help_text: impl Into<String>) -> Self {
        let help = Some(help_text.into());
        match self {
            Self::Config { message, .. } => Self::Config { message, help },
            Self::Release { message, .. } => Self::Release { message, help },
        }
    }
}

/// Convert `lastci_release::Error` to the appropriate `CliError` variant.
///
/// Problems the user can fix by changing inputs map to `Config` (exit code 2);
/// failures while reading artifacts or talking to the platform map to
/// `Release` (exit code 3).
impl From<lastci_release::Error> for CliError {
    fn from(err: lastci_release::Error) -> Self {
        let help = err.help().map(|h| h.to_string());
        let cli_err = match err {
            lastci_release::Error::MissingToken
            | lastci_release::Error::MissingContext { .. }
            | lastci_release::Error::NoFiles { .. } => Self::config(err.to_string()),
            lastci_release::Error::Artifact { .. }
            | lastci_release::Error::Backend { .. }
            | lastci_release::Error::Io(_) => Self::release(err.to_string()),
        };
        match help {
            Some(h) => cli_err.with_help(h),
            None => cli_err,
        }
    }
}

/// Map CLI error to appropriate exit code
#[must_use]
pub const fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::Config { .. } => EXIT_CLI,
        CliError::Release { .. } => EXIT_RELEASE,
    }
}

/// Render error appropriately based on JSON flag
#[allow(clippy::print_stdout, clippy::print_stderr)]
pub fn render_error(err: &CliError, json_mode: bool) {
    if json_mode {
        let error_envelope = ErrorEnvelope::new(serde_json::json!({
            "code": match err {
                CliError::Config { .. } => "config",
                CliError::Release { .. } => "release",
            },
            "message": err.to_string()
        }));

        match serde_json::to_string(&error_envelope) {
            Ok(json) => println!("{json}"),
            Err(_) => eprintln!("Error serializing error response"),
        }
    } else {
        let report = Report::new(err.clone());
        eprintln!("{report:?}");
        let _ = io::stderr().flush();
    }
}

/// Success response envelope for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct OkEnvelope<T> {
    /// Status indicator - always "ok" for success
    pub status: &'static str,
    /// The actual data payload
    pub data: T,
}

impl<T> OkEnvelope<T> {
    /// Create a new success envelope
    #[must_use]
    pub const fn new(data: T) -> Self {
        Self { status: "ok", data }
    }
}

/// Error response envelope for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope<E> {
    /// Status indicator - always "error" for failures
    pub status: &'static str,
    /// The error details
    pub error: E,
}

impl<E> ErrorEnvelope<E> {
    /// Create a new error envelope
    #[must_use]
    pub const fn new(error: E) -> Self {
        Self {
            status: "error",
            error,
        }
    }
}

/// Publish CI kernel builds as GitHub releases.
#[derive(Parser, Debug)]
#[command(name = "lastci")]
#[command(about = "Publish CI kernel builds as GitHub releases and prune old ones")]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Logging verbosity level.
    #[arg(
        short = 'L',
        long,
        global = true,
        help = "Set logging level",
        default_value = "info",
        value_enum
    )]
    pub level: LogLevel,

    /// Log output format.
    #[arg(
        long,
        global = true,
        help = "Log output format",
        default_value = "compact",
        value_enum
    )]
    pub log_format: TracingFormat,

    /// Emit JSON envelope on stdout.
    #[arg(long, global = true, help = "Emit JSON envelope on stdout")]
    pub json: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a release for the current commit and upload the build directory.
    #[command(about = "Create a release for the current commit and upload the build directory")]
    Publish(PublishArgs),
    /// Delete old CI releases beyond a retention count.
    #[command(about = "Delete old CI releases beyond a retention count")]
    Cleanup(CleanupArgs),
}

/// Arguments shared by every command that talks to GitHub.
#[derive(Args, Debug, Clone)]
pub struct RepoArgs {
    /// GitHub token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, default_value = "")]
    pub token: String,

    /// Repository as owner/name (defaults to GITHUB_REPOSITORY).
    #[arg(long, value_name = "OWNER/NAME")]
    pub repo: Option<String>,

    /// Log what would happen without changing anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for `lastci publish`.
#[derive(Args, Debug, Clone)]
pub struct PublishArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Directory containing build artifacts.
    #[arg(long, short = 'd', env = "LASTCI_BUILD_DIR", default_value = "out")]
    pub dir: PathBuf,

    /// Commit SHA to tag (defaults to GITHUB_SHA).
    #[arg(long)]
    pub sha: Option<String>,

    /// Kernel source repository URL.
    #[arg(long, env = "LASTCI_KERNEL_URL", default_value = "")]
    pub kernel_url: String,

    /// Kernel source branch.
    #[arg(long, env = "LASTCI_KERNEL_BRANCH", default_value = "")]
    pub kernel_branch: String,

    /// Kernel defconfig name.
    #[arg(long, env = "LASTCI_CONFIG_NAME", default_value = "")]
    pub config_name: String,

    /// Target architecture.
    #[arg(long, env = "LASTCI_ARCH", default_value = "arm64")]
    pub arch: String,

    /// Build includes KernelSU.
    #[arg(long)]
    pub kernelsu: bool,

    /// Build includes SUSFS.
    #[arg(long)]
    pub susfs: bool,

    /// Build includes LXC support.
    #[arg(long)]
    pub lxc: bool,

    /// Build includes BBR.
    #[arg(long)]
    pub bbr: bool,

    /// Build includes KPM.
    #[arg(long)]
    pub kpm: bool,

    /// After publishing, keep only this many CI releases.
    #[arg(long, value_name = "N")]
    pub keep: Option<usize>,
}

/// Arguments for `lastci cleanup`.
#[derive(Args, Debug, Clone)]
pub struct CleanupArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Number of CI releases to keep.
    #[arg(long, value_name = "N", env = "LASTCI_KEEP")]
    pub keep: usize,
}

/// Parse command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_publish_flags() {
        let cli = Cli::try_parse_from([
            "lastci",
            "publish",
            "--token",
            "t",
            "--dir",
            "build/out",
            "--config-name",
            "gki_defconfig",
            "--kernelsu",
            "--lxc",
            "--keep",
            "5",
        ])
        .unwrap();

        let Commands::Publish(args) = cli.command else {
            panic!("expected publish");
        };
        assert_eq!(args.repo.token, "t");
        assert_eq!(args.dir, PathBuf::from("build/out"));
        assert_eq!(args.config_name, "gki_defconfig");
        assert_eq!(args.arch, "arm64");
        assert!(args.kernelsu);
        assert!(args.lxc);
        assert!(!args.susfs);
        assert_eq!(args.keep, Some(5));
    }

    #[test]
    fn test_parse_cleanup_requires_keep() {
        temp_env::with_var_unset("LASTCI_KEEP", || {
            assert!(Cli::try_parse_from(["lastci", "cleanup"]).is_err());
            let cli = Cli::try_parse_from(["lastci", "cleanup", "--keep", "3"]).unwrap();
            assert!(matches!(cli.command, Commands::Cleanup(CleanupArgs { keep: 3, .. })));
        });
    }

    #[test]
    fn test_error_exit_codes() {
        let err: CliError = lastci_release::Error::MissingToken.into();
        assert_eq!(exit_code_for(&err), EXIT_CLI);

        let err: CliError = lastci_release::Error::no_files("out").into();
        assert_eq!(exit_code_for(&err), EXIT_CLI);

        let err: CliError = lastci_release::Error::backend("GitHub", "boom", None).into();
        assert_eq!(exit_code_for(&err), EXIT_RELEASE);
    }

    #[test]
    fn test_error_keeps_help() {
        let err: CliError = lastci_release::Error::MissingToken.into();
        let CliError::Config { help, .. } = err else {
            panic!("expected config error");
        };
        assert!(help.unwrap().contains("GITHUB_TOKEN"));
    }

    #[test]
    fn test_ok_envelope_serialization() {
        let json = serde_json::to_string(&OkEnvelope::new(42)).unwrap();
        assert_eq!(json, r#"{"status":"ok","data":42}"#);
    }
}
