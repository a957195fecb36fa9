//! Error types for release publishing and cleanup.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for release operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while publishing or pruning releases.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// No access token was supplied.
    #[error("GitHub token is missing or empty")]
    #[diagnostic(
        code(lastci::release::missing_token),
        help("Pass --token or set the GITHUB_TOKEN environment variable")
    )]
    MissingToken,

    /// A value that should come from the CI environment was not available.
    #[error("Execution context is missing `{field}`")]
    #[diagnostic(
        code(lastci::release::missing_context),
        help("Run inside GitHub Actions or pass the value explicitly (e.g. --sha, --repo)")
    )]
    MissingContext {
        /// Name of the missing context field
        field: &'static str,
    },

    /// The build directory held no files to upload.
    #[error("No files to release in {}", dir.display())]
    #[diagnostic(
        code(lastci::release::no_files),
        help("Check that the build produced artifacts in the configured directory")
    )]
    NoFiles {
        /// The directory that was scanned
        dir: PathBuf,
    },

    /// A build artifact could not be read.
    #[error("Artifact error: {message}")]
    #[diagnostic(
        code(lastci::release::artifact),
        help("Check that the file exists and is readable")
    )]
    Artifact {
        /// The error message
        message: String,
        /// The path that caused the error
        path: Option<PathBuf>,
        /// The underlying source error
        #[source]
        source: Option<std::io::Error>,
    },

    /// The hosting platform rejected or failed a request.
    #[error("{backend} backend error: {message}")]
    #[diagnostic(code(lastci::release::backend))]
    Backend {
        /// The backend that failed
        backend: String,
        /// The error message
        message: String,
        /// Help text for the user
        #[help]
        help: Option<String>,
    },

    /// Wrapped I/O error.
    #[error("I/O error: {0}")]
    #[diagnostic(code(lastci::release::io))]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new missing context error.
    #[must_use]
    pub const fn missing_context(field: &'static str) -> Self {
        Self::MissingContext { field }
    }

    /// Create a new "no files to release" error.
    #[must_use]
    pub fn no_files(dir: impl Into<PathBuf>) -> Self {
        Self::NoFiles { dir: dir.into() }
    }

    /// Create a new artifact error.
    #[must_use]
    pub fn artifact(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Artifact {
            message: message.into(),
            path,
            source: None,
        }
    }

    /// Create a new artifact error with source.
    #[must_use]
    pub fn artifact_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Artifact {
            message: message.into(),
            path,
            source: Some(source),
        }
    }

    /// Create a new backend error.
    #[must_use]
    pub fn backend(
        backend: impl Into<String>,
        message: impl Into<String>,
        help: Option<String>,
    ) -> Self {
        Self::Backend {
            backend: backend.into(),
            message: message.into(),
            help,
        }
    }

    /// Wrap a backend error with the operation that was being performed.
    ///
    /// Non-backend errors are returned unchanged.
    #[must_use]
    pub fn context(self, operation: &str) -> Self {
        match self {
            Self::Backend {
                backend,
                message,
                help,
            } => Self::Backend {
                backend,
                message: format!("{operation}: {message}"),
                help,
            },
            other => other,
        }
    }
}
