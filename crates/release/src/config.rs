//! Release configuration types.
//!
//! A [`ReleaseConfig`] describes one kernel build: where its artifacts live,
//! which source tree and configuration produced them, and which optional
//! features were compiled in. It is built once per invocation and never
//! mutated afterwards.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Whether an operation should only report what it would do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum DryRun {
    /// Perform remote calls.
    #[default]
    No,
    /// Validate and log, but issue no remote calls.
    Yes,
}

impl DryRun {
    /// Returns true for [`DryRun::Yes`].
    #[must_use]
    pub const fn is_dry_run(self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl From<bool> for DryRun {
    fn from(value: bool) -> Self {
        if value { Self::Yes } else { Self::No }
    }
}

/// Optional kernel features baked into a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeatureFlags {
    /// KernelSU root support
    pub kernelsu: bool,
    /// SUSFS root hiding patches
    pub susfs: bool,
    /// LXC / container support
    pub lxc: bool,
    /// BBR TCP congestion control
    pub bbr: bool,
    /// Kernel patch module support
    pub kpm: bool,
}

impl FeatureFlags {
    /// Labelled flags in the order they appear in release notes.
    #[must_use]
    pub const fn labelled(&self) -> [(&'static str, bool); 5] {
        [
            ("KernelSU", self.kernelsu),
            ("SUSFS", self.susfs),
            ("LXC", self.lxc),
            ("BBR", self.bbr),
            ("KPM", self.kpm),
        ]
    }
}

/// Configuration for publishing one build as a release.
#[derive(Clone, PartialEq, Eq)]
pub struct ReleaseConfig {
    /// Access token for the hosting platform
    pub token: String,
    /// Directory holding the build artifacts
    pub build_dir: PathBuf,
    /// URL of the kernel source repository
    pub kernel_url: String,
    /// Kernel source branch
    pub kernel_branch: String,
    /// Kernel defconfig name (e.g. "gki_defconfig")
    pub config_name: String,
    /// Target architecture (e.g. "arm64")
    pub arch: String,
    /// Feature toggles
    pub features: FeatureFlags,
}

impl ReleaseConfig {
    /// Creates a configuration with empty build metadata and all features off.
    #[must_use]
    pub fn new(token: impl Into<String>, build_dir: impl Into<PathBuf>) -> Self {
        Self {
            token: token.into(),
            build_dir: build_dir.into(),
            kernel_url: String::new(),
            kernel_branch: String::new(),
            config_name: String::new(),
            arch: String::new(),
            features: FeatureFlags::default(),
        }
    }

    /// Sets the kernel source URL and branch.
    #[must_use]
    pub fn with_source(mut self, url: impl Into<String>, branch: impl Into<String>) -> Self {
        self.kernel_url = url.into();
        self.kernel_branch = branch.into();
        self
    }

    /// Sets the defconfig name.
    #[must_use]
    pub fn with_config_name(mut self, config_name: impl Into<String>) -> Self {
        self.config_name = config_name.into();
        self
    }

    /// Sets the target architecture.
    #[must_use]
    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = arch.into();
        self
    }

    /// Sets the feature flags.
    #[must_use]
    pub const fn with_features(mut self, features: FeatureFlags) -> Self {
        self.features = features;
        self
    }

    /// The build directory as a path.
    #[must_use]
    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Whether a usable token was supplied.
    #[must_use]
    pub fn has_token(&self) -> bool {
        !self.token.trim().is_empty()
    }
}

// The token never appears in debug output.
impl fmt::Debug for ReleaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseConfig")
            .field("token", &if self.has_token() { "***" } else { "" })
            .field("build_dir", &self.build_dir)
            .field("kernel_url", &self.kernel_url)
            .field("kernel_branch", &self.kernel_branch)
            .field("config_name", &self.config_name)
            .field("arch", &self.arch)
            .field("features", &self.features)
            .finish()
    }
}
