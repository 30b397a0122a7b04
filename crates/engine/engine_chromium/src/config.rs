//! Launch settings for the headless Chromium engine.
//!
//! Settings can be loaded from environment variables or constructed
//! programmatically; the command line overrides individual fields.

use anyhow::{Context as _, Result};
use log::info;
use std::env;
use std::fs::remove_dir_all;
use std::path::PathBuf;
use std::process;

/// Directory name prefix used under the system temp dir when no profile dir is
/// given. The process id is appended so concurrent runs never share a profile.
const DEFAULT_PROFILE_DIR_NAME: &str = "webprint-profile";

/// Launch configuration for [`crate::ChromiumEngine`].
#[derive(Clone, Debug)]
pub struct ChromiumConfig {
    /// Explicit browser executable; auto-detected when `None`
    pub executable: Option<PathBuf>,
    /// Whether to keep the browser sandbox enabled
    pub sandbox: bool,
    /// Browser profile (and cache) directory, wiped before launch and after exit
    pub profile_dir: PathBuf,
}

impl Default for ChromiumConfig {
    fn default() -> Self {
        Self {
            executable: None,
            sandbox: true,
            profile_dir: env::temp_dir()
                .join(format!("{DEFAULT_PROFILE_DIR_NAME}-{}", process::id())),
        }
    }
}

impl ChromiumConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `WEBPRINT_CHROME`: Path to the Chrome/Chromium executable
    /// - `WEBPRINT_NO_SANDBOX`: Set to "1" to disable the browser sandbox
    /// - `WEBPRINT_PROFILE_DIR`: Profile directory (default: `$TMPDIR/webprint-profile-<pid>`)
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let executable = env::var_os("WEBPRINT_CHROME")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        let sandbox = env::var("WEBPRINT_NO_SANDBOX").ok().as_deref() != Some("1");
        let profile_dir = env::var_os("WEBPRINT_PROFILE_DIR")
            .filter(|value| !value.is_empty())
            .map_or(defaults.profile_dir, PathBuf::from);
        Self {
            executable,
            sandbox,
            profile_dir,
        }
    }

    /// Remove the profile directory and everything the browser cached in it.
    ///
    /// # Errors
    /// Returns an error if the directory exists but cannot be removed.
    pub fn clear_profile_dir(&self) -> Result<()> {
        if self.profile_dir.exists() {
            info!("Clearing browser cache at {}", self.profile_dir.display());
            remove_dir_all(&self.profile_dir).with_context(|| {
                format!("Failed to clear profile dir {}", self.profile_dir.display())
            })?;
        }
        Ok(())
    }
}
