//! Validated run configuration, built once from parsed flags.

use std::convert::Infallible;
use std::fmt;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use catalog_sync::publish::origin;
use catalog_sync::SyncOptions;

/// Boolean flag value from the command line or the environment: only `true`
/// (any case) switches the flag on.
pub fn parse_flag_value(raw: &str) -> std::result::Result<bool, Infallible> {
    Ok(raw.trim().eq_ignore_ascii_case("true"))
}

/// Everything a run needs, checked before any descriptor is touched.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Canonical working directory.
    pub working_dir: PathBuf,
    pub registry_url: String,
    pub token: String,
    pub skip_version_check: bool,
    pub dry_run: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("working_dir", &self.working_dir)
            .field("registry_url", &self.registry_url)
            .field("token", &"<redacted>")
            .field("skip_version_check", &self.skip_version_check)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl Config {
    pub fn from_args(
        working_dir: PathBuf,
        registry_url: String,
        token: String,
        skip_version_check: bool,
        dry_run: bool,
    ) -> Result<Self> {
        let working_dir = working_dir
            .canonicalize()
            .with_context(|| format!("cannot resolve working directory '{}'", working_dir.display()))?;
        if !working_dir.is_dir() {
            bail!("working directory '{}' is not a directory", working_dir.display());
        }

        let registry_url = registry_url.trim().to_string();
        let Some(rest) = registry_url
            .strip_prefix("https://")
            .or_else(|| registry_url.strip_prefix("http://"))
        else {
            bail!("registry URL '{registry_url}' must start with http:// or https://");
        };
        if rest.is_empty() || origin(&registry_url).ends_with("://") {
            bail!("registry URL '{registry_url}' has no host");
        }

        let token = token.trim().to_string();
        if token.is_empty() {
            bail!("registry token must not be empty");
        }

        Ok(Self {
            working_dir,
            registry_url,
            token,
            skip_version_check,
            dry_run,
        })
    }

    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            working_dir: self.working_dir.clone(),
            skip_version_check: self.skip_version_check,
            dry_run: self.dry_run,
        }
    }
}
