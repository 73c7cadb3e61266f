//! publish-catalog — push new platform and extension versions to the registry.
//!
//! # Usage
//!
//! ```text
//! publish-catalog -w <dir> -u <registry-url> -t <token> [--skip-version-check] [--dry-run] [--json]
//! ```
//!
//! `-u`, `-t`, `-s`, and `-d` fall back to `REGISTRY_URL`, `REGISTRY_TOKEN`,
//! `SKIP_VERSION_CHECK`, and `DRY_RUN`.

mod config;
mod report;

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use catalog_sync::{build_agent, GitRepo, HttpSource, RegistryClient, Synchronizer};

use config::{parse_flag_value, Config};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "publish-catalog",
    version,
    about = "Publish the latest platform and extension versions to the extension registry",
    long_about = None,
)]
struct Cli {
    /// Working directory holding `platforms/` and `extensions/` (a git work tree).
    #[arg(short = 'w', long = "working-directory", value_name = "DIR")]
    working_directory: PathBuf,

    /// Base URL of the extension registry.
    #[arg(short = 'u', long = "registry-url", env = "REGISTRY_URL", value_name = "URL")]
    registry_url: String,

    /// Token sent to the registry admin endpoints.
    #[arg(short = 't', long, env = "REGISTRY_TOKEN", hide_env_values = true)]
    token: String,

    /// Publish the latest version even if it is already recorded; never
    /// rewrites descriptors.
    #[arg(
        short = 's',
        long = "skip-version-check",
        visible_alias = "sv",
        env = "SKIP_VERSION_CHECK",
        value_parser = parse_flag_value
    )]
    skip_version_check: bool,

    /// Resolve and download only; do not publish, change descriptors, or commit.
    #[arg(
        short = 'd',
        long = "dry-run",
        env = "DRY_RUN",
        value_parser = parse_flag_value
    )]
    dry_run: bool,

    /// Emit the run report as JSON.
    #[arg(long)]
    json: bool,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse_from(expand_legacy_flags(std::env::args_os()));
    init_tracing();

    let json = cli.json;
    let config = Config::from_args(
        cli.working_directory,
        cli.registry_url,
        cli.token,
        cli.skip_version_check,
        cli.dry_run,
    )
    .context("invalid configuration")?;
    tracing::debug!("{config:?}");

    let repo = GitRepo::open(&config.working_dir).with_context(|| {
        format!(
            "cannot open git working tree at '{}'",
            config.working_dir.display()
        )
    })?;

    let agent = build_agent();
    let source = HttpSource::new(agent.clone());
    let publisher = RegistryClient::new(agent, config.registry_url.clone(), config.token.clone());
    let options = config.sync_options();

    let reports = Synchronizer::new(&options, &source, &publisher, &repo).run();

    if json {
        report::print_json(&reports, options.dry_run)?;
    } else {
        report::print_table(&reports, options.dry_run);
    }
    Ok(())
}

/// `-sv` is not a valid short flag; accept it as `--skip-version-check`.
fn expand_legacy_flags(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    args.into_iter()
        .map(|arg| {
            if arg == "-sv" {
                OsString::from("--skip-version-check")
            } else {
                arg
            }
        })
        .collect()
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
