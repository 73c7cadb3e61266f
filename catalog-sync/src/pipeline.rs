//! Per-descriptor sync driver.
//!
//! ## `process_file` — sequence per descriptor
//!
//! 1. Read the descriptor.
//! 2. Resolve the latest version from `maven-metadata.xml`.
//! 3. Unless the version check is skipped: stop if already recorded,
//!    otherwise prepend it in memory.
//! 4. Fetch the artifact payload (platform JSON or extension YAML).
//! 5. Dry run: report the descriptor diff and stop.
//! 6. Publish to the registry (202 or 409 continue, anything else aborts).
//! 7. Unless the version check is skipped: save the descriptor and commit.
//!
//! Errors end the current file only; [`Synchronizer::run`] always visits
//! every file.

use std::path::{Path, PathBuf};

use similar::TextDiff;

use catalog_core::{descriptor, Coordinate, Descriptor, DescriptorError, DescriptorKind};

use crate::error::{io_err, SyncError};
use crate::git::{commit_message, slash_path, VersionControl};
use crate::maven;
use crate::publish::{PublishOutcome, Publisher};
use crate::source::ArtifactSource;

const SEPARATOR: &str = "---------------------------------------------------------------";

// ---------------------------------------------------------------------------
// Options and results
// ---------------------------------------------------------------------------

/// Run-wide switches shared by every file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Root holding `platforms/` and `extensions/`.
    pub working_dir: PathBuf,
    /// Publish whatever is latest without consulting or updating `versions`.
    pub skip_version_check: bool,
    /// Resolve and fetch, but publish, write, and commit nothing.
    pub dry_run: bool,
}

/// Outcome of syncing one descriptor file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The latest version is already listed in `versions`.
    AlreadyKnown { version: String },
    /// `--dry-run`: the payload was fetched; `diff` is the descriptor change
    /// that would have been written, if any.
    DryRun {
        version: String,
        diff: Option<String>,
    },
    /// The registry accepted the payload (202).
    Published { version: String, committed: bool },
    /// The registry already had this version (409).
    AlreadyExisted { version: String, committed: bool },
    /// Any error; the batch moved on.
    Failed { error: String },
}

impl FileOutcome {
    pub fn version(&self) -> Option<&str> {
        match self {
            FileOutcome::AlreadyKnown { version }
            | FileOutcome::DryRun { version, .. }
            | FileOutcome::Published { version, .. }
            | FileOutcome::AlreadyExisted { version, .. } => Some(version),
            FileOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, FileOutcome::Failed { .. })
    }
}

/// One line of the run report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub kind: DescriptorKind,
    /// Path relative to the working directory, `/`-separated.
    pub path: String,
    pub outcome: FileOutcome,
}

// ---------------------------------------------------------------------------
// Synchronizer
// ---------------------------------------------------------------------------

/// Drives the per-file sequence with injected collaborators.
pub struct Synchronizer<'a> {
    options: &'a SyncOptions,
    source: &'a dyn ArtifactSource,
    publisher: &'a dyn Publisher,
    vcs: &'a dyn VersionControl,
}

impl<'a> Synchronizer<'a> {
    pub fn new(
        options: &'a SyncOptions,
        source: &'a dyn ArtifactSource,
        publisher: &'a dyn Publisher,
        vcs: &'a dyn VersionControl,
    ) -> Self {
        Self {
            options,
            source,
            publisher,
            vcs,
        }
    }

    /// Sync every platform, then every extension descriptor.
    pub fn run(&self) -> Vec<FileReport> {
        if self.options.dry_run {
            tracing::warn!(
                "running in dry-run mode; no files will be changed or posted to the registry"
            );
        }
        if self.options.skip_version_check {
            tracing::info!("skipping version check; descriptors will not be updated");
        }
        DescriptorKind::all()
            .iter()
            .flat_map(|kind| self.run_kind(*kind))
            .collect()
    }

    /// Sync every descriptor of one kind, in file-name order.
    pub fn run_kind(&self, kind: DescriptorKind) -> Vec<FileReport> {
        let dir = descriptor::descriptor_dir(&self.options.working_dir, kind);
        let files = match descriptor::list_descriptors_at(&dir) {
            Ok(files) => files,
            Err(DescriptorError::DirectoryNotFound { path }) => {
                tracing::warn!("no {kind} descriptors: {} does not exist", path.display());
                return Vec::new();
            }
            Err(err) => {
                tracing::error!("cannot list {kind} descriptors: {err}");
                return Vec::new();
            }
        };

        files
            .iter()
            .map(|path| {
                tracing::info!("{SEPARATOR}");
                let outcome = match self.process_file(path, kind) {
                    Ok(outcome) => outcome,
                    Err(err) => {
                        tracing::error!("error while processing {kind} {}: {err}", path.display());
                        FileOutcome::Failed {
                            error: err.to_string(),
                        }
                    }
                };
                FileReport {
                    kind,
                    path: slash_path(self.relative(path)),
                    outcome,
                }
            })
            .collect()
    }

    /// Run the full sequence for a single descriptor file.
    pub fn process_file(&self, path: &Path, kind: DescriptorKind) -> Result<FileOutcome, SyncError> {
        let original = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        let mut descriptor = Descriptor::from_yaml_str(path, kind, &original)?;
        let spec = descriptor.spec().clone();
        let repository = spec.repository();

        tracing::info!(
            "fetching latest version for {}:{}",
            spec.group_id,
            spec.artifact_id
        );
        let latest =
            maven::latest_version(self.source, &repository, &spec.group_id, &spec.artifact_id)?;

        if !self.options.skip_version_check {
            if descriptor.contains_version(&latest) {
                tracing::warn!(
                    "{}:{} version {latest} was read previously; skipping",
                    spec.group_id,
                    spec.artifact_id
                );
                return Ok(FileOutcome::AlreadyKnown { version: latest });
            }
            descriptor.prepend_version(&latest);
        }

        let coordinate = Coordinate {
            repository,
            group_id: spec.group_id.clone(),
            artifact_id: spec.artifact_id.clone(),
            classifier: match kind {
                DescriptorKind::Platform => spec.effective_classifier(&latest),
                DescriptorKind::Extension => None,
            },
            version: latest.clone(),
        };
        let payload = match kind {
            DescriptorKind::Platform => maven::fetch_platform(self.source, &coordinate)?,
            DescriptorKind::Extension => maven::fetch_extension(self.source, &coordinate)?,
        };

        tracing::info!("publishing {coordinate}");
        if self.options.dry_run {
            let diff = if self.options.skip_version_check {
                None
            } else {
                Some(self.descriptor_diff(path, &original, &descriptor)?)
            };
            return Ok(FileOutcome::DryRun {
                version: latest,
                diff,
            });
        }

        let published = self.publisher.publish(kind, &payload)?;

        let committed = if self.options.skip_version_check {
            false
        } else {
            descriptor.save()?;
            let relative = self.relative(path);
            self.vcs
                .commit_file(relative, &commit_message(&latest, relative))?;
            true
        };

        Ok(match published {
            PublishOutcome::Accepted => FileOutcome::Published {
                version: latest,
                committed,
            },
            PublishOutcome::AlreadyExists => FileOutcome::AlreadyExisted {
                version: latest,
                committed,
            },
        })
    }

    fn relative<'p>(&self, path: &'p Path) -> &'p Path {
        path.strip_prefix(&self.options.working_dir).unwrap_or(path)
    }

    fn descriptor_diff(
        &self,
        path: &Path,
        original: &str,
        updated: &Descriptor,
    ) -> Result<String, SyncError> {
        let rendered = updated.to_yaml()?;
        let relative = slash_path(self.relative(path));
        let old_header = format!("a/{relative}");
        let new_header = format!("b/{relative}");
        Ok(TextDiff::from_lines(original, rendered.as_str())
            .unified_diff()
            .header(&old_header, &new_header)
            .context_radius(3)
            .to_string())
    }
}
