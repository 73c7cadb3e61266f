//! Descriptor files on disk.
//!
//! # Storage layout
//!
//! ```text
//! <working-directory>/
//!   platforms/
//!     <name>.yaml      (one platform descriptor per file)
//!   extensions/
//!     <name>.yaml      (one extension descriptor per file)
//! ```
//!
//! A [`Descriptor`] keeps the whole YAML mapping it was loaded from. Only the
//! `versions` sequence is ever mutated; every other key is written back as it
//! was read.

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use crate::error::{io_err, DescriptorError};
use crate::types::{DescriptorKind, DescriptorSpec};

const VERSIONS_KEY: &str = "versions";

// ---------------------------------------------------------------------------
// 1. Path helpers
// ---------------------------------------------------------------------------

/// `<working_dir>/platforms/` or `<working_dir>/extensions/` — pure, no I/O.
pub fn descriptor_dir(working_dir: &Path, kind: DescriptorKind) -> PathBuf {
    working_dir.join(kind.dir_name())
}

/// List descriptor files (`*.yaml` / `*.yml`) directly under `dir`.
///
/// Results are sorted by file name so a run is deterministic across
/// filesystems. Returns `DescriptorError::DirectoryNotFound` if `dir` is absent.
pub fn list_descriptors_at(dir: &Path) -> Result<Vec<PathBuf>, DescriptorError> {
    if !dir.is_dir() {
        return Err(DescriptorError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| io_err(dir, e))?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|e| e.path())
        .filter(|p| is_yaml(p))
        .collect();
    files.sort();
    Ok(files)
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

// ---------------------------------------------------------------------------
// 2. Descriptor
// ---------------------------------------------------------------------------

/// A platform or extension descriptor loaded from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    path: PathBuf,
    kind: DescriptorKind,
    document: Mapping,
    spec: DescriptorSpec,
}

impl Descriptor {
    /// Read and parse the descriptor at `path`.
    ///
    /// Returns `DescriptorError::Parse` (with path + line context) if the YAML
    /// is malformed or `group-id` / `artifact-id` are missing.
    pub fn load(path: &Path, kind: DescriptorKind) -> Result<Self, DescriptorError> {
        let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        Self::from_yaml_str(path, kind, &contents)
    }

    /// Parse a descriptor from YAML text; `path` is recorded for later saves.
    pub fn from_yaml_str(
        path: &Path,
        kind: DescriptorKind,
        contents: &str,
    ) -> Result<Self, DescriptorError> {
        let parse = |source| DescriptorError::Parse {
            path: path.to_path_buf(),
            source,
        };
        let document = match serde_yaml::from_str::<Value>(contents).map_err(parse)? {
            Value::Mapping(m) => m,
            _ => {
                return Err(DescriptorError::NotAMapping {
                    path: path.to_path_buf(),
                })
            }
        };
        let spec: DescriptorSpec =
            serde_yaml::from_value(Value::Mapping(document.clone())).map_err(parse)?;
        Ok(Self {
            path: path.to_path_buf(),
            kind,
            document,
            spec,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> DescriptorKind {
        self.kind
    }

    pub fn spec(&self) -> &DescriptorSpec {
        &self.spec
    }

    /// Recorded versions, newest first, in their textual form.
    pub fn versions(&self) -> Vec<String> {
        match self.document.get(VERSIONS_KEY) {
            Some(Value::Sequence(seq)) => seq.iter().filter_map(scalar_text).collect(),
            _ => Vec::new(),
        }
    }

    /// Plain string membership; no semantic version comparison.
    pub fn contains_version(&self, version: &str) -> bool {
        self.versions().iter().any(|v| v == version)
    }

    /// Insert `version` at the head of `versions`, creating the sequence if
    /// it is missing or not a sequence.
    pub fn prepend_version(&mut self, version: &str) {
        let entry = self
            .document
            .entry(Value::String(VERSIONS_KEY.to_string()))
            .or_insert_with(|| Value::Sequence(Vec::new()));
        if !entry.is_sequence() {
            *entry = Value::Sequence(Vec::new());
        }
        if let Value::Sequence(seq) = entry {
            seq.insert(0, Value::String(version.to_string()));
        }
    }

    /// Serialize the full document back to YAML.
    pub fn to_yaml(&self) -> Result<String, DescriptorError> {
        Ok(serde_yaml::to_string(&self.document)?)
    }

    /// Atomically overwrite the descriptor file with the current document.
    ///
    /// Write flow: serialize → `<file>.tmp` sibling → `rename`.
    /// The `.tmp` is always in the same directory as the target.
    pub fn save(&self) -> Result<(), DescriptorError> {
        let yaml = self.to_yaml()?;
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "descriptor.yaml".to_string());
        let tmp = self.path.with_file_name(format!("{file_name}.tmp"));

        std::fs::write(&tmp, yaml).map_err(|e| io_err(&tmp, e))?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(io_err(&self.path, e));
        }
        Ok(())
    }
}

/// Textual form of a scalar YAML value; `None` for nested structures.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
