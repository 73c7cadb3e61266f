//! Recording descriptor changes in the git working tree.
//!
//! Shells out to the `git` binary; no libgit bindings.

use std::path::{Component, Path, PathBuf};
use std::process::Command;

use crate::error::{io_err, SyncError};

/// Stages and commits a single changed file.
pub trait VersionControl {
    /// `relative` is relative to the working directory the handle was opened on.
    fn commit_file(&self, relative: &Path, message: &str) -> Result<(), SyncError>;
}

/// A git working tree, addressed through `git -C <dir>`.
#[derive(Debug, Clone)]
pub struct GitRepo {
    dir: PathBuf,
}

impl GitRepo {
    /// Open `dir` as (part of) a git working tree.
    ///
    /// Fails if `git` is not installed or `dir` is not inside a work tree.
    pub fn open(dir: &Path) -> Result<Self, SyncError> {
        let repo = Self {
            dir: dir.to_path_buf(),
        };
        let inside = repo.run(&["rev-parse", "--is-inside-work-tree"])?;
        if inside.trim() != "true" {
            return Err(SyncError::Git {
                command: "rev-parse".to_string(),
                detail: format!("{} is not inside a git work tree", dir.display()),
            });
        }
        Ok(repo)
    }

    fn run(&self, args: &[&str]) -> Result<String, SyncError> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.dir)
            .arg("--literal-pathspecs")
            .args(args)
            .output()
            .map_err(|e| io_err("git", e))?;

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Err(SyncError::Git {
            command: args.first().copied().unwrap_or_default().to_string(),
            detail: format!("(status {}) {} {}", output.status, stdout, stderr)
                .trim()
                .to_string(),
        })
    }
}

impl VersionControl for GitRepo {
    fn commit_file(&self, relative: &Path, message: &str) -> Result<(), SyncError> {
        let pathspec = slash_path(relative);
        self.run(&["add", "--", &pathspec])?;
        self.run(&["commit", "--no-gpg-sign", "--message", message])?;
        tracing::debug!("committed {pathspec}");
        Ok(())
    }
}

/// Lexically normalized, `/`-separated form of `path`.
///
/// `.` components are dropped and `..` pops the previous component; the
/// filesystem is never consulted.
pub fn slash_path(path: &Path) -> String {
    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.pop().is_none() {
                    parts.push("..".to_string());
                }
            }
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::RootDir | Component::Prefix(_) => {}
        }
    }
    parts.join("/")
}

/// Commit message recorded for a new version.
pub fn commit_message(version: &str, relative: &Path) -> String {
    format!("Add {version} to {}", slash_path(relative))
}
