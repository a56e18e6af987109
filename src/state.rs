//! # Persistent Rebranch State
//!
//! While a rebranch runs, everything needed to resume or undo it lives in a
//! single JSON file inside the git directory (`.git/REBRANCH_STATE`). The file
//! exists if and only if a rebranch has been interrupted, either by a rebase
//! conflict or by the process dying between steps.
//!
//! ## File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "original_current_branch": "develop",
//!   "original_revisions": [
//!     { "branch": "develop", "revision": "3f2a..." }
//!   ],
//!   "remaining_plan": [
//!     { "parent": "develop", "child": "feature-b" }
//!   ],
//!   "current_step": { "parent": "develop", "child": "feature-a" }
//! }
//! ```
//!
//! The format is private to this tool. The `version` field guards against
//! resuming a session written by an incompatible release.
//!
//! ## Durability
//!
//! `SessionStore::save` writes to a temporary file, syncs it, renames it over
//! the old file and syncs the directory, so a crash leaves either the old or
//! the new session on disk, never a torn one.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{Error, Result};
use crate::plan::RebasePlanStep;

/// Current on-disk format version.
pub const SESSION_FORMAT_VERSION: u32 = 1;

/// The revision a branch pointed at before it was rebased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedRevision {
    pub branch: String,
    pub revision: String,
}

/// Ordered map from branch name to its pre-rebase revision.
///
/// Entries keep the order in which they were first recorded, which is plan
/// order. Abort walks them in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OriginalRevisions(Vec<RecordedRevision>);

impl OriginalRevisions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `revision` for `branch`, replacing an earlier entry in place.
    pub fn record(&mut self, branch: &str, revision: impl Into<String>) {
        let revision = revision.into();
        match self.0.iter_mut().find(|entry| entry.branch == branch) {
            Some(entry) => entry.revision = revision,
            None => self.0.push(RecordedRevision {
                branch: branch.to_string(),
                revision,
            }),
        }
    }

    /// Returns the recorded revision for `branch`.
    pub fn get(&self, branch: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|entry| entry.branch == branch)
            .map(|entry| entry.revision.as_str())
    }

    pub fn contains(&self, branch: &str) -> bool {
        self.get(branch).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecordedRevision> {
        self.0.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }
}

/// Everything needed to resume or roll back an interrupted rebranch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebranchSession {
    /// Branch (or detached revision) checked out before the rebranch began.
    pub original_current_branch: String,
    /// Pre-rebase revision of every branch touched so far.
    pub original_revisions: OriginalRevisions,
    /// Steps not yet started.
    pub remaining_plan: Vec<RebasePlanStep>,
    /// The step whose rebase is underway, if any.
    pub current_step: Option<RebasePlanStep>,
}

impl RebranchSession {
    /// Starts a session for a fresh plan.
    pub fn new(original_current_branch: impl Into<String>, plan: Vec<RebasePlanStep>) -> Self {
        Self {
            original_current_branch: original_current_branch.into(),
            original_revisions: OriginalRevisions::new(),
            remaining_plan: plan,
            current_step: None,
        }
    }

    /// Removes and returns the next step of the plan.
    pub fn pop_step(&mut self) -> Option<RebasePlanStep> {
        if self.remaining_plan.is_empty() {
            None
        } else {
            Some(self.remaining_plan.remove(0))
        }
    }
}

/// Versioned on-disk record of a session.
#[derive(Serialize, Deserialize)]
struct SessionFile {
    version: u32,
    original_current_branch: String,
    original_revisions: OriginalRevisions,
    remaining_plan: Vec<RebasePlanStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    current_step: Option<RebasePlanStep>,
}

/// Only the version field, read first so that a future format is reported
/// as unsupported instead of as a parse error.
#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

impl From<&RebranchSession> for SessionFile {
    fn from(session: &RebranchSession) -> Self {
        Self {
            version: SESSION_FORMAT_VERSION,
            original_current_branch: session.original_current_branch.clone(),
            original_revisions: session.original_revisions.clone(),
            remaining_plan: session.remaining_plan.clone(),
            current_step: session.current_step.clone(),
        }
    }
}

impl From<SessionFile> for RebranchSession {
    fn from(file: SessionFile) -> Self {
        Self {
            original_current_branch: file.original_current_branch,
            original_revisions: file.original_revisions,
            remaining_plan: file.remaining_plan,
            current_step: file.current_step,
        }
    }
}

/// Reads and writes the session file of one repository.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Creates a store backed by an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store for the repository whose git directory is `git_dir`.
    pub fn in_git_dir(git_dir: &Path) -> Self {
        Self::new(defaults::state_file_path(git_dir))
    }

    /// Location of the session file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if an interrupted rebranch is recorded.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Atomically replaces the session file with `session`.
    pub fn save(&self, session: &RebranchSession) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&SessionFile::from(session))?;
        let tmp_path = self.path.with_extension("tmp");

        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&tmp_path)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }

        std::fs::rename(&tmp_path, &self.path)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            sync_dir(parent)?;
        }

        debug!(
            "saved rebranch session: {} steps remaining, {} revisions recorded",
            session.remaining_plan.len(),
            session.original_revisions.len()
        );
        Ok(())
    }

    /// Loads the persisted session.
    ///
    /// Fails with `NoSession` if there is none and with `CorruptSession` if
    /// the file cannot be understood.
    pub fn load(&self) -> Result<RebranchSession> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(Error::NoSession),
            Err(e) => return Err(e.into()),
        };

        let probe: VersionProbe =
            serde_json::from_slice(&bytes).map_err(|e| Error::CorruptSession {
                message: e.to_string(),
            })?;
        if probe.version != SESSION_FORMAT_VERSION {
            return Err(Error::CorruptSession {
                message: format!(
                    "unsupported format version {} (expected {})",
                    probe.version, SESSION_FORMAT_VERSION
                ),
            });
        }

        let file: SessionFile =
            serde_json::from_slice(&bytes).map_err(|e| Error::CorruptSession {
                message: e.to_string(),
            })?;
        Ok(file.into())
    }

    /// Deletes the session file. Succeeds if it is already gone.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("cleared rebranch session at {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    std::fs::File::open(dir)?.sync_all()
}

// Directories cannot be opened as files on Windows; the rename is as
// durable as the platform allows.
#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
