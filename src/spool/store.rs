use chrono::NaiveDate;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Errors raised by spool operations.
///
/// A failed operation never leaves a record half-moved: the record is
/// defined to still be wherever the failed rename or write left it.
#[derive(Debug, Error)]
pub enum SpoolError {
    #[error("spool i/o failure at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("uid {0:?} is not usable as a spool filename")]
    InvalidUid(String),
}

/// One of the three non-terminal queue states. The terminal `done` state is
/// addressed separately because it is partitioned by completion date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    /// Freshly accepted, not yet picked up for delivery (`in`).
    Incoming,
    /// Handed to, or about to be handed to, the delivery attempter (`wip`).
    InFlight,
    /// Delivery failed, waiting for the next sweep tick (`retry`).
    RetryPending,
}

impl QueueState {
    pub fn dir_name(self) -> &'static str {
        match self {
            QueueState::Incoming => "in",
            QueueState::InFlight => "wip",
            QueueState::RetryPending => "retry",
        }
    }
}

const DONE_DIR: &str = "done";

/// Returns whether a uid is safe to use as a filename inside the spool.
///
/// Generated uids always pass; this guards uids supplied by clients.
pub fn is_valid_uid(uid: &str) -> bool {
    !uid.is_empty()
        && uid.len() <= 128
        && uid != "."
        && uid != ".."
        && uid
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_')
}

/// The four-directory file spool.
///
/// All operations are plain filesystem calls; the store itself holds no
/// state beyond the base path, so it is cheap to clone into each task.
#[derive(Debug, Clone)]
pub struct SpoolStore {
    base: PathBuf,
}

impl SpoolStore {
    /// Opens a spool rooted at `base`, creating the state directories.
    pub fn open(base: impl Into<PathBuf>) -> Result<Self, SpoolError> {
        let base = base.into();
        for dir in ["in", "wip", "retry", DONE_DIR] {
            let path = base.join(dir);
            fs::create_dir_all(&path).map_err(|source| SpoolError::Io { path, source })?;
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn state_path(&self, state: QueueState, uid: &str) -> PathBuf {
        self.base.join(state.dir_name()).join(uid)
    }

    fn done_dir(&self, date: NaiveDate) -> PathBuf {
        self.base.join(DONE_DIR).join(date.format("%Y-%m-%d").to_string())
    }

    /// Durably writes `content` as `state/uid`.
    ///
    /// The content is written to a temporary file in the spool base and then
    /// renamed into place, so a state directory never contains a partially
    /// written record.
    pub fn put(&self, state: QueueState, uid: &str, content: &[u8]) -> Result<(), SpoolError> {
        if !is_valid_uid(uid) {
            return Err(SpoolError::InvalidUid(uid.to_string()));
        }
        let tmp = self.base.join(format!(".{uid}.tmp"));
        fs::write(&tmp, content).map_err(|source| SpoolError::Io {
            path: tmp.clone(),
            source,
        })?;
        let dest = self.state_path(state, uid);
        fs::rename(&tmp, &dest).map_err(|source| SpoolError::Io { path: dest, source })
    }

    /// Relocates `uid` from one queue state to another.
    pub fn relocate(
        &self,
        from: QueueState,
        uid: &str,
        to: QueueState,
    ) -> Result<(), SpoolError> {
        let dest = self.state_path(to, uid);
        fs::rename(self.state_path(from, uid), &dest)
            .map_err(|source| SpoolError::Io { path: dest, source })
    }

    /// Relocates `uid` from the in-flight state into the dated done bucket.
    pub fn complete(&self, uid: &str, date: NaiveDate) -> Result<(), SpoolError> {
        let dir = self.done_dir(date);
        fs::create_dir_all(&dir).map_err(|source| SpoolError::Io {
            path: dir.clone(),
            source,
        })?;
        let dest = dir.join(uid);
        fs::rename(self.state_path(QueueState::InFlight, uid), &dest)
            .map_err(|source| SpoolError::Io { path: dest, source })
    }

    /// Lists the uids currently resident in a queue state.
    pub fn list(&self, state: QueueState) -> Result<Vec<String>, SpoolError> {
        self.list_dir(&self.base.join(state.dir_name()))
    }

    /// Lists the uids completed on the given date.
    pub fn list_completed(&self, date: NaiveDate) -> Result<Vec<String>, SpoolError> {
        let dir = self.done_dir(date);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        self.list_dir(&dir)
    }

    fn list_dir(&self, dir: &Path) -> Result<Vec<String>, SpoolError> {
        let entries = fs::read_dir(dir).map_err(|source| SpoolError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let mut uids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| SpoolError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            if let Some(name) = entry.file_name().to_str() {
                uids.push(name.to_string());
            }
        }
        Ok(uids)
    }

    /// Reads a record's content if it is still resident in `state`.
    ///
    /// Returns `Ok(None)` when the file is gone, which callers treat as
    /// "already moved by someone else" rather than an error.
    pub fn read_if_resident(
        &self,
        state: QueueState,
        uid: &str,
    ) -> Result<Option<Vec<u8>>, SpoolError> {
        let path = self.state_path(state, uid);
        match fs::read(&path) {
            Ok(content) => Ok(Some(content)),
            Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SpoolError::Io { path, source }),
        }
    }

    /// Bulk-moves every record in `from` into `to`, returning how many moved.
    ///
    /// A record that fails to move is logged and left where it is; the sweep
    /// carries on with the rest.
    pub fn sweep(&self, from: QueueState, to: QueueState) -> Result<usize, SpoolError> {
        let mut moved = 0;
        for uid in self.list(from)? {
            match self.relocate(from, &uid, to) {
                Ok(()) => moved += 1,
                Err(e) => warn!(
                    "failed to sweep {uid} from {} to {}: {e}",
                    from.dir_name(),
                    to.dir_name()
                ),
            }
        }
        Ok(moved)
    }
}
