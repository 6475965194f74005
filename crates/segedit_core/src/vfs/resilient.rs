//! Verified writes with NFS path fallbacks, and multi-candidate reads.
//!
//! Some NFS clients drop or mangle intermediate directories of a mount path
//! when writing, and some report no result for a write that did land. A
//! write is therefore only considered successful once the file is seen to
//! exist. For `nfs://` paths a fixed, ordered list of path variations is
//! tried until one verifies:
//!
//! 1. the exact path,
//! 2. the path without the first directory after the host,
//! 3. host plus file name only.
//!
//! Local and other network paths get exactly one attempt.

use std::thread;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::paths::{classify_path, PathKind};
use super::Vfs;

/// Permission bits applied to local files when enabled.
const SHARED_FILE_MODE: u32 = 0o666;

/// Options controlling [`ResilientWriter`].
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Pause after deleting an existing NFS file before writing it again.
    pub settle_delay: Duration,
    /// chmod successful local writes to `0o666`.
    pub set_permissions: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(100),
            set_permissions: false,
        }
    }
}

/// A verified write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Written {
    /// Path variation that was written.
    pub path: String,
    /// Bytes written, as reported by the backend or the payload size.
    pub bytes: usize,
}

/// Every path variation failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "all {} write attempt(s) failed: {}",
    .attempts.len(),
    .last_error.as_deref().unwrap_or("no bytes written")
)]
pub struct WriteError {
    /// Paths tried, in order.
    pub attempts: Vec<String>,
    /// Last I/O error message, if any attempt raised one.
    pub last_error: Option<String>,
}

type PathVariation = fn(&str) -> Option<String>;

const NFS_VARIATIONS: [PathVariation; 3] = [exact_path, without_first_dir, host_and_file_name];

fn exact_path(path: &str) -> Option<String> {
    Some(path.to_string())
}

/// `nfs://server/Media/Kodi/file` -> `nfs://server/Kodi/file`
fn without_first_dir(path: &str) -> Option<String> {
    let parts: Vec<&str> = path.splitn(5, '/').collect();
    match parts.as_slice() {
        [scheme, _, host, _, rest] => Some(format!("{}//{}/{}", scheme, host, rest)),
        _ => None,
    }
}

/// `nfs://server/Media/Kodi/file` -> `nfs://server/file`
fn host_and_file_name(path: &str) -> Option<String> {
    let parts: Vec<&str> = path.split('/').collect();
    if parts.len() < 4 {
        return None;
    }
    let file_name = parts[parts.len() - 1];
    Some(format!("{}/{}", parts[..3].join("/"), file_name))
}

/// Paths a write to `path` will try, in order, without duplicates.
pub fn write_candidates(path: &str) -> Vec<String> {
    if classify_path(path) != PathKind::Nfs {
        return vec![path.to_string()];
    }

    let mut candidates: Vec<String> = Vec::with_capacity(NFS_VARIATIONS.len());
    for variation in NFS_VARIATIONS {
        if let Some(candidate) = variation(path) {
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
    }
    candidates
}

/// Writer that verifies each write and walks the NFS fallback chain.
pub struct ResilientWriter<'a> {
    vfs: &'a dyn Vfs,
    options: WriteOptions,
}

impl<'a> ResilientWriter<'a> {
    pub fn new(vfs: &'a dyn Vfs, options: WriteOptions) -> Self {
        Self { vfs, options }
    }

    /// The filesystem writes go to.
    pub fn vfs(&self) -> &'a dyn Vfs {
        self.vfs
    }

    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// Write `bytes` to `path`, stopping at the first verified variation.
    pub fn write(&self, path: &str, bytes: &[u8]) -> Result<Written, WriteError> {
        let candidates = write_candidates(path);
        let mut attempts = Vec::with_capacity(candidates.len());
        let mut last_error: Option<String> = None;

        for candidate in candidates {
            debug!("Attempting to write {} bytes to {}", bytes.len(), candidate);
            attempts.push(candidate.clone());

            let kind = classify_path(&candidate);
            if kind == PathKind::Nfs {
                self.clear_existing(&candidate);
            }

            let reported = match self.vfs.write(&candidate, bytes) {
                Ok(reported) => reported,
                Err(e) => {
                    warn!("Write to {} failed: {}", candidate, e);
                    last_error = Some(e.to_string());
                    continue;
                }
            };

            if !self.vfs.exists(&candidate) {
                warn!(
                    "Write to {} reported {:?} but the file does not exist",
                    candidate, reported
                );
                continue;
            }

            if self.options.set_permissions {
                self.share_permissions(&candidate, kind);
            }

            let written = reported.filter(|&n| n > 0).unwrap_or(bytes.len());
            if candidate == path {
                info!("Wrote {} bytes to {}", written, candidate);
            } else {
                info!(
                    "Wrote {} bytes to remapped path {} (requested {})",
                    written, candidate, path
                );
            }
            return Ok(Written {
                path: candidate,
                bytes: written,
            });
        }

        let err = WriteError {
            attempts,
            last_error,
        };
        error!("Could not write {}: {}", path, err);
        Err(err)
    }

    /// NFS clients may not truncate on overwrite, so remove the old file first.
    fn clear_existing(&self, path: &str) {
        if !self.vfs.exists(path) {
            return;
        }
        debug!("Deleting existing NFS file before write: {}", path);
        if let Err(e) = self.vfs.delete(path) {
            warn!("Could not delete existing file {}: {}", path, e);
        }
        if !self.options.settle_delay.is_zero() {
            thread::sleep(self.options.settle_delay);
        }
    }

    fn share_permissions(&self, path: &str, kind: PathKind) {
        if kind.is_network() {
            debug!("Skipping chmod for network path {}", path);
            return;
        }
        match self.vfs.set_permissions(path, SHARED_FILE_MODE) {
            Ok(()) => debug!("Set permissions {:o} on {}", SHARED_FILE_MODE, path),
            Err(e) => warn!("Could not set permissions on {}: {}", path, e),
        }
    }
}

/// A file found by [`read_first`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadFile {
    pub path: String,
    pub content: String,
}

/// Read the first candidate that exists and has content.
///
/// Content is decoded as UTF-8, replacing invalid sequences. Unreadable
/// candidates are skipped; `None` means nothing was found.
pub fn read_first<S: AsRef<str>>(vfs: &dyn Vfs, candidates: &[S]) -> Option<ReadFile> {
    for candidate in candidates {
        let path = candidate.as_ref();
        if !vfs.exists(path) {
            continue;
        }
        debug!("Attempting to read {}", path);
        match vfs.read(path) {
            Ok(bytes) if !bytes.is_empty() => {
                debug!("Read {} bytes from {}", bytes.len(), path);
                return Some(ReadFile {
                    path: path.to_string(),
                    content: String::from_utf8_lossy(&bytes).into_owned(),
                });
            }
            Ok(_) => debug!("Skipping empty file {}", path),
            Err(e) => warn!("Failed to read {}: {}", path, e),
        }
    }
    None
}
