//! Virtual filesystem used for every segment file access.
//!
//! Media-center hosts address files through URLs such as `nfs://server/...`
//! or `smb://...` as well as plain local paths, so paths are carried as
//! strings and all I/O goes through the [`Vfs`] trait. [`LocalFs`] is the
//! `std::fs` implementation; hosts with their own VFS layer provide another.

mod local;
mod paths;
mod resilient;

#[cfg(test)]
pub(crate) mod memory;

pub use local::LocalFs;
pub use paths::{classify_path, join_path, parent_dir, strip_extension, PathKind};
pub use resilient::{
    read_first, write_candidates, ReadFile, ResilientWriter, WriteError, WriteOptions, Written,
};

use std::io;

/// Minimal filesystem capability consumed by the parsers and writers.
pub trait Vfs {
    /// Whether a file exists at `path`.
    fn exists(&self, path: &str) -> bool;

    /// Read the whole file.
    fn read(&self, path: &str) -> io::Result<Vec<u8>>;

    /// Create or truncate `path` and write `bytes`.
    ///
    /// Returns the number of bytes the backend reports, or `None` when the
    /// backend gives no usable result. Callers confirm success with
    /// [`Vfs::exists`] rather than trusting this value.
    fn write(&self, path: &str, bytes: &[u8]) -> io::Result<Option<usize>>;

    /// Delete the file at `path`.
    fn delete(&self, path: &str) -> io::Result<()>;

    /// Create a directory and all of its parents.
    ///
    /// Succeeds when the directory already exists.
    fn mkdirs(&self, path: &str) -> io::Result<()>;

    /// Set unix permission bits. Backends without permissions may ignore it.
    fn set_permissions(&self, _path: &str, _mode: u32) -> io::Result<()> {
        Ok(())
    }
}
