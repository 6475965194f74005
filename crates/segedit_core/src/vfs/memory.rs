//! In-memory filesystem with failure injection for tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::io;

use super::Vfs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Op {
    Write(String),
    Delete(String),
    Mkdirs(String),
    SetPermissions(String, u32),
}

#[derive(Default)]
pub(crate) struct MemoryFs {
    files: RefCell<BTreeMap<String, Vec<u8>>>,
    failing: RefCell<HashSet<String>>,
    dropped: RefCell<HashSet<String>>,
    locked: RefCell<HashSet<String>>,
    ops: RefCell<Vec<Op>>,
}

impl MemoryFs {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&self, path: &str, content: &str) {
        self.files
            .borrow_mut()
            .insert(path.to_string(), content.as_bytes().to_vec());
    }

    pub(crate) fn contents(&self, path: &str) -> Option<String> {
        self.files
            .borrow()
            .get(path)
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    /// Writes to `path` return an I/O error.
    pub(crate) fn fail_writes(&self, path: &str) {
        self.failing.borrow_mut().insert(path.to_string());
    }

    /// Writes to `path` report no result and store nothing.
    pub(crate) fn drop_writes(&self, path: &str) {
        self.dropped.borrow_mut().insert(path.to_string());
    }

    /// Permission changes on `path` return an I/O error.
    pub(crate) fn lock_permissions(&self, path: &str) {
        self.locked.borrow_mut().insert(path.to_string());
    }

    pub(crate) fn writes(&self) -> Vec<String> {
        self.ops
            .borrow()
            .iter()
            .filter_map(|op| match op {
                Op::Write(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn ops(&self) -> Vec<Op> {
        self.ops.borrow().clone()
    }
}

impl Vfs for MemoryFs {
    fn exists(&self, path: &str) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        self.files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.to_string()))
    }

    fn write(&self, path: &str, bytes: &[u8]) -> io::Result<Option<usize>> {
        self.ops.borrow_mut().push(Op::Write(path.to_string()));
        if self.failing.borrow().contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("NFS3ERR_ACCES: {}", path),
            ));
        }
        if self.dropped.borrow().contains(path) {
            return Ok(None);
        }
        self.files
            .borrow_mut()
            .insert(path.to_string(), bytes.to_vec());
        Ok(Some(bytes.len()))
    }

    fn delete(&self, path: &str) -> io::Result<()> {
        self.ops.borrow_mut().push(Op::Delete(path.to_string()));
        self.files
            .borrow_mut()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.to_string()))
    }

    fn mkdirs(&self, path: &str) -> io::Result<()> {
        self.ops.borrow_mut().push(Op::Mkdirs(path.to_string()));
        Ok(())
    }

    fn set_permissions(&self, path: &str, mode: u32) -> io::Result<()> {
        self.ops
            .borrow_mut()
            .push(Op::SetPermissions(path.to_string(), mode));
        if self.locked.borrow().contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("operation not permitted: {}", path),
            ));
        }
        Ok(())
    }
}
