//! `std::fs` backed filesystem.

use std::fs;
use std::io;
use std::path::Path;

use super::paths::classify_path;
use super::Vfs;

/// Local filesystem access through `std::fs`.
///
/// `nfs://` and `smb://` URLs are refused with [`io::ErrorKind::Unsupported`]
/// and never exist; a host with network access supplies its own [`Vfs`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

fn local(path: &str) -> io::Result<&Path> {
    if classify_path(path).is_network() {
        return Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("network path is not reachable through the local filesystem: {}", path),
        ));
    }
    Ok(Path::new(path))
}

impl Vfs for LocalFs {
    fn exists(&self, path: &str) -> bool {
        local(path).map(Path::is_file).unwrap_or(false)
    }

    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        fs::read(local(path)?)
    }

    fn write(&self, path: &str, bytes: &[u8]) -> io::Result<Option<usize>> {
        fs::write(local(path)?, bytes)?;
        Ok(Some(bytes.len()))
    }

    fn delete(&self, path: &str) -> io::Result<()> {
        fs::remove_file(local(path)?)
    }

    fn mkdirs(&self, path: &str) -> io::Result<()> {
        fs::create_dir_all(local(path)?)
    }

    #[cfg(unix)]
    fn set_permissions(&self, path: &str, mode: u32) -> io::Result<()> {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(local(path)?, fs::Permissions::from_mode(mode))
    }
}
