//! String path helpers that work for local paths and VFS URLs alike.

/// Kind of location a path points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// Plain filesystem path.
    Local,
    /// `nfs://` URL.
    Nfs,
    /// `smb://` URL.
    Smb,
}

impl PathKind {
    /// Whether the path lives on a network share.
    pub fn is_network(&self) -> bool {
        !matches!(self, PathKind::Local)
    }
}

/// Classify a path by its URL scheme.
pub fn classify_path(path: &str) -> PathKind {
    let lower = path.get(..6).unwrap_or(path).to_ascii_lowercase();
    if lower.starts_with("nfs://") {
        PathKind::Nfs
    } else if lower.starts_with("smb://") {
        PathKind::Smb
    } else {
        PathKind::Local
    }
}

fn last_separator(path: &str) -> Option<usize> {
    path.rfind(['/', '\\'])
}

/// Strip the extension from the final path component.
///
/// Leading dots of the file name do not start an extension, so
/// `/media/.hidden` is returned unchanged.
pub fn strip_extension(path: &str) -> &str {
    let name_start = last_separator(path).map(|i| i + 1).unwrap_or(0);
    let name = &path[name_start..];
    let leading_dots = name.len() - name.trim_start_matches('.').len();

    match name[leading_dots..].rfind('.') {
        Some(dot) => &path[..name_start + leading_dots + dot],
        None => path,
    }
}

/// Directory part of a path, if it has one.
pub fn parent_dir(path: &str) -> Option<&str> {
    let idx = last_separator(path)?;
    let dir = &path[..idx];
    if dir.is_empty() || dir.ends_with(':') || dir.ends_with(":/") {
        None
    } else {
        Some(dir)
    }
}

/// Join a directory and a file name with a forward slash.
pub fn join_path(dir: &str, name: &str) -> String {
    if dir.ends_with('/') || dir.ends_with('\\') {
        format!("{}{}", dir, name)
    } else {
        format!("{}/{}", dir, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_schemes() {
        assert_eq!(classify_path("nfs://nas/media/a.mkv"), PathKind::Nfs);
        assert_eq!(classify_path("NFS://nas/a.mkv"), PathKind::Nfs);
        assert_eq!(classify_path("smb://nas/a.mkv"), PathKind::Smb);
        assert_eq!(classify_path("/srv/media/a.mkv"), PathKind::Local);
        assert_eq!(classify_path("a"), PathKind::Local);
        assert!(!PathKind::Local.is_network());
        assert!(PathKind::Smb.is_network());
    }

    #[test]
    fn strip_extension_only_touches_file_name() {
        assert_eq!(strip_extension("/media/show.s01e01.mkv"), "/media/show.s01e01");
        assert_eq!(strip_extension("/media/v1.2/movie"), "/media/v1.2/movie");
        assert_eq!(strip_extension("/media/.hidden"), "/media/.hidden");
        assert_eq!(strip_extension("nfs://nas/tv/ep.mp4"), "nfs://nas/tv/ep");
        assert_eq!(strip_extension("movie.avi"), "movie");
        assert_eq!(strip_extension(r"C:\media\movie.mkv"), r"C:\media\movie");
    }

    #[test]
    fn parent_dir_works() {
        assert_eq!(parent_dir("/media/tv/ep.mkv"), Some("/media/tv"));
        assert_eq!(parent_dir("nfs://nas/tv/ep.mkv"), Some("nfs://nas/tv"));
        assert_eq!(parent_dir("ep.mkv"), None);
        assert_eq!(parent_dir("/ep.mkv"), None);
        assert_eq!(parent_dir("nfs://nas"), None);
    }

    #[test]
    fn join_adds_single_separator() {
        assert_eq!(join_path("/media", "chapters.xml"), "/media/chapters.xml");
        assert_eq!(join_path("/media/", "chapters.xml"), "/media/chapters.xml");
    }
}
