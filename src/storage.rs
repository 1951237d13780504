//! Sandboxed resolution of request paths inside the media root.

use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::ErrorKind;
use tracing::warn;

/// The data directory all served and uploaded files must stay within.
#[derive(Clone, Debug)]
pub struct MediaRoot {
    root: PathBuf,
}

impl MediaRoot {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub async fn ensure_root(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root).await
    }

    pub fn root_path(&self) -> &Path {
        &self.root
    }

    /// Resolves a decoded request path to an absolute path under the root.
    ///
    /// Escapes are rejected before any filesystem access; symlinked
    /// components are rejected afterwards since they escape by indirection.
    /// With `allow_missing_leaf` the target itself (and any missing parent
    /// directories about to be created) may not exist yet.
    pub async fn resolve_checked(
        &self,
        relative: &str,
        allow_missing_leaf: bool,
    ) -> Result<PathBuf, StorageError> {
        let target = self.resolve(relative)?;
        self.ensure_no_symlink_components(&target, allow_missing_leaf)
            .await?;
        Ok(target)
    }

    /// Segment-wise join that never leaves the root. `..`, absolute
    /// components and drive prefixes are rejected outright rather than
    /// normalized away, so no string-prefix comparison is ever needed.
    fn resolve(&self, relative: &str) -> Result<PathBuf, StorageError> {
        let trimmed = relative.trim_start_matches(['/', '\\']);
        let mut normalized = PathBuf::new();

        for component in Path::new(trimmed).components() {
            match component {
                Component::Normal(segment) => normalized.push(segment),
                Component::CurDir => continue,
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    warn!(path = relative, "rejected path escaping media root");
                    return Err(StorageError::Traversal);
                }
            }
        }

        Ok(self.root.join(normalized))
    }

    async fn ensure_no_symlink_components(
        &self,
        target: &Path,
        allow_missing_leaf: bool,
    ) -> Result<(), StorageError> {
        let relative = target
            .strip_prefix(&self.root)
            .map_err(|_| StorageError::Traversal)?;
        let mut current = PathBuf::from(&self.root);
        let mut components = relative.components().peekable();

        while let Some(component) = components.next() {
            current.push(component.as_os_str());
            match fs::symlink_metadata(&current).await {
                Ok(metadata) => {
                    if metadata.file_type().is_symlink() {
                        warn!(path = %relative.display(), "rejected symlink inside media root");
                        return Err(StorageError::Traversal);
                    }
                    if components.peek().is_some() && !metadata.is_dir() {
                        return Err(StorageError::Io(io::Error::from(ErrorKind::NotFound)));
                    }
                }
                Err(err) if err.kind() == ErrorKind::NotFound && allow_missing_leaf => {
                    return Ok(());
                }
                Err(err) => return Err(StorageError::Io(err)),
            }
        }

        Ok(())
    }
}

#[derive(Debug)]
pub enum StorageError {
    Traversal,
    Io(io::Error),
}

impl From<io::Error> for StorageError {
    fn from(err: io::Error) -> Self {
        StorageError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::{MediaRoot, StorageError};
    use tempfile::tempdir;

    fn make_root() -> (tempfile::TempDir, MediaRoot) {
        let temp = tempdir().expect("tempdir");
        let root = temp.path().join("data");
        std::fs::create_dir_all(&root).expect("create data root");
        (temp, MediaRoot::new(root))
    }

    #[tokio::test]
    async fn rejects_parent_dir_segments() {
        let (_temp, root) = make_root();
        let result = root.resolve_checked("../outside.mp3", false).await;
        assert!(matches!(result, Err(StorageError::Traversal)));
    }

    #[tokio::test]
    async fn rejects_nested_parent_dir_segments() {
        let (_temp, root) = make_root();
        let result = root.resolve_checked("albums/../../outside.mp3", true).await;
        assert!(matches!(result, Err(StorageError::Traversal)));
    }

    #[tokio::test]
    async fn strips_leading_separators() {
        let (_temp, root) = make_root();
        std::fs::write(root.root_path().join("track.mp3"), b"x").expect("write");
        let resolved = root
            .resolve_checked("/track.mp3", false)
            .await
            .expect("resolve");
        assert_eq!(resolved, root.root_path().join("track.mp3"));
    }

    #[tokio::test]
    async fn allows_missing_leaf_for_uploads() {
        let (_temp, root) = make_root();
        let resolved = root
            .resolve_checked("albums/new/track.mp3", true)
            .await
            .expect("resolve");
        assert!(resolved.starts_with(root.root_path()));
    }

    #[tokio::test]
    async fn missing_leaf_is_not_found_when_required() {
        let (_temp, root) = make_root();
        let result = root.resolve_checked("absent.mp3", false).await;
        assert!(matches!(result, Err(StorageError::Io(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn rejects_symlink_components() {
        use std::os::unix::fs::symlink;

        let (temp, root) = make_root();
        let outside = temp.path().join("outside.mp3");
        std::fs::write(&outside, b"secret").expect("write outside file");
        symlink(&outside, root.root_path().join("link.mp3")).expect("symlink");

        let result = root.resolve_checked("link.mp3", false).await;
        assert!(matches!(result, Err(StorageError::Traversal)));
    }
}
