//! Filesystem storage for original uploads and their converted artifacts.

use std::io;
use std::path::{Path, PathBuf};

/// Flat directory of files keyed by name. Holds both the original upload
/// and the WebP artifact written next to it.
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a file name maps to inside the store.
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    pub async fn write(&self, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.path_for(file_name);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }

    /// Read a stored file, mapping a missing entry to `None`.
    pub async fn read(&self, file_name: &str) -> io::Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path_for(file_name)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Reduce a client-supplied upload name to its final path component, so
/// names can never address anything outside the storage root. Returns
/// `None` when nothing usable remains.
pub fn clean_file_name(raw: &str) -> Option<String> {
    let name = Path::new(raw).file_name()?.to_str()?;
    Some(name.to_string())
}
