//! Image storage backends.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWriteExt};

/// An opened stored image, ready to be streamed.
pub struct StoredImage {
    pub reader: Box<dyn AsyncRead + Send + Unpin>,
    pub len: Option<u64>,
}

impl std::fmt::Debug for StoredImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredImage")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

/// Trait for storing and reading uploaded images by file name.
///
/// Names passed in are already validated as single path components.
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Write `contents` under `file_name`.
    async fn save(&self, file_name: &str, contents: &[u8]) -> io::Result<()>;

    /// Open `file_name`, returning `None` when it does not exist.
    async fn open(&self, file_name: &str) -> io::Result<Option<StoredImage>>;

    /// Check that the backend is usable; used by the readiness probe.
    async fn check(&self) -> io::Result<()>;
}

/// Stores images as plain files in one directory.
pub struct LocalImageStorage {
    root: PathBuf,
}

impl LocalImageStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ImageStorage for LocalImageStorage {
    async fn save(&self, file_name: &str, contents: &[u8]) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.root.join(file_name))
            .await?;
        file.write_all(contents).await?;
        file.flush().await
    }

    async fn open(&self, file_name: &str) -> io::Result<Option<StoredImage>> {
        let path = self.root.join(file_name);
        let file = match tokio::fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Ok(None);
        }

        Ok(Some(StoredImage {
            reader: Box::new(file),
            len: Some(metadata.len()),
        }))
    }

    async fn check(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        let metadata = tokio::fs::metadata(&self.root).await?;
        if metadata.permissions().readonly() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("upload directory {} is read-only", self.root.display()),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_save_then_open() {
        let dir = tempdir().unwrap();
        let storage = LocalImageStorage::new(dir.path().join("products"));

        storage.save("a.png", b"\x89PNG").await.unwrap();

        let mut image = storage.open("a.png").await.unwrap().unwrap();
        assert_eq!(image.len, Some(4));
        let mut read = Vec::new();
        image.reader.read_to_end(&mut read).await.unwrap();
        assert_eq!(read, b"\x89PNG");
    }

    #[tokio::test]
    async fn test_open_missing_is_none() {
        let dir = tempdir().unwrap();
        let storage = LocalImageStorage::new(dir.path());

        assert!(storage.open("missing.jpg").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_never_overwrites() {
        let dir = tempdir().unwrap();
        let storage = LocalImageStorage::new(dir.path());

        storage.save("a.gif", b"one").await.unwrap();
        let err = storage.save("a.gif", b"two").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
    }

    #[tokio::test]
    async fn test_check_creates_directory() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("nested").join("products");
        let storage = LocalImageStorage::new(&root);

        storage.check().await.unwrap();
        assert!(root.is_dir());
    }
}
