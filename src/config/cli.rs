use crate::core::Storage;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// 本機檔案系統存儲，路徑相對於 `base_path`
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve(path);
        tracing::debug!("Reading {}", full_path.display());
        Ok(tokio::fs::read(full_path).await?)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);

        if let Some(parent) = full_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&full_path, data).await?;
        Ok(())
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new(Path::new("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_then_read_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        storage.write_file("nested/dir/OUTPUT.txt", b"A-B: 1\n").await.unwrap();

        assert!(temp_dir.path().join("nested/dir/OUTPUT.txt").exists());
        assert_eq!(storage.read_file("nested/dir/OUTPUT.txt").await.unwrap(), b"A-B: 1\n");
    }

    #[tokio::test]
    async fn test_read_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());
        let err = storage.read_file("missing.txt").await.unwrap_err();
        assert!(matches!(err, crate::utils::error::EtlError::IoError(_)));
    }

    #[test]
    fn test_absolute_path_ignores_base() {
        let temp_dir = TempDir::new().unwrap();
        let absolute = temp_dir.path().join("abs.txt");
        std::fs::write(&absolute, "A=MO10:00-12:00\n").unwrap();

        let storage = LocalStorage::new("/nonexistent-base");
        let path = absolute.to_string_lossy().into_owned();
        let data = tokio_test::block_on(storage.read_file(&path)).unwrap();
        assert_eq!(data, b"A=MO10:00-12:00\n");
    }
}
