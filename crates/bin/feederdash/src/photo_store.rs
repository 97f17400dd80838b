//! Captured photos written to a local directory.

use std::path::PathBuf;

use feederdash_app::ports::PhotoStore;
use feederdash_domain::error::FeederError;

/// Writes each capture to `<dir>/photo_<taken_at>.jpg`.
#[derive(Debug, Clone)]
pub struct DirectoryPhotoStore {
    dir: PathBuf,
}

impl DirectoryPhotoStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl PhotoStore for DirectoryPhotoStore {
    async fn store(&self, photo: Vec<u8>, taken_at: i64) -> Result<String, FeederError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|err| FeederError::Storage(Box::new(err)))?;
        let path = self.dir.join(format!("photo_{taken_at}.jpg"));
        tokio::fs::write(&path, photo)
            .await
            .map_err(|err| FeederError::Storage(Box::new(err)))?;
        tracing::debug!(path = %path.display(), "photo stored");
        Ok(path.display().to_string())
    }
}
