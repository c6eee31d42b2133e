use log::info;
use std::io;
use std::path::{Path, PathBuf};

const CACHE_DIR_NAME: &str = "oak311_rs_cache";

pub fn get_cache_dir() -> io::Result<PathBuf> {
    dirs::cache_dir()
        .map(|p| p.join(CACHE_DIR_NAME))
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "could not determine system cache directory",
            )
        })
}

pub async fn ensure_cache_dir_exists(path: &Path) -> io::Result<()> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("cache path exists but is not a directory: {}", path.display()),
                ));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating cache directory: {}", path.display());
            tokio::fs::create_dir_all(path).await
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_cache_dir_creates_missing_dir() -> io::Result<()> {
        let tmp = tempfile::tempdir()?;
        let target = tmp.path().join("nested").join("cache");

        ensure_cache_dir_exists(&target).await?;
        assert!(target.is_dir());

        // Calling again on an existing directory is a no-op.
        ensure_cache_dir_exists(&target).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_ensure_cache_dir_rejects_file() -> io::Result<()> {
        let tmp = tempfile::tempdir()?;
        let target = tmp.path().join("occupied");
        tokio::fs::write(&target, b"not a directory").await?;

        let result = ensure_cache_dir_exists(&target).await;
        assert!(result.is_err());
        Ok(())
    }
}
