//! Product image storage on local disk.
//!
//! Uploaded files land in the configured uploads directory under a random
//! name and are served back by both binaries under `/uploads`.

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Extensions accepted for product images.
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

/// Errors from storing an upload.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The file extension is not an accepted image type.
    #[error("unsupported image type: {0}")]
    UnsupportedType(String),

    /// Writing the file failed.
    #[error("failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

/// The sanitized lowercase extension of a filename, if it is allowed.
fn allowed_extension(filename: &str) -> Option<String> {
    let ext = Path::new(filename).extension()?.to_str()?.to_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Where an uploaded image was stored.
#[derive(Debug)]
pub struct StoredImage {
    /// Path on disk.
    pub path: PathBuf,
    /// Public URL path (`/uploads/<name>`), what goes into the database.
    pub url: String,
}

/// Write image bytes under a fresh random name.
///
/// # Errors
///
/// Returns `UploadError::UnsupportedType` for non-image extensions and
/// `UploadError::Io` if the directory or file cannot be written.
pub async fn store_image(
    uploads_dir: &Path,
    original_filename: &str,
    bytes: &[u8],
) -> Result<StoredImage, UploadError> {
    let ext = allowed_extension(original_filename)
        .ok_or_else(|| UploadError::UnsupportedType(original_filename.to_string()))?;

    tokio::fs::create_dir_all(uploads_dir).await?;

    let name = format!("{}.{ext}", Uuid::new_v4());
    let path = uploads_dir.join(&name);
    tokio::fs::write(&path, bytes).await?;

    Ok(StoredImage {
        path,
        url: format!("/uploads/{name}"),
    })
}

/// Delete a stored image by its public URL path, ignoring files that are
/// already gone.
pub async fn remove_image(uploads_dir: &Path, url: &str) {
    let Some(name) = url.strip_prefix("/uploads/") else {
        return;
    };
    // Refuse anything that could escape the uploads directory.
    if name.contains('/') || name.contains("..") {
        return;
    }
    if let Err(e) = tokio::fs::remove_file(uploads_dir.join(name)).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!("failed to remove upload {url}: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_extension() {
        assert_eq!(allowed_extension("foto.JPG").as_deref(), Some("jpg"));
        assert_eq!(allowed_extension("a.b.png").as_deref(), Some("png"));
        assert!(allowed_extension("script.sh").is_none());
        assert!(allowed_extension("noextension").is_none());
    }

    #[tokio::test]
    async fn test_store_and_remove_image() {
        let dir = std::env::temp_dir().join(format!("reis-uploads-{}", Uuid::new_v4()));

        let stored = store_image(&dir, "produto.png", b"fake-png")
            .await
            .expect("store");
        assert!(stored.path.exists());
        assert!(stored.url.starts_with("/uploads/"));
        assert!(stored.url.ends_with(".png"));

        remove_image(&dir, &stored.url).await;
        assert!(!stored.path.exists());

        // Removing again is a no-op.
        remove_image(&dir, &stored.url).await;

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_store_rejects_non_image() {
        let dir = std::env::temp_dir().join(format!("reis-uploads-{}", Uuid::new_v4()));
        let result = store_image(&dir, "malware.exe", b"nope").await;
        assert!(matches!(result, Err(UploadError::UnsupportedType(_))));
    }
}
