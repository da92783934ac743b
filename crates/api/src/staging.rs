//! Staging of multipart uploads on local disk.
//!
//! A staged file is owned by a [`TempUpload`]. Dropping the guard removes the
//! file, so every early return or error path cleans up; the normal path calls
//! [`TempUpload::release`] to remove it without blocking the runtime.

use std::path::Path;

use axum::extract::multipart::{Field, Multipart, MultipartError, MultipartRejection};
use axum::http::StatusCode;
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use photodrop_core::UploadSource;
use photodrop_shared::{AppError, AppResult};

/// Multipart field carrying the file.
pub const PHOTO_FIELD: &str = "photo";
/// Multipart field carrying the target filename.
pub const FILENAME_FIELD: &str = "filename";

/// A staged upload that is removed from disk when released or dropped.
pub struct TempUpload {
    path: Option<TempPath>,
    source: UploadSource,
}

impl TempUpload {
    /// Stream a multipart field into a uniquely named file inside `dir`.
    pub async fn stage(mut field: Field<'_>, dir: &Path) -> AppResult<Self> {
        let content_type = field.content_type().map(str::to_string);
        let original_name = field.file_name().map(str::to_string);

        let (file, path) = tempfile::Builder::new()
            .prefix("photo-")
            .tempfile_in(dir)
            .map_err(|e| AppError::internal(format!("failed to stage upload: {e}")))?
            .into_parts();

        // `path` removes the file if anything below fails.
        let mut file = tokio::fs::File::from_std(file);
        let mut size = 0u64;
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            size += chunk.len() as u64;
            file.write_all(&chunk)
                .await
                .map_err(|e| AppError::internal(format!("failed to stage upload: {e}")))?;
        }
        file.flush()
            .await
            .map_err(|e| AppError::internal(format!("failed to stage upload: {e}")))?;
        drop(file);

        debug!(path = %path.display(), size, "Staged upload");

        let source = UploadSource {
            path: path.to_path_buf(),
            content_type,
            original_name,
            size,
        };

        Ok(Self {
            path: Some(path),
            source,
        })
    }

    /// The staged file as handed to a provider.
    pub fn source(&self) -> &UploadSource {
        &self.source
    }

    /// Remove the staged file.
    pub async fn release(mut self) {
        let Some(path) = self.path.take() else {
            return;
        };

        match tokio::task::spawn_blocking(move || path.close()).await {
            Ok(Ok(())) => debug!(path = %self.source.path.display(), "Removed staged upload"),
            Ok(Err(e)) => {
                warn!(error = %e, path = %self.source.path.display(), "Failed to remove staged upload");
            }
            Err(e) => warn!(error = %e, "Staged upload cleanup task failed"),
        }
    }
}

/// A validated upload form: one staged photo plus the target filename.
pub struct UploadForm {
    /// The staged photo.
    pub photo: TempUpload,
    /// Target filename supplied by the client.
    pub filename: String,
}

impl UploadForm {
    /// Read the multipart body, staging the `photo` field into `dir`.
    ///
    /// Unknown fields are skipped. A photo staged before a validation failure
    /// is removed when the error is returned.
    pub async fn receive(
        multipart: Result<Multipart, MultipartRejection>,
        dir: &Path,
    ) -> AppResult<Self> {
        let mut multipart = multipart.map_err(|e| AppError::validation(e.body_text()))?;

        let mut photo: Option<TempUpload> = None;
        let mut filename: Option<String> = None;

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();

            match name.as_str() {
                PHOTO_FIELD => {
                    if photo.is_some() {
                        return Err(AppError::validation("only one photo may be uploaded"));
                    }
                    photo = Some(TempUpload::stage(field, dir).await?);
                }
                FILENAME_FIELD => {
                    filename = Some(field.text().await.map_err(multipart_error)?);
                }
                other => debug!(field = %other, "Ignoring multipart field"),
            }
        }

        let photo = photo.ok_or_else(|| AppError::validation("photo required"))?;
        let filename = filename
            .filter(|name| !name.is_empty())
            .ok_or_else(|| AppError::validation("filename required"))?;

        Ok(Self { photo, filename })
    }
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::validation(err.body_text())
    }
}
