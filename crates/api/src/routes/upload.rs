//! Photo upload route.

use axum::{
    Router,
    extract::{Multipart, State, multipart::MultipartRejection},
    response::Response,
    routing::post,
};
use serde::Serialize;
use tracing::{error, info, warn};

use photodrop_core::AssetReference;
use photodrop_shared::AppError;

use crate::{AppState, envelope, staging::UploadForm};

/// Creates the upload route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/upload", post(upload))
}

/// Response body for a stored upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Where the provider put the file.
    pub file: AssetReference,
}

/// Stage the `photo` field, hand it to the provider, and remove it again.
async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let UploadForm { photo, filename } =
        match UploadForm::receive(multipart, state.upload_dir.as_path()).await {
            Ok(form) => form,
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "Rejected upload");
                return envelope::failure(&e);
            }
        };

    let stored = state.provider.store(photo.source(), &filename).await;
    photo.release().await;

    match stored {
        Ok(file) => {
            info!(id = %file.id(), filename = %filename, "Upload stored");
            envelope::success(UploadResponse { file })
        }
        Err(e) => {
            let e = AppError::from(e);
            error!(error = %e, code = e.error_code(), filename = %filename, "Upload failed");
            envelope::failure(&e)
        }
    }
}
