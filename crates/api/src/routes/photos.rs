//! Photo listing route.

use axum::{Router, extract::State, response::Response, routing::get};
use serde::Serialize;
use tracing::{debug, error};

use photodrop_core::{AssetDescriptor, MAX_LIST_RESULTS};
use photodrop_shared::AppError;

use crate::{AppState, envelope};

/// Creates the listing route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/photos", get(list_photos))
}

/// Response body for a listing.
#[derive(Debug, Serialize)]
pub struct PhotosResponse {
    /// Assets under the provider's namespace.
    pub photos: Vec<AssetDescriptor>,
}

async fn list_photos(State(state): State<AppState>) -> Response {
    let prefix = state.provider.namespace();

    match state.provider.list(prefix, MAX_LIST_RESULTS).await {
        Ok(mut photos) => {
            photos.truncate(MAX_LIST_RESULTS);
            debug!(prefix = %prefix, count = photos.len(), "Listed photos");
            envelope::success(PhotosResponse { photos })
        }
        Err(e) => {
            let e = AppError::from(e);
            error!(error = %e, code = e.error_code(), prefix = %prefix, "Listing failed");
            envelope::failure(&e)
        }
    }
}
