//! Photo deletion route.

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, header},
    response::Response,
    routing::post,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use photodrop_core::DeletionResult;
use photodrop_shared::{AppError, AppResult};

use crate::{AppState, envelope};

/// Creates the deletion route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/delete", post(delete_photo))
}

/// Request body for a deletion.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteRequest {
    /// Provider id of the asset to remove.
    #[serde(default)]
    pub public_id: Option<String>,
}

/// Response body for a deletion.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Provider acknowledgement, passed through unchanged.
    pub result: DeletionResult,
}

/// Parse the request body leniently.
///
/// Bodies that are not declared as JSON, or are blank, read as an empty
/// request so they fail the `public_id` check rather than the parser.
fn parse_request(headers: &HeaderMap, body: &[u8]) -> AppResult<DeleteRequest> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.to_ascii_lowercase().contains("json"));

    if !is_json || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(DeleteRequest::default());
    }

    serde_json::from_slice(body).map_err(|e| AppError::validation(e.to_string()))
}

/// Extract a non-empty public id.
fn required_public_id(request: DeleteRequest) -> AppResult<String> {
    request
        .public_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::validation("public_id required"))
}

async fn delete_photo(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let public_id = match parse_request(&headers, &body).and_then(required_public_id) {
        Ok(id) => id,
        Err(e) => {
            warn!(error = %e, code = e.error_code(), "Rejected delete");
            return envelope::failure(&e);
        }
    };

    match state.provider.delete(&public_id).await {
        Ok(result) => {
            info!(
                public_id = %public_id,
                result = %result.result,
                removed = result.is_ok(),
                "Delete acknowledged"
            );
            envelope::success(DeleteResponse { result })
        }
        Err(e) => {
            let e = AppError::from(e);
            error!(error = %e, code = e.error_code(), public_id = %public_id, "Delete failed");
            envelope::failure(&e)
        }
    }
}
