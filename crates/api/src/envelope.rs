//! Uniform `{ success, ... }` response bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use photodrop_shared::AppError;

#[derive(Serialize)]
struct Success<T> {
    success: bool,
    #[serde(flatten)]
    body: T,
}

#[derive(Serialize)]
struct Failure<'a> {
    success: bool,
    error: &'a str,
}

/// 200 with `success: true` and the fields of `body`.
pub fn success<T: Serialize>(body: T) -> Response {
    (
        StatusCode::OK,
        Json(Success {
            success: true,
            body,
        }),
    )
        .into_response()
}

/// The error's status with `success: false` and its bare message.
pub fn failure(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let rendered;
    let error = if err.message().is_empty() {
        rendered = err.to_string();
        rendered.as_str()
    } else {
        err.message()
    };

    (
        status,
        Json(Failure {
            success: false,
            error,
        }),
    )
        .into_response()
}
