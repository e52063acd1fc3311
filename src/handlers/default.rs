use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::models::GenericResponse;

/// Handler function for default route "/"
/// Returns a JSON response with 200 status code
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Server is up", body = GenericResponse)
    ),
    tag = "Debugging API"
)]
pub async fn default_route_handler() -> impl IntoResponse {
    let response = GenericResponse {
        success: true,
        message: "Smart Panchayat server is running".to_owned(),
    };
    (StatusCode::OK, Json(response))
}
