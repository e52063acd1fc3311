use axum::http::Uri;

use crate::utils::AppError;

pub async fn global_404_handler(uri: Uri) -> AppError {
    AppError::NotFound(format!("Route `{}` does not exist", uri))
}
