use axum::{extract::State, Json};
use mongodb::bson::doc;
use std::sync::Arc;

use crate::{
    auth::SessionClaims,
    constants::*,
    handlers::villager::helper::villager_by_id,
    models::{ProfileResponse, SessionInfo, ValidateResponse},
    state::AppState,
    utils::AppError,
};

/// Validate token
///
/// Returns the claims of a valid admin or villager session
#[utoipa::path(
    get,
    path = "/api/auth/validate",
    responses(
        (status = 200, description = "Token is valid", body = ValidateResponse),
        (status = 401, description = "Missing, invalid or expired token", body = crate::models::ErrorResponse)
    ),
    tag = "Auth API",
    security(("authorization" = []))
)]
pub async fn validate_token_handler(claims: SessionClaims) -> Json<ValidateResponse> {
    let res = ValidateResponse {
        success: true,
        valid: true,
        session: SessionInfo::from(&claims),
    };
    Json(res)
}

/// Caller profile
///
/// Villagers also get their current record and the number of sensors mapped to them.
/// Admins get a count of all sensors.
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Profile of the caller", body = ProfileResponse),
        (status = 401, description = "Missing, invalid or expired token", body = crate::models::ErrorResponse)
    ),
    tag = "Auth API",
    security(("authorization" = []))
)]
pub async fn profile_handler(
    State(state): State<Arc<AppState>>,
    claims: SessionClaims,
) -> Result<Json<ProfileResponse>, AppError> {
    let (villager, filter) = match claims.villager_id() {
        Some(id) => {
            let villager = villager_by_id(&state.db, id).await?;
            (Some(villager), Some(doc! {"villagerId": id}))
        }
        None => (None, None),
    };
    let sensor_count = state
        .db
        .count_documents(DB_NAME, COLL_SENSORS, filter, None)
        .await?;
    let res = ProfileResponse {
        success: true,
        profile: SessionInfo::from(&claims),
        villager,
        sensor_count,
    };
    Ok(Json(res))
}
