use axum::{extract::State, Json};
use mongodb::bson::doc;
use std::sync::Arc;

use super::helper::parse_dev_eui;
use crate::{
    auth::AdminClaims,
    constants::*,
    models::GenericResponse,
    state::AppState,
    utils::{AppError, ValidatedPath},
};

/// Delete sensor
///
/// Telemetry already recorded for the sensor is kept
#[utoipa::path(
    delete,
    path = "/api/sensors/{dev_eui}",
    params(("dev_eui" = String, Path, description = "16 hex character device identifier")),
    responses(
        (status = 200, description = "Sensor deleted", body = GenericResponse),
        (status = 404, description = "Sensor not found", body = crate::models::ErrorResponse)
    ),
    tag = "Sensor API",
    security(("authorization" = []))
)]
pub async fn delete_sensor_handler(
    State(state): State<Arc<AppState>>,
    _admin: AdminClaims,
    ValidatedPath(dev_eui): ValidatedPath<String>,
) -> Result<Json<GenericResponse>, AppError> {
    let dev_eui = parse_dev_eui(&dev_eui)?;
    let filter = doc! {"devEui": &dev_eui};
    let deleted = state
        .db
        .delete_one(DB_NAME, COLL_SENSORS, filter, None)
        .await?;
    if deleted == 0 {
        let err = AppError::NotFound(format!("Sensor not found with devEui: {dev_eui}"));
        return Err(err);
    }
    tracing::info!("Sensor {dev_eui} deleted");
    let res = GenericResponse {
        success: true,
        message: format!("Sensor {dev_eui} deleted"),
    };
    Ok(Json(res))
}
