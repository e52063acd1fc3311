use axum::{extract::State, Json};
use mongodb::bson::{doc, Document};
use std::sync::Arc;

use super::helper::{parse_dev_eui, sensor_by_dev_eui};
use crate::{
    auth::{AdminClaims, VillagerClaims},
    constants::*,
    handlers::villager::get::page_options,
    liveness::{decorate, decorate_all},
    models::{Sensor, SensorListParams, SensorListResponse, SensorResponse},
    state::AppState,
    utils::{get_epoch_ts, AppError, ValidatedPath, ValidatedQuery},
};

/// List sensors
///
/// Every sensor is decorated with its liveness and latest reading
#[utoipa::path(
    get,
    path = "/api/sensors",
    params(SensorListParams),
    responses(
        (status = 200, description = "List of sensors", body = SensorListResponse),
        (status = 401, description = "Invalid token", body = crate::models::ErrorResponse),
        (status = 403, description = "Not an admin session", body = crate::models::ErrorResponse)
    ),
    tag = "Sensor API",
    security(("authorization" = []))
)]
pub async fn list_sensors_handler(
    State(state): State<Arc<AppState>>,
    _admin: AdminClaims,
    ValidatedQuery(params): ValidatedQuery<SensorListParams>,
) -> Result<Json<SensorListResponse>, AppError> {
    let mut filter = Document::new();
    if let Some(villager_id) = params.villager_id {
        filter.insert("villagerId", villager_id);
    }
    let options = page_options(params.page_index, params.page_size, doc! {"createdTs": -1});
    let sensors = state
        .db
        .find::<Sensor>(DB_NAME, COLL_SENSORS, Some(filter), Some(options))
        .await?;
    let threshold = state.config.sensor_live_threshold;
    let data = decorate_all(&state.db, sensors, get_epoch_ts(), threshold).await?;
    let res = SensorListResponse {
        success: true,
        data,
    };
    Ok(Json(res))
}

/// Get sensor by devEui
#[utoipa::path(
    get,
    path = "/api/sensors/{dev_eui}",
    params(("dev_eui" = String, Path, description = "16 hex character device identifier")),
    responses(
        (status = 200, description = "Sensor with liveness", body = SensorResponse),
        (status = 404, description = "Sensor not found", body = crate::models::ErrorResponse)
    ),
    tag = "Sensor API",
    security(("authorization" = []))
)]
pub async fn get_sensor_handler(
    State(state): State<Arc<AppState>>,
    _admin: AdminClaims,
    ValidatedPath(dev_eui): ValidatedPath<String>,
) -> Result<Json<SensorResponse>, AppError> {
    let dev_eui = parse_dev_eui(&dev_eui)?;
    let sensor = sensor_by_dev_eui(&state.db, &dev_eui).await?;
    let threshold = state.config.sensor_live_threshold;
    let data = decorate(&state.db, sensor, get_epoch_ts(), threshold).await?;
    let res = SensorResponse {
        success: true,
        data,
    };
    Ok(Json(res))
}

/// Sensors of the logged in villager
#[utoipa::path(
    get,
    path = "/api/my-sensors",
    responses(
        (status = 200, description = "Sensors mapped to the caller", body = SensorListResponse),
        (status = 403, description = "Not a villager session", body = crate::models::ErrorResponse)
    ),
    tag = "Villager App API",
    security(("authorization" = []))
)]
pub async fn my_sensors_handler(
    State(state): State<Arc<AppState>>,
    VillagerClaims(claims): VillagerClaims,
) -> Result<Json<SensorListResponse>, AppError> {
    let Some(villager_id) = claims.villager_id() else {
        let res = SensorListResponse {
            success: true,
            data: vec![],
        };
        return Ok(Json(res));
    };
    let filter = Some(doc! {"villagerId": villager_id});
    let options = page_options(None, None, doc! {"createdTs": -1});
    let sensors = state
        .db
        .find::<Sensor>(DB_NAME, COLL_SENSORS, filter, Some(options))
        .await?;
    let threshold = state.config.sensor_live_threshold;
    let data = decorate_all(&state.db, sensors, get_epoch_ts(), threshold).await?;
    let res = SensorListResponse {
        success: true,
        data,
    };
    Ok(Json(res))
}
