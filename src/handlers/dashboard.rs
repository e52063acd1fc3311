use axum::{extract::State, Json};
use mongodb::{
    bson::{doc, Document},
    options::FindOptions,
};
use std::sync::Arc;

use crate::{
    auth::AdminClaims,
    constants::*,
    liveness::{sensor_status, to_view, Liveness},
    models::{DashboardData, DashboardResponse, Sensor, Villager},
    state::AppState,
    utils::{get_epoch_ts, AppError},
};

/// Admin dashboard
///
/// Villager and sensor counts plus the most recently registered records
#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "Dashboard data", body = DashboardResponse),
        (status = 401, description = "Invalid token", body = crate::models::ErrorResponse),
        (status = 403, description = "Not an admin session", body = crate::models::ErrorResponse)
    ),
    tag = "Admin API",
    security(("authorization" = []))
)]
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    _admin: AdminClaims,
) -> Result<Json<DashboardResponse>, AppError> {
    let db = &state.db;
    let now = get_epoch_ts();
    let threshold = state.config.sensor_live_threshold;
    let total_villagers = db
        .count_documents(DB_NAME, COLL_VILLAGERS, None, None)
        .await?;
    let active_villagers = db
        .count_documents(DB_NAME, COLL_VILLAGERS, Some(doc! {"isActive": true}), None)
        .await?;

    // liveness is derived from telemetry so every sensor has to be looked at
    let sensors = db
        .find::<Sensor>(DB_NAME, COLL_SENSORS, None, None)
        .await?;
    let total_sensors = sensors.len() as u64;
    let mut statuses = Vec::with_capacity(sensors.len());
    for sensor in sensors {
        let (latest, status) = sensor_status(db, &sensor.dev_eui, now, threshold).await?;
        statuses.push((sensor, latest, status));
    }
    let live_sensors = statuses
        .iter()
        .filter(|(_, _, status)| *status == Liveness::Live)
        .count() as u64;

    let recent_villagers = db
        .find::<Villager>(DB_NAME, COLL_VILLAGERS, None, Some(recent(doc! {"id": -1})))
        .await?;
    statuses.sort_by(|a, b| b.0.created_ts.cmp(&a.0.created_ts));
    statuses.truncate(DASHBOARD_RECENT_LIMIT as usize);
    let recent_sensors = statuses
        .into_iter()
        .map(|(sensor, latest, status)| to_view(sensor, latest, status))
        .collect();

    let data = DashboardData {
        total_villagers,
        active_villagers,
        total_sensors,
        live_sensors,
        offline_sensors: total_sensors - live_sensors,
        recent_villagers,
        recent_sensors,
    };
    let res = DashboardResponse {
        success: true,
        data,
    };
    Ok(Json(res))
}

fn recent(sort: Document) -> FindOptions {
    let mut options = FindOptions::default();
    options.sort = Some(sort);
    options.limit = Some(DASHBOARD_RECENT_LIMIT);
    options
}
