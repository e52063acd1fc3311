use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use super::helper::{parse_dev_eui, sensor_by_dev_eui};
use crate::{
    auth::IngestKey,
    constants::*,
    models::{Reading, ReadingAccepted, ReadingReq},
    state::AppState,
    utils::{get_epoch_ts, AppError, ValidatedBody, ValidatedPath},
};

/// Report telemetry
///
/// Called by sensor uplinks, authenticated by the `x-api-key` ingest key.
/// The reading marks the sensor as seen at `ts`.
#[utoipa::path(
    post,
    path = "/api/sensors/{dev_eui}/readings",
    params(("dev_eui" = String, Path, description = "16 hex character device identifier")),
    request_body = ReadingReq,
    responses(
        (status = 201, description = "Reading stored", body = ReadingAccepted),
        (status = 400, description = "Invalid reading or inactive sensor", body = crate::models::ErrorResponse),
        (status = 401, description = "Missing or invalid ingest key", body = crate::models::ErrorResponse),
        (status = 404, description = "Sensor not registered", body = crate::models::ErrorResponse)
    ),
    tag = "Sensor API",
    security(("x-api-key" = []))
)]
pub async fn report_reading_handler(
    State(state): State<Arc<AppState>>,
    _key: IngestKey,
    ValidatedPath(dev_eui): ValidatedPath<String>,
    ValidatedBody(body): ValidatedBody<ReadingReq>,
) -> Result<(StatusCode, Json<ReadingAccepted>), AppError> {
    let dev_eui = parse_dev_eui(&dev_eui)?;
    let ts = reading_ts(body.ts, get_epoch_ts())?;
    let sensor = sensor_by_dev_eui(&state.db, &dev_eui).await?;
    if !sensor.is_active {
        let err = format!("Sensor {dev_eui} is inactive");
        return Err(AppError::BadRequestErr(err));
    }
    let reading = Reading {
        dev_eui,
        ts,
        temperature: body.temperature,
        humidity: body.humidity,
        moisture: body.moisture,
        battery: body.battery,
    };
    state
        .db
        .insert_one::<Reading>(TELEMETRY_DB_NAME, COLL_READINGS, &reading, None)
        .await?;
    tracing::debug!("Reading stored for {} at {}", reading.dev_eui, reading.ts);
    let res = ReadingAccepted {
        success: true,
        dev_eui: reading.dev_eui,
        ts: reading.ts,
    };
    Ok((StatusCode::CREATED, Json(res)))
}

/// Readings dated after `now` plus the allowed skew, or beyond the
/// range of a BSON int64, are rejected
fn reading_ts(ts: Option<u64>, now: u64) -> Result<u64, AppError> {
    let Some(ts) = ts else {
        return Ok(now);
    };
    if i64::try_from(ts).is_err() {
        let err = format!("Reading timestamp {ts} is out of range");
        return Err(AppError::BadRequestErr(err));
    }
    if ts > now.saturating_add(READING_MAX_CLOCK_SKEW_SECS) {
        let err = format!("Reading timestamp {ts} is ahead of the server time {now}");
        return Err(AppError::BadRequestErr(err));
    }
    Ok(ts)
}
