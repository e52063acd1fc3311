use mongodb::{bson::doc, options::FindOneOptions};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    constants::*,
    models::{Reading, Sensor, SensorView},
    utils::format_epoch_ts,
};

#[cfg(test)]
use mockall_double::double;

#[cfg_attr(test, double)]
use crate::database::AppDatabase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Liveness {
    Live,
    Offline,
}

/// A sensor is live when it reported within the last `threshold` seconds.
/// Timestamps ahead of `now` count as just seen.
pub fn classify(last_seen: Option<u64>, now: u64, threshold: u64) -> Liveness {
    match last_seen {
        Some(ts) if now.saturating_sub(ts) <= threshold => Liveness::Live,
        _ => Liveness::Offline,
    }
}

/// Newest telemetry sample of a sensor
pub async fn latest_reading(
    db: &Arc<AppDatabase>,
    dev_eui: &str,
) -> anyhow::Result<Option<Reading>> {
    let filter = Some(doc! {"devEui": dev_eui});
    let options = FindOneOptions::builder().sort(doc! {"ts": -1}).build();
    let reading = db
        .find_one::<Reading>(TELEMETRY_DB_NAME, COLL_READINGS, filter, Some(options))
        .await?;
    Ok(reading)
}

/// Newest sample of a sensor and its status, one telemetry lookup
pub async fn sensor_status(
    db: &Arc<AppDatabase>,
    dev_eui: &str,
    now: u64,
    threshold: u64,
) -> anyhow::Result<(Option<Reading>, Liveness)> {
    let latest = latest_reading(db, dev_eui).await?;
    let status = classify(latest.as_ref().map(|reading| reading.ts), now, threshold);
    Ok((latest, status))
}

/// Builds the view from an already fetched status
pub fn to_view(sensor: Sensor, latest: Option<Reading>, status: Liveness) -> SensorView {
    let last_seen = latest.as_ref().map(|reading| reading.ts);
    SensorView {
        status,
        last_seen,
        last_seen_at: last_seen.and_then(format_epoch_ts),
        latest_reading: latest,
        sensor,
    }
}

pub async fn decorate(
    db: &Arc<AppDatabase>,
    sensor: Sensor,
    now: u64,
    threshold: u64,
) -> anyhow::Result<SensorView> {
    let (latest, status) = sensor_status(db, &sensor.dev_eui, now, threshold).await?;
    Ok(to_view(sensor, latest, status))
}

pub async fn decorate_all(
    db: &Arc<AppDatabase>,
    sensors: Vec<Sensor>,
    now: u64,
    threshold: u64,
) -> anyhow::Result<Vec<SensorView>> {
    let mut views = Vec::with_capacity(sensors.len());
    for sensor in sensors {
        views.push(decorate(db, sensor, now, threshold).await?);
    }
    Ok(views)
}
