use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Reading;
use crate::liveness::Liveness;

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sensor {
    pub dev_eui: String,
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor_type: Option<String>,

    /// villager the sensor is mapped to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub villager_id: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    pub is_active: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_ts: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_ts: Option<u64>,
}

/// Sensor decorated with its liveness and most recent reading
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SensorView {
    pub sensor: Sensor,
    pub status: Liveness,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen_at: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_reading: Option<Reading>,
}
