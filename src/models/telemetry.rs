use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One telemetry sample in the time-series store
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub dev_eui: String,
    /// EPOCH timestamp in seconds
    pub ts: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub moisture: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery: Option<f64>,
}
