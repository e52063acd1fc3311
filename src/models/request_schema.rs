use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::utils::{validate_aadhaar, validate_phonenumber, validation::DEV_EUI_REGEX};

/// request body for Aadhaar number login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AadhaarLoginReq {
    #[validate(custom(function = "validate_aadhaar"))]
    pub aadhaar: String,
}

/// request body carrying only a phone number
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PhoneReq {
    #[validate(custom(function = "validate_phonenumber"))]
    pub phone: String,
}

/// request body for checking an otp
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CheckOtpReq {
    #[validate(custom(function = "validate_phonenumber"))]
    pub phone: String,
    #[validate(length(equal = 6))]
    pub otp: String,
}

/// request body for username/password admin login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AdminLoginReq {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(length(min = 1, max = 200))]
    pub password: String,
}

/// request body to register a villager
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateVillagerReq {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(custom(function = "validate_aadhaar"))]
    pub aadhaar: String,

    #[validate(custom(function = "validate_phonenumber"))]
    pub phone: String,

    #[validate(length(min = 1, max = 100))]
    pub village: String,

    #[validate(length(min = 1, max = 100))]
    pub panchayat: String,
}

/// request body to update a villager, absent fields are left untouched
#[derive(Debug, Default, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVillagerReq {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(custom(function = "validate_aadhaar"))]
    pub aadhaar: Option<String>,

    #[validate(custom(function = "validate_phonenumber"))]
    pub phone: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub village: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub panchayat: Option<String>,

    pub is_active: Option<bool>,
}

/// query params to list villagers
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct VillagerListParams {
    pub village: Option<String>,
    pub panchayat: Option<String>,
    pub page_index: Option<u64>,
    pub page_size: Option<u64>,
}

/// request body to register a sensor
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSensorReq {
    #[validate(regex = "DEV_EUI_REGEX")]
    pub dev_eui: String,

    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(min = 1, max = 50))]
    pub sensor_type: Option<String>,

    pub villager_id: Option<u32>,

    #[validate(length(min = 1, max = 200))]
    pub location: Option<String>,
}

/// request body to update a sensor, absent fields are left untouched
#[derive(Debug, Default, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSensorReq {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub sensor_type: Option<String>,

    pub villager_id: Option<u32>,

    /// removes the villager mapping when true
    pub unassign: Option<bool>,

    #[validate(length(min = 1, max = 200))]
    pub location: Option<String>,

    pub is_active: Option<bool>,
}

/// query params to list sensors
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SensorListParams {
    pub villager_id: Option<u32>,
    pub page_index: Option<u64>,
    pub page_size: Option<u64>,
}

/// telemetry reported by a sensor
#[derive(Debug, Default, Clone, Deserialize, Validate, ToSchema)]
pub struct ReadingReq {
    /// EPOCH timestamp in seconds, defaults to the time of receipt
    pub ts: Option<u64>,
    pub temperature: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub humidity: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub moisture: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub battery: Option<f64>,
}
