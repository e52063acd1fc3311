use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Sensor, SensorView, Villager};
use crate::auth::{IssuedSession, Principal, Role, SessionClaims};
use crate::utils::format_epoch_ts;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenericResponse {
    pub success: bool,
    pub message: String,
}

/// body of every failed request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    /// stable machine readable error code
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error: String, code: &str) -> Self {
        Self {
            success: false,
            error,
            code: code.to_owned(),
        }
    }
}

/// response schema for every successful login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub success: bool,
    pub token: String,
    pub role: Role,
    /// EPOCH timestamp in seconds
    pub expires_at: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub villager: Option<Villager>,
}

impl SessionResponse {
    pub fn new(session: IssuedSession, villager: Option<Villager>) -> Self {
        Self {
            success: true,
            role: session.claims.role(),
            expires_at: session.claims.exp,
            token: session.token,
            villager,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OtpSentResponse {
    pub success: bool,
    pub message: String,
    /// seconds until the code expires
    pub expires_in: u64,
    /// only present when otp exposure is enabled for development
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
}

/// Public view of the claims carried by a session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub villager_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub village: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panchayat: Option<String>,
    pub issued_at: u64,
    pub expires_at: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at_iso: Option<String>,
}

impl From<&SessionClaims> for SessionInfo {
    fn from(claims: &SessionClaims) -> Self {
        let mut info = Self {
            role: claims.role(),
            username: None,
            phone: None,
            villager_id: None,
            name: None,
            village: None,
            panchayat: None,
            issued_at: claims.iat,
            expires_at: claims.exp,
            expires_at_iso: format_epoch_ts(claims.exp),
        };
        match &claims.principal {
            Principal::Admin { username, .. } => info.username = Some(username.clone()),
            Principal::Villager {
                phone,
                villager_id,
                name,
                village,
                panchayat,
            } => {
                info.phone = Some(phone.clone());
                info.villager_id = *villager_id;
                info.name = Some(name.clone());
                info.village = Some(village.clone());
                info.panchayat = Some(panchayat.clone());
            }
        }
        info
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidateResponse {
    pub success: bool,
    pub valid: bool,
    pub session: SessionInfo,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub success: bool,
    pub profile: SessionInfo,
    /// current villager record, absent for admin sessions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub villager: Option<Villager>,
    pub sensor_count: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VillagerResponse {
    pub success: bool,
    pub data: Villager,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VillagerListResponse {
    pub success: bool,
    pub data: Vec<Villager>,
}

/// sensor record decorated with its liveness
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SensorResponse {
    pub success: bool,
    pub data: SensorView,
}

/// sensor record as stored
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SensorRecordResponse {
    pub success: bool,
    pub data: Sensor,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SensorListResponse {
    pub success: bool,
    pub data: Vec<SensorView>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReadingAccepted {
    pub success: bool,
    pub dev_eui: String,
    pub ts: u64,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub total_villagers: u64,
    pub active_villagers: u64,
    pub total_sensors: u64,
    pub live_sensors: u64,
    pub offline_sensors: u64,
    pub recent_villagers: Vec<Villager>,
    pub recent_sensors: Vec<SensorView>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    pub success: bool,
    pub data: DashboardData,
}
