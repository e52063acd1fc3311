use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::VillagerIdentity;

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Villager {
    pub id: u32,
    pub name: String,
    pub aadhaar: String,
    pub phone: String,
    pub village: String,
    pub panchayat: String,
    pub is_active: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_ts: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_ts: Option<u64>,
}

impl From<&Villager> for VillagerIdentity {
    fn from(villager: &Villager) -> Self {
        Self {
            phone: villager.phone.clone(),
            villager_id: Some(villager.id),
            name: villager.name.clone(),
            village: villager.village.clone(),
            panchayat: villager.panchayat.clone(),
        }
    }
}
