use mongodb::bson::{doc, Document};
use std::sync::Arc;

use crate::{
    constants::*,
    models::Sensor,
    utils::{normalize_dev_eui, AppError},
};

#[cfg(test)]
use mockall_double::double;

#[cfg_attr(test, double)]
use crate::database::AppDatabase;

/// Normalize a devEUI taken from the request path
pub fn parse_dev_eui(dev_eui: &str) -> Result<String, AppError> {
    let dev_eui = normalize_dev_eui(dev_eui);
    let valid = dev_eui.len() == DEV_EUI_LENGTH && dev_eui.chars().all(|ch| ch.is_ascii_hexdigit());
    if !valid {
        let err = format!("devEui must be {DEV_EUI_LENGTH} hex characters: {dev_eui}");
        return Err(AppError::BadRequestErr(err));
    }
    Ok(dev_eui)
}

pub async fn sensor_by_dev_eui(db: &Arc<AppDatabase>, dev_eui: &str) -> Result<Sensor, AppError> {
    let filter = Some(doc! {"devEui": dev_eui});
    db.find_one::<Sensor>(DB_NAME, COLL_SENSORS, filter, None)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Sensor not found with devEui: {dev_eui}")))
}

// devEui is the primary key of the sensors collection
pub async fn check_uniq_dev_eui(db: &Arc<AppDatabase>, dev_eui: &str) -> Result<(), AppError> {
    let filter = Some(doc! {"devEui": dev_eui});
    let result = db
        .find_one::<Document>(DB_NAME, COLL_SENSORS, filter, None)
        .await?;
    if result.is_some() {
        let err = format!("Sensor already registered with devEui: {dev_eui}");
        return Err(AppError::Conflict(err));
    }
    Ok(())
}

/// A sensor can only be mapped to an existing villager
pub async fn check_villager_exists(db: &Arc<AppDatabase>, villager_id: u32) -> Result<(), AppError> {
    let filter = Some(doc! {"id": villager_id});
    let count = db
        .count_documents(DB_NAME, COLL_VILLAGERS, filter, None)
        .await?;
    if count == 0 {
        let err = format!("Villager not found with id: {villager_id}");
        return Err(AppError::NotFound(err));
    }
    Ok(())
}
