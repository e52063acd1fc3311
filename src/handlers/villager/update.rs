use axum::{extract::State, Json};
use mongodb::{
    bson::{doc, Document},
    options::{FindOneAndUpdateOptions, ReturnDocument},
};
use std::sync::Arc;

use super::helper::{check_uniq_aadhaar, check_uniq_phone};
use crate::{
    auth::AdminClaims,
    constants::*,
    models::{UpdateVillagerReq, Villager, VillagerResponse},
    state::AppState,
    utils::{get_epoch_ts, AppError, ValidatedBody, ValidatedPath},
};

/// Update villager
///
/// Only the fields present in the body are changed
#[utoipa::path(
    put,
    path = "/api/villagers/{id}",
    params(("id" = u32, Path, description = "villager id")),
    request_body = UpdateVillagerReq,
    responses(
        (status = 200, description = "Updated villager", body = VillagerResponse),
        (status = 400, description = "Invalid request body", body = crate::models::ErrorResponse),
        (status = 404, description = "Villager not found", body = crate::models::ErrorResponse),
        (status = 409, description = "Phone or Aadhaar already registered", body = crate::models::ErrorResponse)
    ),
    tag = "Villager API",
    security(("authorization" = []))
)]
pub async fn update_villager_handler(
    State(state): State<Arc<AppState>>,
    _admin: AdminClaims,
    ValidatedPath(id): ValidatedPath<u32>,
    ValidatedBody(body): ValidatedBody<UpdateVillagerReq>,
) -> Result<Json<VillagerResponse>, AppError> {
    if let Some(phone) = &body.phone {
        check_uniq_phone(&state.db, phone, Some(id)).await?;
    }
    if let Some(aadhaar) = &body.aadhaar {
        check_uniq_aadhaar(&state.db, aadhaar, Some(id)).await?;
    }
    let update = update_doc(&body)?;
    let mut options = FindOneAndUpdateOptions::default();
    options.upsert = Some(false);
    options.return_document = Some(ReturnDocument::After);
    let villager = state
        .db
        .find_one_and_update::<Villager>(
            DB_NAME,
            COLL_VILLAGERS,
            doc! {"id": id},
            update,
            Some(options),
        )
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Villager not found with id: {id}")))?;
    tracing::debug!("Villager {id} updated");
    let res = VillagerResponse {
        success: true,
        data: villager,
    };
    Ok(Json(res))
}

fn update_doc(body: &UpdateVillagerReq) -> Result<Document, AppError> {
    let mut set = Document::new();
    if let Some(name) = &body.name {
        set.insert("name", name.trim());
    }
    if let Some(aadhaar) = &body.aadhaar {
        set.insert("aadhaar", aadhaar.as_str());
    }
    if let Some(phone) = &body.phone {
        set.insert("phone", phone.as_str());
    }
    if let Some(village) = &body.village {
        set.insert("village", village.trim());
    }
    if let Some(panchayat) = &body.panchayat {
        set.insert("panchayat", panchayat.trim());
    }
    if let Some(is_active) = body.is_active {
        set.insert("isActive", is_active);
    }
    if set.is_empty() {
        return Err(AppError::BadRequestErr("Nothing to update".into()));
    }
    set.insert("updatedTs", get_epoch_ts() as i64);
    Ok(doc! {"$set": set})
}
