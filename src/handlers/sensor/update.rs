use axum::{extract::State, Json};
use mongodb::{
    bson::{doc, Document},
    options::{FindOneAndUpdateOptions, ReturnDocument},
};
use std::sync::Arc;

use super::helper::{check_villager_exists, parse_dev_eui};
use crate::{
    auth::AdminClaims,
    constants::*,
    models::{Sensor, SensorRecordResponse, UpdateSensorReq},
    state::AppState,
    utils::{get_epoch_ts, AppError, ValidatedBody, ValidatedPath},
};

/// Update sensor
///
/// Set `unassign` to remove the villager mapping
#[utoipa::path(
    put,
    path = "/api/sensors/{dev_eui}",
    params(("dev_eui" = String, Path, description = "16 hex character device identifier")),
    request_body = UpdateSensorReq,
    responses(
        (status = 200, description = "Updated sensor", body = SensorRecordResponse),
        (status = 400, description = "Invalid request body", body = crate::models::ErrorResponse),
        (status = 404, description = "Sensor or villager not found", body = crate::models::ErrorResponse)
    ),
    tag = "Sensor API",
    security(("authorization" = []))
)]
pub async fn update_sensor_handler(
    State(state): State<Arc<AppState>>,
    _admin: AdminClaims,
    ValidatedPath(dev_eui): ValidatedPath<String>,
    ValidatedBody(body): ValidatedBody<UpdateSensorReq>,
) -> Result<Json<SensorRecordResponse>, AppError> {
    let dev_eui = parse_dev_eui(&dev_eui)?;
    let update = update_doc(&body)?;
    if let Some(villager_id) = body.villager_id {
        check_villager_exists(&state.db, villager_id).await?;
    }
    let mut options = FindOneAndUpdateOptions::default();
    options.upsert = Some(false);
    options.return_document = Some(ReturnDocument::After);
    let sensor = state
        .db
        .find_one_and_update::<Sensor>(
            DB_NAME,
            COLL_SENSORS,
            doc! {"devEui": &dev_eui},
            update,
            Some(options),
        )
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Sensor not found with devEui: {dev_eui}")))?;
    tracing::debug!("Sensor {dev_eui} updated");
    let res = SensorRecordResponse {
        success: true,
        data: sensor,
    };
    Ok(Json(res))
}

fn update_doc(body: &UpdateSensorReq) -> Result<Document, AppError> {
    let unassign = body.unassign.unwrap_or_default();
    if unassign && body.villager_id.is_some() {
        let err = "villagerId and unassign can not be used together";
        return Err(AppError::BadRequestErr(err.into()));
    }
    let mut set = Document::new();
    if let Some(name) = &body.name {
        set.insert("name", name.trim());
    }
    if let Some(sensor_type) = &body.sensor_type {
        set.insert("sensorType", sensor_type.as_str());
    }
    if let Some(villager_id) = body.villager_id {
        set.insert("villagerId", villager_id);
    }
    if let Some(location) = &body.location {
        set.insert("location", location.as_str());
    }
    if let Some(is_active) = body.is_active {
        set.insert("isActive", is_active);
    }
    if set.is_empty() && !unassign {
        return Err(AppError::BadRequestErr("Nothing to update".into()));
    }
    set.insert("updatedTs", get_epoch_ts() as i64);
    let mut update = doc! {"$set": set};
    if unassign {
        update.insert("$unset", doc! {"villagerId": ""});
    }
    Ok(update)
}

#[cfg(test)]
mod tests {
    use axum::{http::Method, http::StatusCode, routing::put, Router};
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::{database::MockAppDatabase, state::test_support::*};

    fn app(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/api/sensors/:dev_eui", put(update_sensor_handler))
            .with_state(state)
    }

    #[test]
    fn test_update_doc_unassign() {
        let body = UpdateSensorReq {
            unassign: Some(true),
            ..Default::default()
        };
        let update = update_doc(&body).unwrap();
        assert!(update.get_document("$unset").unwrap().contains_key("villagerId"));
        let set = update.get_document("$set").unwrap();
        assert!(set.contains_key("updatedTs"));

        let body = UpdateSensorReq {
            unassign: Some(true),
            villager_id: Some(2),
            ..Default::default()
        };
        assert!(matches!(update_doc(&body), Err(AppError::BadRequestErr(_))));
        assert!(update_doc(&UpdateSensorReq::default()).is_err());
    }

    #[tokio::test]
    async fn test_update_sensor_mapping() {
        let mut mock_db = MockAppDatabase::default();
        mock_db
            .expect_count_documents()
            .times(1)
            .returning(|_, _, _, _| Ok(1));
        mock_db
            .expect_find_one_and_update::<Sensor>()
            .withf(|_, coll, filter, update, _| {
                coll == COLL_SENSORS
                    && filter == &doc! {"devEui": "70B3D57ED0001ABC"}
                    && update
                        .get_document("$set")
                        .map(|set| set.contains_key("villagerId"))
                        .unwrap_or(false)
            })
            .times(1)
            .returning(|_, _, _, _, _| Ok(Some(sample_sensor("70B3D57ED0001ABC", Some(6)))));
        let state = test_state(mock_db);
        let token = admin_token(&state);
        let body = json!({"villagerId": 6});
        let uri = "/api/sensors/70b3d57ed0001abc";
        let req = build_request(Method::PUT, uri, Some(&token), Some(body));
        let res = app(state).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let res: SensorRecordResponse = read_json(res).await;
        assert_eq!(res.data.villager_id, Some(6));
    }
}
