use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use super::helper::{check_uniq_dev_eui, check_villager_exists};
use crate::{
    auth::AdminClaims,
    constants::*,
    models::{CreateSensorReq, Sensor, SensorRecordResponse},
    state::AppState,
    utils::{get_epoch_ts, normalize_dev_eui, AppError, ValidatedBody},
};

/// Register sensor
///
/// devEui is stored upper case and must be unique
#[utoipa::path(
    post,
    path = "/api/sensors",
    request_body = CreateSensorReq,
    responses(
        (status = 201, description = "Sensor registered", body = SensorRecordResponse),
        (status = 400, description = "Invalid request body", body = crate::models::ErrorResponse),
        (status = 404, description = "Mapped villager not found", body = crate::models::ErrorResponse),
        (status = 409, description = "devEui already registered", body = crate::models::ErrorResponse)
    ),
    tag = "Sensor API",
    security(("authorization" = []))
)]
pub async fn create_sensor_handler(
    State(state): State<Arc<AppState>>,
    _admin: AdminClaims,
    ValidatedBody(body): ValidatedBody<CreateSensorReq>,
) -> Result<(StatusCode, Json<SensorRecordResponse>), AppError> {
    let dev_eui = normalize_dev_eui(&body.dev_eui);
    check_uniq_dev_eui(&state.db, &dev_eui).await?;
    if let Some(villager_id) = body.villager_id {
        check_villager_exists(&state.db, villager_id).await?;
    }
    let sensor = Sensor {
        dev_eui,
        name: body.name.trim().to_owned(),
        sensor_type: body.sensor_type,
        villager_id: body.villager_id,
        location: body.location,
        is_active: true,
        created_ts: Some(get_epoch_ts()),
        updated_ts: None,
    };
    state
        .db
        .insert_one::<Sensor>(DB_NAME, COLL_SENSORS, &sensor, None)
        .await?;
    tracing::info!("Sensor {} registered", sensor.dev_eui);
    let res = SensorRecordResponse {
        success: true,
        data: sensor,
    };
    Ok((StatusCode::CREATED, Json(res)))
}

#[cfg(test)]
mod tests {
    use axum::{http::Method, routing::post, Router};
    use mongodb::bson::{doc, Document};
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::{database::MockAppDatabase, models::ErrorResponse, state::test_support::*};

    fn app(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/api/sensors", post(create_sensor_handler))
            .with_state(state)
    }

    #[tokio::test]
    async fn test_create_sensor_normalizes_dev_eui() {
        let mut mock_db = MockAppDatabase::default();
        mock_db
            .expect_find_one::<Document>()
            .withf(|_, _, filter, _| filter == &Some(doc! {"devEui": "70B3D57ED0001ABC"}))
            .times(1)
            .returning(|_, _, _, _| Ok(None));
        mock_db
            .expect_count_documents()
            .times(1)
            .returning(|_, _, _, _| Ok(1));
        mock_db
            .expect_insert_one::<Sensor>()
            .withf(|_, coll, sensor, _| coll == COLL_SENSORS && sensor.villager_id == Some(3))
            .times(1)
            .returning(|_, _, _, _| Ok(()));
        let state = test_state(mock_db);
        let token = admin_token(&state);
        let body = json!({"devEui": "70b3d57ed0001abc", "name": "Soil probe", "villagerId": 3});
        let req = build_request(Method::POST, "/api/sensors", Some(&token), Some(body));
        let res = app(state).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let res: SensorRecordResponse = read_json(res).await;
        assert_eq!(res.data.dev_eui, "70B3D57ED0001ABC");
        assert_eq!(res.data.is_active, true);
    }

    #[tokio::test]
    async fn test_create_sensor_unknown_villager() {
        let mut mock_db = MockAppDatabase::default();
        mock_db
            .expect_find_one::<Document>()
            .times(1)
            .returning(|_, _, _, _| Ok(None));
        mock_db
            .expect_count_documents()
            .times(1)
            .returning(|_, _, _, _| Ok(0));
        let state = test_state(mock_db);
        let token = admin_token(&state);
        let body = json!({"devEui": "70B3D57ED0001ABC", "name": "Soil probe", "villagerId": 8});
        let req = build_request(Method::POST, "/api/sensors", Some(&token), Some(body));
        let res = app(state).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let res: ErrorResponse = read_json(res).await;
        assert_eq!(res.error, "Villager not found with id: 8");
    }

    #[tokio::test]
    async fn test_create_sensor_invalid_dev_eui() {
        let state = test_state(MockAppDatabase::default());
        let token = admin_token(&state);
        let body = json!({"devEui": "xyz", "name": "Soil probe"});
        let req = build_request(Method::POST, "/api/sensors", Some(&token), Some(body));
        let res = app(state).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
