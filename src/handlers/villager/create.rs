use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use super::helper::{check_uniq_aadhaar, check_uniq_phone};
use crate::{
    auth::AdminClaims,
    constants::*,
    models::{CreateVillagerReq, Villager, VillagerResponse},
    state::AppState,
    utils::{get_epoch_ts, get_seq_nxt_val, AppError, ValidatedBody},
};

/// Register villager
///
/// Phone and Aadhaar number must not be used by any other villager
#[utoipa::path(
    post,
    path = "/api/villagers",
    request_body = CreateVillagerReq,
    responses(
        (status = 201, description = "Villager created", body = VillagerResponse),
        (status = 400, description = "Invalid request body", body = crate::models::ErrorResponse),
        (status = 401, description = "Invalid token", body = crate::models::ErrorResponse),
        (status = 409, description = "Phone or Aadhaar already registered", body = crate::models::ErrorResponse)
    ),
    tag = "Villager API",
    security(("authorization" = []))
)]
pub async fn create_villager_handler(
    State(state): State<Arc<AppState>>,
    _admin: AdminClaims,
    ValidatedBody(body): ValidatedBody<CreateVillagerReq>,
) -> Result<(StatusCode, Json<VillagerResponse>), AppError> {
    check_uniq_phone(&state.db, &body.phone, None).await?;
    check_uniq_aadhaar(&state.db, &body.aadhaar, None).await?;
    let id = get_seq_nxt_val(VILLAGER_ID_SEQ, &state.db).await?;
    let villager = Villager {
        id,
        name: body.name.trim().to_owned(),
        aadhaar: body.aadhaar,
        phone: body.phone,
        village: body.village.trim().to_owned(),
        panchayat: body.panchayat.trim().to_owned(),
        is_active: true,
        created_ts: Some(get_epoch_ts()),
        updated_ts: None,
    };
    state
        .db
        .insert_one::<Villager>(DB_NAME, COLL_VILLAGERS, &villager, None)
        .await?;
    tracing::info!("Villager {id} registered");
    let res = VillagerResponse {
        success: true,
        data: villager,
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
    use crate::{
        database::MockAppDatabase,
        models::ErrorResponse,
        state::test_support::*,
    };

    fn body() -> serde_json::Value {
        json!({
            "name": "Sita Devi",
            "aadhaar": "432143214321",
            "phone": "9123456789",
            "village": "Rampur",
            "panchayat": "Rampur GP"
        })
    }

    fn app(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/api/villagers", post(create_villager_handler))
            .with_state(state)
    }

    #[tokio::test]
    async fn test_create_villager() {
        let mut mock_db = MockAppDatabase::default();
        mock_db
            .expect_find_one::<Document>()
            .times(2)
            .returning(|_, _, _, _| Ok(None));
        mock_db
            .expect_find_one_and_update::<Document>()
            .times(1)
            .returning(|_, _, _, _, _| Ok(Some(doc! {"val": 12})));
        mock_db
            .expect_insert_one::<Villager>()
            .withf(|db, coll, villager, _| {
                db == DB_NAME && coll == COLL_VILLAGERS && villager.id == 12 && villager.is_active
            })
            .times(1)
            .returning(|_, _, _, _| Ok(()));
        let state = test_state(mock_db);
        let token = admin_token(&state);
        let req = build_request(Method::POST, "/api/villagers", Some(&token), Some(body()));
        let res = app(state).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let res: VillagerResponse = read_json(res).await;
        assert_eq!(res.data.id, 12);
        assert_eq!(res.data.name, "Sita Devi");
    }

    #[tokio::test]
    async fn test_create_villager_duplicate_phone() {
        let mut mock_db = MockAppDatabase::default();
        mock_db
            .expect_find_one::<Document>()
            .times(1)
            .returning(|_, _, _, _| Ok(Some(doc! {"id": 1})));
        let state = test_state(mock_db);
        let token = admin_token(&state);
        let req = build_request(Method::POST, "/api/villagers", Some(&token), Some(body()));
        let res = app(state).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::CONFLICT);
        let res: ErrorResponse = read_json(res).await;
        assert_eq!(res.code, "CONFLICT");
    }

    #[tokio::test]
    async fn test_create_villager_rejects_villager_session() {
        let state = test_state(MockAppDatabase::default());
        let token = villager_token(&state, &sample_villager(1));
        let req = build_request(Method::POST, "/api/villagers", Some(&token), Some(body()));
        let res = app(state).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_create_villager_invalid_body() {
        let state = test_state(MockAppDatabase::default());
        let token = admin_token(&state);
        let mut body = body();
        body["aadhaar"] = json!("1234");
        let req = build_request(Method::POST, "/api/villagers", Some(&token), Some(body));
        let res = app(state).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let res: ErrorResponse = read_json(res).await;
        assert_eq!(res.code, "VALIDATION_ERROR");
    }
}
