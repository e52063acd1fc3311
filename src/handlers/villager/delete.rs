use axum::{extract::State, Json};
use mongodb::bson::doc;
use std::sync::Arc;

use crate::{
    auth::AdminClaims,
    constants::*,
    models::GenericResponse,
    state::AppState,
    utils::{get_epoch_ts, AppError, ValidatedPath},
};

/// Delete villager
///
/// Sensors mapped to the villager are unassigned
#[utoipa::path(
    delete,
    path = "/api/villagers/{id}",
    params(("id" = u32, Path, description = "villager id")),
    responses(
        (status = 200, description = "Villager deleted", body = GenericResponse),
        (status = 404, description = "Villager not found", body = crate::models::ErrorResponse)
    ),
    tag = "Villager API",
    security(("authorization" = []))
)]
pub async fn delete_villager_handler(
    State(state): State<Arc<AppState>>,
    _admin: AdminClaims,
    ValidatedPath(id): ValidatedPath<u32>,
) -> Result<Json<GenericResponse>, AppError> {
    let deleted = state
        .db
        .delete_one(DB_NAME, COLL_VILLAGERS, doc! {"id": id}, None)
        .await?;
    if deleted == 0 {
        let err = AppError::NotFound(format!("Villager not found with id: {id}"));
        return Err(err);
    }
    let filter = doc! {"villagerId": id};
    let update = doc! {
        "$unset": {"villagerId": ""},
        "$set": {"updatedTs": get_epoch_ts() as i64}
    };
    let unassigned = state
        .db
        .update_many(DB_NAME, COLL_SENSORS, filter, update, None)
        .await?;
    tracing::info!("Villager {id} deleted, {unassigned} sensor(s) unassigned");
    let res = GenericResponse {
        success: true,
        message: format!("Villager {id} deleted"),
    };
    Ok(Json(res))
}

#[cfg(test)]
mod tests {
    use axum::{http::Method, http::StatusCode, routing::delete, Router};
    use tower::ServiceExt;

    use super::*;
    use crate::{database::MockAppDatabase, state::test_support::*};

    fn app(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/api/villagers/:id", delete(delete_villager_handler))
            .with_state(state)
    }

    #[tokio::test]
    async fn test_delete_villager_unassigns_sensors() {
        let mut mock_db = MockAppDatabase::default();
        mock_db
            .expect_delete_one()
            .withf(|db, coll, filter, _| {
                db == DB_NAME && coll == COLL_VILLAGERS && filter == &doc! {"id": 5}
            })
            .times(1)
            .returning(|_, _, _, _| Ok(1));
        mock_db
            .expect_update_many()
            .withf(|_, coll, filter, update, _| {
                coll == COLL_SENSORS
                    && filter == &doc! {"villagerId": 5}
                    && update.contains_key("$unset")
            })
            .times(1)
            .returning(|_, _, _, _, _| Ok(2));
        let state = test_state(mock_db);
        let token = admin_token(&state);
        let req = build_request(Method::DELETE, "/api/villagers/5", Some(&token), None);
        let res = app(state).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let res: GenericResponse = read_json(res).await;
        assert_eq!(res.success, true);
    }

    #[tokio::test]
    async fn test_delete_missing_villager() {
        let mut mock_db = MockAppDatabase::default();
        mock_db
            .expect_delete_one()
            .times(1)
            .returning(|_, _, _, _| Ok(0));
        let state = test_state(mock_db);
        let token = admin_token(&state);
        let req = build_request(Method::DELETE, "/api/villagers/5", Some(&token), None);
        let res = app(state).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
