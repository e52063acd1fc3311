use axum::{extract::State, Json};
use mongodb::bson::doc;
use std::sync::Arc;

use crate::{
    auth::Role,
    config::AppConfig,
    constants::*,
    handlers::villager::helper::active_villager,
    models::{AadhaarLoginReq, SessionResponse},
    state::AppState,
    utils::{constant_time_eq, get_epoch_ts, AppError, ValidatedBody},
};

/// Aadhaar login
///
/// Logs in as the administrator when the number matches the configured admin Aadhaar,
/// otherwise as the villager registered with that number
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = AadhaarLoginReq,
    responses(
        (status = 200, description = "Session issued", body = SessionResponse),
        (status = 400, description = "Invalid Aadhaar number", body = crate::models::ErrorResponse),
        (status = 404, description = "No villager with this Aadhaar number", body = crate::models::ErrorResponse)
    ),
    tag = "Auth API"
)]
pub async fn aadhaar_login_handler(
    State(state): State<Arc<AppState>>,
    ValidatedBody(body): ValidatedBody<AadhaarLoginReq>,
) -> Result<Json<SessionResponse>, AppError> {
    if is_admin_aadhaar(&state.config, &body.aadhaar) {
        let session = state
            .sessions
            .issue_admin_session_for(DEFAULT_ADMIN_USERNAME, Role::Admin, get_epoch_ts())
            .map_err(AppError::Session)?;
        tracing::info!("Admin logged in with Aadhaar");
        return Ok(Json(SessionResponse::new(session, None)));
    }
    let filter = doc! {"aadhaar": &body.aadhaar};
    let not_found = "No villager registered with this Aadhaar number";
    let villager = active_villager(&state.db, filter, not_found).await?;
    let session = state
        .sessions
        .issue_villager_session((&villager).into())
        .map_err(AppError::Session)?;
    tracing::debug!("Villager {} logged in with Aadhaar", villager.id);
    Ok(Json(SessionResponse::new(session, Some(villager))))
}

fn is_admin_aadhaar(config: &AppConfig, aadhaar: &str) -> bool {
    config
        .admin_aadhaar
        .as_deref()
        .map(|admin| constant_time_eq(admin, aadhaar))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use axum::{http::Method, http::StatusCode, routing::post, Router};
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::{
        database::MockAppDatabase,
        models::{ErrorResponse, Villager},
        state::test_support::*,
    };

    fn app(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/api/login", post(aadhaar_login_handler))
            .with_state(state)
    }

    #[tokio::test]
    async fn test_admin_aadhaar_login() {
        let state = test_state(MockAppDatabase::default());
        let body = json!({"aadhaar": ADMIN_AADHAAR});
        let req = build_request(Method::POST, "/api/login", None, Some(body));
        let res = app(state.clone()).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let res: SessionResponse = read_json(res).await;
        assert_eq!(res.role, Role::Admin);
        let claims = state.sessions.validate(&res.token).unwrap();
        assert_eq!(claims.role(), Role::Admin);
    }

    #[tokio::test]
    async fn test_villager_aadhaar_login() {
        let mut mock_db = MockAppDatabase::default();
        mock_db
            .expect_find_one::<Villager>()
            .withf(|_, coll, filter, _| {
                coll == COLL_VILLAGERS && filter == &Some(doc! {"aadhaar": "123412341234"})
            })
            .times(1)
            .returning(|_, _, _, _| Ok(Some(sample_villager(42))));
        let state = test_state(mock_db);
        let body = json!({"aadhaar": "123412341234"});
        let req = build_request(Method::POST, "/api/login", None, Some(body));
        let res = app(state.clone()).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let res: SessionResponse = read_json(res).await;
        assert_eq!(res.role, Role::Villager);
        assert_eq!(res.villager.map(|v| v.id), Some(42));
        let claims = state.sessions.validate(&res.token).unwrap();
        assert_eq!(claims.villager_id(), Some(42));
    }

    #[tokio::test]
    async fn test_unknown_aadhaar_login() {
        let mut mock_db = MockAppDatabase::default();
        mock_db
            .expect_find_one::<Villager>()
            .times(1)
            .returning(|_, _, _, _| Ok(None));
        let state = test_state(mock_db);
        let body = json!({"aadhaar": "111122223333"});
        let req = build_request(Method::POST, "/api/login", None, Some(body));
        let res = app(state).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_short_aadhaar_is_rejected() {
        let state = test_state(MockAppDatabase::default());
        let body = json!({"aadhaar": "12345"});
        let req = build_request(Method::POST, "/api/login", None, Some(body));
        let res = app(state).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let res: ErrorResponse = read_json(res).await;
        assert!(res.error.contains("Aadhaar must be 12 digits"));
    }
}
